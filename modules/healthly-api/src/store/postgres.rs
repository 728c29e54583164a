use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{Contact, License, LicenseFilter, NewContact, User};
use super::Store;

const LICENSE_COLUMNS: &str = "license_address_id, license_id, license_number, \
    license_code_description, application_form_type_id, license_type_id, license_type_code, \
    license_status_id, license_status_code, license_classification_id, \
    license_classification_code, license_classification_description, expiration_date, firm_id, \
    corporate_name, business_name, doing_business_as, state_incorporation, address_line_1, \
    address_line_2, city, state, zip, county_id, county_code, license_address_type_id, \
    license_address_type_code, license_address_type_description, exemptee_last_name, \
    exemptee_first_name";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// `SELECT ... FROM licenses WHERE ...` with one bound predicate per filter.
fn license_query(filter: &LicenseFilter) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE TRUE "));

    for (column, value) in &filter.text {
        qb.push(format!("AND {column} = "));
        qb.push_bind(value.as_str());
        qb.push(" ");
    }
    if let Some(date) = filter.expiration_date {
        qb.push("AND expiration_date = ");
        qb.push_bind(date);
        qb.push(" ");
    }

    qb.push("ORDER BY license_address_id");
    qb
}

#[async_trait]
impl Store for PgStore {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, county, name, address, phone, fax, link_to_website
            FROM contacts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        if contacts.is_empty() {
            tracing::info!("No contacts found in the database");
        }
        Ok(contacts)
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (county, name, address, phone, fax, link_to_website)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, county, name, address, phone, fax, link_to_website
            "#,
        )
        .bind(&contact.county)
        .bind(&contact.name)
        .bind(&contact.address)
        .bind(&contact.phone)
        .bind(&contact.fax)
        .bind(&contact.link_to_website)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn search_licenses(&self, filter: &LicenseFilter) -> Result<Vec<License>> {
        let mut qb = license_query(filter);
        let licenses = qb.build_query_as::<License>().fetch_all(&self.pool).await?;

        if licenses.is_empty() {
            tracing::info!(filters = filter.text.len(), "No license found in the database");
        }
        Ok(licenses)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<bool> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.is_some())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
