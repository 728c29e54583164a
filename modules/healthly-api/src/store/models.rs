use chrono::NaiveDate;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// District attorney office contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub county: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax: Option<String>,
    pub link_to_website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub county: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax: Option<String>,
    pub link_to_website: Option<String>,
}

// ---------------------------------------------------------------------------
// Licenses
// ---------------------------------------------------------------------------

/// One row of the state license registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub license_address_id: i64,
    pub license_id: Option<i64>,
    pub license_number: Option<i64>,
    pub license_code_description: Option<String>,
    pub application_form_type_id: Option<i64>,
    pub license_type_id: Option<i64>,
    pub license_type_code: Option<String>,
    pub license_status_id: Option<i64>,
    pub license_status_code: Option<String>,
    pub license_classification_id: Option<i64>,
    pub license_classification_code: Option<String>,
    pub license_classification_description: Option<String>,
    #[serde(serialize_with = "us_date")]
    pub expiration_date: Option<NaiveDate>,
    pub firm_id: Option<i64>,
    pub corporate_name: Option<String>,
    pub business_name: Option<String>,
    pub doing_business_as: Option<String>,
    pub state_incorporation: Option<String>,
    #[serde(rename = "addressLine1")]
    pub address_line_1: Option<String>,
    #[serde(rename = "addressLine2")]
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county_id: Option<i64>,
    pub county_code: Option<String>,
    pub license_address_type_id: Option<i64>,
    pub license_address_type_code: Option<String>,
    pub license_address_type_description: Option<String>,
    pub exemptee_last_name: Option<String>,
    pub exemptee_first_name: Option<String>,
}

/// `MM/DD/YYYY`, or `""` when unset.
fn us_date<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&date.format("%m/%d/%Y").to_string()),
        None => serializer.serialize_str(""),
    }
}

#[cfg(any(test, feature = "test-support"))]
impl License {
    /// Value of a filterable text column, by column name.
    pub fn text_column(&self, column: &str) -> Option<&str> {
        let value = match column {
            "business_name" => &self.business_name,
            "license_code_description" => &self.license_code_description,
            "license_status_code" => &self.license_status_code,
            "license_address_type_description" => &self.license_address_type_description,
            "address_line_1" => &self.address_line_1,
            "city" => &self.city,
            "state" => &self.state,
            "zip" => &self.zip,
            "county_code" => &self.county_code,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Exact-match license filters; every populated filter must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseFilter {
    /// `(column, value)` pairs over text columns.
    pub text: Vec<(&'static str, String)>,
    pub expiration_date: Option<NaiveDate>,
}

#[cfg(any(test, feature = "test-support"))]
impl LicenseFilter {
    /// In-memory equivalent of the SQL filter built by the Postgres store.
    pub fn matches(&self, license: &License) -> bool {
        let text_ok = self
            .text
            .iter()
            .all(|(column, value)| license.text_column(column) == Some(value.as_str()));
        let date_ok = self
            .expiration_date
            .map_or(true, |date| license.expiration_date == Some(date));
        text_ok && date_ok
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
