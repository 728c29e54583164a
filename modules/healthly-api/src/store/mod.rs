// Relational storage behind one trait.
//
// PgStore is the production implementation; tests use the in-memory store
// in `crate::testing`.

pub mod models;
mod postgres;

use anyhow::Result;
use async_trait::async_trait;

pub use models::{Contact, License, LicenseFilter, NewContact, User};
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>>;

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact>;

    /// Licenses matching every populated filter, ordered by id.
    async fn search_licenses(&self, filter: &LicenseFilter) -> Result<Vec<License>>;

    /// Insert a user. Returns `false` when the username is already taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<bool>;

    async fn find_user(&self, username: &str) -> Result<Option<User>>;
}
