use serde::Serialize;
use sqlx::FromRow;

use crate::auth::roles::Role;

/// User record, keyed by the identity provider's subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: String,            // Google `sub`
    pub email: String,
    pub name: String,
    pub role: Role,
    pub prodi: Option<String>, // academic program
}

/// Fields refreshed from verified claims on every authentication.
#[derive(Debug, Clone)]
pub struct IdentityUpsert<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub role: Role,
}
