use anyhow::Context;
use serde::Deserialize;

use crate::auth::roles::RolePolicy;

const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub certs_url: String,
    pub keys_ttl_secs: u64,
}

/// Ordering of the faculty pending queue by submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueOrder {
    Newest,
    Oldest,
}

impl QueueOrder {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(Self::Newest),
            "oldest" | "asc" => Ok(Self::Oldest),
            other => anyhow::bail!("PENDING_ORDER must be `newest` or `oldest`, got `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    pub queue_limit: i64,
    pub pending_order: QueueOrder,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            queue_limit: 5,
            pending_order: QueueOrder::Newest,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub google: GoogleConfig,
    pub roles: RolePolicy,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10)?;

        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID is not set")?,
            certs_url: std::env::var("GOOGLE_CERTS_URL").unwrap_or_else(|_| GOOGLE_CERTS_URL.into()),
            keys_ttl_secs: parse_or("GOOGLE_KEYS_TTL_SECS", 3600)?,
        };

        let roles = RolePolicy {
            domain: std::env::var("INSTITUTION_DOMAIN").unwrap_or_else(|_| "ugm.ac.id".into()),
            restrict_to_institution: parse_or("RESTRICT_TO_INSTITUTION", false)?,
        };

        let review = ReviewConfig {
            queue_limit: positive_limit("REVIEW_QUEUE_LIMIT", parse_or("REVIEW_QUEUE_LIMIT", 5)?)?,
            pending_order: match std::env::var("PENDING_ORDER") {
                Ok(v) => QueueOrder::parse(&v)?,
                Err(_) => QueueOrder::Newest,
            },
        };

        Ok(Self {
            database_url,
            max_connections,
            google,
            roles,
            review,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value `{v}`")),
        Err(_) => Ok(default),
    }
}

fn positive_limit(key: &str, value: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(value >= 1, "{key} must be at least 1, got {value}");
    Ok(value)
}
