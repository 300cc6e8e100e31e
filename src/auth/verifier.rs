use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::claims::{GoogleClaims, IdentityClaims};
use crate::config::GoogleConfig;

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Unknown key ids trigger a refetch at most this often.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed token header: {0}")]
    Header(#[source] jsonwebtoken::errors::Error),
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("unknown signing key `{0}`")]
    UnknownKey(String),
    #[error("fetch signing keys: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("no signing keys available")]
    NoKeys,
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no email")]
    MissingEmail,
    #[error("email is not verified by google")]
    UnverifiedEmail,
}

/// Turns a bearer token into verified identity claims.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifyError>;
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

/// Verifies Google ID tokens against Google's published JWKS.
pub struct GoogleVerifier {
    client_id: String,
    certs_url: Option<String>,
    keys_ttl: Duration,
    http: reqwest::Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl GoogleVerifier {
    pub fn new(config: &GoogleConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client_id: config.client_id.clone(),
            certs_url: Some(config.certs_url.clone()),
            keys_ttl: Duration::from_secs(config.keys_ttl_secs),
            http,
            keys: RwLock::new(None),
        })
    }

    /// Verifier with a fixed key set that is never refetched.
    pub fn with_keys(client_id: impl Into<String>, set: JwkSet) -> Self {
        Self {
            client_id: client_id.into(),
            certs_url: None,
            keys_ttl: Duration::MAX,
            http: reqwest::Client::new(),
            keys: RwLock::new(Some(CachedKeys {
                set,
                fetched_at: Instant::now(),
            })),
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        {
            let cached = self.keys.read().await;
            if let Some(cached) = cached.as_ref() {
                let age = cached.fetched_at.elapsed();
                if age < self.keys_ttl {
                    if let Some(jwk) = cached.set.find(kid) {
                        return Ok(DecodingKey::from_jwk(jwk)?);
                    }
                    if age < MIN_REFETCH_INTERVAL {
                        return Err(VerifyError::UnknownKey(kid.to_string()));
                    }
                }
            }
        }

        let mut cached = self.keys.write().await;
        if let Some(url) = &self.certs_url {
            debug!(%url, "fetching google signing keys");
            let set: JwkSet = self
                .http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            info!(keys = set.keys.len(), "google signing keys refreshed");
            *cached = Some(CachedKeys {
                set,
                fetched_at: Instant::now(),
            });
        }

        let set = &cached.as_ref().ok_or(VerifyError::NoKeys)?.set;
        let jwk = set
            .find(kid)
            .ok_or_else(|| VerifyError::UnknownKey(kid.to_string()))?;
        Ok(DecodingKey::from_jwk(jwk)?)
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifyError> {
        let header = decode_header(token).map_err(VerifyError::Header)?;
        let kid = header.kid.ok_or(VerifyError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(std::slice::from_ref(&self.client_id));
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(token, &key, &validation).map_err(|e| {
            warn!(error = %e, "google id token rejected");
            VerifyError::Jwt(e)
        })?;
        if !data.claims.email_verified {
            return Err(VerifyError::UnverifiedEmail);
        }
        debug!(sub = %data.claims.sub, "google id token verified");
        IdentityClaims::from_google(data.claims).ok_or(VerifyError::MissingEmail)
    }
}
