use serde::{Deserialize, Serialize};

/// Payload of a Google ID token. `aud`, `iss` and `exp` are checked by
/// `jsonwebtoken` during decoding and are not kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleClaims {
    pub sub: String,          // stable Google account id
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>, // display name, absent for some accounts
}

/// Verified identity handed to the role resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub subject: String,
    pub email: String,
    pub name: String,
}

impl IdentityClaims {
    /// Returns `None` when the token carries no email.
    pub fn from_google(claims: GoogleClaims) -> Option<Self> {
        let email = claims.email.filter(|e| !e.trim().is_empty())?;
        let name = claims
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        Some(Self {
            subject: claims.sub,
            email,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google(email: Option<&str>, name: Option<&str>) -> GoogleClaims {
        GoogleClaims {
            sub: "1234".into(),
            email: email.map(Into::into),
            email_verified: true,
            name: name.map(Into::into),
        }
    }

    #[test]
    fn name_falls_back_to_email_local_part() {
        let c = IdentityClaims::from_google(google(Some("budi@gmail.com"), None)).unwrap();
        assert_eq!(c.name, "budi");
        assert_eq!(c.subject, "1234");
    }

    #[test]
    fn missing_email_is_rejected() {
        assert!(IdentityClaims::from_google(google(None, Some("Budi"))).is_none());
        assert!(IdentityClaims::from_google(google(Some("  "), Some("Budi"))).is_none());
    }
}
