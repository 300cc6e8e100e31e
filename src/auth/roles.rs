use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Faculty,
    Blocked,
}

/// Domain-matching policy used to derive a [`Role`] from an email address.
#[derive(Debug, Clone, Deserialize)]
pub struct RolePolicy {
    /// Institutional domain, e.g. `ugm.ac.id`. Its `mail.` subdomain is
    /// treated separately.
    pub domain: String,
    /// When set, addresses outside the institution are blocked.
    pub restrict_to_institution: bool,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self {
            domain: "ugm.ac.id".into(),
            restrict_to_institution: false,
        }
    }
}

/// Derives the role of `email` under `policy`.
///
/// Open policy: `@mail.<domain>` is faculty, every other address is a
/// student. Restricted policy: `@mail.<domain>` is a student, `@<domain>`
/// is faculty and everything else is blocked.
pub fn email_to_role(policy: &RolePolicy, email: &str) -> Role {
    let email = email.trim().to_ascii_lowercase();
    let domain = policy.domain.trim().to_ascii_lowercase();
    let in_mail_subdomain = email.ends_with(&format!("@mail.{domain}"));

    if !policy.restrict_to_institution {
        return if in_mail_subdomain {
            Role::Faculty
        } else {
            Role::Student
        };
    }

    if in_mail_subdomain {
        Role::Student
    } else if email.ends_with(&format!("@{domain}")) {
        Role::Faculty
    } else {
        Role::Blocked
    }
}
