use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{auth::roles::Role, users::repo_types::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "thesis_status", rename_all = "UPPERCASE")]
pub enum ThesisStatus {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ThesisStatus {
    type Err = ();

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Thesis {
    pub id: i64,
    pub title: String,
    pub doc_url: String,
    pub student_id: String,
    pub status: ThesisStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub scheduled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// New submission, always inserted as `PENDING` with no schedule.
#[derive(Debug, Clone)]
pub struct NewThesis<'a> {
    pub title: &'a str,
    pub doc_url: &'a str,
    pub student_id: &'a str,
}

/// Flat join row of `theses` and its owning `users` row.
#[derive(Debug, FromRow)]
pub struct ThesisStudentRow {
    pub id: i64,
    pub title: String,
    pub doc_url: String,
    pub student_id: String,
    pub status: ThesisStatus,
    pub scheduled_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub student_email: String,
    pub student_name: String,
    pub student_role: Role,
    pub student_prodi: Option<String>,
}

/// Thesis with its owner embedded under `student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThesisWithStudent {
    #[serde(flatten)]
    pub thesis: Thesis,
    pub student: User,
}

impl From<ThesisStudentRow> for ThesisWithStudent {
    fn from(r: ThesisStudentRow) -> Self {
        Self {
            student: User {
                id: r.student_id.clone(),
                email: r.student_email,
                name: r.student_name,
                role: r.student_role,
                prodi: r.student_prodi,
            },
            thesis: Thesis {
                id: r.id,
                title: r.title,
                doc_url: r.doc_url,
                student_id: r.student_id,
                status: r.status,
                scheduled_at: r.scheduled_at,
                created_at: r.created_at,
            },
        }
    }
}
