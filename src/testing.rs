//! In-memory doubles for handler tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{
    auth::{
        claims::IdentityClaims,
        verifier::{IdentityVerifier, VerifyError},
    },
    config::QueueOrder,
    thesis::{
        repo::ThesisRepo,
        repo_types::{NewThesis, Thesis, ThesisStatus, ThesisWithStudent},
    },
    users::{
        repo::UserRepo,
        repo_types::{IdentityUpsert, User},
    },
};

pub const STUDENT_TOKEN: &str = "student-token";
pub const OTHER_STUDENT_TOKEN: &str = "other-student-token";
pub const DOSEN_TOKEN: &str = "dosen-token";

/// Maps fixed bearer tokens to identities; anything else is rejected.
pub struct StaticVerifier {
    tokens: HashMap<String, IdentityClaims>,
}

impl Default for StaticVerifier {
    fn default() -> Self {
        let identity = |sub: &str, email: &str, name: &str| IdentityClaims {
            subject: sub.into(),
            email: email.into(),
            name: name.into(),
        };
        let tokens = HashMap::from([
            (STUDENT_TOKEN.to_string(), identity("student-1", "budi@gmail.com", "Budi")),
            (OTHER_STUDENT_TOKEN.to_string(), identity("student-2", "sari@gmail.com", "Sari")),
            (DOSEN_TOKEN.to_string(), identity("dosen-1", "a@mail.ugm.ac.id", "Dr. Dosen")),
        ]);
        Self { tokens }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::UnknownKey(token.to_string()))
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    theses: Vec<Thesis>,
    next_id: i64,
}

impl Tables {
    fn joined<'a>(&self, theses: impl Iterator<Item = &'a Thesis>) -> Vec<ThesisWithStudent> {
        theses
            .filter_map(|t| {
                self.users.get(&t.student_id).map(|u| ThesisWithStudent {
                    thesis: t.clone(),
                    student: u.clone(),
                })
            })
            .collect()
    }

    fn newest_first(&self) -> Vec<&Thesis> {
        let mut all: Vec<&Thesis> = self.theses.iter().collect();
        all.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        all
    }

    fn find_mut(&mut self, id: i64) -> sqlx::Result<&mut Thesis> {
        self.theses
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(sqlx::Error::RowNotFound)
    }
}

/// Implements both repositories over plain collections.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn thesis_count(&self) -> usize {
        self.tables.lock().unwrap().theses.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn upsert_identity(&self, identity: IdentityUpsert<'_>) -> sqlx::Result<User> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .entry(identity.id.to_string())
            .and_modify(|u| {
                u.email = identity.email.to_string();
                u.name = identity.name.to_string();
                u.role = identity.role;
            })
            .or_insert_with(|| User {
                id: identity.id.to_string(),
                email: identity.email.to_string(),
                name: identity.name.to_string(),
                role: identity.role,
                prodi: None,
            });
        Ok(user.clone())
    }

    async fn update_profile(&self, id: &str, name: &str, prodi: Option<&str>) -> sqlx::Result<User> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables.users.get_mut(id).ok_or(sqlx::Error::RowNotFound)?;
        user.name = name.to_string();
        user.prodi = prodi.map(str::to_string);
        Ok(user.clone())
    }

    async fn update_prodi(&self, id: &str, prodi: &str) -> sqlx::Result<User> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables.users.get_mut(id).ok_or(sqlx::Error::RowNotFound)?;
        user.prodi = Some(prodi.to_string());
        Ok(user.clone())
    }
}

#[async_trait]
impl ThesisRepo for MemoryStore {
    async fn create(&self, new: NewThesis<'_>) -> sqlx::Result<Thesis> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let thesis = Thesis {
            id: tables.next_id,
            title: new.title.to_string(),
            doc_url: new.doc_url.to_string(),
            student_id: new.student_id.to_string(),
            status: ThesisStatus::Pending,
            scheduled_at: None,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.theses.push(thesis.clone());
        Ok(thesis)
    }

    async fn list_by_student(&self, student_id: &str, limit: Option<i64>) -> sqlx::Result<Vec<Thesis>> {
        let tables = self.tables.lock().unwrap();
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|t| t.student_id == student_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_pending(&self, order: QueueOrder, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let tables = self.tables.lock().unwrap();
        let mut pending: Vec<&Thesis> = tables
            .newest_first()
            .into_iter()
            .filter(|t| t.status == ThesisStatus::Pending)
            .collect();
        if order == QueueOrder::Oldest {
            pending.reverse();
        }
        Ok(tables.joined(pending.into_iter().take(limit as usize)))
    }

    async fn list_scheduled(&self, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let tables = self.tables.lock().unwrap();
        let mut scheduled: Vec<&Thesis> = tables
            .theses
            .iter()
            .filter(|t| t.status == ThesisStatus::Approved && t.scheduled_at.is_some())
            .collect();
        scheduled.sort_by_key(|t| (t.scheduled_at, t.id));
        Ok(tables.joined(scheduled.into_iter().take(limit as usize)))
    }

    async fn list_all(&self) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.joined(tables.newest_first().into_iter()))
    }

    async fn find_with_student(&self, id: i64) -> sqlx::Result<Option<ThesisWithStudent>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.joined(tables.theses.iter().filter(|t| t.id == id)).pop())
    }

    async fn set_status(&self, id: i64, status: ThesisStatus) -> sqlx::Result<Thesis> {
        let mut tables = self.tables.lock().unwrap();
        let thesis = tables.find_mut(id)?;
        thesis.status = status;
        Ok(thesis.clone())
    }

    async fn schedule(&self, id: i64, at: OffsetDateTime) -> sqlx::Result<Thesis> {
        let mut tables = self.tables.lock().unwrap();
        let thesis = tables.find_mut(id)?;
        thesis.scheduled_at = Some(at);
        thesis.status = ThesisStatus::Approved;
        Ok(thesis.clone())
    }
}

/// Sends one request through `app` and returns status plus JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
