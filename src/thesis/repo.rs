use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_types::{NewThesis, Thesis, ThesisStatus, ThesisStudentRow, ThesisWithStudent};
use crate::config::QueueOrder;

/// Persistence of [`Thesis`] records.
#[async_trait]
pub trait ThesisRepo: Send + Sync {
    async fn create(&self, new: NewThesis<'_>) -> sqlx::Result<Thesis>;

    /// Student's submissions, newest first, at most `limit` when given.
    async fn list_by_student(&self, student_id: &str, limit: Option<i64>) -> sqlx::Result<Vec<Thesis>>;

    async fn list_pending(&self, order: QueueOrder, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>>;

    /// Approved theses with a schedule, earliest defense first.
    async fn list_scheduled(&self, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>>;

    async fn list_all(&self) -> sqlx::Result<Vec<ThesisWithStudent>>;

    async fn find_with_student(&self, id: i64) -> sqlx::Result<Option<ThesisWithStudent>>;

    /// Fails with `RowNotFound` for an unknown id. `scheduled_at` is untouched.
    async fn set_status(&self, id: i64, status: ThesisStatus) -> sqlx::Result<Thesis>;

    /// Sets `scheduled_at` and forces `APPROVED`. Fails with `RowNotFound`
    /// for an unknown id.
    async fn schedule(&self, id: i64, at: OffsetDateTime) -> sqlx::Result<Thesis>;
}

#[derive(Clone)]
pub struct PgThesisRepo {
    db: PgPool,
}

impl PgThesisRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const THESIS_COLUMNS: &str = "id, title, doc_url, student_id, status, scheduled_at, created_at";

const JOINED_SELECT: &str = r#"
    SELECT t.id, t.title, t.doc_url, t.student_id, t.status, t.scheduled_at, t.created_at,
           u.email AS student_email, u.name AS student_name,
           u.role AS student_role, u.prodi AS student_prodi
      FROM theses t
      JOIN users u ON u.id = t.student_id
"#;

async fn fetch_joined(db: &PgPool, sql: &str, limit: Option<i64>) -> sqlx::Result<Vec<ThesisWithStudent>> {
    let mut query = sqlx::query_as::<_, ThesisStudentRow>(sql);
    if let Some(limit) = limit {
        query = query.bind(limit);
    }
    let rows = query.fetch_all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[async_trait]
impl ThesisRepo for PgThesisRepo {
    async fn create(&self, new: NewThesis<'_>) -> sqlx::Result<Thesis> {
        let sql = format!(
            "INSERT INTO theses (title, doc_url, student_id) VALUES ($1, $2, $3) RETURNING {THESIS_COLUMNS}"
        );
        sqlx::query_as::<_, Thesis>(&sql)
            .bind(new.title)
            .bind(new.doc_url)
            .bind(new.student_id)
            .fetch_one(&self.db)
            .await
    }

    async fn list_by_student(&self, student_id: &str, limit: Option<i64>) -> sqlx::Result<Vec<Thesis>> {
        // LIMIT NULL means no limit in Postgres.
        let sql = format!(
            "SELECT {THESIS_COLUMNS} FROM theses WHERE student_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2"
        );
        sqlx::query_as::<_, Thesis>(&sql)
            .bind(student_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await
    }

    async fn list_pending(&self, order: QueueOrder, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let direction = match order {
            QueueOrder::Newest => "DESC",
            QueueOrder::Oldest => "ASC",
        };
        let sql = format!(
            "{JOINED_SELECT} WHERE t.status = 'PENDING' \
             ORDER BY t.created_at {direction}, t.id {direction} LIMIT $1"
        );
        fetch_joined(&self.db, &sql, Some(limit)).await
    }

    async fn list_scheduled(&self, limit: i64) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let sql = format!(
            "{JOINED_SELECT} WHERE t.status = 'APPROVED' AND t.scheduled_at IS NOT NULL \
             ORDER BY t.scheduled_at ASC, t.id ASC LIMIT $1"
        );
        fetch_joined(&self.db, &sql, Some(limit)).await
    }

    async fn list_all(&self) -> sqlx::Result<Vec<ThesisWithStudent>> {
        let sql = format!("{JOINED_SELECT} ORDER BY t.created_at DESC, t.id DESC");
        fetch_joined(&self.db, &sql, None).await
    }

    async fn find_with_student(&self, id: i64) -> sqlx::Result<Option<ThesisWithStudent>> {
        let sql = format!("{JOINED_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, ThesisStudentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn set_status(&self, id: i64, status: ThesisStatus) -> sqlx::Result<Thesis> {
        let sql = format!("UPDATE theses SET status = $2 WHERE id = $1 RETURNING {THESIS_COLUMNS}");
        sqlx::query_as::<_, Thesis>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(&self.db)
            .await
    }

    async fn schedule(&self, id: i64, at: OffsetDateTime) -> sqlx::Result<Thesis> {
        let sql = format!(
            "UPDATE theses SET scheduled_at = $2, status = 'APPROVED' WHERE id = $1 RETURNING {THESIS_COLUMNS}"
        );
        sqlx::query_as::<_, Thesis>(&sql)
            .bind(id)
            .bind(at)
            .fetch_one(&self.db)
            .await
    }
}
