use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {source}")]
    StoreFailure {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Maps a store error to a 500 carrying `message`, except `RowNotFound`
    /// which becomes a 404 with `not_found`.
    pub fn from_store(message: &'static str, not_found: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| match source {
            sqlx::Error::RowNotFound => Self::NotFound(not_found.into()),
            source => Self::StoreFailure { message, source },
        }
    }

    /// Like [`AppError::from_store`] without a not-found distinction.
    pub fn store(message: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::StoreFailure { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::StoreFailure { message, source } => {
                error!(error = %source, context = message, "store failure");
                message.to_string()
            }
            Self::Unauthenticated(msg)
            | Self::InvalidToken(msg)
            | Self::Forbidden(msg)
            | Self::InvalidInput(msg)
            | Self::NotFound(msg) => msg,
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(format!("Body permintaan tidak valid: {}", rejection.body_text()))
    }
}

/// `Json` body extractor whose rejection renders as an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_404() {
        let err = AppError::from_store("Gagal", "Tesis tidak ditemukan")(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Tesis tidak ditemukan");
    }

    #[test]
    fn other_store_errors_become_500() {
        let err = AppError::from_store("Gagal menyimpan", "x")(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::store("Gagal menyimpan")(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn response_body_is_json_error() {
        let res = AppError::forbidden("Akses ditolak").into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Akses ditolak");
    }
}
