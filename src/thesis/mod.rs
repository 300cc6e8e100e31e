pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod review;
pub mod validation;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::student_routes())
        .merge(review::faculty_routes())
}
