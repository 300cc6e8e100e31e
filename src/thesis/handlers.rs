use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::SubmitThesisRequest,
    repo_types::{NewThesis, Thesis},
    validation::validate_submission,
};
use crate::{
    auth::{extractors::Principal, roles::Role},
    error::{AppError, AppJson, AppResult},
    state::AppState,
    users::dto::PRODI_MAX_CHARS,
};

const STUDENT_ONLY: &str = "Hanya mahasiswa yang dapat mengakses fitur ini";

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/api/thesis", post(submit_thesis))
        .route("/api/thesis/me", get(latest_thesis))
        .route("/api/thesis/me/all", get(all_my_theses))
}

/// POST /api/thesis { title, docUrl, prodi? }
#[instrument(skip_all)]
pub async fn submit_thesis(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<AppJson<SubmitThesisRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Thesis>)> {
    let student = principal.require(Role::Student, "Hanya mahasiswa yang dapat mengirim tesis")?;
    let AppJson(payload) = payload?;
    let submission = validate_submission(&payload.title, &payload.doc_url)?;

    let prodi = payload
        .prodi
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if let Some(prodi) = prodi {
        if prodi.chars().count() > PRODI_MAX_CHARS {
            return Err(AppError::invalid(format!(
                "Program studi maksimal {PRODI_MAX_CHARS} karakter"
            )));
        }
        state
            .users
            .update_prodi(&student.id, prodi)
            .await
            .map_err(AppError::store("Gagal mengirim tesis"))?;
    }

    let thesis = state
        .theses
        .create(NewThesis {
            title: &submission.title,
            doc_url: &submission.doc_url,
            student_id: &student.id,
        })
        .await
        .map_err(AppError::store("Gagal mengirim tesis"))?;

    info!(thesis_id = thesis.id, student_id = %student.id, "thesis submitted");
    Ok((StatusCode::CREATED, Json(thesis)))
}

/// GET /api/thesis/me: caller's latest submission or `null`, for any role.
#[instrument(skip_all)]
pub async fn latest_thesis(
    State(state): State<AppState>,
    Principal(user): Principal,
) -> AppResult<Json<Option<Thesis>>> {
    let latest = state
        .theses
        .list_by_student(&user.id, Some(1))
        .await
        .map_err(AppError::store("Gagal mengambil data tesis"))?
        .into_iter()
        .next();
    Ok(Json(latest))
}

/// GET /api/thesis/me/all: every submission, newest first.
#[instrument(skip_all)]
pub async fn all_my_theses(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Thesis>>> {
    let student = principal.require(Role::Student, STUDENT_ONLY)?;
    let theses = state
        .theses
        .list_by_student(&student.id, None)
        .await
        .map_err(AppError::store("Gagal mengambil data tesis"))?;
    Ok(Json(theses))
}
