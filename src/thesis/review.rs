use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{ReviewRequest, ScheduleRequest},
    repo_types::{Thesis, ThesisWithStudent},
    validation::{parse_decision, parse_schedule_date, parse_thesis_id},
};
use crate::{
    auth::{extractors::Principal, roles::Role},
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

const FACULTY_ONLY: &str = "Hanya dosen yang dapat mengakses fitur ini";
const THESIS_NOT_FOUND: &str = "Tesis tidak ditemukan";

pub fn faculty_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dosen/pending", get(pending_queue))
        .route("/api/dosen/scheduled", get(scheduled_queue))
        .route("/api/dosen/all", get(all_theses))
        .route("/api/dosen/thesis/:id", get(thesis_detail))
        .route("/api/dosen/review/:id", put(review_thesis))
        .route("/api/dosen/schedule/:id", put(schedule_defense))
}

/// GET /api/dosen/pending
#[instrument(skip_all)]
pub async fn pending_queue(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<ThesisWithStudent>>> {
    principal.require(Role::Faculty, FACULTY_ONLY)?;
    let review = &state.config.review;
    let list = state
        .theses
        .list_pending(review.pending_order, review.queue_limit)
        .await
        .map_err(AppError::store("Gagal mengambil antrean tesis"))?;
    Ok(Json(list))
}

/// GET /api/dosen/scheduled
#[instrument(skip_all)]
pub async fn scheduled_queue(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<ThesisWithStudent>>> {
    principal.require(Role::Faculty, FACULTY_ONLY)?;
    let list = state
        .theses
        .list_scheduled(state.config.review.queue_limit)
        .await
        .map_err(AppError::store("Gagal mengambil jadwal sidang"))?;
    Ok(Json(list))
}

/// GET /api/dosen/all
#[instrument(skip_all)]
pub async fn all_theses(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<ThesisWithStudent>>> {
    principal.require(Role::Faculty, FACULTY_ONLY)?;
    let list = state
        .theses
        .list_all()
        .await
        .map_err(AppError::store("Gagal mengambil data tesis"))?;
    Ok(Json(list))
}

/// GET /api/dosen/thesis/:id
#[instrument(skip(state, principal))]
pub async fn thesis_detail(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<ThesisWithStudent>> {
    principal.require(Role::Faculty, FACULTY_ONLY)?;
    let id = parse_thesis_id(&id)?;
    state
        .theses
        .find_with_student(id)
        .await
        .map_err(AppError::store("Gagal mengambil detail tesis"))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(THESIS_NOT_FOUND.into()))
}

/// PUT /api/dosen/review/:id { decision }
#[instrument(skip(state, principal, payload))]
pub async fn review_thesis(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    payload: Result<AppJson<ReviewRequest>, AppError>,
) -> AppResult<Json<Thesis>> {
    let reviewer = principal.require(Role::Faculty, FACULTY_ONLY)?;
    let id = parse_thesis_id(&id)?;
    let AppJson(payload) = payload?;
    let decision = parse_decision(&payload.decision)?;

    let thesis = state
        .theses
        .set_status(id, decision)
        .await
        .map_err(AppError::from_store("Gagal memperbarui status tesis", THESIS_NOT_FOUND))?;
    info!(thesis_id = id, reviewer = %reviewer.id, status = ?decision, "thesis reviewed");
    Ok(Json(thesis))
}

/// PUT /api/dosen/schedule/:id { date }: schedules the defense and approves.
#[instrument(skip(state, principal, payload))]
pub async fn schedule_defense(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    payload: Result<AppJson<ScheduleRequest>, AppError>,
) -> AppResult<Json<Thesis>> {
    let reviewer = principal.require(Role::Faculty, FACULTY_ONLY)?;
    let id = parse_thesis_id(&id)?;
    let AppJson(payload) = payload?;
    let at = parse_schedule_date(&payload.date, OffsetDateTime::now_utc())?;

    let thesis = state
        .theses
        .schedule(id, at)
        .await
        .map_err(AppError::from_store("Gagal menjadwalkan sidang", THESIS_NOT_FOUND))?;
    info!(thesis_id = id, reviewer = %reviewer.id, scheduled_at = %at, "defense scheduled");
    Ok(Json(thesis))
}
