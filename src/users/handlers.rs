use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{dto::UpdateProfileRequest, repo_types::User};
use crate::{
    auth::extractors::Principal,
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", post(update_profile))
        .route("/api/profile/me", get(get_profile))
}

/// GET /api/profile/me
#[instrument(skip_all)]
pub async fn get_profile(Principal(user): Principal) -> Json<User> {
    Json(user)
}

/// POST /api/profile { name, prodi }
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    Principal(user): Principal,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    let update = payload.validate()?;
    let updated = state
        .users
        .update_profile(&user.id, &update.name, update.prodi.as_deref())
        .await
        .map_err(AppError::from_store("Gagal memperbarui profil", "Pengguna tidak ditemukan"))?;
    info!(user_id = %updated.id, "profile updated");
    Ok(Json(updated))
}
