use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const NAME_MAX_CHARS: usize = 100;
pub const PRODI_MAX_CHARS: usize = 100;

/// Request body for profile edits.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prodi: Option<String>,
}

/// Trimmed profile fields; a blank prodi becomes `None`.
#[derive(Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub prodi: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> AppResult<ProfileUpdate> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::invalid(format!(
                "Nama wajib diisi dan maksimal {NAME_MAX_CHARS} karakter"
            )));
        }

        let prodi = self
            .prodi
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if prodi.is_some_and(|p| p.chars().count() > PRODI_MAX_CHARS) {
            return Err(AppError::invalid(format!(
                "Program studi maksimal {PRODI_MAX_CHARS} karakter"
            )));
        }

        Ok(ProfileUpdate {
            name: name.to_string(),
            prodi: prodi.map(str::to_string),
        })
    }
}
