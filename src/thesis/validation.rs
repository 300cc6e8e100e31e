use lazy_static::lazy_static;
use regex::Regex;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use super::repo_types::ThesisStatus;
use crate::error::{AppError, AppResult};

pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 200;

lazy_static! {
    static ref DOC_URL_RE: Regex = Regex::new(r"^https?://.+").unwrap();
}

/// Trimmed title and document URL of a valid submission.
#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub doc_url: String,
}

pub fn validate_submission(title: &str, doc_url: &str) -> AppResult<Submission> {
    let title = title.trim();
    let len = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(AppError::invalid(format!(
            "Judul harus terdiri dari {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} karakter"
        )));
    }

    let doc_url = doc_url.trim();
    if !DOC_URL_RE.is_match(doc_url) {
        return Err(AppError::invalid("URL dokumen harus diawali http:// atau https://"));
    }

    Ok(Submission {
        title: title.to_string(),
        doc_url: doc_url.to_string(),
    })
}

pub fn parse_decision(raw: &str) -> AppResult<ThesisStatus> {
    raw.parse()
        .map_err(|_| AppError::invalid("Keputusan harus APPROVED, REJECTED, atau PENDING"))
}

pub fn parse_thesis_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::invalid("ID tesis tidak valid"))
}

/// Parses a defense date and requires it to lie strictly after `now`.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_schedule_date(raw: &str, now: OffsetDateTime) -> AppResult<OffsetDateTime> {
    let at = parse_instant(raw.trim()).ok_or_else(|| AppError::invalid("Format tanggal tidak valid"))?;
    if at <= now {
        return Err(AppError::invalid("Tanggal jadwal harus di masa depan"));
    }
    Ok(at)
}

fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let without_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(at) = PrimitiveDateTime::parse(raw, with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(raw, without_seconds))
    {
        return Some(at.assume_utc());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}
