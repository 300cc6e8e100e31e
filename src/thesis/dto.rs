use serde::Deserialize;

/// POST /api/thesis body. `prodi`, when present, also updates the profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitThesisRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub doc_url: String,
    #[serde(default)]
    pub prodi: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub decision: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub date: String,
}
