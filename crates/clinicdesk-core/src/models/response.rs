use serde::Deserialize;

use super::DoctorRecord;

/// Body of `POST /api/admin/all-doctors`.
#[derive(Debug, Deserialize)]
pub struct AllDoctorsResponse {
    pub success: bool,
    #[serde(default)]
    pub doctors: Vec<DoctorRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
