use super::session::Role;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// The subset of `/patients/me` and `/doctors/me` the client reads.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PatientRegistration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub date_of_birth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRegistration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub specialization: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub message: String,
    pub user_id: i64,
}
