//! Backend paths, relative to the configured base URL.

pub const LOGIN: &str = "/auth/login";
pub const REGISTER_PATIENT: &str = "/auth/register-patient";
pub const REGISTER_DOCTOR: &str = "/auth/register-doctor";

pub const PATIENT_PROFILE: &str = "/patients/me";
pub const DOCTOR_PROFILE: &str = "/doctors/me";

pub const CHAT_HISTORY: &str = "/ai-chat/history";
pub const CHAT_ANALYZE: &str = "/ai-chat/analyze";
pub const CHAT_CLEAR: &str = "/ai-chat/clear";
