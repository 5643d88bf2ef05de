mod auth;
mod chat;
mod session;

pub use auth::{
    DoctorRegistration, LoginRequest, LoginResponse, PatientRegistration, Profile,
    RegistrationReceipt,
};
pub use chat::{AnalyzeRequest, ChatMessage};
pub use session::{Credentials, Role, Session};
