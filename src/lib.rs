pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;

pub use api::ApiClient;
pub use chat::ChatClient;
pub use error::{ClinicError, Result};
pub use session::SessionStore;
