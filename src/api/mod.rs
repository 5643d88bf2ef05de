pub mod client;
pub mod endpoints;
pub mod response;

pub use client::ApiClient;
