//! HTTP networking module
//!
//! Provides the HTTP client the remote suggestion backends share.

mod client;
mod user_agent;

pub use client::{HttpClient, HttpResponse};
pub use user_agent::generate_user_agent;
