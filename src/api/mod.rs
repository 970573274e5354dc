//! Media server API client.
//!
//! Only the handful of endpoints the startup flow and the login command need:
//! public system info, the current user, and single-item lookup.

mod client;
mod http;
mod media;
mod types;

pub use client::ApiClient;
pub use http::RetryPolicy;
pub use types::{ApiError, PublicSystemInfo};
