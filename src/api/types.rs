//! Request and response types for the media server API.

use serde::Deserialize;

use crate::domain::ServerId;

/// `GET System/Info/Public`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicSystemInfo {
    pub id: ServerId,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Non-success HTTP response from the server.
#[derive(Debug, Clone, thiserror::Error)]
#[error("HTTP {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn from_http_response(status: u16, body: String) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            match status {
                401 => "Unauthorized".to_string(),
                403 => "Forbidden".to_string(),
                404 => "Not found".to_string(),
                _ => "Unknown error".to_string(),
            }
        } else {
            body.chars().take(200).collect()
        };

        Self { status, message }
    }

    /// The access token is no longer accepted.
    pub fn requires_relogin(&self) -> bool {
        self.status == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_system_info_parses() {
        let raw = r#"{
            "LocalAddress": "http://10.0.0.2:8096",
            "ServerName": "den",
            "Version": "10.9.11",
            "ProductName": "Jellyfin Server",
            "Id": "8b8b2d6b4f0a4c6e9d4f2a1b3c5d7e9f",
            "StartupWizardCompleted": true
        }"#;
        let info: PublicSystemInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.server_name.as_deref(), Some("den"));
        assert_eq!(info.id.simple().to_string(), "8b8b2d6b4f0a4c6e9d4f2a1b3c5d7e9f");
    }

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::from_http_response(401, String::new());
        assert!(err.requires_relogin());
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");

        let err = ApiError::from_http_response(500, "boom\n".to_string());
        assert!(!err.requires_relogin());
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }
}
