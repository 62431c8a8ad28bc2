//! Configuration model.
//!
//! Every section is defaulted, so an empty or missing `config.toml` yields a
//! working configuration pointed at the hosted backend.

use serde::{Deserialize, Serialize};

/// Default backend used when nothing overrides it.
pub const DEFAULT_API_BASE_URL: &str = "https://project-updater.onrender.com";

/// Cookie holding the bearer token for `/api/add_project`.
pub const DEFAULT_TOKEN_COOKIE: &str = "auth_token";

/// Multipart field name shared by all image parts.
pub const DEFAULT_IMAGE_FIELD: &str = "projectImages";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub form: FormConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means requests may wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AuthConfig {
    #[serde(default = "default_token_cookie")]
    pub token_cookie: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_cookie: default_token_cookie(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FormConfig {
    /// Separator for the raw services text. Some deployments use `;`.
    #[serde(default = "default_service_delimiter")]
    pub service_delimiter: char,
    #[serde(default = "default_image_field")]
    pub image_field: String,
    #[serde(default = "default_allowed_image_types")]
    pub allowed_image_types: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            service_delimiter: default_service_delimiter(),
            image_field: default_image_field(),
            allowed_image_types: default_allowed_image_types(),
        }
    }
}

impl FormConfig {
    /// Whether an attachment with this MIME type may be staged.
    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim();
        self.allowed_image_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_cookie() -> String {
    DEFAULT_TOKEN_COOKIE.to_string()
}

fn default_service_delimiter() -> char {
    ','
}

fn default_image_field() -> String {
    DEFAULT_IMAGE_FIELD.to_string()
}

fn default_allowed_image_types() -> Vec<String> {
    ["image/png", "image/jpeg", "image/gif", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}
