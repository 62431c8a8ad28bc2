pub mod attachment_loader;
pub mod config_service;
pub mod cookie_token;
pub mod http_backend;
pub mod paths;

pub use attachment_loader::{load_attachment, load_attachments};
pub use config_service::ConfigService;
pub use cookie_token::CookieTokenSource;
pub use http_backend::HttpBackend;
pub use paths::UpdaterPaths;
