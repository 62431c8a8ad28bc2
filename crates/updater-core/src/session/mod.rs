//! Authentication session module.
//!
//! # Module Structure
//!
//! - `api`: Identity endpoint trait consumed by the session
//! - `auth`: The `AuthSession` state machine
//! - `navigation`: Route signals emitted on login/logout

mod api;
mod auth;
mod navigation;

pub use api::{IdentityApi, LoginResponse};
pub use auth::AuthSession;
pub use navigation::{NoopNavigator, Navigator, Route};
