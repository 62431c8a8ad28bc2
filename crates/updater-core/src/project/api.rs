use super::model::ProjectSubmission;
use crate::error::Result;

/// Catalog endpoint that stores new projects.
#[async_trait::async_trait]
pub trait ProjectApi: Send + Sync {
    /// `POST /api/add_project` as multipart, with `Authorization: Bearer <token>`.
    ///
    /// The whole submission succeeds or fails as one unit.
    async fn add_project(&self, submission: &ProjectSubmission, bearer_token: &str) -> Result<()>;
}

/// Source of the bearer credential attached to mutating requests.
pub trait TokenSource: Send + Sync {
    /// Name of the cookie the token is read from, for error reporting.
    fn cookie_name(&self) -> &str;

    /// Current token value, `None` when the cookie is absent or empty.
    fn bearer_token(&self) -> Option<String>;
}

/// Explicit human confirmation before a mutating action.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
