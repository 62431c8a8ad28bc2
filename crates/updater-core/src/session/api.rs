use crate::error::Result;

/// How the identity endpoint answered a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResponse {
    /// 2xx; the server has set the session cookie.
    Accepted,
    /// 401; the credential was rejected.
    Unauthorized,
}

/// Identity endpoint consumed by [`AuthSession`](super::AuthSession).
///
/// Implementations classify the two expected answers (accepted/unauthorized,
/// valid/invalid) and return every other failure as
/// [`UpdaterError::TransportFault`](crate::error::UpdaterError::TransportFault).
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// `POST /api/login` with `{credential}`.
    async fn login(&self, credential: &str) -> Result<LoginResponse>;

    /// `POST /api/logout`.
    async fn logout(&self) -> Result<()>;

    /// `GET /api/verify_token`.
    ///
    /// Returns the `valid` field of the response. A 401 maps to `Ok(false)`.
    async fn verify_token(&self) -> Result<bool>;
}
