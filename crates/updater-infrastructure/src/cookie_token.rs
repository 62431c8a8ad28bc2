//! Bearer token source backed by the HTTP client's cookie store.

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use updater_core::project::TokenSource;

/// Reads the bearer token from a named cookie the backend set on login.
pub struct CookieTokenSource {
    jar: Arc<Jar>,
    url: Url,
    cookie: String,
}

impl CookieTokenSource {
    pub fn new(jar: Arc<Jar>, url: Url, cookie: impl Into<String>) -> Self {
        Self {
            jar,
            url,
            cookie: cookie.into(),
        }
    }
}

impl TokenSource for CookieTokenSource {
    fn cookie_name(&self) -> &str {
        &self.cookie
    }

    fn bearer_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        find_cookie(header.to_str().ok()?, &self.cookie)
    }
}

/// Finds `name` in a `Cookie` header value (`a=1; b=2`). Empty values count
/// as absent.
pub(crate) fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie_among_several() {
        let header = "session=abc; auth_token=tok.123==; theme=dark";
        assert_eq!(find_cookie(header, "auth_token").as_deref(), Some("tok.123=="));
        assert_eq!(find_cookie(header, "theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_find_cookie_requires_exact_name() {
        assert_eq!(find_cookie("my_auth_token=x", "auth_token"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        assert_eq!(find_cookie("auth_token=; a=b", "auth_token"), None);
    }

    #[test]
    fn test_reads_from_jar() {
        let url: Url = "http://catalog.example/".parse().unwrap();
        let jar = Arc::new(Jar::default());
        let source = CookieTokenSource::new(jar.clone(), url.clone(), "auth_token");
        assert_eq!(source.bearer_token(), None);

        jar.add_cookie_str("auth_token=signed-value; Path=/", &url);
        assert_eq!(source.bearer_token().as_deref(), Some("signed-value"));
        assert_eq!(source.cookie_name(), "auth_token");
    }
}
