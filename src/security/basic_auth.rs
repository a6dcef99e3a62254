//! HTTP Basic authentication gate.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::http::request::request_id;

/// Accepted username/password pairs for one realm.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    realm: String,
    credentials: HashMap<String, String>,
}

impl BasicAuth {
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            credentials: HashMap::new(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            realm: config.realm.clone(),
            credentials: config.credentials.clone(),
        }
    }

    /// Register (or replace) a user.
    pub fn add(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials.insert(username.into(), password.into());
    }

    /// Check a username/password pair. Unknown users never validate.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        match self.credentials.get(username) {
            Some(expected) => password.as_bytes().ct_eq(expected.as_bytes()).into(),
            None => false,
        }
    }

    /// Value of the `WWW-Authenticate` challenge.
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }
}

/// Decode an `Authorization: Basic ...` header value.
pub fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Reject requests without valid Basic credentials.
pub async fn basic_auth_middleware(
    State(auth): State<Arc<BasicAuth>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_credentials);

    match credentials {
        Some((username, password)) if auth.validate(&username, &password) => next.run(request).await,
        _ => {
            tracing::warn!(
                request_id = %request_id(&request),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, auth.challenge())],
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let mut auth = BasicAuth::new("vanity");
        auth.add("alice", "secret");

        assert!(auth.validate("alice", "secret"));
        assert!(!auth.validate("alice", "secreT"));
        assert!(!auth.validate("alice", "secret2"));
        assert!(!auth.validate("bob", "secret"));
        assert!(!auth.validate("bob", ""));
    }

    #[test]
    fn test_validate_rejects_prefix_and_empty_passwords() {
        let mut auth = BasicAuth::new("vanity");
        auth.add("alice", "secret");
        auth.add("carol", "");

        assert!(!auth.validate("alice", "secre"));
        assert!(!auth.validate("alice", ""));
        assert!(auth.validate("carol", ""));
        assert!(!auth.validate("carol", "x"));
    }

    #[test]
    fn test_challenge() {
        assert_eq!(BasicAuth::new("go").challenge(), r#"Basic realm="go""#);
    }

    #[test]
    fn test_parse_basic_credentials() {
        let header = format!("Basic {}", STANDARD.encode("alice:pa:ss"));
        assert_eq!(
            parse_basic_credentials(&header),
            Some(("alice".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
        assert_eq!(
            parse_basic_credentials(&format!("Basic {}", STANDARD.encode("nocolon"))),
            None
        );
    }
}
