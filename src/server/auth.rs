//! HTTP Basic gate in front of the planner
//!
//! Static assets pass through; everything else needs the configured
//! username and password.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::Credentials;

/// Realm announced in the 401 challenge
pub const REALM: &str = "Secure Area";

const PUBLIC_PREFIXES: [&str; 2] = ["/_next", "/favicon.ico"];
const PUBLIC_EXTENSIONS: [&str; 5] = ["png", "jpg", "svg", "css", "js"];

/// Paths served without credentials
pub fn is_public_path(path: &str) -> bool {
    if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PUBLIC_EXTENSIONS.contains(&ext))
}

/// Decode an `Authorization` value into its user and password halves
pub fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.split_whitespace().nth(1)?;
    let bytes = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8_lossy(&bytes);
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

impl Credentials {
    /// True when an `Authorization` value carries exactly these credentials
    pub fn accepts(&self, authorization: &str) -> bool {
        match decode_basic(authorization) {
            Some((user, pass)) => user == self.user && pass == self.pass,
            None => false,
        }
    }
}

/// Middleware: admit public paths and matching credentials, challenge the rest
pub async fn require_basic_auth(
    State(credentials): State<Arc<Credentials>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if is_public_path(&path) {
        return next.run(req).await;
    }

    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| credentials.accepts(v));

    if authorized {
        next.run(req).await
    } else {
        log::warn!("Rejected unauthenticated request for {path}");
        unauthorized()
    }
}

/// 401 with a Basic challenge
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, format!("Basic realm=\"{REALM}\""))],
        "Auth required",
    )
        .into_response()
}
