use std::time::Duration;

use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use http::request::Parts;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{AdminSession, AppState};
use crate::AppError;

pub const SESSION_COOKIE: &str = "xcx_admin";

/// Hex sha256, the form admin passwords are configured in
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Without configured credentials nobody gets in
pub fn check_credentials(config: &Config, email: &str, password: &str) -> bool {
    match (&config.admin_email, &config.admin_password_sha256) {
        (Some(admin_email), Some(hash)) => {
            let digest = password_digest(password);
            let expected = hash.to_lowercase();
            admin_email.eq_ignore_ascii_case(email.trim())
                && constant_time_eq(digest.as_bytes(), expected.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn session_cookie(id: Uuid, ttl: Duration) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Handed to [`CookieJar::remove`], the path has to match the one it was set with
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value().trim()).ok())
}

/// Extractor guarding back-office routes
pub struct Admin(pub AdminSession);

impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let id = session_id(&jar).ok_or(AppError::Unauthorized)?;
        state
            .storage
            .get_session(id)
            .await
            .map(Admin)
            .ok_or(AppError::Unauthorized)
    }
}
