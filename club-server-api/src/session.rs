use std::{convert::Infallible, time::Duration};

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{TypedHeader, headers::Cookie};
use club_server_domain::{
    ServiceError, ServiceResult,
    app::AppState,
    session::{RequestContext, SessionService, SessionUser},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "session";

/// Tokens are stateless. Logging out only clears the cookie, so a copied
/// token stays valid until its `exp`, at most this long after login.
const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

const DEFAULT_SECRET_KEY: &str = "basketball-club-development-key";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    exp: usize,
}

pub struct JwtSessionService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtSessionService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Signs sessions with `SECRET_KEY`, or with a fixed key when unset.
    pub fn from_env() -> Self {
        match std::env::var("SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => Self::new(secret.as_bytes()),
            _ => {
                warn!("SECRET_KEY not set, using the built-in development key. Do not use this in production!");
                Self::new(DEFAULT_SECRET_KEY.as_bytes())
            }
        }
    }
}

impl SessionService for JwtSessionService {
    fn issue_token(&self, user: &SessionUser) -> ServiceResult<String> {
        let claims = Claims {
            sub: user.user_id.to_string(),
            name: user.username.clone(),
            exp: (chrono::Utc::now() + chrono::Duration::seconds(SESSION_TTL.as_secs() as i64))
                .timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ServiceError::Storage(format!("Failed to sign session: {}", e)))
    }

    fn validate_token(&self, token: &str) -> ServiceResult<SessionUser> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ServiceError::Unauthorized("Invalid session".to_string()))?;
        let user_id = data
            .claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Invalid session".to_string()))?;
        Ok(SessionUser {
            user_id,
            username: data.claims.name,
        })
    }
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL.as_secs()
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Per-request identity. Never rejects: a missing or invalid cookie yields an
/// anonymous context and the domain decides whether that is enough.
pub struct Session(pub RequestContext);

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .extract::<TypedHeader<Cookie>>()
            .await
            .ok()
            .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE).map(str::to_string));

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(Session(RequestContext::anonymous()));
        };
        match app.session_service.validate_token(&token) {
            Ok(user) => Ok(Session(RequestContext::authenticated(user))),
            Err(e) => {
                debug!("Ignoring session cookie: {}", e);
                Ok(Session(RequestContext::anonymous()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> SessionUser {
        SessionUser {
            user_id: 3,
            username: "coach".to_string(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = JwtSessionService::new(b"test-secret");
        let token = service.issue_token(&coach()).unwrap();
        assert_eq!(service.validate_token(&token).ok(), Some(coach()));
    }

    #[test]
    fn test_rejects_foreign_and_tampered_tokens() {
        let service = JwtSessionService::new(b"test-secret");
        let other = JwtSessionService::new(b"other-secret");
        let token = other.issue_token(&coach()).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(ServiceError::Unauthorized(_))
        ));

        let mut token = service.issue_token(&coach()).unwrap();
        token.push('x');
        assert!(service.validate_token(&token).is_err());
        assert!(service.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_token_expires_within_ttl() {
        let service = JwtSessionService::new(b"test-secret");
        let token = service.issue_token(&coach()).unwrap();
        let claims = decode::<Claims>(&token, &service.decoding, &Validation::default())
            .unwrap()
            .claims;
        let now = chrono::Utc::now().timestamp() as usize;
        let ttl = SESSION_TTL.as_secs() as usize;
        assert!(claims.exp > now);
        assert!(claims.exp <= now + ttl);
        assert!(session_cookie(&token).contains(&format!("Max-Age={}", ttl)));
    }

    #[test]
    fn test_cookies() {
        assert!(session_cookie("abc").starts_with("session=abc; Path=/; HttpOnly"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
