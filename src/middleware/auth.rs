use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::modules::auth::model::{ACCESS_TOKEN_COOKIE, Claims};
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the access token and exposes the caller's claims.
///
/// The token is accepted from the `Authorization: Bearer` header or from the
/// auth cookie set at login. Role and school always come from here, never
/// from the request body.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn school_id(&self) -> i64 {
        self.0.school_id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.to_string());

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(ACCESS_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::unauthorized("Missing authorization token"))?,
        };

        let claims = verify_token(&token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            role,
            school_id: 7,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_subject() {
        let auth_user = AuthUser(claims(Role::Admin));
        assert_eq!(auth_user.user_id().unwrap(), 42);
    }

    #[test]
    fn test_user_id_rejects_garbage_subject() {
        let mut c = claims(Role::Admin);
        c.sub = "not-a-number".to_string();
        assert!(AuthUser(c).user_id().is_err());
    }

    #[test]
    fn test_claim_accessors() {
        let auth_user = AuthUser(claims(Role::Teacher));
        assert_eq!(auth_user.role(), Role::Teacher);
        assert_eq!(auth_user.school_id(), 7);
        assert_eq!(auth_user.email(), "test@example.com");
    }
}
