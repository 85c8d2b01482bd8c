//! Role-based guard extractors.
//!
//! A guard rejects with `Forbidden` when the caller's role is not allowed to
//! touch the resource class at all. Tenant scoping is handled separately by
//! the store, where a cross-tenant row reads as `NotFound`. The two must not
//! be conflated, since `Forbidden` would confirm the row's existence.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Requires the school-admin role. All mutations of users and academic
/// records are admin-only.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl RequireAdmin {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0.user_id()
    }

    pub fn school_id(&self) -> i64 {
        self.0.school_id()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, Role::Admin)?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Requires the superadmin role; only the cross-school admin listing uses it.
#[derive(Debug, Clone)]
pub struct RequireSuperadmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperadmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, Role::Superadmin)?;
        Ok(RequireSuperadmin(auth_user))
    }
}

pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    if auth_user.role() != required_role {
        return Err(AppError::forbidden(
            "You are not authorized to perform this action",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: "1".to_string(),
            email: "test@example.com".to_string(),
            role,
            school_id: 1,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_check_role_accepts_matching_role() {
        assert!(check_role(&auth_user(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn test_check_role_rejects_other_roles() {
        for role in [Role::Teacher, Role::Parent, Role::Student, Role::Superadmin] {
            let err = check_role(&auth_user(role), Role::Admin).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }
}
