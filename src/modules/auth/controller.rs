use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{ACCESS_TOKEN_COOKIE, AdminSignupDto, AuthResponse, LoginRequest, MessageResponse};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{Role, UserProfile};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new school admin (bootstraps the school tenant)
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = AdminSignupDto,
    responses(
        (status = 201, description = "Admin created successfully", body = AuthResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AdminSignupDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let profile = AuthService::signup_admin(&state.db, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Admin,
        profile.id,
        &state.jwt_config,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::Admin(profile),
            access_token,
        }),
    ))
}

/// Login with username or email; the token is returned in the body and as an
/// http-only cookie
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Bad request - missing credential", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let record = AuthService::login(&state.db, dto).await?;

    let access_token = create_access_token(
        record.id(),
        record.email(),
        record.role(),
        record.school_id(),
        &state.jwt_config,
    )?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, access_token.clone()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/");

    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            user: record.into_profile(),
            access_token,
        }),
    ))
}

/// Logout: clears the auth cookie
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(jar, _auth_user))]
pub async fn logout(
    jar: CookieJar,
    _auth_user: AuthUser,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    Ok((
        jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/")),
        Json(MessageResponse {
            message: "User logged out successfully".to_string(),
        }),
    ))
}

/// Fetch the authenticated caller's own profile
#[utoipa::path(
    get,
    path = "/api/get-current-user",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let record =
        AuthService::current_user(&state.db, auth_user.user_id()?, auth_user.school_id()).await?;
    Ok(Json(record.into_profile()))
}
