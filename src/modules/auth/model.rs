use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::{Role, UserProfile};

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// JWT claims. Everything authorization needs (identity, role, tenant)
/// lives here; handlers never take these from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub school_id: i64,
    pub exp: usize,
    pub iat: usize,
}

/// Login accepts a username or an email plus the password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Admin signup bootstraps a school: the created admin's id becomes the
/// school id every other record hangs off.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignupDto {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub school_name: String,
    #[validate(length(min = 1))]
    pub school_address: String,
    #[validate(length(min = 1))]
    pub school_contact_number: String,
    #[validate(email)]
    pub school_email: String,
    #[validate(length(min = 1))]
    pub school_register_id: String,
    #[validate(length(min = 1))]
    pub government_id: String,
    pub agreement_to_terms: bool,
    /// `YYYY-MM-DD`
    pub school_established: String,
    /// Paths handed over by the upload collaborator.
    pub profile_picture: Option<String>,
    pub school_logo: Option<String>,
}

/// User payload plus a fresh access token embedding its claims.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
