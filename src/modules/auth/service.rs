use sqlx::PgPool;
use tracing::instrument;

use crate::modules::auth::model::{AdminSignupDto, LoginRequest};
use crate::modules::users::model::{AdminProfile, Role, UserRecord};
use crate::modules::users::service::{UserService, parse_date};
use crate::store::records;
use crate::store::{Fields, SqlValue, Table};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::uploads::normalize_upload_path;

pub struct AuthService;

impl AuthService {
    /// Creates the admin account that anchors a new school. This is the one
    /// lookup path without a tenant filter: no tenant exists before the row
    /// is inserted, so the duplicate check runs across the whole admin table.
    #[instrument(skip(db, dto))]
    pub async fn signup_admin(db: &PgPool, dto: AdminSignupDto) -> Result<AdminProfile, AppError> {
        let established = parse_date("schoolEstablished", &dto.school_established)?;

        let existing = UserService::find_credential(
            db,
            Some(dto.username.trim()),
            Some(dto.email.to_lowercase().trim()),
            None,
            Some(Role::Admin),
        )
        .await?;
        if existing.is_some() {
            return Err(AppError::conflict("Username or email already exists"));
        }

        let mut fields = Fields::new();
        fields.push_text("username", dto.username);
        fields.push_text("password", hash_password(dto.password.trim())?);
        fields.push_text("full_name", dto.full_name);
        fields.push_text("email", dto.email.to_lowercase());
        fields.push_text("phone_number", dto.phone_number);
        fields.push_text("school_name", dto.school_name);
        fields.push_text("school_address", dto.school_address);
        fields.push_text("school_contact_number", dto.school_contact_number);
        fields.push_text("school_email", dto.school_email.to_lowercase());
        fields.push_text("school_register_id", dto.school_register_id);
        fields.push("agreement_to_terms", SqlValue::Bool(dto.agreement_to_terms));
        fields.push_text("government_id", dto.government_id);
        fields.push("school_established", SqlValue::Date(established));
        if let Some(picture) = dto.profile_picture {
            fields.push_text(
                "profile_picture",
                normalize_upload_path("profilePicture", &picture)?,
            );
        }
        if let Some(logo) = dto.school_logo {
            fields.push_text("school_logo", normalize_upload_path("schoolLogo", &logo)?);
        }

        let id = records::insert(db, Table::Admin, &fields).await?;

        // Re-select the canonical row; the admin's own id is its school.
        records::fetch_by_id::<AdminProfile>(db, Table::Admin, id, id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("admin {} missing after signup", id))
            })
    }

    /// Resolves a credential across the role tables and verifies the
    /// password. Both an unknown credential and a wrong password collapse to
    /// the same unauthorized answer.
    #[instrument(skip(db, dto))]
    pub async fn login(db: &PgPool, dto: LoginRequest) -> Result<UserRecord, AppError> {
        let username = dto
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let email = dto
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        let record = UserService::find_credential(db, username, email.as_deref(), None, None)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username, email, or password"))?;

        if !verify_password(&dto.password, record.password())? {
            return Err(AppError::unauthorized("Invalid username, email, or password"));
        }

        Ok(record)
    }

    /// Resolves the authenticated caller's own record within its school.
    #[instrument(skip(db))]
    pub async fn current_user(
        db: &PgPool,
        user_id: i64,
        school_id: i64,
    ) -> Result<UserRecord, AppError> {
        UserService::find_by_id(db, user_id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
