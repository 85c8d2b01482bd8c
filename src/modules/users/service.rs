//! Identity resolution and user management.
//!
//! The resolver is the only code that reads the four role tables by
//! credential. Login searches them in [`Role::LOGIN_ORDER`] without a tenant
//! filter (the caller does not know its tenant yet); every other lookup is
//! tenant-scoped. Results carry the password hash and must be converted to
//! profiles before leaving the boundary layer.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::model::{
    AdminProfile, AdminRecord, CreateParentDto, CreateStudentDto, CreateTeacherDto, ParentProfile,
    ParentRecord, Role, StudentProfile, StudentRecord, TeacherProfile, TeacherRecord,
    UpdateAdminDto, UpdateParentDto, UpdateStudentDto, UpdateTeacherDto, UserRecord,
};
use crate::store::records;
use crate::store::{Fields, SqlValue, Table};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::uploads::normalize_upload_path;

pub struct UserService;

impl UserService {
    /// Looks a credential up across the role tables.
    ///
    /// With a `role`, only that role's table is searched. Without one, the
    /// tables are searched in [`Role::LOGIN_ORDER`] and the first match wins:
    /// a username colliding across tables resolves to the earliest role.
    /// Admin lookups without a `school_id` are the bootstrap path: at signup
    /// and login no tenant is known yet.
    #[instrument(skip(db))]
    pub async fn find_credential(
        db: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
        school_id: Option<i64>,
        role: Option<Role>,
    ) -> Result<Option<UserRecord>, AppError> {
        if username.is_none() && email.is_none() {
            return Err(AppError::bad_request(
                "Please provide either a username or an email",
            ));
        }

        match role {
            Some(role) => Self::find_in_table(db, role, username, email, school_id).await,
            None => {
                for role in Role::LOGIN_ORDER {
                    if let Some(record) =
                        Self::find_in_table(db, role, username, email, school_id).await?
                    {
                        return Ok(Some(record));
                    }
                }
                Ok(None)
            }
        }
    }

    async fn find_in_table(
        db: &PgPool,
        role: Role,
        username: Option<&str>,
        email: Option<&str>,
        school_id: Option<i64>,
    ) -> Result<Option<UserRecord>, AppError> {
        let table = role.table();
        let mut sql = format!(
            "SELECT * FROM {} WHERE (username = $1 OR email = $2)",
            table
        );
        if school_id.is_some() {
            sql.push_str(&format!(" AND {} = $3", table.tenant_column()));
        }

        macro_rules! fetch {
            ($record:ty, $variant:expr) => {{
                let mut query = sqlx::query_as::<_, $record>(&sql).bind(username).bind(email);
                if let Some(school_id) = school_id {
                    query = query.bind(school_id);
                }
                Ok(query.fetch_optional(db).await?.map($variant))
            }};
        }

        match table {
            Table::Admin => fetch!(AdminRecord, UserRecord::Admin),
            Table::Teacher => fetch!(TeacherRecord, UserRecord::Teacher),
            Table::Parent => fetch!(ParentRecord, UserRecord::Parent),
            Table::Student => fetch!(StudentRecord, UserRecord::Student),
            _ => Ok(None),
        }
    }

    /// Searches all four role tables for an id within the caller's school.
    /// Admin rows only match when the id is the school itself.
    #[instrument(skip(db))]
    pub async fn find_by_id(
        db: &PgPool,
        id: i64,
        school_id: i64,
    ) -> Result<Option<UserRecord>, AppError> {
        for role in Role::LOGIN_ORDER {
            if let Some(record) = Self::find_by_role_and_id(db, role, id, school_id).await? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    #[instrument(skip(db))]
    pub async fn find_by_role_and_id(
        db: &PgPool,
        role: Role,
        id: i64,
        school_id: i64,
    ) -> Result<Option<UserRecord>, AppError> {
        let table = role.table();
        match table {
            Table::Admin => Ok(records::fetch_by_id::<AdminRecord>(db, table, id, school_id)
                .await?
                .map(UserRecord::Admin)),
            Table::Teacher => Ok(records::fetch_by_id::<TeacherRecord>(db, table, id, school_id)
                .await?
                .map(UserRecord::Teacher)),
            Table::Parent => Ok(records::fetch_by_id::<ParentRecord>(db, table, id, school_id)
                .await?
                .map(UserRecord::Parent)),
            Table::Student => Ok(records::fetch_by_id::<StudentRecord>(db, table, id, school_id)
                .await?
                .map(UserRecord::Student)),
            _ => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Account creation (admin-driven; the new account inherits the admin's
    // school)
    // -----------------------------------------------------------------------

    #[instrument(skip(db, dto))]
    pub async fn create_teacher(
        db: &PgPool,
        school_id: i64,
        dto: CreateTeacherDto,
    ) -> Result<TeacherProfile, AppError> {
        Self::ensure_unique_identity(
            db,
            Role::Teacher,
            Some(&dto.username),
            Some(&dto.email),
            Some(school_id),
            None,
        )
        .await?;

        let birthday = parse_date("birthday", &dto.birthday)?;

        let mut fields = Fields::new();
        fields.push_text("username", dto.username);
        fields.push_text("password", hash_password(dto.password.trim())?);
        fields.push_text("name", dto.name);
        fields.push_text("surname", dto.surname);
        fields.push_text("email", dto.email.to_lowercase());
        fields.push_text("phone", dto.phone);
        fields.push_text("address", dto.address);
        fields.push_text("blood_type", dto.blood_type);
        fields.push_text("sex", dto.sex.to_lowercase());
        fields.push("birthday", SqlValue::Date(birthday));
        if let Some(profile) = dto.profile {
            fields.push_text("profile", normalize_upload_path("profile", &profile)?);
        }
        fields.push("school_id", SqlValue::Int(school_id));

        let id = records::insert(db, Table::Teacher, &fields).await?;
        Self::fetch_profile::<TeacherProfile>(db, Table::Teacher, id, school_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn create_parent(
        db: &PgPool,
        school_id: i64,
        dto: CreateParentDto,
    ) -> Result<ParentProfile, AppError> {
        Self::ensure_unique_identity(
            db,
            Role::Parent,
            Some(&dto.username),
            Some(&dto.email),
            Some(school_id),
            None,
        )
        .await?;

        let mut fields = Fields::new();
        fields.push_text("username", dto.username);
        fields.push_text("password", hash_password(dto.password.trim())?);
        fields.push_text("name", dto.name);
        fields.push_text("surname", dto.surname);
        fields.push_text("email", dto.email.to_lowercase());
        fields.push_text("phone", dto.phone);
        fields.push_text("address", dto.address);
        fields.push("school_id", SqlValue::Int(school_id));

        let id = records::insert(db, Table::Parent, &fields).await?;
        Self::fetch_profile::<ParentProfile>(db, Table::Parent, id, school_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        school_id: i64,
        dto: CreateStudentDto,
    ) -> Result<StudentProfile, AppError> {
        Self::ensure_unique_identity(
            db,
            Role::Student,
            Some(&dto.username),
            Some(&dto.email),
            Some(school_id),
            None,
        )
        .await?;

        let birthday = parse_date("birthday", &dto.birthday)?;

        // A parent can be named by username (resolved within the school) or
        // referenced directly by id.
        let parent_id = match dto.parent_username.as_deref().map(str::trim) {
            Some(parent_username) if !parent_username.is_empty() => {
                let parent = Self::find_in_table(
                    db,
                    Role::Parent,
                    Some(parent_username),
                    None,
                    Some(school_id),
                )
                .await?
                .ok_or_else(|| AppError::not_found("Parent not found"))?;
                Some(parent.id())
            }
            _ => match dto.parent_id {
                Some(parent_id) => {
                    if !records::exists(db, Table::Parent, parent_id, school_id).await? {
                        return Err(AppError::not_found(format!(
                            "Parent {} not found",
                            parent_id
                        )));
                    }
                    Some(parent_id)
                }
                None => None,
            },
        };

        if let Some(class_id) = dto.class_id
            && !records::exists(db, Table::Class, class_id, school_id).await?
        {
            return Err(AppError::not_found(format!("Class {} not found", class_id)));
        }

        if let Some(grade_id) = dto.grade_id
            && !records::exists(db, Table::Grade, grade_id, school_id).await?
        {
            return Err(AppError::not_found(format!("Grade {} not found", grade_id)));
        }

        let mut fields = Fields::new();
        fields.push_text("username", dto.username);
        fields.push_text("password", hash_password(dto.password.trim())?);
        fields.push_text("name", dto.name);
        fields.push_text("surname", dto.surname);
        fields.push_text("email", dto.email.to_lowercase());
        fields.push_text("phone", dto.phone);
        fields.push_text("address", dto.address);
        fields.push_text("blood_type", dto.blood_type);
        fields.push_text("sex", dto.sex.to_lowercase());
        fields.push("birthday", SqlValue::Date(birthday));
        if let Some(profile) = dto.profile {
            fields.push_text("profile", normalize_upload_path("profile", &profile)?);
        }
        fields.push_opt_int("parent_id", parent_id);
        fields.push_opt_int("class_id", dto.class_id);
        fields.push_opt_int("grade_id", dto.grade_id);
        fields.push("school_id", SqlValue::Int(school_id));

        let id = records::insert(db, Table::Student, &fields).await?;
        Self::fetch_profile::<StudentProfile>(db, Table::Student, id, school_id).await
    }

    // -----------------------------------------------------------------------
    // Profile updates
    // -----------------------------------------------------------------------

    #[instrument(skip(db, dto))]
    pub async fn update_admin(
        db: &PgPool,
        id: i64,
        dto: UpdateAdminDto,
    ) -> Result<AdminProfile, AppError> {
        let existing = records::fetch_by_id::<AdminRecord>(db, Table::Admin, id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Admin not found"))?;

        let mut updates = Fields::new();
        updates.push_opt_text("username", dto.username);
        updates.push_opt_text("email", dto.email.map(|e| e.to_lowercase()));
        updates.push_opt_text("full_name", dto.full_name);
        updates.push_opt_text("phone_number", dto.phone_number);
        updates.push_opt_text("school_name", dto.school_name);
        updates.push_opt_text("school_address", dto.school_address);
        updates.push_opt_text("school_contact_number", dto.school_contact_number);
        updates.push_opt_text("school_email", dto.school_email.map(|e| e.to_lowercase()));
        updates.push_opt_text("school_register_id", dto.school_register_id);
        updates.push_opt_text("government_id", dto.government_id);
        if let Some(established) = non_blank(dto.school_established) {
            let parsed = parse_date("schoolEstablished", &established)?;
            updates.push("school_established", SqlValue::Date(parsed));
        }
        if let Some(picture) = non_blank(dto.profile_picture) {
            updates.push_text(
                "profile_picture",
                normalize_upload_path("profilePicture", &picture)?,
            );
        }
        if let Some(logo) = non_blank(dto.school_logo) {
            updates.push_text("school_logo", normalize_upload_path("schoolLogo", &logo)?);
        }
        gate_password_change(&mut updates, dto.password, dto.old_password, &existing.password)?;

        if updates.is_empty() {
            return Err(AppError::bad_request("No fields provided to update"));
        }

        // Admin identity is unique across the whole table, not per school.
        Self::ensure_unique_identity(
            db,
            Role::Admin,
            updates.get("username").and_then(|v| v.as_text()),
            updates.get("email").and_then(|v| v.as_text()),
            None,
            Some(id),
        )
        .await?;

        Self::apply_update(db, Table::Admin, id, id, &updates, "Admin").await?;
        Self::fetch_profile::<AdminProfile>(db, Table::Admin, id, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        school_id: i64,
        id: i64,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherProfile, AppError> {
        let existing = records::fetch_by_id::<TeacherRecord>(db, Table::Teacher, id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found("Teacher not found"))?;

        let mut updates = Fields::new();
        updates.push_opt_text("username", dto.username);
        updates.push_opt_text("email", dto.email.map(|e| e.to_lowercase()));
        updates.push_opt_text("name", dto.name);
        updates.push_opt_text("surname", dto.surname);
        updates.push_opt_text("phone", dto.phone);
        updates.push_opt_text("address", dto.address);
        updates.push_opt_text("blood_type", dto.blood_type);
        updates.push_opt_text("sex", dto.sex.map(|s| s.to_lowercase()));
        if let Some(birthday) = non_blank(dto.birthday) {
            updates.push("birthday", SqlValue::Date(parse_date("birthday", &birthday)?));
        }
        if let Some(profile) = non_blank(dto.profile) {
            updates.push_text("profile", normalize_upload_path("profile", &profile)?);
        }
        gate_password_change(&mut updates, dto.password, dto.old_password, &existing.password)?;

        if updates.is_empty() {
            return Err(AppError::bad_request("No fields provided to update"));
        }

        Self::ensure_unique_identity(
            db,
            Role::Teacher,
            updates.get("username").and_then(|v| v.as_text()),
            updates.get("email").and_then(|v| v.as_text()),
            Some(school_id),
            Some(id),
        )
        .await?;

        Self::apply_update(db, Table::Teacher, id, school_id, &updates, "Teacher").await?;
        Self::fetch_profile::<TeacherProfile>(db, Table::Teacher, id, school_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        school_id: i64,
        id: i64,
        dto: UpdateParentDto,
    ) -> Result<ParentProfile, AppError> {
        let existing = records::fetch_by_id::<ParentRecord>(db, Table::Parent, id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent not found"))?;

        let mut updates = Fields::new();
        updates.push_opt_text("username", dto.username);
        updates.push_opt_text("email", dto.email.map(|e| e.to_lowercase()));
        updates.push_opt_text("name", dto.name);
        updates.push_opt_text("surname", dto.surname);
        updates.push_opt_text("phone", dto.phone);
        updates.push_opt_text("address", dto.address);
        gate_password_change(&mut updates, dto.password, dto.old_password, &existing.password)?;

        if updates.is_empty() {
            return Err(AppError::bad_request("No fields provided to update"));
        }

        Self::ensure_unique_identity(
            db,
            Role::Parent,
            updates.get("username").and_then(|v| v.as_text()),
            updates.get("email").and_then(|v| v.as_text()),
            Some(school_id),
            Some(id),
        )
        .await?;

        Self::apply_update(db, Table::Parent, id, school_id, &updates, "Parent").await?;
        Self::fetch_profile::<ParentProfile>(db, Table::Parent, id, school_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        school_id: i64,
        id: i64,
        dto: UpdateStudentDto,
    ) -> Result<StudentProfile, AppError> {
        let existing = records::fetch_by_id::<StudentRecord>(db, Table::Student, id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        let mut updates = Fields::new();
        updates.push_opt_text("username", dto.username);
        updates.push_opt_text("email", dto.email.map(|e| e.to_lowercase()));
        updates.push_opt_text("name", dto.name);
        updates.push_opt_text("surname", dto.surname);
        updates.push_opt_text("phone", dto.phone);
        updates.push_opt_text("address", dto.address);
        updates.push_opt_text("blood_type", dto.blood_type);
        updates.push_opt_text("sex", dto.sex.map(|s| s.to_lowercase()));
        if let Some(birthday) = non_blank(dto.birthday) {
            updates.push("birthday", SqlValue::Date(parse_date("birthday", &birthday)?));
        }
        if let Some(profile) = non_blank(dto.profile) {
            updates.push_text("profile", normalize_upload_path("profile", &profile)?);
        }

        if let Some(class_id) = dto.class_id {
            if !records::exists(db, Table::Class, class_id, school_id).await? {
                return Err(AppError::not_found(format!("Class {} not found", class_id)));
            }
            updates.push("class_id", SqlValue::Int(class_id));
        }

        if let Some(grade_id) = dto.grade_id {
            if !records::exists(db, Table::Grade, grade_id, school_id).await? {
                return Err(AppError::not_found(format!("Grade {} not found", grade_id)));
            }
            updates.push("grade_id", SqlValue::Int(grade_id));
        }

        gate_password_change(&mut updates, dto.password, dto.old_password, &existing.password)?;

        if updates.is_empty() {
            return Err(AppError::bad_request("No fields provided to update"));
        }

        Self::ensure_unique_identity(
            db,
            Role::Student,
            updates.get("username").and_then(|v| v.as_text()),
            updates.get("email").and_then(|v| v.as_text()),
            Some(school_id),
            Some(id),
        )
        .await?;

        Self::apply_update(db, Table::Student, id, school_id, &updates, "Student").await?;
        Self::fetch_profile::<StudentProfile>(db, Table::Student, id, school_id).await
    }

    // -----------------------------------------------------------------------
    // Listings and deletion
    // -----------------------------------------------------------------------

    /// Cross-school listing; the superadmin's only scope bypass.
    #[instrument(skip(db))]
    pub async fn list_admins(db: &PgPool) -> Result<Vec<AdminProfile>, AppError> {
        let admins = sqlx::query_as::<_, AdminProfile>("SELECT * FROM admin ORDER BY id")
            .fetch_all(db)
            .await?;
        Ok(admins)
    }

    #[instrument(skip(db))]
    pub async fn list_teachers(db: &PgPool, school_id: i64) -> Result<Vec<TeacherProfile>, AppError> {
        records::fetch_all::<TeacherProfile>(db, Table::Teacher, school_id).await
    }

    #[instrument(skip(db))]
    pub async fn list_parents(db: &PgPool, school_id: i64) -> Result<Vec<ParentProfile>, AppError> {
        records::fetch_all::<ParentProfile>(db, Table::Parent, school_id).await
    }

    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool, school_id: i64) -> Result<Vec<StudentProfile>, AppError> {
        records::fetch_all::<StudentProfile>(db, Table::Student, school_id).await
    }

    /// Physical delete, scoped to the caller's school.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64, school_id: i64) -> Result<i64, AppError> {
        let record = Self::find_by_id(db, id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let deleted = records::delete_by_id(db, record.table(), id, school_id).await?;
        if !deleted {
            return Err(AppError::internal(anyhow::anyhow!(
                "user {} was not deleted despite being found",
                id
            )));
        }

        Ok(record.id())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn ensure_unique_identity(
        db: &PgPool,
        role: Role,
        username: Option<&str>,
        email: Option<&str>,
        school_id: Option<i64>,
        exclude_id: Option<i64>,
    ) -> Result<(), AppError> {
        if username.is_none() && email.is_none() {
            return Ok(());
        }

        if let Some(existing) = Self::find_in_table(db, role, username, email, school_id).await?
            && Some(existing.id()) != exclude_id
        {
            return Err(AppError::conflict("Username or email already exists"));
        }

        Ok(())
    }

    async fn apply_update(
        db: &PgPool,
        table: Table,
        id: i64,
        school_id: i64,
        updates: &Fields,
        entity: &'static str,
    ) -> Result<(), AppError> {
        let updated = records::update(db, table, id, school_id, updates).await?;
        if !updated {
            return Err(AppError::internal(anyhow::anyhow!(
                "{} {} was not updated despite passing validation",
                entity,
                id
            )));
        }
        Ok(())
    }

    async fn fetch_profile<T>(
        db: &PgPool,
        table: Table,
        id: i64,
        school_id: i64,
    ) -> Result<T, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        records::fetch_by_id::<T>(db, table, id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("{} {} missing after write", table, id))
            })
    }
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(format!("Invalid '{}' date format. Use YYYY-MM-DD", field))
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Password changes ride along on profile updates but are gated on the
/// account's current password: a new password without the old one is a
/// validation failure, a wrong old one is an authorization failure. Nothing
/// is hashed or staged until the old password verifies.
fn gate_password_change(
    updates: &mut Fields,
    new_password: Option<String>,
    old_password: Option<String>,
    stored_hash: &str,
) -> Result<(), AppError> {
    let new_password = non_blank(new_password);
    let old_password = non_blank(old_password);

    if let Some(new_password) = new_password {
        let old_password = old_password.ok_or_else(|| {
            AppError::bad_request("Please provide the old password to change the password")
        })?;

        if !verify_password(&old_password, stored_hash)? {
            return Err(AppError::unauthorized("Old password does not match"));
        }

        updates.push_text("password", hash_password(&new_password)?);
    }

    Ok(())
}
