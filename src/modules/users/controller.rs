use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireSuperadmin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::AuthResponse;
use crate::modules::users::model::{
    AdminProfile, CreateParentDto, CreateStudentDto, CreateTeacherDto, ParentProfile, Role,
    StudentProfile, TeacherProfile, UpdateAdminDto, UpdateParentDto, UpdateStudentDto,
    UpdateTeacherDto, UserProfile,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct DeletedUserResponse {
    pub message: String,
    pub id: i64,
}

/// Create a teacher account in the admin's school
#[utoipa::path(
    post,
    path = "/api/create-teacher",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created successfully", body = AuthResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let school_id = admin.school_id();
    let profile = UserService::create_teacher(&state.db, school_id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Teacher,
        school_id,
        &state.jwt_config,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::Teacher(profile),
            access_token,
        }),
    ))
}

/// Create a parent account in the admin's school
#[utoipa::path(
    post,
    path = "/api/create-parent",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created successfully", body = AuthResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_parent(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let school_id = admin.school_id();
    let profile = UserService::create_parent(&state.db, school_id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Parent,
        school_id,
        &state.jwt_config,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::Parent(profile),
            access_token,
        }),
    ))
}

/// Create a student account in the admin's school
#[utoipa::path(
    post,
    path = "/api/create-student",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created successfully", body = AuthResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Referenced parent, class or grade not found", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let school_id = admin.school_id();
    let profile = UserService::create_student(&state.db, school_id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Student,
        school_id,
        &state.jwt_config,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::Student(profile),
            access_token,
        }),
    ))
}

/// Update the admin's own profile
#[utoipa::path(
    put,
    path = "/api/update-admin/{id}",
    request_body = UpdateAdminDto,
    responses(
        (status = 200, description = "Admin updated successfully", body = AuthResponse),
        (status = 400, description = "Bad request - no fields or validation error", body = ErrorResponse),
        (status = 401, description = "Old password missing or wrong", body = ErrorResponse),
        (status = 403, description = "Not the caller's own profile", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_admin(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminDto>,
) -> Result<Json<AuthResponse>, AppError> {
    if id != admin.user_id()? {
        return Err(AppError::forbidden(
            "You can only update your own admin profile",
        ));
    }

    let profile = UserService::update_admin(&state.db, id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Admin,
        profile.id,
        &state.jwt_config,
    )?;

    Ok(Json(AuthResponse {
        user: UserProfile::Admin(profile),
        access_token,
    }))
}

/// Update a teacher profile in the admin's school
#[utoipa::path(
    put,
    path = "/api/update-teacher/{id}",
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated successfully", body = AuthResponse),
        (status = 400, description = "Bad request - no fields or validation error", body = ErrorResponse),
        (status = 401, description = "Old password missing or wrong", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Teacher not found in this school", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let school_id = admin.school_id();
    let profile = UserService::update_teacher(&state.db, school_id, id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Teacher,
        school_id,
        &state.jwt_config,
    )?;

    Ok(Json(AuthResponse {
        user: UserProfile::Teacher(profile),
        access_token,
    }))
}

/// Update a parent profile in the admin's school
#[utoipa::path(
    put,
    path = "/api/update-parent/{id}",
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated successfully", body = AuthResponse),
        (status = 400, description = "Bad request - no fields or validation error", body = ErrorResponse),
        (status = 401, description = "Old password missing or wrong", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Parent not found in this school", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_parent(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let school_id = admin.school_id();
    let profile = UserService::update_parent(&state.db, school_id, id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Parent,
        school_id,
        &state.jwt_config,
    )?;

    Ok(Json(AuthResponse {
        user: UserProfile::Parent(profile),
        access_token,
    }))
}

/// Update a student profile in the admin's school
#[utoipa::path(
    put,
    path = "/api/update-student/{id}",
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully", body = AuthResponse),
        (status = 400, description = "Bad request - no fields or validation error", body = ErrorResponse),
        (status = 401, description = "Old password missing or wrong", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Student, class or grade not found in this school", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let school_id = admin.school_id();
    let profile = UserService::update_student(&state.db, school_id, id, dto).await?;
    let access_token = create_access_token(
        profile.id,
        &profile.email,
        Role::Student,
        school_id,
        &state.jwt_config,
    )?;

    Ok(Json(AuthResponse {
        user: UserProfile::Student(profile),
        access_token,
    }))
}

/// List all admins across schools (superadmin only)
#[utoipa::path(
    get,
    path = "/api/get-admins",
    responses(
        (status = 200, description = "All admins", body = Vec<AdminProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a superadmin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _superadmin))]
pub async fn get_admins(
    State(state): State<AppState>,
    _superadmin: RequireSuperadmin,
) -> Result<Json<Vec<AdminProfile>>, AppError> {
    let admins = UserService::list_admins(&state.db).await?;
    Ok(Json(admins))
}

/// List the teachers of the caller's school
#[utoipa::path(
    get,
    path = "/api/get-teachers",
    responses(
        (status = 200, description = "Teachers in the caller's school", body = Vec<TeacherProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_teachers(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<TeacherProfile>>, AppError> {
    let teachers = UserService::list_teachers(&state.db, auth_user.school_id()).await?;
    Ok(Json(teachers))
}

/// List the parents of the caller's school
#[utoipa::path(
    get,
    path = "/api/get-parents",
    responses(
        (status = 200, description = "Parents in the caller's school", body = Vec<ParentProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_parents(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ParentProfile>>, AppError> {
    let parents = UserService::list_parents(&state.db, auth_user.school_id()).await?;
    Ok(Json(parents))
}

/// List the students of the caller's school
#[utoipa::path(
    get,
    path = "/api/get-students",
    responses(
        (status = 200, description = "Students in the caller's school", body = Vec<StudentProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<StudentProfile>>, AppError> {
    let students = UserService::list_students(&state.db, auth_user.school_id()).await?;
    Ok(Json(students))
}

/// Fetch a single user of any role within the caller's school
#[utoipa::path(
    get,
    path = "/api/get-user/{id}",
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found in this school", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let record = UserService::find_by_id(&state.db, id, auth_user.school_id())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(record.into_profile()))
}

/// Delete a user of any role within the admin's school
#[utoipa::path(
    delete,
    path = "/api/delete-user/{id}",
    responses(
        (status = 200, description = "User deleted", body = DeletedUserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found in this school", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<DeletedUserResponse>, AppError> {
    let deleted_id = UserService::delete_user(&state.db, id, admin.school_id()).await?;
    Ok(Json(DeletedUserResponse {
        message: "User deleted successfully".to_string(),
        id: deleted_id,
    }))
}
