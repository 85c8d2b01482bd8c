use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{AdminSignupDto, AuthResponse, LoginRequest, MessageResponse};
use crate::modules::records::model::{
    Announcement, AssessmentResult, Assignment, Attendance, Class, Event, Exam, Grade, Lesson,
    RecordPayload, Subject,
};
use crate::modules::users::controller::DeletedUserResponse;
use crate::modules::users::model::{
    AdminProfile, CreateParentDto, CreateStudentDto, CreateTeacherDto, ParentProfile, Role,
    StudentProfile, TeacherProfile, UpdateAdminDto, UpdateParentDto, UpdateStudentDto,
    UpdateTeacherDto, UserProfile,
};

// The academic record routes are registered through generic handlers and are
// not individually annotated; their schemas are still published below.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::get_current_user,
        crate::modules::users::controller::create_teacher,
        crate::modules::users::controller::create_parent,
        crate::modules::users::controller::create_student,
        crate::modules::users::controller::update_admin,
        crate::modules::users::controller::update_teacher,
        crate::modules::users::controller::update_parent,
        crate::modules::users::controller::update_student,
        crate::modules::users::controller::get_admins,
        crate::modules::users::controller::get_teachers,
        crate::modules::users::controller::get_parents,
        crate::modules::users::controller::get_students,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            Role,
            UserProfile,
            AdminProfile,
            TeacherProfile,
            ParentProfile,
            StudentProfile,
            AdminSignupDto,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            ErrorResponse,
            DeletedUserResponse,
            CreateTeacherDto,
            CreateParentDto,
            CreateStudentDto,
            UpdateAdminDto,
            UpdateTeacherDto,
            UpdateParentDto,
            UpdateStudentDto,
            Grade,
            Class,
            Subject,
            Lesson,
            Exam,
            Assignment,
            AssessmentResult,
            Attendance,
            Event,
            Announcement,
            RecordPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and session endpoints"),
        (name = "Users", description = "Admin-driven account management")
    ),
    info(
        title = "Slateboard API",
        version = "0.1.0",
        description = "Multi-tenant school management REST API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
