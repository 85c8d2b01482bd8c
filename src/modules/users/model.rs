//! User data models and DTOs.
//!
//! Each role lives in its own table with its own column set, so each role has
//! a pair of types: a `*Record` carrying the full row including the password
//! hash (internal only, never serialized) and a `*Profile` carrying the
//! response shape. The [`UserRecord`] and [`UserProfile`] enums close the
//! four roles into single types for the identity resolver and for responses
//! that tag the owning role, mirroring the role tag the resolver attaches.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Table;

/// Caller roles as embedded in token claims.
///
/// Superadmin is an admin row flagged at the database level; it can only be
/// seeded from the CLI, never through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Parent,
    Student,
    Superadmin,
}

impl Role {
    /// Credential lookup order. A username colliding across role tables
    /// resolves to the earliest role in this list; the ordering is load-
    /// bearing for login and must not be rearranged.
    pub const LOGIN_ORDER: [Role; 4] = [Role::Admin, Role::Teacher, Role::Parent, Role::Student];

    pub const fn table(&self) -> Table {
        match self {
            Role::Admin | Role::Superadmin => Table::Admin,
            Role::Teacher => Table::Teacher,
            Role::Parent => Table::Parent,
            Role::Student => Table::Student,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal rows (password included; never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub school_contact_number: Option<String>,
    pub school_email: Option<String>,
    pub school_register_id: Option<String>,
    pub government_id: Option<String>,
    pub agreement_to_terms: bool,
    pub school_established: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    pub school_logo: Option<String>,
    pub is_superadmin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeacherRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub profile: Option<String>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ParentRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub profile: Option<String>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    pub grade_id: Option<i64>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A credential-bearing row from one of the four role tables.
///
/// The password hash stays inside until the boundary layer converts the
/// record into a [`UserProfile`]; handlers never serialize this type.
#[derive(Debug, Clone)]
pub enum UserRecord {
    Admin(AdminRecord),
    Teacher(TeacherRecord),
    Parent(ParentRecord),
    Student(StudentRecord),
}

impl UserRecord {
    pub fn id(&self) -> i64 {
        match self {
            UserRecord::Admin(r) => r.id,
            UserRecord::Teacher(r) => r.id,
            UserRecord::Parent(r) => r.id,
            UserRecord::Student(r) => r.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            UserRecord::Admin(r) => &r.email,
            UserRecord::Teacher(r) => &r.email,
            UserRecord::Parent(r) => &r.email,
            UserRecord::Student(r) => &r.email,
        }
    }

    pub fn password(&self) -> &str {
        match self {
            UserRecord::Admin(r) => &r.password,
            UserRecord::Teacher(r) => &r.password,
            UserRecord::Parent(r) => &r.password,
            UserRecord::Student(r) => &r.password,
        }
    }

    /// An admin's own id anchors its school.
    pub fn school_id(&self) -> i64 {
        match self {
            UserRecord::Admin(r) => r.id,
            UserRecord::Teacher(r) => r.school_id,
            UserRecord::Parent(r) => r.school_id,
            UserRecord::Student(r) => r.school_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserRecord::Admin(r) if r.is_superadmin => Role::Superadmin,
            UserRecord::Admin(_) => Role::Admin,
            UserRecord::Teacher(_) => Role::Teacher,
            UserRecord::Parent(_) => Role::Parent,
            UserRecord::Student(_) => Role::Student,
        }
    }

    pub fn table(&self) -> Table {
        self.role().table()
    }

    /// Strips the secret field and tags the payload with the owning role.
    pub fn into_profile(self) -> UserProfile {
        match self {
            UserRecord::Admin(r) if r.is_superadmin => UserProfile::Superadmin(r.into()),
            UserRecord::Admin(r) => UserProfile::Admin(r.into()),
            UserRecord::Teacher(r) => UserProfile::Teacher(r.into()),
            UserRecord::Parent(r) => UserProfile::Parent(r.into()),
            UserRecord::Student(r) => UserProfile::Student(r.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Response profiles (no password field exists on these types)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub school_contact_number: Option<String>,
    pub school_email: Option<String>,
    pub school_register_id: Option<String>,
    pub government_id: Option<String>,
    pub agreement_to_terms: bool,
    pub school_established: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    pub school_logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminRecord> for AdminProfile {
    fn from(r: AdminRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            full_name: r.full_name,
            email: r.email,
            phone_number: r.phone_number,
            school_name: r.school_name,
            school_address: r.school_address,
            school_contact_number: r.school_contact_number,
            school_email: r.school_email,
            school_register_id: r.school_register_id,
            government_id: r.government_id,
            agreement_to_terms: r.agreement_to_terms,
            school_established: r.school_established,
            profile_picture: r.profile_picture,
            school_logo: r.school_logo,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub profile: Option<String>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeacherRecord> for TeacherProfile {
    fn from(r: TeacherRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            name: r.name,
            surname: r.surname,
            email: r.email,
            phone: r.phone,
            address: r.address,
            blood_type: r.blood_type,
            sex: r.sex,
            birthday: r.birthday,
            profile: r.profile,
            school_id: r.school_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParentRecord> for ParentProfile {
    fn from(r: ParentRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            name: r.name,
            surname: r.surname,
            email: r.email,
            phone: r.phone,
            address: r.address,
            school_id: r.school_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub profile: Option<String>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    pub grade_id: Option<i64>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentRecord> for StudentProfile {
    fn from(r: StudentRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            name: r.name,
            surname: r.surname,
            email: r.email,
            phone: r.phone,
            address: r.address,
            blood_type: r.blood_type,
            sex: r.sex,
            birthday: r.birthday,
            profile: r.profile,
            parent_id: r.parent_id,
            class_id: r.class_id,
            grade_id: r.grade_id,
            school_id: r.school_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Role-tagged user payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserProfile {
    Admin(AdminProfile),
    Teacher(TeacherProfile),
    Parent(ParentProfile),
    Student(StudentProfile),
    Superadmin(AdminProfile),
}

impl UserProfile {
    pub fn id(&self) -> i64 {
        match self {
            UserProfile::Admin(p) | UserProfile::Superadmin(p) => p.id,
            UserProfile::Teacher(p) => p.id,
            UserProfile::Parent(p) => p.id,
            UserProfile::Student(p) => p.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherDto {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub blood_type: String,
    #[validate(length(min = 1))]
    pub sex: String,
    /// `YYYY-MM-DD`
    pub birthday: String,
    /// Path handed over by the upload collaborator.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParentDto {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub blood_type: String,
    #[validate(length(min = 1))]
    pub sex: String,
    /// `YYYY-MM-DD`
    pub birthday: String,
    pub profile: Option<String>,
    /// Either a parent username (resolved within the school) or a parent id.
    pub parent_username: Option<String>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    pub grade_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminDto {
    pub username: Option<String>,
    pub old_password: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub school_contact_number: Option<String>,
    pub school_email: Option<String>,
    pub school_register_id: Option<String>,
    pub government_id: Option<String>,
    /// `YYYY-MM-DD`
    pub school_established: Option<String>,
    pub profile_picture: Option<String>,
    pub school_logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherDto {
    pub username: Option<String>,
    pub old_password: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParentDto {
    pub username: Option<String>,
    pub old_password: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
    pub username: Option<String>,
    pub old_password: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub sex: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub profile: Option<String>,
    pub class_id: Option<i64>,
    pub grade_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_order_is_admin_first() {
        assert_eq!(
            Role::LOGIN_ORDER,
            [Role::Admin, Role::Teacher, Role::Parent, Role::Student]
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Superadmin).unwrap(),
            "\"superadmin\""
        );
    }

    #[test]
    fn test_profile_serialization_has_no_password() {
        let record = ParentRecord {
            id: 1,
            username: "pat".to_string(),
            password: "$2b$10$secret-hash".to_string(),
            name: "Pat".to_string(),
            surname: "Smith".to_string(),
            email: "pat@example.com".to_string(),
            phone: None,
            address: None,
            school_id: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = UserRecord::Parent(record).into_profile();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"parent\""));
        assert!(json.contains("\"schoolId\":7"));
    }

    #[test]
    fn test_superadmin_flag_changes_role_tag() {
        let record = AdminRecord {
            id: 3,
            username: "root".to_string(),
            password: "hash".to_string(),
            full_name: "Root User".to_string(),
            email: "root@example.com".to_string(),
            phone_number: None,
            school_name: None,
            school_address: None,
            school_contact_number: None,
            school_email: None,
            school_register_id: None,
            government_id: None,
            agreement_to_terms: true,
            school_established: None,
            profile_picture: None,
            school_logo: None,
            is_superadmin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(UserRecord::Admin(record.clone()).role(), Role::Superadmin);
        let json = serde_json::to_string(&UserRecord::Admin(record).into_profile()).unwrap();
        assert!(json.contains("\"role\":\"superadmin\""));
    }
}
