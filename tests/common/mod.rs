#[allow(unused_imports)]
use sqlx::PgPool;

use slateboard::modules::auth::model::AdminSignupDto;
use slateboard::store::{Fields, SqlValue, Table, records};
use slateboard::utils::password::hash_password;

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "test-password-123";

/// Creates a school by inserting its anchoring admin row and returns the
/// school id (which is the admin id).
#[allow(dead_code)]
pub async fn create_school(pool: &PgPool, username: &str) -> i64 {
    let mut fields = Fields::new();
    fields.push_text("username", username);
    fields.push_text("password", hash_password(TEST_PASSWORD).unwrap());
    fields.push_text("full_name", "Test Admin");
    fields.push_text("email", format!("{}@test.com", username));
    fields.push_text("school_name", format!("{} School", username));
    fields.push("agreement_to_terms", SqlValue::Bool(true));

    records::insert(pool, Table::Admin, &fields).await.unwrap()
}

#[allow(dead_code)]
pub async fn create_superadmin(pool: &PgPool, username: &str) -> i64 {
    let mut fields = Fields::new();
    fields.push_text("username", username);
    fields.push_text("password", hash_password(TEST_PASSWORD).unwrap());
    fields.push_text("full_name", "Test Superadmin");
    fields.push_text("email", format!("{}@test.com", username));
    fields.push("agreement_to_terms", SqlValue::Bool(true));
    fields.push("is_superadmin", SqlValue::Bool(true));

    records::insert(pool, Table::Admin, &fields).await.unwrap()
}

#[allow(dead_code)]
pub async fn create_teacher_row(pool: &PgPool, school_id: i64, username: &str) -> i64 {
    let mut fields = Fields::new();
    fields.push_text("username", username);
    fields.push_text("password", hash_password(TEST_PASSWORD).unwrap());
    fields.push_text("name", "Test");
    fields.push_text("surname", "Teacher");
    fields.push_text("email", format!("{}@test.com", username));
    fields.push("school_id", SqlValue::Int(school_id));

    records::insert(pool, Table::Teacher, &fields).await.unwrap()
}

#[allow(dead_code)]
pub async fn create_parent_row(pool: &PgPool, school_id: i64, username: &str) -> i64 {
    let mut fields = Fields::new();
    fields.push_text("username", username);
    fields.push_text("password", hash_password(TEST_PASSWORD).unwrap());
    fields.push_text("name", "Test");
    fields.push_text("surname", "Parent");
    fields.push_text("email", format!("{}@test.com", username));
    fields.push("school_id", SqlValue::Int(school_id));

    records::insert(pool, Table::Parent, &fields).await.unwrap()
}

#[allow(dead_code)]
pub async fn create_student_row(pool: &PgPool, school_id: i64, username: &str) -> i64 {
    let mut fields = Fields::new();
    fields.push_text("username", username);
    fields.push_text("password", hash_password(TEST_PASSWORD).unwrap());
    fields.push_text("name", "Test");
    fields.push_text("surname", "Student");
    fields.push_text("email", format!("{}@test.com", username));
    fields.push("school_id", SqlValue::Int(school_id));

    records::insert(pool, Table::Student, &fields).await.unwrap()
}

#[allow(dead_code)]
pub fn admin_signup_dto(username: &str) -> AdminSignupDto {
    AdminSignupDto {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        email: format!("{}@test.com", username),
        full_name: "Signup Admin".to_string(),
        phone_number: "555-0100".to_string(),
        school_name: format!("{} Academy", username),
        school_address: "1 Test Street".to_string(),
        school_contact_number: "555-0101".to_string(),
        school_email: format!("office-{}@test.com", username),
        school_register_id: "REG-001".to_string(),
        government_id: "GOV-001".to_string(),
        agreement_to_terms: true,
        school_established: "1999-09-01".to_string(),
        profile_picture: None,
        school_logo: None,
    }
}
