mod common;

use sqlx::PgPool;

use common::{TEST_PASSWORD, admin_signup_dto, create_school, create_superadmin, create_teacher_row};
use slateboard::modules::auth::model::LoginRequest;
use slateboard::modules::auth::service::AuthService;
use slateboard::modules::users::model::Role;
use slateboard::utils::errors::AppError;

fn login_request(username: Option<&str>, email: Option<&str>, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.map(str::to_string),
        email: email.map(str::to_string),
        password: password.to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_creates_school_anchor(pool: PgPool) {
    let profile = AuthService::signup_admin(&pool, admin_signup_dto("su-admin"))
        .await
        .unwrap();

    assert!(profile.id > 0);
    assert_eq!(profile.email, "su-admin@test.com");
    assert_eq!(profile.school_name.as_deref(), Some("su-admin Academy"));
    assert_eq!(
        profile.school_established.map(|d| d.to_string()),
        Some("1999-09-01".to_string())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_rejects_duplicate_identity(pool: PgPool) {
    AuthService::signup_admin(&pool, admin_signup_dto("dup-admin"))
        .await
        .unwrap();

    let err = AuthService::signup_admin(&pool, admin_signup_dto("dup-admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_rejects_malformed_date(pool: PgPool) {
    let mut dto = admin_signup_dto("date-admin");
    dto.school_established = "01/09/1999".to_string();

    let err = AuthService::signup_admin(&pool, dto).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_username_or_email(pool: PgPool) {
    let school_id = create_school(&pool, "login-admin").await;

    let by_username = AuthService::login(
        &pool,
        login_request(Some("login-admin"), None, TEST_PASSWORD),
    )
    .await
    .unwrap();
    assert_eq!(by_username.id(), school_id);
    assert_eq!(by_username.role(), Role::Admin);

    let by_email = AuthService::login(
        &pool,
        login_request(None, Some("login-admin@test.com"), TEST_PASSWORD),
    )
    .await
    .unwrap();
    assert_eq!(by_email.id(), school_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_requires_a_credential(pool: PgPool) {
    let err = AuthService::login(&pool, login_request(None, None, TEST_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejects_bad_credentials(pool: PgPool) {
    create_school(&pool, "bad-admin").await;

    let err = AuthService::login(
        &pool,
        login_request(Some("bad-admin"), None, "not-the-password"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = AuthService::login(
        &pool,
        login_request(Some("nobody-here"), None, TEST_PASSWORD),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_resolves_colliding_username_to_earliest_role(pool: PgPool) {
    // The same username exists in both the admin and teacher tables; the
    // lookup order makes the admin win.
    let school_id = create_school(&pool, "shared-name").await;
    create_teacher_row(&pool, school_id, "shared-name").await;

    let record = AuthService::login(
        &pool,
        login_request(Some("shared-name"), None, TEST_PASSWORD),
    )
    .await
    .unwrap();
    assert_eq!(record.role(), Role::Admin);
    assert_eq!(record.id(), school_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_maps_superadmin_flag_to_role(pool: PgPool) {
    create_superadmin(&pool, "root-user").await;

    let record = AuthService::login(
        &pool,
        login_request(Some("root-user"), None, TEST_PASSWORD),
    )
    .await
    .unwrap();
    assert_eq!(record.role(), Role::Superadmin);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_current_user_is_tenant_scoped(pool: PgPool) {
    let school_a = create_school(&pool, "cu-a").await;
    let school_b = create_school(&pool, "cu-b").await;
    let teacher_id = create_teacher_row(&pool, school_a, "cu-teacher").await;

    let record = AuthService::current_user(&pool, teacher_id, school_a)
        .await
        .unwrap();
    assert_eq!(record.role(), Role::Teacher);

    // A stale token naming another school resolves as not found.
    let err = AuthService::current_user(&pool, teacher_id, school_b)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
