//! PostgreSQL connection pool initialization.
//!
//! The database URL is read from the `DATABASE_URL` environment variable.
//! The pool is created once at startup and cloned into the application state;
//! it carries its own internal checkout/return concurrency control.

use sqlx::PgPool;
use std::env;

/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection cannot be
/// established. Startup is the one place where failing loudly is correct.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
