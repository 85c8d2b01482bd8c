//! Tenant-scoped record store.
//!
//! Generic parameterized access over the whitelisted tables. Every read and
//! write is filtered by the table's tenant column in addition to the row id,
//! so a cross-tenant row is indistinguishable from an absent one. Statement
//! text is assembled only from [`Table`] identifiers and `'static` column
//! names; every value travels through a bind parameter.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::store::table::Table;
use crate::store::value::{Fields, SqlValue, bind_value};
use crate::utils::errors::AppError;

#[instrument(skip(db))]
pub async fn fetch_by_id<T>(
    db: &PgPool,
    table: Table,
    id: i64,
    school_id: i64,
) -> Result<Option<T>, AppError>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE id = $1 AND {} = $2",
        table,
        table.tenant_column()
    );

    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .bind(school_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

#[instrument(skip(db))]
pub async fn fetch_all<T>(db: &PgPool, table: Table, school_id: i64) -> Result<Vec<T>, AppError>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE {} = $1 ORDER BY id",
        table,
        table.tenant_column()
    );

    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(school_id)
        .fetch_all(db)
        .await?;

    Ok(rows)
}

#[instrument(skip(db))]
pub async fn exists(db: &PgPool, table: Table, id: i64, school_id: i64) -> Result<bool, AppError> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND {} = $2)",
        table,
        table.tenant_column()
    );

    let found = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .bind(school_id)
        .fetch_one(db)
        .await?;

    Ok(found)
}

/// Inserts a row and returns its generated id. Callers re-select the
/// canonical row afterwards rather than echoing client-supplied values, so
/// server-generated columns (id, timestamps) are always authoritative.
#[instrument(skip(db, fields))]
pub async fn insert(db: &PgPool, table: Table, fields: &Fields) -> Result<i64, AppError> {
    let columns = fields.columns().join(", ");
    let placeholders = (1..=fields.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        table, columns, placeholders
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in fields.iter() {
        query = bind_value(query, value);
    }

    let row = query.fetch_one(db).await?;
    row.try_get("id").map_err(AppError::from)
}

/// Applies a sparse field set to one tenant-scoped row.
///
/// An empty field set is rejected before any statement is issued. Returns
/// whether a row was actually updated; a `false` after the caller has already
/// verified existence means the row disappeared between statements.
#[instrument(skip(db, fields))]
pub async fn update(
    db: &PgPool,
    table: Table,
    id: i64,
    school_id: i64,
    fields: &Fields,
) -> Result<bool, AppError> {
    if fields.is_empty() {
        return Err(AppError::bad_request("No fields provided to update"));
    }

    let assignments = fields
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {}, updated_at = NOW() WHERE id = ${} AND {} = ${}",
        table,
        assignments,
        fields.len() + 1,
        table.tenant_column(),
        fields.len() + 2
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in fields.iter() {
        query = bind_value(query, value);
    }

    let result = query.bind(id).bind(school_id).execute(db).await?;
    Ok(result.rows_affected() > 0)
}

#[instrument(skip(db))]
pub async fn delete_by_id(
    db: &PgPool,
    table: Table,
    id: i64,
    school_id: i64,
) -> Result<bool, AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE id = $1 AND {} = $2",
        table,
        table.tenant_column()
    );

    let result = sqlx::query(&sql).bind(id).bind(school_id).execute(db).await?;
    Ok(result.rows_affected() > 0)
}

/// Looks for a row that would collide with a scoped uniqueness key. On
/// update, the record's own id is excluded from the scan.
#[instrument(skip(db, value))]
pub async fn unique_conflict(
    db: &PgPool,
    table: Table,
    column: &'static str,
    value: &SqlValue,
    school_id: i64,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    let mut sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND {} = $2",
        table,
        column,
        table.tenant_column()
    );
    if exclude_id.is_some() {
        sql.push_str(" AND id <> $3");
    }
    sql.push(')');

    let mut query = sqlx::query(&sql);
    query = bind_value(query, value);
    query = query.bind(school_id);
    if let Some(exclude_id) = exclude_id {
        query = query.bind(exclude_id);
    }

    let row = query.fetch_one(db).await?;
    row.try_get(0).map_err(AppError::from)
}
