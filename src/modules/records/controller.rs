//! Handlers for the academic record endpoints.
//!
//! The create/update/list handlers are generic over [`Record`] and are
//! instantiated per entity in the router, so adding an entity means adding a
//! model and a route, not another handler. The dynamic `{table}` handlers
//! parse the path segment against the record allow-list before anything else
//! touches it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::model::MessageResponse;
use crate::modules::records::model::{Record, RecordPayload};
use crate::modules::records::service::RecordService;
use crate::state::AppState;
use crate::store::Table;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

fn parse_record_table(name: &str) -> Result<Table, AppError> {
    Table::from_record_name(name).ok_or_else(|| AppError::bad_request("Invalid table name"))
}

pub async fn create_record<R: Record>(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<R::Create>,
) -> Result<(StatusCode, Json<R>), AppError> {
    let record = RecordService::create::<R>(&state.db, admin.school_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record<R: Record>(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<R::Update>,
) -> Result<Json<R>, AppError> {
    let record = RecordService::update::<R>(&state.db, admin.school_id(), id, dto).await?;
    Ok(Json(record))
}

pub async fn list_records<R: Record>(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<R>>, AppError> {
    let records = RecordService::list::<R>(&state.db, auth_user.school_id()).await?;
    Ok(Json(records))
}

#[instrument(skip(state, auth_user))]
pub async fn get_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Json<RecordPayload>, AppError> {
    let table = parse_record_table(&table)?;
    let record = RecordService::get_any(&state.db, table, id, auth_user.school_id()).await?;
    Ok(Json(record))
}

#[instrument(skip(state, admin))]
pub async fn delete_record(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    let table = parse_record_table(&table)?;
    let entity = RecordService::delete_any(&state.db, table, id, admin.school_id()).await?;
    Ok(Json(MessageResponse {
        message: format!("{} deleted successfully", entity),
    }))
}
