use sqlx::PgPool;
use tracing::instrument;

use crate::modules::records::model::{
    Announcement, AssessmentResult, Assignment, Attendance, Class, Event, Exam, Grade, IntoFields,
    Lesson, Record, RecordPayload, Subject,
};
use crate::store::records;
use crate::store::spec;
use crate::store::{SqlValue, Table};
use crate::utils::errors::AppError;

pub struct RecordService;

impl RecordService {
    /// Validates and inserts a record, then re-selects the canonical row so
    /// the response carries server-generated values rather than echoes of
    /// the request.
    #[instrument(skip(db, dto))]
    pub async fn create<R: Record>(
        db: &PgPool,
        school_id: i64,
        dto: R::Create,
    ) -> Result<R, AppError> {
        let mut fields = dto.into_fields();
        spec::validate(db, &R::SPEC, &mut fields, school_id, None).await?;

        fields.push("school_id", SqlValue::Int(school_id));
        let id = records::insert(db, R::TABLE, &fields).await?;

        records::fetch_by_id::<R>(db, R::TABLE, id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!(
                    "{} {} missing after insert",
                    R::SPEC.entity,
                    id
                ))
            })
    }

    /// Partial update: the supplied fields are merged onto the existing row
    /// and the merged set is re-validated before anything is written. Only
    /// the supplied fields reach the UPDATE statement.
    #[instrument(skip(db, dto))]
    pub async fn update<R: Record>(
        db: &PgPool,
        school_id: i64,
        id: i64,
        dto: R::Update,
    ) -> Result<R, AppError> {
        let existing: R = records::fetch_by_id(db, R::TABLE, id, school_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} not found", R::SPEC.entity)))?;

        let mut supplied = dto.into_fields();
        if supplied.is_empty() {
            return Err(AppError::bad_request("No fields provided to update"));
        }

        spec::coerce_formats(&R::SPEC, &mut supplied)?;

        let mut merged = existing.to_fields();
        merged.apply(&supplied);
        spec::check_required(&R::SPEC, &merged)?;
        spec::check_shape(&R::SPEC, &merged)?;
        spec::check_integrity(db, &R::SPEC, &merged, school_id, Some(id)).await?;

        let updated = records::update(db, R::TABLE, id, school_id, &supplied).await?;
        if !updated {
            // Existence was just verified; losing the row here is a race,
            // reported rather than swallowed.
            return Err(AppError::internal(anyhow::anyhow!(
                "{} {} was not updated despite passing validation",
                R::SPEC.entity,
                id
            )));
        }

        records::fetch_by_id::<R>(db, R::TABLE, id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!(
                    "{} {} missing after update",
                    R::SPEC.entity,
                    id
                ))
            })
    }

    #[instrument(skip(db))]
    pub async fn list<R: Record>(db: &PgPool, school_id: i64) -> Result<Vec<R>, AppError> {
        records::fetch_all::<R>(db, R::TABLE, school_id).await
    }

    /// Fetch through the dynamic table path. The table has already been
    /// parsed against the record allow-list; the match maps it onto the
    /// typed variant.
    #[instrument(skip(db))]
    pub async fn get_any(
        db: &PgPool,
        table: Table,
        id: i64,
        school_id: i64,
    ) -> Result<RecordPayload, AppError> {
        let payload = match table {
            Table::Grade => records::fetch_by_id::<Grade>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Grade),
            Table::Class => records::fetch_by_id::<Class>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Class),
            Table::Subject => records::fetch_by_id::<Subject>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Subject),
            Table::Lesson => records::fetch_by_id::<Lesson>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Lesson),
            Table::Exam => records::fetch_by_id::<Exam>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Exam),
            Table::Assignment => records::fetch_by_id::<Assignment>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Assignment),
            Table::Result => records::fetch_by_id::<AssessmentResult>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Result),
            Table::Attendance => records::fetch_by_id::<Attendance>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Attendance),
            Table::Event => records::fetch_by_id::<Event>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Event),
            Table::Announcement => records::fetch_by_id::<Announcement>(db, table, id, school_id)
                .await?
                .map(RecordPayload::Announcement),
            _ => None,
        };

        payload.ok_or_else(|| AppError::not_found("Record not found"))
    }

    #[instrument(skip(db))]
    pub async fn delete_any(
        db: &PgPool,
        table: Table,
        id: i64,
        school_id: i64,
    ) -> Result<&'static str, AppError> {
        let entity = Self::display_name(table);
        let deleted = records::delete_by_id(db, table, id, school_id).await?;
        if !deleted {
            return Err(AppError::not_found(format!("{} not found", entity)));
        }
        Ok(entity)
    }

    pub fn display_name(table: Table) -> &'static str {
        match table {
            Table::Grade => "Grade",
            Table::Class => "Class",
            Table::Subject => "Subject",
            Table::Lesson => "Lesson",
            Table::Exam => "Exam",
            Table::Assignment => "Assignment",
            Table::Result => "Result",
            Table::Attendance => "Attendance",
            Table::Event => "Event",
            Table::Announcement => "Announcement",
            Table::Admin => "Admin",
            Table::Teacher => "Teacher",
            Table::Parent => "Parent",
            Table::Student => "Student",
        }
    }
}
