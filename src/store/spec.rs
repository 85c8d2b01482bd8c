//! Declarative per-entity validation.
//!
//! Each academic entity describes its rules as data (required columns,
//! temporal formats, ordering pairs, exclusive pairs, foreign references and
//! the scoped uniqueness key) and one engine interprets them ahead of every
//! mutating store call. On create the engine runs over the full field set; on
//! update it runs over the merged (existing + supplied) set with the record's
//! own id excluded from the uniqueness scan. Nothing is partially applied:
//! the first violation aborts the mutation.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::store::records;
use crate::store::table::Table;
use crate::store::value::{Fields, SqlValue};
use crate::utils::errors::AppError;

pub struct Reference {
    pub field: &'static str,
    pub table: Table,
    pub entity: &'static str,
}

pub struct EntitySpec {
    pub entity: &'static str,
    pub table: Table,
    pub required: &'static [&'static str],
    pub date_fields: &'static [&'static str],
    pub time_fields: &'static [&'static str],
    /// Fields restricted to a closed set of values, e.g. the day of week.
    pub one_of: &'static [(&'static str, &'static [&'static str])],
    /// (start, end) pairs where start must be strictly earlier than end.
    pub ordered: &'static [(&'static str, &'static str)],
    /// Pairs where exactly one side must be present and non-null.
    pub exclusive: &'static [(&'static str, &'static str)],
    pub references: &'static [Reference],
    /// Column unique per school, checked with a scoped lookup.
    pub unique: Option<&'static str>,
}

pub async fn validate(
    db: &PgPool,
    spec: &EntitySpec,
    fields: &mut Fields,
    school_id: i64,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    check_required(spec, fields)?;
    coerce_formats(spec, fields)?;
    check_shape(spec, fields)?;
    check_integrity(db, spec, fields, school_id, exclude_id).await
}

pub fn check_required(spec: &EntitySpec, fields: &Fields) -> Result<(), AppError> {
    for &field in spec.required {
        let missing = match fields.get(field) {
            None | Some(SqlValue::Null) => true,
            Some(SqlValue::Text(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(AppError::bad_request(format!("{} is required", field)));
        }
    }
    Ok(())
}

/// Parses date (`YYYY-MM-DD`) and time (`HH:mm`) strings into their typed
/// values in place, and checks closed-set fields. Values arriving already
/// typed (from an existing row during a merge) pass through untouched.
pub fn coerce_formats(spec: &EntitySpec, fields: &mut Fields) -> Result<(), AppError> {
    for &field in spec.date_fields {
        let text = match fields.get(field) {
            Some(SqlValue::Text(s)) => Some(s.clone()),
            _ => None,
        };
        if let Some(text) = text {
            let parsed = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| {
                AppError::bad_request(format!(
                    "Invalid '{}' date format. Use YYYY-MM-DD",
                    field
                ))
            })?;
            fields.set(field, SqlValue::Date(parsed));
        }
    }

    for &field in spec.time_fields {
        let text = match fields.get(field) {
            Some(SqlValue::Text(s)) => Some(s.clone()),
            _ => None,
        };
        if let Some(text) = text {
            let parsed = NaiveTime::parse_from_str(&text, "%H:%M").map_err(|_| {
                AppError::bad_request(format!("Invalid '{}' time format. Use HH:mm", field))
            })?;
            fields.set(field, SqlValue::Time(parsed));
        }
    }

    for &(field, allowed) in spec.one_of {
        if let Some(SqlValue::Text(value)) = fields.get(field)
            && !allowed.contains(&value.as_str())
        {
            return Err(AppError::bad_request(format!(
                "Invalid {}. Allowed values: {}",
                field,
                allowed.join(", ")
            )));
        }
    }

    Ok(())
}

/// Ordering and exclusivity over the coerced field set.
///
/// The exclusive-pair check deliberately runs before any foreign reference is
/// resolved: a request naming both sides of the pair is malformed regardless
/// of whether those ids exist.
pub fn check_shape(spec: &EntitySpec, fields: &Fields) -> Result<(), AppError> {
    for &(start, end) in spec.ordered {
        if let (Some(a), Some(b)) = (fields.get(start), fields.get(end))
            && !strictly_before(a, b)
        {
            return Err(AppError::bad_request(format!(
                "'{}' must be earlier than '{}'",
                start, end
            )));
        }
    }

    for &(left, right) in spec.exclusive {
        let has_left = fields.get(left).is_some_and(|v| !v.is_null());
        let has_right = fields.get(right).is_some_and(|v| !v.is_null());
        if has_left == has_right {
            return Err(AppError::bad_request(format!(
                "Exactly one of '{}' or '{}' is required",
                left, right
            )));
        }
    }

    Ok(())
}

/// Referential and uniqueness checks against the tenant record store. A
/// foreign id that is absent or belongs to another school fails as not-found
/// naming the referenced entity.
pub async fn check_integrity(
    db: &PgPool,
    spec: &EntitySpec,
    fields: &Fields,
    school_id: i64,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    for reference in spec.references {
        if let Some(value) = fields.get(reference.field)
            && let Some(id) = value.as_int()
            && !records::exists(db, reference.table, id, school_id).await?
        {
            return Err(AppError::not_found(format!(
                "{} {} not found",
                reference.entity, id
            )));
        }
    }

    if let Some(column) = spec.unique
        && let Some(value) = fields.get(column)
        && records::unique_conflict(db, spec.table, column, value, school_id, exclude_id).await?
    {
        return Err(AppError::conflict(format!(
            "A {} with this {} already exists in this school",
            spec.entity.to_lowercase(),
            column
        )));
    }

    Ok(())
}

fn strictly_before(a: &SqlValue, b: &SqlValue) -> bool {
    match (a, b) {
        (SqlValue::Date(a), SqlValue::Date(b)) => a < b,
        (SqlValue::Time(a), SqlValue::Time(b)) => a < b,
        (SqlValue::Int(a), SqlValue::Int(b)) => a < b,
        (SqlValue::Text(a), SqlValue::Text(b)) => a < b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAYS: &[&str] = &[
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];

    const LESSON_LIKE: EntitySpec = EntitySpec {
        entity: "Lesson",
        table: Table::Lesson,
        required: &["name", "day", "start_time", "end_time"],
        date_fields: &[],
        time_fields: &["start_time", "end_time"],
        one_of: &[("day", DAYS)],
        ordered: &[("start_time", "end_time")],
        exclusive: &[],
        references: &[],
        unique: None,
    };

    const RESULT_LIKE: EntitySpec = EntitySpec {
        entity: "Result",
        table: Table::Result,
        required: &["score"],
        date_fields: &[],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[("exam_id", "assignment_id")],
        references: &[],
        unique: None,
    };

    fn lesson_fields(day: &str, start: &str, end: &str) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("name", "Algebra");
        fields.push_text("day", day);
        fields.push_text("start_time", start);
        fields.push_text("end_time", end);
        fields
    }

    #[test]
    fn test_required_rejects_blank_text() {
        let mut fields = lesson_fields("Monday", "09:00", "10:00");
        fields.set("name", SqlValue::Text("   ".to_string()));
        let err = check_required(&LESSON_LIKE, &fields).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_coerce_parses_valid_times() {
        let mut fields = lesson_fields("Monday", "09:00", "10:30");
        coerce_formats(&LESSON_LIKE, &mut fields).unwrap();
        assert!(matches!(
            fields.get("start_time"),
            Some(SqlValue::Time(_))
        ));
        assert!(matches!(fields.get("end_time"), Some(SqlValue::Time(_))));
    }

    #[test]
    fn test_coerce_rejects_bad_time_format() {
        let mut fields = lesson_fields("Monday", "9 o'clock", "10:00");
        let err = coerce_formats(&LESSON_LIKE, &mut fields).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_coerce_rejects_out_of_range_time() {
        let mut fields = lesson_fields("Monday", "24:30", "25:00");
        assert!(coerce_formats(&LESSON_LIKE, &mut fields).is_err());
    }

    #[test]
    fn test_coerce_rejects_unknown_day() {
        let mut fields = lesson_fields("Sunday", "09:00", "10:00");
        let err = coerce_formats(&LESSON_LIKE, &mut fields).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_ordering_requires_start_before_end() {
        let mut fields = lesson_fields("Friday", "10:00", "09:00");
        coerce_formats(&LESSON_LIKE, &mut fields).unwrap();
        let err = check_shape(&LESSON_LIKE, &fields).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_ordering_rejects_equal_endpoints() {
        let mut fields = lesson_fields("Friday", "09:00", "09:00");
        coerce_formats(&LESSON_LIKE, &mut fields).unwrap();
        assert!(check_shape(&LESSON_LIKE, &fields).is_err());
    }

    #[test]
    fn test_exclusive_rejects_both_present() {
        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(90));
        fields.push("exam_id", SqlValue::Int(1));
        fields.push("assignment_id", SqlValue::Int(2));
        assert!(check_shape(&RESULT_LIKE, &fields).is_err());
    }

    #[test]
    fn test_exclusive_rejects_both_absent() {
        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(90));
        assert!(check_shape(&RESULT_LIKE, &fields).is_err());
    }

    #[test]
    fn test_exclusive_accepts_exactly_one() {
        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(90));
        fields.push("exam_id", SqlValue::Int(1));
        assert!(check_shape(&RESULT_LIKE, &fields).is_ok());

        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(90));
        fields.push("exam_id", SqlValue::Null);
        fields.push("assignment_id", SqlValue::Int(2));
        assert!(check_shape(&RESULT_LIKE, &fields).is_ok());
    }

    #[test]
    fn test_valid_lesson_shape_passes() {
        let mut fields = lesson_fields("Wednesday", "08:15", "09:45");
        check_required(&LESSON_LIKE, &fields).unwrap();
        coerce_formats(&LESSON_LIKE, &mut fields).unwrap();
        check_shape(&LESSON_LIKE, &fields).unwrap();
    }
}
