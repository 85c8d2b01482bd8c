//! Academic record entities.
//!
//! Each entity implements [`Record`]: its table identifier, its declarative
//! validation spec, its create/update DTOs and the conversion of an existing
//! row back into a field set for merged-update validation. The handlers and
//! the service are generic over this trait, so every entity-specific rule in
//! this module is data, not code.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::postgres::PgRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::store::spec::{EntitySpec, Reference};
use crate::store::{Fields, SqlValue, Table};

/// Days a lesson can be scheduled on. Sunday is deliberately absent.
pub const LESSON_DAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Converts a request DTO into the ordered field set handed to the
/// validation engine and the store. Optional fields that are absent (or
/// blank after trimming, for text) are left out entirely.
pub trait IntoFields {
    fn into_fields(self) -> Fields;
}

/// An academic record entity.
pub trait Record:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const TABLE: Table;
    const SPEC: EntitySpec;

    type Create: DeserializeOwned + Validate + IntoFields + Send + Debug + 'static;
    type Update: DeserializeOwned + Validate + IntoFields + Send + Debug + 'static;

    /// The row's mutable columns as a field set, used as the base a partial
    /// update is merged onto before validation.
    fn to_fields(&self) -> Fields;
}

fn opt_int(value: Option<i64>) -> SqlValue {
    match value {
        Some(v) => SqlValue::Int(v),
        None => SqlValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    pub level: String,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeDto {
    #[validate(length(min = 1))]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeDto {
    pub level: Option<String>,
}

impl IntoFields for CreateGradeDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("level", self.level);
        fields
    }
}

impl IntoFields for UpdateGradeDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("level", self.level);
        fields
    }
}

impl Record for Grade {
    const TABLE: Table = Table::Grade;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Grade",
        table: Table::Grade,
        required: &["level"],
        date_fields: &[],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[],
        references: &[],
        unique: Some("level"),
    };

    type Create = CreateGradeDto;
    type Update = UpdateGradeDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("level", SqlValue::Text(self.level.clone()));
        fields
    }
}

// ---------------------------------------------------------------------------
// Class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub supervisor_id: Option<i64>,
    pub grade_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub capacity: i64,
    pub supervisor_id: Option<i64>,
    pub grade_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassDto {
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i64>,
    pub supervisor_id: Option<i64>,
    pub grade_id: Option<i64>,
}

impl IntoFields for CreateClassDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("name", self.name);
        fields.push("capacity", SqlValue::Int(self.capacity));
        fields.push_opt_int("supervisor_id", self.supervisor_id);
        fields.push("grade_id", SqlValue::Int(self.grade_id));
        fields
    }
}

impl IntoFields for UpdateClassDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("name", self.name);
        fields.push_opt_int("capacity", self.capacity);
        fields.push_opt_int("supervisor_id", self.supervisor_id);
        fields.push_opt_int("grade_id", self.grade_id);
        fields
    }
}

impl Record for Class {
    const TABLE: Table = Table::Class;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Class",
        table: Table::Class,
        required: &["name", "capacity", "grade_id"],
        date_fields: &[],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[],
        references: &[
            Reference {
                field: "supervisor_id",
                table: Table::Teacher,
                entity: "Teacher",
            },
            Reference {
                field: "grade_id",
                table: Table::Grade,
                entity: "Grade",
            },
        ],
        unique: Some("name"),
    };

    type Create = CreateClassDto;
    type Update = UpdateClassDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("name", SqlValue::Text(self.name.clone()));
        fields.push("capacity", SqlValue::Int(self.capacity));
        fields.push("supervisor_id", opt_int(self.supervisor_id));
        fields.push("grade_id", SqlValue::Int(self.grade_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectDto {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectDto {
    pub name: Option<String>,
}

impl IntoFields for CreateSubjectDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("name", self.name);
        fields
    }
}

impl IntoFields for UpdateSubjectDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("name", self.name);
        fields
    }
}

impl Record for Subject {
    const TABLE: Table = Table::Subject;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Subject",
        table: Table::Subject,
        required: &["name"],
        date_fields: &[],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[],
        references: &[],
        unique: Some("name"),
    };

    type Create = CreateSubjectDto;
    type Update = UpdateSubjectDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("name", SqlValue::Text(self.name.clone()));
        fields
    }
}

// ---------------------------------------------------------------------------
// Lesson
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub name: String,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject_id: i64,
    pub class_id: i64,
    pub teacher_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub day: String,
    /// `HH:mm`
    pub start_time: String,
    /// `HH:mm`
    pub end_time: String,
    pub subject_id: i64,
    pub class_id: i64,
    pub teacher_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonDto {
    pub name: Option<String>,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub subject_id: Option<i64>,
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl IntoFields for CreateLessonDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("name", self.name);
        fields.push_text("day", self.day);
        fields.push_text("start_time", self.start_time);
        fields.push_text("end_time", self.end_time);
        fields.push("subject_id", SqlValue::Int(self.subject_id));
        fields.push("class_id", SqlValue::Int(self.class_id));
        fields.push("teacher_id", SqlValue::Int(self.teacher_id));
        fields
    }
}

impl IntoFields for UpdateLessonDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("name", self.name);
        fields.push_opt_text("day", self.day);
        fields.push_opt_text("start_time", self.start_time);
        fields.push_opt_text("end_time", self.end_time);
        fields.push_opt_int("subject_id", self.subject_id);
        fields.push_opt_int("class_id", self.class_id);
        fields.push_opt_int("teacher_id", self.teacher_id);
        fields
    }
}

impl Record for Lesson {
    const TABLE: Table = Table::Lesson;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Lesson",
        table: Table::Lesson,
        required: &[
            "name",
            "day",
            "start_time",
            "end_time",
            "subject_id",
            "class_id",
            "teacher_id",
        ],
        date_fields: &[],
        time_fields: &["start_time", "end_time"],
        one_of: &[("day", LESSON_DAYS)],
        ordered: &[("start_time", "end_time")],
        exclusive: &[],
        references: &[
            Reference {
                field: "subject_id",
                table: Table::Subject,
                entity: "Subject",
            },
            Reference {
                field: "class_id",
                table: Table::Class,
                entity: "Class",
            },
            Reference {
                field: "teacher_id",
                table: Table::Teacher,
                entity: "Teacher",
            },
        ],
        unique: None,
    };

    type Create = CreateLessonDto;
    type Update = UpdateLessonDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("name", SqlValue::Text(self.name.clone()));
        fields.push("day", SqlValue::Text(self.day.clone()));
        fields.push("start_time", SqlValue::Time(self.start_time));
        fields.push("end_time", SqlValue::Time(self.end_time));
        fields.push("subject_id", SqlValue::Int(self.subject_id));
        fields.push("class_id", SqlValue::Int(self.class_id));
        fields.push("teacher_id", SqlValue::Int(self.teacher_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Exam
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub lesson_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamDto {
    #[validate(length(min = 1))]
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub start_time: String,
    /// `HH:mm`
    pub end_time: String,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExamDto {
    pub title: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub lesson_id: Option<i64>,
}

impl IntoFields for CreateExamDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("title", self.title);
        fields.push_text("date", self.date);
        fields.push_text("start_time", self.start_time);
        fields.push_text("end_time", self.end_time);
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

impl IntoFields for UpdateExamDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("title", self.title);
        fields.push_opt_text("date", self.date);
        fields.push_opt_text("start_time", self.start_time);
        fields.push_opt_text("end_time", self.end_time);
        fields.push_opt_int("lesson_id", self.lesson_id);
        fields
    }
}

impl Record for Exam {
    const TABLE: Table = Table::Exam;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Exam",
        table: Table::Exam,
        required: &["title", "date", "start_time", "end_time", "lesson_id"],
        date_fields: &["date"],
        time_fields: &["start_time", "end_time"],
        one_of: &[],
        ordered: &[("start_time", "end_time")],
        exclusive: &[],
        references: &[Reference {
            field: "lesson_id",
            table: Table::Lesson,
            entity: "Lesson",
        }],
        unique: None,
    };

    type Create = CreateExamDto;
    type Update = UpdateExamDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("title", SqlValue::Text(self.title.clone()));
        fields.push("date", SqlValue::Date(self.date));
        fields.push("start_time", SqlValue::Time(self.start_time));
        fields.push("end_time", SqlValue::Time(self.end_time));
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub lesson_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1))]
    pub title: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentDto {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub lesson_id: Option<i64>,
}

impl IntoFields for CreateAssignmentDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("title", self.title);
        fields.push_text("start_date", self.start_date);
        fields.push_text("due_date", self.due_date);
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

impl IntoFields for UpdateAssignmentDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("title", self.title);
        fields.push_opt_text("start_date", self.start_date);
        fields.push_opt_text("due_date", self.due_date);
        fields.push_opt_int("lesson_id", self.lesson_id);
        fields
    }
}

impl Record for Assignment {
    const TABLE: Table = Table::Assignment;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Assignment",
        table: Table::Assignment,
        required: &["title", "start_date", "due_date", "lesson_id"],
        date_fields: &["start_date", "due_date"],
        time_fields: &[],
        one_of: &[],
        ordered: &[("start_date", "due_date")],
        exclusive: &[],
        references: &[Reference {
            field: "lesson_id",
            table: Table::Lesson,
            entity: "Lesson",
        }],
        unique: None,
    };

    type Create = CreateAssignmentDto;
    type Update = UpdateAssignmentDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("title", SqlValue::Text(self.title.clone()));
        fields.push("start_date", SqlValue::Date(self.start_date));
        fields.push("due_date", SqlValue::Date(self.due_date));
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A score against exactly one of an exam or an assignment.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub id: i64,
    pub score: i64,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResultDto {
    #[validate(range(min = 0))]
    pub score: i64,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultDto {
    #[validate(range(min = 0))]
    pub score: Option<i64>,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}

impl IntoFields for CreateResultDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(self.score));
        fields.push_opt_int("exam_id", self.exam_id);
        fields.push_opt_int("assignment_id", self.assignment_id);
        fields.push("student_id", SqlValue::Int(self.student_id));
        fields
    }
}

impl IntoFields for UpdateResultDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_int("score", self.score);
        fields.push_opt_int("exam_id", self.exam_id);
        fields.push_opt_int("assignment_id", self.assignment_id);
        fields.push_opt_int("student_id", self.student_id);
        fields
    }
}

impl Record for AssessmentResult {
    const TABLE: Table = Table::Result;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Result",
        table: Table::Result,
        required: &["score", "student_id"],
        date_fields: &[],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[("exam_id", "assignment_id")],
        references: &[
            Reference {
                field: "exam_id",
                table: Table::Exam,
                entity: "Exam",
            },
            Reference {
                field: "assignment_id",
                table: Table::Assignment,
                entity: "Assignment",
            },
            Reference {
                field: "student_id",
                table: Table::Student,
                entity: "Student",
            },
        ],
        unique: None,
    };

    type Create = CreateResultDto;
    type Update = UpdateResultDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("score", SqlValue::Int(self.score));
        fields.push("exam_id", opt_int(self.exam_id));
        fields.push("assignment_id", opt_int(self.assignment_id));
        fields.push("student_id", SqlValue::Int(self.student_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub date: NaiveDate,
    pub present: bool,
    pub student_id: i64,
    pub lesson_id: i64,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceDto {
    /// `YYYY-MM-DD`
    pub date: String,
    pub present: bool,
    pub student_id: i64,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceDto {
    pub date: Option<String>,
    pub present: Option<bool>,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
}

impl IntoFields for CreateAttendanceDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("date", self.date);
        fields.push("present", SqlValue::Bool(self.present));
        fields.push("student_id", SqlValue::Int(self.student_id));
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

impl IntoFields for UpdateAttendanceDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("date", self.date);
        fields.push_opt_bool("present", self.present);
        fields.push_opt_int("student_id", self.student_id);
        fields.push_opt_int("lesson_id", self.lesson_id);
        fields
    }
}

impl Record for Attendance {
    const TABLE: Table = Table::Attendance;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Attendance",
        table: Table::Attendance,
        required: &["date", "present", "student_id", "lesson_id"],
        date_fields: &["date"],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[],
        references: &[
            Reference {
                field: "student_id",
                table: Table::Student,
                entity: "Student",
            },
            Reference {
                field: "lesson_id",
                table: Table::Lesson,
                entity: "Lesson",
            },
        ],
        unique: None,
    };

    type Create = CreateAttendanceDto;
    type Update = UpdateAttendanceDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("date", SqlValue::Date(self.date));
        fields.push("present", SqlValue::Bool(self.present));
        fields.push("student_id", SqlValue::Int(self.student_id));
        fields.push("lesson_id", SqlValue::Int(self.lesson_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub class_id: Option<i64>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub class_id: Option<i64>,
}

impl IntoFields for CreateEventDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("title", self.title);
        fields.push_text("description", self.description);
        fields.push_text("start_date", self.start_date);
        fields.push_text("end_date", self.end_date);
        fields.push_opt_int("class_id", self.class_id);
        fields
    }
}

impl IntoFields for UpdateEventDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("title", self.title);
        fields.push_opt_text("description", self.description);
        fields.push_opt_text("start_date", self.start_date);
        fields.push_opt_text("end_date", self.end_date);
        fields.push_opt_int("class_id", self.class_id);
        fields
    }
}

impl Record for Event {
    const TABLE: Table = Table::Event;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Event",
        table: Table::Event,
        required: &["title", "description", "start_date", "end_date"],
        date_fields: &["start_date", "end_date"],
        time_fields: &[],
        one_of: &[],
        ordered: &[("start_date", "end_date")],
        exclusive: &[],
        references: &[Reference {
            field: "class_id",
            table: Table::Class,
            entity: "Class",
        }],
        unique: None,
    };

    type Create = CreateEventDto;
    type Update = UpdateEventDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("title", SqlValue::Text(self.title.clone()));
        fields.push("description", SqlValue::Text(self.description.clone()));
        fields.push("start_date", SqlValue::Date(self.start_date));
        fields.push("end_date", SqlValue::Date(self.end_date));
        fields.push("class_id", opt_int(self.class_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Announcement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub class_id: Option<i64>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementDto {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub class_id: Option<i64>,
}

impl IntoFields for CreateAnnouncementDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_text("title", self.title);
        fields.push_text("description", self.description);
        fields.push_text("date", self.date);
        fields.push_opt_int("class_id", self.class_id);
        fields
    }
}

impl IntoFields for UpdateAnnouncementDto {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.push_opt_text("title", self.title);
        fields.push_opt_text("description", self.description);
        fields.push_opt_text("date", self.date);
        fields.push_opt_int("class_id", self.class_id);
        fields
    }
}

impl Record for Announcement {
    const TABLE: Table = Table::Announcement;
    const SPEC: EntitySpec = EntitySpec {
        entity: "Announcement",
        table: Table::Announcement,
        required: &["title", "description", "date"],
        date_fields: &["date"],
        time_fields: &[],
        one_of: &[],
        ordered: &[],
        exclusive: &[],
        references: &[Reference {
            field: "class_id",
            table: Table::Class,
            entity: "Class",
        }],
        unique: None,
    };

    type Create = CreateAnnouncementDto;
    type Update = UpdateAnnouncementDto;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.push("title", SqlValue::Text(self.title.clone()));
        fields.push("description", SqlValue::Text(self.description.clone()));
        fields.push("date", SqlValue::Date(self.date));
        fields.push("class_id", opt_int(self.class_id));
        fields
    }
}

// ---------------------------------------------------------------------------
// Dynamic payload
// ---------------------------------------------------------------------------

/// Payload for the dynamic `/get-record/{table}/{id}` path: the table
/// identifier picks the variant, each variant serializes as its entity.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RecordPayload {
    Grade(Grade),
    Class(Class),
    Subject(Subject),
    Lesson(Lesson),
    Exam(Exam),
    Assignment(Assignment),
    Result(AssessmentResult),
    Attendance(Attendance),
    Event(Event),
    Announcement(Announcement),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_skips_absent_fields() {
        let dto = UpdateLessonDto {
            name: Some("Geometry".to_string()),
            day: None,
            start_time: None,
            end_time: None,
            subject_id: None,
            class_id: Some(4),
            teacher_id: None,
        };

        let fields = dto.into_fields();
        assert_eq!(fields.columns(), vec!["name", "class_id"]);
    }

    #[test]
    fn test_create_dto_orders_columns_stably() {
        let dto = CreateGradeDto {
            level: " 10 ".to_string(),
        };
        let fields = dto.into_fields();
        assert_eq!(fields.columns(), vec!["level"]);
        assert_eq!(fields.get("level").unwrap().as_text(), Some("10"));
    }

    #[test]
    fn test_result_to_fields_keeps_null_side_of_pair() {
        let result = AssessmentResult {
            id: 1,
            score: 88,
            exam_id: Some(5),
            assignment_id: None,
            student_id: 9,
            school_id: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let fields = result.to_fields();
        assert_eq!(fields.get("exam_id"), Some(&SqlValue::Int(5)));
        assert_eq!(fields.get("assignment_id"), Some(&SqlValue::Null));
    }

    #[test]
    fn test_entity_serializes_camel_case() {
        let grade = Grade {
            id: 1,
            level: "10".to_string(),
            school_id: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&grade).unwrap();
        assert!(json.contains("\"schoolId\":3"));
        assert!(json.contains("\"createdAt\""));
    }
}
