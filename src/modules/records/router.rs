use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::controller::{
    create_record, delete_record, get_record, list_records, update_record,
};
use super::model::{
    Announcement, AssessmentResult, Assignment, Attendance, Class, Event, Exam, Grade, Lesson,
    Subject,
};
use crate::state::AppState;

pub fn init_records_router() -> Router<AppState> {
    Router::new()
        .route("/create-grade", post(create_record::<Grade>))
        .route("/create-class", post(create_record::<Class>))
        .route("/create-subject", post(create_record::<Subject>))
        .route("/create-lesson", post(create_record::<Lesson>))
        .route("/create-exam", post(create_record::<Exam>))
        .route("/create-assignment", post(create_record::<Assignment>))
        .route("/create-result", post(create_record::<AssessmentResult>))
        .route("/create-attendance", post(create_record::<Attendance>))
        .route("/create-event", post(create_record::<Event>))
        .route("/create-announcement", post(create_record::<Announcement>))
        .route("/update-grade/{id}", put(update_record::<Grade>))
        .route("/update-class/{id}", put(update_record::<Class>))
        .route("/update-subject/{id}", put(update_record::<Subject>))
        .route("/update-lesson/{id}", put(update_record::<Lesson>))
        .route("/update-exam/{id}", put(update_record::<Exam>))
        .route("/update-assignment/{id}", put(update_record::<Assignment>))
        .route("/update-result/{id}", put(update_record::<AssessmentResult>))
        .route("/update-attendance/{id}", put(update_record::<Attendance>))
        .route("/update-event/{id}", put(update_record::<Event>))
        .route(
            "/update-announcement/{id}",
            put(update_record::<Announcement>),
        )
        .route("/get-grades", get(list_records::<Grade>))
        .route("/get-classes", get(list_records::<Class>))
        .route("/get-subjects", get(list_records::<Subject>))
        .route("/get-lessons", get(list_records::<Lesson>))
        .route("/get-exams", get(list_records::<Exam>))
        .route("/get-assignments", get(list_records::<Assignment>))
        .route("/get-results", get(list_records::<AssessmentResult>))
        .route("/get-attendances", get(list_records::<Attendance>))
        .route("/get-events", get(list_records::<Event>))
        .route("/get-announcements", get(list_records::<Announcement>))
        .route("/get-record/{table}/{id}", get(get_record))
        .route("/delete-record/{table}/{id}", delete(delete_record))
}
