mod common;

use sqlx::PgPool;

use common::{create_school, create_student_row, create_teacher_row};
use slateboard::modules::records::model::{
    AssessmentResult, Class, CreateClassDto, CreateGradeDto, CreateLessonDto, CreateResultDto,
    CreateSubjectDto, Grade, Lesson, Subject, UpdateGradeDto, UpdateLessonDto,
};
use slateboard::modules::records::service::RecordService;
use slateboard::store::{Table, records};
use slateboard::utils::errors::AppError;

fn grade_dto(level: &str) -> CreateGradeDto {
    CreateGradeDto {
        level: level.to_string(),
    }
}

async fn create_grade(pool: &PgPool, school_id: i64, level: &str) -> Grade {
    RecordService::create::<Grade>(pool, school_id, grade_dto(level))
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_round_trip(pool: PgPool) {
    let school_id = create_school(&pool, "rt-admin").await;

    let grade = create_grade(&pool, school_id, "10").await;
    assert_eq!(grade.level, "10");
    assert_eq!(grade.school_id, school_id);
    assert!(grade.id > 0);

    let fetched = records::fetch_by_id::<Grade>(&pool, Table::Grade, grade.id, school_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.level, grade.level);
    assert_eq!(fetched.id, grade.id);
    assert_eq!(fetched.created_at, grade.created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_uniqueness_is_scoped_per_school(pool: PgPool) {
    let school_a = create_school(&pool, "unique-a").await;
    let school_b = create_school(&pool, "unique-b").await;

    let grade_a = create_grade(&pool, school_a, "10").await;
    let grade_b = create_grade(&pool, school_b, "10").await;
    assert_ne!(grade_a.id, grade_b.id);

    let err = RecordService::create::<Grade>(&pool, school_a, grade_dto("10"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tenant_isolation_on_reads(pool: PgPool) {
    let school_a = create_school(&pool, "iso-a").await;
    let school_b = create_school(&pool, "iso-b").await;

    let grade = create_grade(&pool, school_a, "10").await;

    let cross_tenant = records::fetch_by_id::<Grade>(&pool, Table::Grade, grade.id, school_b)
        .await
        .unwrap();
    assert!(cross_tenant.is_none());

    let listed_a = RecordService::list::<Grade>(&pool, school_a).await.unwrap();
    let listed_b = RecordService::list::<Grade>(&pool, school_b).await.unwrap();
    assert_eq!(listed_a.len(), 1);
    assert!(listed_b.is_empty());

    let err = RecordService::get_any(&pool, Table::Grade, grade.id, school_b)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tenant_isolation_on_writes(pool: PgPool) {
    let school_a = create_school(&pool, "isow-a").await;
    let school_b = create_school(&pool, "isow-b").await;

    let grade = create_grade(&pool, school_a, "10").await;

    let update = UpdateGradeDto {
        level: Some("11".to_string()),
    };
    let err = RecordService::update::<Grade>(&pool, school_b, grade.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = RecordService::delete_any(&pool, Table::Grade, grade.id, school_b)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The row is untouched under its own school.
    let fetched = records::fetch_by_id::<Grade>(&pool, Table::Grade, grade.id, school_a)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.level, "10");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_update_is_rejected_without_a_write(pool: PgPool) {
    let school_id = create_school(&pool, "noop-admin").await;
    let grade = create_grade(&pool, school_id, "10").await;

    let err = RecordService::update::<Grade>(&pool, school_id, grade.id, UpdateGradeDto { level: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let blank = UpdateGradeDto {
        level: Some("   ".to_string()),
    };
    let err = RecordService::update::<Grade>(&pool, school_id, grade.id, blank)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let fetched = records::fetch_by_id::<Grade>(&pool, Table::Grade, grade.id, school_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.level, "10");
    assert_eq!(fetched.updated_at, grade.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_excludes_own_id_from_uniqueness(pool: PgPool) {
    let school_id = create_school(&pool, "self-admin").await;
    let grade = create_grade(&pool, school_id, "10").await;

    // Re-submitting the same level must not collide with itself.
    let update = UpdateGradeDto {
        level: Some("10".to_string()),
    };
    let updated = RecordService::update::<Grade>(&pool, school_id, grade.id, update)
        .await
        .unwrap();
    assert_eq!(updated.level, "10");

    let other = create_grade(&pool, school_id, "11").await;
    let update = UpdateGradeDto {
        level: Some("10".to_string()),
    };
    let err = RecordService::update::<Grade>(&pool, school_id, other.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

async fn lesson_fixture(pool: &PgPool, school_id: i64, tag: &str) -> (Subject, Class, i64) {
    let subject = RecordService::create::<Subject>(
        pool,
        school_id,
        CreateSubjectDto {
            name: format!("Math {}", tag),
        },
    )
    .await
    .unwrap();

    let grade = create_grade(pool, school_id, &format!("g-{}", tag)).await;

    let teacher_id = create_teacher_row(pool, school_id, &format!("teach-{}", tag)).await;

    let class = RecordService::create::<Class>(
        pool,
        school_id,
        CreateClassDto {
            name: format!("Class {}", tag),
            capacity: 30,
            supervisor_id: Some(teacher_id),
            grade_id: grade.id,
        },
    )
    .await
    .unwrap();

    (subject, class, teacher_id)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lesson_referential_checks_are_tenant_scoped(pool: PgPool) {
    let school_a = create_school(&pool, "ref-a").await;
    let school_b = create_school(&pool, "ref-b").await;

    let (subject_a, _, _) = lesson_fixture(&pool, school_a, "a").await;
    let (_, class_b, teacher_b) = lesson_fixture(&pool, school_b, "b").await;

    // Subject belongs to school A; creating under school B must not see it.
    let dto = CreateLessonDto {
        name: "Algebra".to_string(),
        day: "Monday".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:00".to_string(),
        subject_id: subject_a.id,
        class_id: class_b.id,
        teacher_id: teacher_b,
    };

    let err = RecordService::create::<Lesson>(&pool, school_b, dto)
        .await
        .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("Subject")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lesson_create_update_cycle(pool: PgPool) {
    let school_id = create_school(&pool, "lesson-admin").await;
    let (subject, class, teacher_id) = lesson_fixture(&pool, school_id, "x").await;

    let dto = CreateLessonDto {
        name: "Algebra".to_string(),
        day: "Monday".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:00".to_string(),
        subject_id: subject.id,
        class_id: class.id,
        teacher_id,
    };

    let lesson = RecordService::create::<Lesson>(&pool, school_id, dto)
        .await
        .unwrap();
    assert_eq!(lesson.day, "Monday");

    // Partial update touching only the day: merged validation still sees the
    // stored times.
    let update = UpdateLessonDto {
        name: None,
        day: Some("Friday".to_string()),
        start_time: None,
        end_time: None,
        subject_id: None,
        class_id: None,
        teacher_id: None,
    };
    let updated = RecordService::update::<Lesson>(&pool, school_id, lesson.id, update)
        .await
        .unwrap();
    assert_eq!(updated.day, "Friday");
    assert_eq!(updated.start_time, lesson.start_time);

    // An end time earlier than the stored start time fails on the merged set.
    let update = UpdateLessonDto {
        name: None,
        day: None,
        start_time: None,
        end_time: Some("08:00".to_string()),
        subject_id: None,
        class_id: None,
        teacher_id: None,
    };
    let err = RecordService::update::<Lesson>(&pool, school_id, lesson.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_result_exclusivity(pool: PgPool) {
    let school_id = create_school(&pool, "result-admin").await;
    let student_id = create_student_row(&pool, school_id, "result-student").await;

    let both = CreateResultDto {
        score: 90,
        exam_id: Some(1),
        assignment_id: Some(1),
        student_id,
    };
    let err = RecordService::create::<AssessmentResult>(&pool, school_id, both)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let neither = CreateResultDto {
        score: 90,
        exam_id: None,
        assignment_id: None,
        student_id,
    };
    let err = RecordService::create::<AssessmentResult>(&pool, school_id, neither)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let dangling = CreateResultDto {
        score: 90,
        exam_id: Some(999_999),
        assignment_id: None,
        student_id,
    };
    let err = RecordService::create::<AssessmentResult>(&pool, school_id, dangling)
        .await
        .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("Exam")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dynamic_table_allow_list(pool: PgPool) {
    let school_id = create_school(&pool, "dyn-admin").await;

    // Role tables are not reachable through the dynamic record path.
    assert!(Table::from_record_name("admin").is_none());
    assert!(Table::from_record_name("teacher").is_none());

    let grade = create_grade(&pool, school_id, "10").await;
    let payload = RecordService::get_any(&pool, Table::Grade, grade.id, school_id)
        .await
        .unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["level"], "10");

    RecordService::delete_any(&pool, Table::Grade, grade.id, school_id)
        .await
        .unwrap();
    let gone = records::fetch_by_id::<Grade>(&pool, Table::Grade, grade.id, school_id)
        .await
        .unwrap();
    assert!(gone.is_none());
}
