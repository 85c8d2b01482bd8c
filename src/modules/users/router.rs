use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::controller::{
    create_parent, create_student, create_teacher, delete_user, get_admins, get_parents,
    get_students, get_teachers, get_user, update_admin, update_parent, update_student,
    update_teacher,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/create-teacher", post(create_teacher))
        .route("/create-parent", post(create_parent))
        .route("/create-student", post(create_student))
        .route("/update-admin/{id}", put(update_admin))
        .route("/update-teacher/{id}", put(update_teacher))
        .route("/update-parent/{id}", put(update_parent))
        .route("/update-student/{id}", put(update_student))
        .route("/get-admins", get(get_admins))
        .route("/get-teachers", get(get_teachers))
        .route("/get-parents", get(get_parents))
        .route("/get-students", get(get_students))
        .route("/get-user/{id}", get(get_user))
        .route("/delete-user/{id}", delete(delete_user))
}
