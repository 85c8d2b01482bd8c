use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_current_user, login, logout, signup};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/get-current-user", get(get_current_user))
}
