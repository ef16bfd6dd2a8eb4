use axum::Router;

pub mod follow;
pub mod metadata;
pub mod sharing;
pub mod storage;
pub mod user;
pub mod wire;

pub use wire::{RequestError, VerdictResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/user", user::router(state.clone()))
        .nest("/follow", follow::router(state.clone()))
        .nest("/sharing", sharing::router(state.clone()))
        .nest("/metadata", metadata::router(state.clone()))
        .nest("/storage", storage::router(state.clone()))
        .with_state(state)
}
