use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod pending;
pub mod request;
pub mod withdraw;

pub use pending::PendingRequest;
pub use request::FollowRequest;
pub use withdraw::WithdrawRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/request", post(request::handler))
        .route("/withdraw", post(withdraw::handler))
        .route("/pending", post(pending::handler))
        .with_state(state)
}
