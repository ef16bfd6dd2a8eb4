use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod commit;
pub mod node;
pub mod quota;
pub mod register;

pub use commit::CommitRequest;
pub use node::NodeRequest;
pub use quota::QuotaRequest;
pub use register::RegisterRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/register", post(register::handler))
        .route("/commit", post(commit::handler))
        .route("/node", post(node::handler))
        .route("/quota", post(quota::handler))
        .with_state(state)
}
