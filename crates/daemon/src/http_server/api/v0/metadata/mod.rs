use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod add;
pub mod allowed;
pub mod attach;
pub mod get;
pub mod remove;

pub use add::AddRequest;
pub use allowed::AllowedRequest;
pub use attach::AttachRequest;
pub use get::GetRequest;
pub use remove::RemoveRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/add", post(add::handler))
        .route("/attach", post(attach::handler))
        .route("/remove", post(remove::handler))
        .route("/get", post(get::handler))
        .route("/allowed", post(allowed::handler))
        .with_state(state)
}
