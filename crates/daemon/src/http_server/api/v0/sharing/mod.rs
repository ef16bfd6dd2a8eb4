use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod ban;
pub mod grant;
pub mod list;

pub use ban::BanRequest;
pub use grant::GrantRequest;
pub use list::ListRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/grant", post(grant::handler))
        .route("/ban", post(ban::handler))
        .route("/list", post(list::handler))
        .with_state(state)
}
