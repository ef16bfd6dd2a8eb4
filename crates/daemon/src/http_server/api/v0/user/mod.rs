use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod claim;
pub mod lookup;
pub mod remove;
pub mod whois;

pub use claim::ClaimRequest;
pub use lookup::LookupRequest;
pub use remove::RemoveRequest;
pub use whois::WhoisRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/claim", post(claim::handler))
        .route("/remove", post(remove::handler))
        .route("/lookup", post(lookup::handler))
        .route("/whois", post(whois::handler))
        .with_state(state)
}
