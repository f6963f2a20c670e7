//! HTTP API layer

pub mod health;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use router::create_router_with_state;
pub use state::AppState;
