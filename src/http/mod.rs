//! HTTP API for the nutrition tracker.
//!
//! Thin axum layer over the operations in `tools`: handlers parse the
//! request, take the storage lock only for the data fetch, run the
//! computation and wrap the outcome in the `{success, data, error}`
//! envelope the mobile app expects.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
