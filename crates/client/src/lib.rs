pub mod backend;
pub mod client;
pub mod error;
pub mod filters;
pub mod request;
pub mod session;
#[cfg(test)]
mod testutils;

pub use backend::{Backend, HttpBackend};
pub use client::{PostgSailClient, USER_AGENT};
pub use error::ClientError;
pub use filters::{DateRange, ExportFormat, StatsKind, StayType, TimelapseFormat};
pub use request::{BackendRequest, BackendResponse, Method, PreparedRequest, RawResponse};
pub use session::Session;
