//! wrapped-ingest: statement upload client, payload normalisation and aggregate rebuilding.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod payload;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, IngestClient};
pub use error::{GENERIC_FAILURE, IngestError};
pub use payload::{Payload, load_statement_file, rejection_from_body, statement_from_body};
