//! Testing utilities and mock implementations.
//!
//! Mock implementations of the external-service traits, so the full
//! classification flow can be exercised without a running inference server.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskbrain_core::testing::{MockBackend, MockRetriever};
//!
//! let backend = MockBackend::new();
//! backend.push_completion("llama3.2:3b", r#"{"category": "BILLING", ...}"#);
//! backend.push_error("llama3.1:8b", InvocationError::EmptyOutput);
//!
//! // Wire into a TriageEngine via ModelInvoker...
//! ```

mod mock_backend;
mod mock_retriever;

pub use mock_backend::{MockBackend, RecordedCall};
pub use mock_retriever::MockRetriever;
