//! Model invocation: the swappable completion backend seam and the
//! timeout-bounded single-shot invoker.

mod backend;
mod invoker;
mod ollama;

pub use backend::{CompletionBackend, CompletionRequest, InvocationError};
pub use invoker::{ModelInvoker, ModelSpec};
pub use ollama::OllamaBackend;
