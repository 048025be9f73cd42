//! Model integration: client transport, prompt construction, and the
//! per-action model-call entry points.

pub mod client;
pub mod prompts;
pub mod service;

pub use client::LlmClient;
