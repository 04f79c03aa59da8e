//! Text-generation client and explanation prompts
//!
//! The LLM layer only explains engine output; nothing here feeds back into
//! the numbers.

pub mod client;
pub mod context;
pub mod explain;
pub mod prompts;

pub use client::{ApiFormat, LlmClient, TextGenerator};
pub use context::IndicatorContext;
pub use explain::ExplanationService;
