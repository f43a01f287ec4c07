//! Structured-inference adapters.

mod openai;

pub use openai::OpenAi;
