//! markwise-providers — assessor backends.
//!
//! Implements the `Assessor` trait for OpenAI and Anthropic, plus a
//! scripted mock for tests and offline runs.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod mock;
pub mod openai;

pub use config::{
    assessor_from_config, create_assessor, load_config, load_config_from, AssessorSettings,
    MarkwiseConfig, ProviderConfig,
};
pub use error::ProviderError;
pub use mock::MockAssessor;
