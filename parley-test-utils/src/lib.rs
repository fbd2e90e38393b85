//! Shared helpers for testing parley against a mocked `OpenAI` api.
#[cfg(feature = "test-utils")]
mod test_utils;

#[cfg(feature = "test-utils")]
pub use test_utils::*;
