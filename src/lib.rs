//! polyrun - multi-language snippet execution engine
//!
//! Accepts a source snippet tagged with a language identifier plus a list
//! of pre-supplied interactive-input values, executes it under bounded
//! wall-clock ceilings, and returns one normalized result. Strategies
//! cover in-process embedded evaluation, compile-then-run toolchains,
//! run-only interpreters, and an embedded tabular-query store.

pub mod engine;
pub mod error;
pub mod input;
pub mod languages;
pub mod normalize;
pub mod prepare;
pub mod runner;
pub mod strategies;
pub mod toolchain;
pub mod types;

pub use engine::Engine;
pub use languages::Language;
pub use types::{ExecutionRequest, ExecutionResult, ExecutionStatus};
