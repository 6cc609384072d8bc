// storefront/src/flow/mod.rs

//! A small async stage runner.
//!
//! A `Flow<T, Err, P>` is an ordered list of named stages. Each stage carries the
//! phase tag `P` it belongs to and up to three handler lists (`before`, `on`,
//! `after`) that operate on a shared `FlowContext<T>`. Stages can be optional
//! or skipped by a condition, and any handler can halt the flow early.

pub mod context;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod stage;

pub use context::FlowContext;
pub use control::{FlowControl, FlowOutcome};
pub use definition::{Flow, Handler};
pub use stage::{SkipCondition, StageDef, StagePhase};
