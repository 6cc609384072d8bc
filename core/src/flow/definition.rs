// storefront/src/flow/definition.rs

//! The `Flow<T, Err, P>` struct and its construction.

use super::{FlowContext, FlowControl, StageDef, StagePhase};
use crate::error::FlowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A stage handler: an async function over the shared context.
///
/// Handlers must drop any lock guard taken from the `FlowContext` before their
/// first `.await`.
pub type Handler<T, Err> = Box<
  dyn Fn(FlowContext<T>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>> + Send + Sync,
>;

/// An ordered list of stages with `before`, `on` and `after` handlers per stage.
/// `P` is the phase tag carried by each stage.
///
/// `Err` is the error type handlers return. It must absorb `FlowError` so that
/// runner-level problems (a required stage with no handlers) surface through
/// the same channel.
pub struct Flow<T, Err, P = ()>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
  P: StagePhase,
{
  pub(crate) stages: Vec<StageDef<T, P>>,
  pub(crate) before: HashMap<&'static str, Vec<Handler<T, Err>>>,
  pub(crate) on: HashMap<&'static str, Vec<Handler<T, Err>>>,
  pub(crate) after: HashMap<&'static str, Vec<Handler<T, Err>>>,
}

impl<T, Err, P> Flow<T, Err, P>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
  P: StagePhase,
{
  /// Creates a flow from its stage definitions. Panics on duplicate stage names,
  /// which is a setup bug rather than a runtime condition.
  pub fn new(stages: Vec<StageDef<T, P>>) -> Self {
    for (idx, stage) in stages.iter().enumerate() {
      if stages[..idx].iter().any(|s| s.name == stage.name) {
        panic!("Flow setup error: stage '{}' is defined twice.", stage.name);
      }
    }
    Self {
      stages,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn stage_names(&self) -> Vec<&'static str> {
    self.stages.iter().map(|s| s.name).collect()
  }

  pub(crate) fn ensure_stage_exists(&self, stage_name: &str) {
    if !self.stages.iter().any(|s| s.name == stage_name) {
      panic!("Flow setup error: stage '{}' not found in flow definition.", stage_name);
    }
  }

  pub(crate) fn has_handlers(&self, stage_name: &str) -> bool {
    [&self.before, &self.on, &self.after]
      .iter()
      .any(|map| map.get(stage_name).is_some_and(|v| !v.is_empty()))
  }
}
