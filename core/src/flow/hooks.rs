// storefront/src/flow/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use super::definition::{Flow, Handler};
use super::{FlowContext, FlowControl, StagePhase};
use crate::error::FlowError;
use std::future::Future;

/// Which handler list of a stage a registration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookPhase {
  Before,
  On,
  After,
}

impl<T, Err, P> Flow<T, Err, P>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
  P: StagePhase,
{
  /// Registers a handler that runs before the stage's `on` handlers.
  ///
  /// The handler's own error type only has to convert into the flow's `Err`.
  pub fn before<F, HandlerErr>(
    &mut self,
    stage_name: &'static str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(HookPhase::Before, stage_name, handler_fn);
  }

  /// Registers the main handler(s) of a stage.
  pub fn on<F, HandlerErr>(
    &mut self,
    stage_name: &'static str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(HookPhase::On, stage_name, handler_fn);
  }

  /// Registers a handler that runs after the stage's `on` handlers.
  pub fn after<F, HandlerErr>(
    &mut self,
    stage_name: &'static str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(HookPhase::After, stage_name, handler_fn);
  }

  fn register<F, HandlerErr>(
    &mut self,
    hook: HookPhase,
    stage_name: &'static str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let handler: Handler<T, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    let map = match hook {
      HookPhase::Before => &mut self.before,
      HookPhase::On => &mut self.on,
      HookPhase::After => &mut self.after,
    };
    map.entry(stage_name).or_default().push(handler);
    tracing::trace!(stage = stage_name, ?hook, "Handler registered.");
  }
}
