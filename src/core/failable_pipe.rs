use crate::core::failable::Failable;
use crate::stages::normalise::{AsyncStage, make_it_async, make_it_failable};
use crate::stages::stage::Stage;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Threads a value through stages, stopping at the first failure
///
/// Each stage receives the payload of the previous stage's success (an
/// absent payload is passed on as `Value::Null`). The result is the last
/// stage's failable, or the first failure encountered. With no stages the
/// pipe is the identity: `success(arg)`.
///
/// # Example
///
/// ```
/// use failable::{FailablePipe, success};
/// use serde_json::Value;
///
/// let pipe = FailablePipe::new()
///     .stage(|n: Value| success(n.as_i64().unwrap_or(0) + 1))
///     .stage(|n: Value| async move { success(n.as_i64().unwrap_or(0) * 2) });
///
/// let result = futures::executor::block_on(pipe.run(Value::from(3)));
/// assert_eq!(result, success(8));
/// ```
#[derive(Clone, Default)]
pub struct FailablePipe {
    name: Option<String>,
    stages: Vec<AsyncStage>,
}

impl FailablePipe {
    /// Create a new pipe with no stages
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipe from already-lifted stages
    pub fn from_stages(stages: Vec<AsyncStage>) -> Self {
        Self { name: None, stages }
    }

    /// Label used on the tracing span of every run
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a stage of any shape (fluent API - consumes self)
    ///
    /// Stages execute in the order they are added.
    pub fn stage<M, S: Stage<M>>(mut self, stage: S) -> Self {
        self.stages.push(make_it_async(stage));
        self
    }

    /// Add an already-lifted stage (mutable reference API)
    pub fn add_stage(&mut self, stage: AsyncStage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Feed `arg` through every stage in order
    pub async fn run(&self, arg: Value) -> Failable {
        let span = tracing::debug_span!(
            "failable_pipe",
            name = self.name.as_deref(),
            stages = self.stages.len()
        );
        self.run_stages(arg).instrument(span).await
    }

    async fn run_stages(&self, arg: Value) -> Failable {
        let mut input = arg.clone();
        let mut result = Failable::success(arg);

        for (index, stage) in self.stages.iter().enumerate() {
            let stage = make_it_failable(index, Arc::clone(stage));
            tracing::trace!(index, "running stage");

            result = stage(input).await;
            input = match &result {
                Failable::Success { payload } => payload.clone().unwrap_or(Value::Null),
                Failable::Failure { error } => {
                    tracing::debug!(index, error = %error, "stage failed, stopping pipe");
                    return result;
                }
            };
        }

        result
    }
}

/// Compose `stages` into a function that threads its argument through them
///
/// See [`FailablePipe`] for the semantics.
pub fn failable_pipe(
    stages: Vec<AsyncStage>,
) -> impl Fn(Value) -> BoxFuture<'static, Failable> + Clone + Send + Sync + 'static {
    let pipe = Arc::new(FailablePipe::from_stages(stages));
    move |arg: Value| {
        let pipe = Arc::clone(&pipe);
        async move { pipe.run(arg).await }.boxed()
    }
}
