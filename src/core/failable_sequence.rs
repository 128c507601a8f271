use crate::core::failable::Failable;
use crate::stages::normalise::{AsyncStage, make_it_async, make_it_failable};
use crate::stages::stage::Stage;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Failure message when a sequence has no stages
pub const NO_FUNCTIONS_SUPPLIED: &str = "no functions were supplied";

/// Success payload when every stage of a sequence succeeded
pub const ALL_FUNCTIONS_SUCCEEDED: &str = "all functions succeeded";

/// Runs stages against one shared argument, stopping at the first failure
///
/// Every stage receives a clone of the same argument; outputs are discarded.
/// The overall result is either the first failure, verbatim, or
/// `success("all functions succeeded")`.
///
/// # Stage Execution Order
///
/// Stages execute strictly in the order they are added, one at a time. A
/// stage never starts before the previous one has produced its result.
///
/// # Example
///
/// ```
/// use failable::{FailableSequence, empty, failure};
/// use serde_json::Value;
///
/// let validate = FailableSequence::new()
///     .named("validate-user")
///     .stage(|user: Value| {
///         if user["email"].is_string() { empty() } else { failure("email is required") }
///     })
///     .stage(|user: Value| async move {
///         if user["age"].as_i64().unwrap_or(0) >= 18 { empty() } else { failure("too young") }
///     });
///
/// let result = futures::executor::block_on(validate.run(serde_json::json!({ "age": 30 })));
/// assert_eq!(result, failure("email is required"));
/// ```
#[derive(Clone, Default)]
pub struct FailableSequence {
    name: Option<String>,
    stages: Vec<AsyncStage>,
}

impl FailableSequence {
    /// Create a new sequence with no stages
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from already-lifted stages
    pub fn from_stages(stages: Vec<AsyncStage>) -> Self {
        Self { name: None, stages }
    }

    /// Label used on the tracing span of every run
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a stage of any shape (fluent API - consumes self)
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

    /// Run every stage against `arg`
    pub async fn run(&self, arg: Value) -> Failable {
        let span = tracing::debug_span!(
            "failable_sequence",
            name = self.name.as_deref(),
            stages = self.stages.len()
        );
        self.run_stages(arg).instrument(span).await
    }

    async fn run_stages(&self, arg: Value) -> Failable {
        if self.stages.is_empty() {
            tracing::debug!("no stages to run");
            return Failable::failure(NO_FUNCTIONS_SUPPLIED);
        }

        for (index, stage) in self.stages.iter().enumerate() {
            let stage = make_it_failable(index, Arc::clone(stage));
            tracing::trace!(index, "running stage");

            let result = stage(arg.clone()).await;
            if let Failable::Failure { error } = &result {
                tracing::debug!(index, error = %error, "stage failed, stopping sequence");
                return result;
            }
        }

        Failable::success(ALL_FUNCTIONS_SUCCEEDED)
    }
}

/// Compose `stages` into a function that runs them all against one argument
///
/// See [`FailableSequence`] for the semantics.
pub fn failable_sequence(
    stages: Vec<AsyncStage>,
) -> impl Fn(Value) -> BoxFuture<'static, Failable> + Clone + Send + Sync + 'static {
    let sequence = Arc::new(FailableSequence::from_stages(stages));
    move |arg: Value| {
        let sequence = Arc::clone(&sequence);
        async move { sequence.run(arg).await }.boxed()
    }
}
