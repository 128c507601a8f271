use crate::core::error_info::ErrorInfo;
use crate::core::failable::Failable;
use crate::stages::stage::{Stage, StageOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// A stage lifted to "always returns a future", with its shape erased
pub type AsyncStage = Arc<dyn Fn(Value) -> BoxFuture<'static, StageOutcome> + Send + Sync>;

/// A stage that always resolves to a [`Failable`] and never panics or errors out of band
pub type NormalisedStage = Arc<dyn Fn(Value) -> BoxFuture<'static, Failable> + Send + Sync>;

/// Lift any stage shape into an [`AsyncStage`]
///
/// Immediate results are treated as already resolved.
pub fn make_it_async<M, S: Stage<M>>(stage: S) -> AsyncStage {
    Arc::new(move |arg: Value| stage.invoke(arg))
}

/// Turn whatever an [`AsyncStage`] settles to into a [`Failable`]
///
/// * thrown (an `Err` or a panic): `"function at index {index} threw an exception"`,
///   with the original error kept as the cause
/// * a value without the failable shape: `"function at index {index} did not return failable"`
/// * a failable: passed through unchanged
pub fn make_it_failable(index: usize, stage: AsyncStage) -> NormalisedStage {
    Arc::new(move |arg: Value| {
        let pending = stage(arg);
        async move {
            match pending.await {
                StageOutcome::Failable(result) => result,
                StageOutcome::Value(value) => match Failable::try_from(value) {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::debug!(index, "stage did not return a failable");
                        Failable::failure(format!("function at index {index} did not return failable"))
                    }
                },
                StageOutcome::Thrown(cause) => {
                    tracing::debug!(index, cause = %cause, "stage threw");
                    Failable::failure(
                        ErrorInfo::new(format!("function at index {index} threw an exception"))
                            .with_cause(cause),
                    )
                }
            }
        }
        .boxed()
    })
}

/// Adapt a stage of any shape into a [`NormalisedStage`] tagged with its position
pub fn normalise_function<M, S: Stage<M>>(index: usize, stage: S) -> NormalisedStage {
    make_it_failable(index, make_it_async(stage))
}

/// Build the `Vec<AsyncStage>` taken by [`failable_sequence`](crate::failable_sequence)
/// and [`failable_pipe`](crate::failable_pipe)
///
/// ```
/// use failable::{failable_pipe, stages, success};
/// use serde_json::Value;
///
/// let pipe = failable_pipe(stages![
///     |n: Value| success(n.as_i64().unwrap_or(0) + 1),
///     |n: Value| async move { success(n.as_i64().unwrap_or(0) * 2) },
/// ]);
/// let result = futures::executor::block_on(pipe(Value::from(3)));
/// assert_eq!(result, success(8));
/// ```
#[macro_export]
macro_rules! stages {
    ($($stage:expr),* $(,)?) => {
        ::std::vec![$($crate::make_it_async($stage)),*]
    };
}
