use crate::core::error_info::ErrorInfo;
use crate::core::failable::Failable;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// What a stage settled to, before it is checked for the failable shape
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The stage already returned a failable
    Failable(Failable),
    /// The stage returned a plain value
    Value(Value),
    /// The stage returned `Err` or panicked
    Thrown(ErrorInfo),
}

/// Values a stage may hand back
///
/// Implemented for [`Failable`], for [`Value`] and the JSON scalar types,
/// and for `Result<T, E>` where an `Err` counts as the stage throwing.
pub trait StageOutput {
    fn into_outcome(self) -> StageOutcome;
}

impl StageOutput for Failable {
    fn into_outcome(self) -> StageOutcome {
        StageOutcome::Failable(self)
    }
}

impl StageOutput for Value {
    fn into_outcome(self) -> StageOutcome {
        StageOutcome::Value(self)
    }
}

impl<T, E> StageOutput for Result<T, E>
where
    T: StageOutput,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn into_outcome(self) -> StageOutcome {
        match self {
            Ok(output) => output.into_outcome(),
            Err(err) => {
                let err: Box<dyn std::error::Error + Send + Sync> = err.into();
                StageOutcome::Thrown(ErrorInfo::from_error(&*err))
            }
        }
    }
}

macro_rules! plain_stage_output {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StageOutput for $ty {
                fn into_outcome(self) -> StageOutcome {
                    StageOutcome::Value(Value::from(self))
                }
            }
        )*
    };
}

plain_stage_output!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

/// Marker for stages that return their output directly
pub struct Immediate;

/// Marker for stages that return a future
pub struct Deferred;

/// A unit of work that can be placed in a sequence or pipe
///
/// Implemented for any `Fn(Value) -> R` where `R` is a [`StageOutput`]
/// ([`Immediate`]) or a future resolving to one ([`Deferred`]). The marker
/// parameter only exists to keep the two blanket impls apart and is always
/// inferred.
///
/// Panics raised while calling the function or while polling its future
/// are caught and reported as [`StageOutcome::Thrown`].
pub trait Stage<Marker>: Send + Sync + 'static {
    fn invoke(&self, arg: Value) -> BoxFuture<'static, StageOutcome>;
}

impl<F, R> Stage<Immediate> for F
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: StageOutput,
{
    fn invoke(&self, arg: Value) -> BoxFuture<'static, StageOutcome> {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self(arg))) {
            Ok(output) => output.into_outcome(),
            Err(panic) => StageOutcome::Thrown(panic_info(panic)),
        };
        future::ready(outcome).boxed()
    }
}

impl<F, Fut> Stage<Deferred> for F
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: StageOutput,
{
    fn invoke(&self, arg: Value) -> BoxFuture<'static, StageOutcome> {
        match panic::catch_unwind(AssertUnwindSafe(|| self(arg))) {
            Ok(pending) => AssertUnwindSafe(pending)
                .catch_unwind()
                .map(|settled| match settled {
                    Ok(output) => output.into_outcome(),
                    Err(panic) => StageOutcome::Thrown(panic_info(panic)),
                })
                .boxed(),
            Err(panic) => future::ready(StageOutcome::Thrown(panic_info(panic))).boxed(),
        }
    }
}

fn panic_info(panic: Box<dyn Any + Send>) -> ErrorInfo {
    let message = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "stage panicked".to_string()
    };
    ErrorInfo::new(message).with_detail("panic", true)
}
