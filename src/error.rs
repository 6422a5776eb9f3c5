use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the popup service.
///
/// The enum is `Clone` (failure sources are shared behind `Arc`) because a
/// single failing phase may have to resolve both the `shown` and `closed`
/// futures of the same push.
#[derive(Debug, Clone, Error)]
pub enum PopupError {
    /// The service was used before `initialize` registered its collaborators.
    #[error("popup service has not been initialized; call initialize() first")]
    Uninitialized,

    /// A caller-supplied argument was rejected, e.g. pushing a popup that is
    /// already on the stack.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The native presenter failed to materialize the popup. The entry was
    /// never appended to the stack.
    #[error("native presenter failed to show popup")]
    NativeShow(#[source] Arc<anyhow::Error>),

    /// The native presenter failed to tear the popup down. The popup stays on
    /// the stack so the caller can retry the pop.
    #[error("native presenter failed to close popup")]
    NativeTeardown(#[source] Arc<anyhow::Error>),

    /// An animator failed with something other than a cancellation.
    #[error("popup animation failed")]
    Animation(#[source] Arc<anyhow::Error>),

    /// The lifecycle was abandoned before reaching a terminal phase, e.g. the
    /// UI dispatcher was dropped mid-flight.
    #[error("popup lifecycle was interrupted before completing")]
    Interrupted,
}
