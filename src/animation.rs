use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::popup::Popup;

/// Failure mode of a running popup animation.
#[derive(Debug, Clone, Error)]
pub enum AnimationError {
    /// The animation was cancelled mid-flight. The orchestrator treats this
    /// as "finished early", not as a failure.
    #[error("animation was cancelled")]
    Cancelled,

    /// The animation failed outright; this propagates to the push/pop caller.
    #[error("animation failed")]
    Failed(#[source] Arc<anyhow::Error>),
}

impl From<anyhow::Error> for AnimationError {
    fn from(err: anyhow::Error) -> Self {
        AnimationError::Failed(Arc::new(err))
    }
}

/// An enter/exit animation for a popup.
///
/// Implementations live in the platform crates; the orchestrator only drives
/// the contract: `prepare` runs synchronously before the popup is visible
/// (set the initial transform there), then `run` plays the animation to
/// completion on the UI context.
#[async_trait]
pub trait PopupAnimation: Send + Sync {
    /// Synchronous setup before the animation runs.
    fn prepare(&self, popup: &dyn Popup);

    /// Play the animation. Returning [`AnimationError::Cancelled`] is benign;
    /// the lifecycle continues as if the animation had finished.
    async fn run(&self, popup: &dyn Popup) -> Result<(), AnimationError>;
}
