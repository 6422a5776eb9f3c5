use std::any::Any;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::popup::Popup;

/// Opaque reference to the platform artifact a presenter created for a popup.
///
/// The service stores it on the stack entry and hands it back verbatim at
/// teardown; only the presenter that produced it knows what is inside.
pub type NativeHandle = Arc<dyn Any + Send + Sync>;

/// Platform collaborator that materializes a popup on screen and later
/// removes it.
///
/// Contract:
/// - `show` is called at most once per stack entry and must have fully
///   materialized the view before returning.
/// - `close` must tolerate a handle that was already torn down by becoming a
///   no-op; an error from `close` leaves the popup on the stack for a retry.
#[async_trait]
pub trait NativePresenter: Send + Sync {
    /// Convert the popup into a displayed platform artifact.
    async fn show(&self, popup: &Arc<dyn Popup>) -> Result<NativeHandle>;

    /// Remove the platform artifact from the screen.
    async fn close(&self, handle: &NativeHandle) -> Result<()>;
}
