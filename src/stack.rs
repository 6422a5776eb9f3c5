use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::PopupError;
use crate::popup::Popup;
use crate::presenter::NativeHandle;

/// Fired exactly once when an entry's closing lifecycle finishes (`Ok`) or
/// its lifecycle fails (`Err`).
pub(crate) type CompletionHook = Box<dyn FnOnce(Result<(), PopupError>) + Send>;

/// One currently-displayed (or displaying) popup.
///
/// The entry is created at push time, gains its native handle during the
/// show phase (strictly before it is appended to the visible stack), and is
/// evicted only after native teardown succeeds.
pub(crate) struct StackEntry {
    pub popup: Arc<dyn Popup>,
    native: Mutex<Option<NativeHandle>>,
    completion: Mutex<Option<CompletionHook>>,
}

impl StackEntry {
    pub fn new(popup: Arc<dyn Popup>, completion: CompletionHook) -> Self {
        Self {
            popup,
            native: Mutex::new(None),
            completion: Mutex::new(Some(completion)),
        }
    }

    /// Record the native handle. Set exactly once, during the show phase.
    pub fn set_native(&self, handle: NativeHandle) {
        let mut slot = self.native.lock().unwrap();
        debug_assert!(slot.is_none(), "native handle set twice");
        *slot = Some(handle);
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native.lock().unwrap().clone()
    }

    /// Fire the completion hook. Later calls are no-ops, preserving the
    /// resolve-exactly-once invariant.
    pub fn resolve(&self, outcome: Result<(), PopupError>) {
        if let Some(hook) = self.completion.lock().unwrap().take() {
            hook(outcome);
        }
    }
}

/// Future resolving to a lifecycle milestone of a pushed popup.
///
/// Yields [`PopupError::Interrupted`] when the producing side disappeared
/// before the milestone was reached.
pub struct Completion(oneshot::Receiver<Result<(), PopupError>>);

impl Completion {
    pub(crate) fn new(rx: oneshot::Receiver<Result<(), PopupError>>) -> Self {
        Self(rx)
    }
}

impl Future for Completion {
    type Output = Result<(), PopupError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(PopupError::Interrupted)))
    }
}

/// Future resolving to the typed result of a result-producing popup.
pub struct TypedCompletion<T>(oneshot::Receiver<Result<Option<T>, PopupError>>);

impl<T> TypedCompletion<T> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<Option<T>, PopupError>>) -> Self {
        Self(rx)
    }
}

impl<T> Future for TypedCompletion<T> {
    type Output = Result<Option<T>, PopupError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(PopupError::Interrupted)))
    }
}

/// Futures returned by [`PopupService::push`](crate::PopupService::push).
///
/// `shown` resolves once the popup is visible and its appearing animation
/// has finished, before the opened events fire; `closed` resolves when a
/// matching pop completes the full closing lifecycle. A failure before the
/// shown milestone resolves both futures with the error; a failure after it
/// resolves only `closed`.
pub struct PushHandle {
    pub shown: Completion,
    pub closed: Completion,
}

/// Futures returned by
/// [`PopupService::push_result`](crate::PopupService::push_result).
///
/// `result` resolves to the value the popup supplied before it was popped,
/// or `None` when it was dismissed without one.
pub struct TypedPushHandle<T> {
    pub shown: Completion,
    pub result: TypedCompletion<T>,
}
