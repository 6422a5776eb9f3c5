//! Popup stack orchestration for cross-platform overlay UIs.
//!
//! The crate's core is [`PopupService`]: it owns the ordered stack of
//! currently-displayed popups (modals, toasts, floating notifications),
//! drives the multi-phase open/close lifecycle, and emits lifecycle events
//! in a fixed order. Platform concerns stay behind three collaborator
//! traits: a [`NativePresenter`] materializes popups on screen, a
//! [`UiDispatcher`] serializes lifecycle work onto the UI context, and an
//! optional [`ViewModelBinder`] attaches presentation logic.
//!
//! ```no_run
//! use std::sync::Arc;
//! use popstack::{
//!     BasicPopup, NativeHandle, NativePresenter, NavigationParams, Popup,
//!     PopupService, SerialDispatcher,
//! };
//!
//! struct Headless;
//!
//! #[async_trait::async_trait]
//! impl NativePresenter for Headless {
//!     async fn show(&self, _popup: &Arc<dyn Popup>) -> anyhow::Result<NativeHandle> {
//!         Ok(Arc::new(()))
//!     }
//!     async fn close(&self, _handle: &NativeHandle) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = PopupService::new();
//!     service.initialize(Arc::new(Headless), Arc::new(SerialDispatcher::spawn()), None);
//!
//!     let popup: Arc<dyn Popup> = Arc::new(BasicPopup::new());
//!     let handle = service.push(popup.clone(), NavigationParams::new())?;
//!     handle.shown.await?;
//!
//!     service.pop(Some(&popup)).await?;
//!     handle.closed.await?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod basic;
pub mod binder;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod params;
pub mod popup;
pub mod presenter;
pub mod service;
pub mod stack;

pub use animation::{AnimationError, PopupAnimation};
pub use basic::{BasicPopup, BasicResultPopup};
pub use binder::{NoBinder, ViewModelBinder};
pub use dispatcher::{SerialDispatcher, UiDispatcher, UiWork};
pub use error::PopupError;
pub use events::StackChangedEventArgs;
pub use params::NavigationParams;
pub use popup::{popup_ptr_eq, Popup, PopupEventArgs, ResultCell, ResultPopup};
pub use presenter::{NativeHandle, NativePresenter};
pub use service::PopupService;
pub use stack::{Completion, PushHandle, TypedCompletion, TypedPushHandle};
