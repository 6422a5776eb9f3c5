use std::any::Any;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::animation::PopupAnimation;
use crate::params::NavigationParams;

/// Event arguments handed to popup-level hooks and service-level listeners.
#[derive(Clone)]
pub struct PopupEventArgs {
    /// The popup the event refers to.
    pub popup: Arc<dyn Popup>,
}

impl PopupEventArgs {
    pub fn new(popup: Arc<dyn Popup>) -> Self {
        Self { popup }
    }
}

/// A popup entity: content, configured animations, behavior flags, and
/// lifecycle callbacks.
///
/// The service never mutates a popup; it reads the flags and animation slots
/// and invokes the callbacks in the order documented on
/// [`PopupService`](crate::PopupService). Everything has a no-op default, so
/// an implementation only overrides what it cares about.
///
/// The sync callbacks (`on_appearing`, `on_disappearing`, `on_navigated_to`)
/// run inline between lifecycle phases; the four async hooks are awaited and
/// may suspend. All of them execute on the UI dispatch context.
#[async_trait]
pub trait Popup: Send + Sync {
    /// Downcast support for native presenters and view-model binders, which
    /// need the concrete type to reach the popup's content.
    fn as_any(&self) -> &dyn Any;

    /// Animation played after the popup is shown. The service only invokes
    /// it; ownership stays with whoever configured the popup.
    fn appearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        None
    }

    /// Animation played before the popup is torn down.
    fn disappearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        None
    }

    /// Whether a tap on the background overlay closes this popup.
    fn close_on_background_click(&self) -> bool {
        false
    }

    /// Whether input falls through the background overlay to the view below.
    fn background_input_transparent(&self) -> bool {
        false
    }

    /// Whether input is disabled while an animation is running.
    fn disable_input_while_animating(&self) -> bool {
        true
    }

    /// Toggle input handling on the popup's native view.
    fn set_interaction_enabled(&self, _enabled: bool) {}

    /// Called right after the popup's native view is on screen.
    fn on_appearing(&self) {}

    /// Called right before the disappearing animation runs.
    fn on_disappearing(&self) {}

    /// Called with the navigation parameters before any opening event fires.
    fn on_navigated_to(&self, _parameters: &NavigationParams) {}

    /// Awaited before the popup's native view is materialized.
    async fn on_popup_opening(&self, _e: PopupEventArgs) {}

    /// Awaited after the appearing animation completes.
    async fn on_popup_opened(&self, _e: PopupEventArgs) {}

    /// Awaited before the disappearing animation runs.
    async fn on_popup_closing(&self, _e: PopupEventArgs) {}

    /// Awaited after the native view is torn down and the popup has left the
    /// stack.
    async fn on_popup_closed(&self, _e: PopupEventArgs) {}

    /// Awaited when the background overlay is tapped, before the popup is
    /// closed (if [`close_on_background_click`](Popup::close_on_background_click)
    /// is set).
    async fn on_background_clicked(&self, _e: PopupEventArgs) {}
}

/// A popup that produces a typed result when popped.
///
/// The caller of [`PopupService::push_result`](crate::PopupService::push_result)
/// receives the value via the returned handle; `take_result` is called by the
/// service exactly once, after the closing lifecycle completes.
pub trait ResultPopup: Popup {
    type Output: Send + 'static;

    /// Take the result supplied while the popup was open. `None` when the
    /// popup was dismissed without producing one.
    fn take_result(&self) -> Option<Self::Output>;
}

/// Single-slot container for a popup's result value, for embedding in
/// [`ResultPopup`] implementations.
#[derive(Debug)]
pub struct ResultCell<T>(Mutex<Option<T>>);

impl<T> ResultCell<T> {
    pub fn new() -> Self {
        Self(Mutex::new(None))
    }

    /// Store a value, replacing any previous one.
    pub fn set(&self, value: T) {
        *self.0.lock().unwrap() = Some(value);
    }

    /// Take the stored value out, leaving the cell empty.
    pub fn take(&self) -> Option<T> {
        self.0.lock().unwrap().take()
    }
}

impl<T> Default for ResultCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison for trait-object popups: pointer equality on the
/// underlying allocation, ignoring vtables.
pub fn popup_ptr_eq(a: &Arc<dyn Popup>, b: &Arc<dyn Popup>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl Popup for Bare {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn ptr_eq_is_identity_not_equality() {
        let a: Arc<dyn Popup> = Arc::new(Bare);
        let b: Arc<dyn Popup> = Arc::new(Bare);

        assert!(popup_ptr_eq(&a, &a.clone()));
        assert!(!popup_ptr_eq(&a, &b));
    }

    #[test]
    fn result_cell_takes_once() {
        let cell = ResultCell::new();
        cell.set(7);
        assert_eq!(cell.take(), Some(7));
        assert_eq!(cell.take(), None);
    }
}
