use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::animation::PopupAnimation;
use crate::params::NavigationParams;
use crate::popup::{Popup, PopupEventArgs, ResultCell, ResultPopup};

type Callback = Box<dyn Fn() + Send + Sync>;
type NavigatedCallback = Box<dyn Fn(&NavigationParams) + Send + Sync>;
type EventCallback = Box<dyn Fn(&PopupEventArgs) + Send + Sync>;

/// Ready-made [`Popup`] with opaque content, behavior flags, animation slots,
/// and closure-based callbacks.
///
/// Covers the common case where the popup is pure configuration; implement
/// [`Popup`] directly when a hook needs to suspend or the popup carries real
/// behavior.
///
/// # Example
/// ```rust
/// use popstack::BasicPopup;
///
/// let popup = BasicPopup::new()
///     .with_content("Saved!".to_string())
///     .with_close_on_background_click(true)
///     .appearing_callback(|| log::debug!("toast visible"));
///
/// assert_eq!(popup.content_as::<String>().map(String::as_str), Some("Saved!"));
/// ```
pub struct BasicPopup {
    content: Box<dyn Any + Send + Sync>,
    appearing_animation: Option<Arc<dyn PopupAnimation>>,
    disappearing_animation: Option<Arc<dyn PopupAnimation>>,
    close_on_background_click: bool,
    background_input_transparent: bool,
    disable_input_while_animating: bool,
    interaction_enabled: AtomicBool,
    on_appearing: Option<Callback>,
    on_disappearing: Option<Callback>,
    on_navigated_to: Option<NavigatedCallback>,
    on_background_clicked: Option<EventCallback>,
}

impl BasicPopup {
    pub fn new() -> Self {
        Self {
            content: Box::new(()),
            appearing_animation: None,
            disappearing_animation: None,
            close_on_background_click: false,
            background_input_transparent: false,
            disable_input_while_animating: true,
            interaction_enabled: AtomicBool::new(true),
            on_appearing: None,
            on_disappearing: None,
            on_navigated_to: None,
            on_background_clicked: None,
        }
    }

    /// Set the displayed content. The service treats it as opaque; the native
    /// presenter downcasts it back out via [`BasicPopup::content_as`].
    pub fn with_content<C: Any + Send + Sync>(mut self, content: C) -> Self {
        self.content = Box::new(content);
        self
    }

    pub fn with_appearing_animation(mut self, animation: Arc<dyn PopupAnimation>) -> Self {
        self.appearing_animation = Some(animation);
        self
    }

    pub fn with_disappearing_animation(mut self, animation: Arc<dyn PopupAnimation>) -> Self {
        self.disappearing_animation = Some(animation);
        self
    }

    /// Close the popup when the background overlay is tapped (default: false).
    pub fn with_close_on_background_click(mut self, close: bool) -> Self {
        self.close_on_background_click = close;
        self
    }

    /// Let input fall through the background overlay (default: false).
    pub fn with_background_input_transparent(mut self, transparent: bool) -> Self {
        self.background_input_transparent = transparent;
        self
    }

    /// Disable input while an animation is running (default: true).
    pub fn with_disable_input_while_animating(mut self, disable: bool) -> Self {
        self.disable_input_while_animating = disable;
        self
    }

    /// Callback invoked when the native view is on screen.
    pub fn appearing_callback(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_appearing = Some(Box::new(f));
        self
    }

    /// Callback invoked before the disappearing animation runs.
    pub fn disappearing_callback(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_disappearing = Some(Box::new(f));
        self
    }

    /// Callback invoked with the navigation parameters at push time.
    pub fn navigated_callback(
        mut self,
        f: impl Fn(&NavigationParams) + Send + Sync + 'static,
    ) -> Self {
        self.on_navigated_to = Some(Box::new(f));
        self
    }

    /// Callback invoked when the background overlay is tapped.
    pub fn background_clicked_callback(
        mut self,
        f: impl Fn(&PopupEventArgs) + Send + Sync + 'static,
    ) -> Self {
        self.on_background_clicked = Some(Box::new(f));
        self
    }

    /// Downcast the content back to its concrete type.
    pub fn content_as<C: Any>(&self) -> Option<&C> {
        self.content.downcast_ref()
    }

    /// Current input state, as last set by the service around animations.
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled.load(Ordering::SeqCst)
    }
}

impl Default for BasicPopup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Popup for BasicPopup {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn appearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        self.appearing_animation.clone()
    }

    fn disappearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        self.disappearing_animation.clone()
    }

    fn close_on_background_click(&self) -> bool {
        self.close_on_background_click
    }

    fn background_input_transparent(&self) -> bool {
        self.background_input_transparent
    }

    fn disable_input_while_animating(&self) -> bool {
        self.disable_input_while_animating
    }

    fn set_interaction_enabled(&self, enabled: bool) {
        self.interaction_enabled.store(enabled, Ordering::SeqCst);
    }

    fn on_appearing(&self) {
        if let Some(f) = &self.on_appearing {
            f();
        }
    }

    fn on_disappearing(&self) {
        if let Some(f) = &self.on_disappearing {
            f();
        }
    }

    fn on_navigated_to(&self, parameters: &NavigationParams) {
        if let Some(f) = &self.on_navigated_to {
            f(parameters);
        }
    }

    async fn on_background_clicked(&self, e: PopupEventArgs) {
        if let Some(f) = &self.on_background_clicked {
            f(&e);
        }
    }
}

/// [`BasicPopup`] plus a typed result slot, implementing [`ResultPopup`].
///
/// The popup's own logic (or anything holding a reference to it) calls
/// [`set_result`](BasicResultPopup::set_result) before the popup is popped.
pub struct BasicResultPopup<T> {
    inner: BasicPopup,
    result: ResultCell<T>,
}

impl<T: Send + 'static> BasicResultPopup<T> {
    pub fn new() -> Self {
        Self::from_popup(BasicPopup::new())
    }

    /// Wrap an already-configured [`BasicPopup`].
    pub fn from_popup(inner: BasicPopup) -> Self {
        Self {
            inner,
            result: ResultCell::new(),
        }
    }

    /// Store the value delivered to the pusher when this popup is popped.
    pub fn set_result(&self, value: T) {
        self.result.set(value);
    }

    /// The wrapped popup configuration.
    pub fn popup(&self) -> &BasicPopup {
        &self.inner
    }
}

impl<T: Send + 'static> Default for BasicResultPopup<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + 'static> Popup for BasicResultPopup<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn appearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        Popup::appearing_animation(&self.inner)
    }

    fn disappearing_animation(&self) -> Option<Arc<dyn PopupAnimation>> {
        Popup::disappearing_animation(&self.inner)
    }

    fn close_on_background_click(&self) -> bool {
        Popup::close_on_background_click(&self.inner)
    }

    fn background_input_transparent(&self) -> bool {
        Popup::background_input_transparent(&self.inner)
    }

    fn disable_input_while_animating(&self) -> bool {
        Popup::disable_input_while_animating(&self.inner)
    }

    fn set_interaction_enabled(&self, enabled: bool) {
        Popup::set_interaction_enabled(&self.inner, enabled);
    }

    fn on_appearing(&self) {
        Popup::on_appearing(&self.inner);
    }

    fn on_disappearing(&self) {
        Popup::on_disappearing(&self.inner);
    }

    fn on_navigated_to(&self, parameters: &NavigationParams) {
        Popup::on_navigated_to(&self.inner, parameters);
    }

    async fn on_background_clicked(&self, e: PopupEventArgs) {
        Popup::on_background_clicked(&self.inner, e).await;
    }
}

impl<T: Send + 'static> ResultPopup for BasicResultPopup<T> {
    type Output = T;

    fn take_result(&self) -> Option<T> {
        self.result.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let popup = BasicPopup::new();
        assert!(!Popup::close_on_background_click(&popup));
        assert!(!Popup::background_input_transparent(&popup));
        assert!(Popup::disable_input_while_animating(&popup));
        assert!(popup.interaction_enabled());
    }

    #[test]
    fn content_roundtrip() {
        let popup = BasicPopup::new().with_content(42u32);
        assert_eq!(popup.content_as::<u32>(), Some(&42));
        assert!(popup.content_as::<String>().is_none());
    }

    #[test]
    fn result_popup_takes_result_once() {
        let popup = BasicResultPopup::new();
        popup.set_result("done");
        assert_eq!(popup.take_result(), Some("done"));
        assert_eq!(popup.take_result(), None);
    }
}
