use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use tokio::sync::oneshot;

use crate::animation::{AnimationError, PopupAnimation};
use crate::binder::{NoBinder, ViewModelBinder};
use crate::dispatcher::UiDispatcher;
use crate::error::PopupError;
use crate::events::{ServiceEvents, StackChangedEventArgs};
use crate::params::NavigationParams;
use crate::popup::{popup_ptr_eq, Popup, PopupEventArgs, ResultPopup};
use crate::presenter::NativePresenter;
use crate::stack::{
    Completion, CompletionHook, PushHandle, StackEntry, TypedCompletion, TypedPushHandle,
};

/// Collaborators registered through [`PopupService::initialize`].
struct Collaborators {
    presenter: Arc<dyn NativePresenter>,
    dispatcher: Arc<dyn UiDispatcher>,
    binder: Arc<dyn ViewModelBinder>,
}

struct ServiceInner {
    collaborators: ArcSwapOption<Collaborators>,
    stack: Mutex<Vec<Arc<StackEntry>>>,
    events: ServiceEvents,
}

static GLOBAL: Lazy<PopupService> = Lazy::new(PopupService::new);

/// The popup stack orchestrator.
///
/// Owns the ordered list of currently-displayed popups, drives the
/// multi-phase open/close lifecycle, and emits the service-level events.
/// Argument validation and view-model binding run synchronously on the
/// caller; every state-mutating phase is marshaled onto the UI dispatcher,
/// which runs units one at a time, so a push and a pop issued concurrently
/// complete in dispatch order and the stack is never observed mid-mutation.
///
/// Phase order within one push: navigated -> binder parameters ->
/// opening(service) -> opening(popup) -> native show -> stack append ->
/// appearing callback -> appearing animation -> shown signal ->
/// opened(service) -> opened(popup) -> pushed -> stack_changed.
///
/// Within one pop: closing(service) -> closing(popup) -> disappearing
/// callback -> disappearing animation -> native teardown -> stack removal ->
/// closed(service) -> closed(popup) -> popped -> stack_changed -> completion.
#[derive(Clone)]
pub struct PopupService {
    inner: Arc<ServiceInner>,
}

impl PopupService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                collaborators: ArcSwapOption::empty(),
                stack: Mutex::new(Vec::new()),
                events: ServiceEvents::new(),
            }),
        }
    }

    /// Process-wide instance, created lazily on first access. Prefer an
    /// explicitly constructed service handed to call sites; this exists for
    /// platform shims that have nowhere to thread one through.
    pub fn global() -> &'static PopupService {
        &GLOBAL
    }

    /// Register the platform collaborators. Must be called before any
    /// push/pop. Calling it again silently replaces the collaborators; there
    /// is deliberately no guard, which makes re-initialization a sharp edge
    /// rather than an error.
    pub fn initialize(
        &self,
        presenter: Arc<dyn NativePresenter>,
        dispatcher: Arc<dyn UiDispatcher>,
        binder: Option<Arc<dyn ViewModelBinder>>,
    ) {
        self.inner.collaborators.store(Some(Arc::new(Collaborators {
            presenter,
            dispatcher,
            binder: binder.unwrap_or_else(|| Arc::new(NoBinder)),
        })));
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.collaborators.load().is_some()
    }

    /// Read-only snapshot of the currently displayed popups, in front-to-back
    /// push order. Iterating the snapshot is unaffected by later mutations.
    pub fn navigation_stack(&self) -> Vec<Arc<dyn Popup>> {
        snapshot(&self.inner)
    }

    /// Push a popup onto the stack and start its opening lifecycle.
    ///
    /// Returns immediately after enqueueing; the open sequence always runs to
    /// completion on the UI context regardless of which [`PushHandle`] future
    /// the caller awaits (or whether it awaits any).
    pub fn push(
        &self,
        popup: Arc<dyn Popup>,
        parameters: NavigationParams,
    ) -> Result<PushHandle, PopupError> {
        let collab = self.collaborators()?;
        self.reject_duplicate(&popup)?;
        self.assign_view_model(&collab, &popup);

        let (shown_tx, shown_rx) = oneshot::channel();
        let (closed_tx, closed_rx) = oneshot::channel();
        let hook: CompletionHook = Box::new(move |outcome| {
            let _ = closed_tx.send(outcome);
        });

        self.enqueue_open(collab, popup, parameters, hook, shown_tx);
        Ok(PushHandle {
            shown: Completion::new(shown_rx),
            closed: Completion::new(closed_rx),
        })
    }

    /// Push a result-producing popup. Identical phase sequence to
    /// [`push`](PopupService::push); the handle's `result` future resolves to
    /// the value the popup supplied by the time it was popped.
    pub fn push_result<P>(
        &self,
        popup: Arc<P>,
        parameters: NavigationParams,
    ) -> Result<TypedPushHandle<P::Output>, PopupError>
    where
        P: ResultPopup + 'static,
    {
        let collab = self.collaborators()?;
        let popup_dyn: Arc<dyn Popup> = popup.clone();
        self.reject_duplicate(&popup_dyn)?;
        self.assign_view_model(&collab, &popup_dyn);

        let (shown_tx, shown_rx) = oneshot::channel();
        let (result_tx, result_rx) = oneshot::channel();
        let hook: CompletionHook = Box::new(move |outcome| {
            let _ = result_tx.send(outcome.map(|()| popup.take_result()));
        });

        self.enqueue_open(collab, popup_dyn, parameters, hook, shown_tx);
        Ok(TypedPushHandle {
            shown: Completion::new(shown_rx),
            result: TypedCompletion::new(result_rx),
        })
    }

    /// Pop a popup: the given one, or the top of the stack when `None`.
    ///
    /// Popping an empty stack, or a popup that is not on it, is a documented
    /// no-op (this includes a popup whose show phase has not appended it
    /// yet). Resolves only after the full closing lifecycle ran on the UI
    /// context; a teardown failure is returned and leaves the popup on the
    /// stack, with its completion unresolved, so the caller may retry.
    pub async fn pop(&self, popup: Option<&Arc<dyn Popup>>) -> Result<(), PopupError> {
        let collab = self.collaborators()?;

        let entry = {
            let stack = self.inner.stack.lock().unwrap();
            let found = match popup {
                Some(target) => stack.iter().find(|e| popup_ptr_eq(&e.popup, target)),
                None => stack.last(),
            };
            match found {
                Some(entry) => entry.clone(),
                None => return Ok(()),
            }
        };

        let inner = self.inner.clone();
        let (tx, rx) = oneshot::channel();
        let work_entry = entry.clone();
        let work_collab = collab.clone();
        collab
            .dispatcher
            .dispatch_async(Box::pin(async move {
                let result = run_close_sequence(&inner, &work_collab, &work_entry).await;
                let _ = tx.send(result);
            }))
            .await;

        rx.await.unwrap_or(Err(PopupError::Interrupted))
    }

    /// Pop every popup, tail first. Each pop runs its full closing lifecycle
    /// (animation and teardown included) before the next begins.
    pub async fn pop_all(&self) -> Result<(), PopupError> {
        while !self.inner.stack.lock().unwrap().is_empty() {
            self.pop(None).await?;
        }
        Ok(())
    }

    /// Background-tap entry point for the platform overlay: runs the popup's
    /// background-clicked hook, then closes it if the popup asked for
    /// close-on-background-click.
    pub async fn handle_background_click(
        &self,
        popup: &Arc<dyn Popup>,
    ) -> Result<(), PopupError> {
        popup
            .on_background_clicked(PopupEventArgs::new(popup.clone()))
            .await;
        if popup.close_on_background_click() {
            self.pop(Some(popup)).await
        } else {
            Ok(())
        }
    }

    /// System back-navigation integration: pops the top popup when one is
    /// displayed. Returns `false` when the stack was empty, letting the
    /// platform run its default back handling instead.
    pub async fn handle_back_request(&self) -> Result<bool, PopupError> {
        if self.inner.stack.lock().unwrap().is_empty() {
            return Ok(false);
        }
        self.pop(None).await?;
        Ok(true)
    }

    /// Subscribe to the `pushed` event (fires after a popup fully opened).
    pub fn on_pushed(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.pushed.subscribe(listener);
    }

    /// Subscribe to the `popped` event (fires after a popup fully closed).
    pub fn on_popped(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.popped.subscribe(listener);
    }

    /// Subscribe to stack composition changes. The args carry a snapshot
    /// taken strictly after the corresponding mutation.
    pub fn on_stack_changed(
        &self,
        listener: impl Fn(&StackChangedEventArgs) + Send + Sync + 'static,
    ) {
        self.inner.events.stack_changed.subscribe(listener);
    }

    /// Subscribe to the `opening` event (before the popup becomes visible).
    pub fn on_opening(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.opening.subscribe(listener);
    }

    /// Subscribe to the `opened` event (after the appearing animation).
    pub fn on_opened(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.opened.subscribe(listener);
    }

    /// Subscribe to the `closing` event (before the disappearing animation).
    pub fn on_closing(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.closing.subscribe(listener);
    }

    /// Subscribe to the `closed` event (after native teardown).
    pub fn on_closed(&self, listener: impl Fn(&PopupEventArgs) + Send + Sync + 'static) {
        self.inner.events.closed.subscribe(listener);
    }

    fn collaborators(&self) -> Result<Arc<Collaborators>, PopupError> {
        self.inner
            .collaborators
            .load_full()
            .ok_or(PopupError::Uninitialized)
    }

    fn reject_duplicate(&self, popup: &Arc<dyn Popup>) -> Result<(), PopupError> {
        let on_stack = self
            .inner
            .stack
            .lock()
            .unwrap()
            .iter()
            .any(|e| popup_ptr_eq(&e.popup, popup));
        if on_stack {
            return Err(PopupError::InvalidArgument(
                "popup is already on the stack".into(),
            ));
        }
        Ok(())
    }

    /// Best-effort view-model binding on the caller's context. Failures are
    /// logged, never surfaced: presentation must not fail merely because
    /// binding failed.
    fn assign_view_model(&self, collab: &Collaborators, popup: &Arc<dyn Popup>) {
        if !collab.binder.supports_binding() {
            return;
        }
        if collab.binder.has_view_model(popup.as_ref()) {
            return;
        }
        if let Err(err) = collab.binder.assign_view_model(popup.as_ref()) {
            log::warn!("view-model binding failed: {:#}", err);
        }
    }

    fn enqueue_open(
        &self,
        collab: Arc<Collaborators>,
        popup: Arc<dyn Popup>,
        parameters: NavigationParams,
        completion: CompletionHook,
        shown_tx: oneshot::Sender<Result<(), PopupError>>,
    ) {
        let inner = self.inner.clone();
        let entry = Arc::new(StackEntry::new(popup, completion));
        let dispatcher = collab.dispatcher.clone();
        dispatcher.dispatch(Box::pin(async move {
            let mut shown_tx = Some(shown_tx);
            if let Err(err) = run_open_sequence(&inner, &collab, &entry, parameters, &mut shown_tx).await
            {
                log::error!("popup open sequence failed: {}", err);
                if let Some(tx) = shown_tx.take() {
                    let _ = tx.send(Err(err.clone()));
                }
                entry.resolve(Err(err));
            }
        }));
    }
}

impl Default for PopupService {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(inner: &ServiceInner) -> Vec<Arc<dyn Popup>> {
    inner
        .stack
        .lock()
        .unwrap()
        .iter()
        .map(|entry| entry.popup.clone())
        .collect()
}

async fn run_open_sequence(
    inner: &Arc<ServiceInner>,
    collab: &Collaborators,
    entry: &Arc<StackEntry>,
    parameters: NavigationParams,
    shown_tx: &mut Option<oneshot::Sender<Result<(), PopupError>>>,
) -> Result<(), PopupError> {
    let popup = entry.popup.clone();

    // Authoritative duplicate check: appends only ever happen on this
    // context, so a race past the synchronous check is caught here.
    if inner
        .stack
        .lock()
        .unwrap()
        .iter()
        .any(|e| popup_ptr_eq(&e.popup, &popup))
    {
        return Err(PopupError::InvalidArgument(
            "popup is already on the stack".into(),
        ));
    }

    // Deliver navigation parameters to the popup, then to its view-model.
    popup.on_navigated_to(&parameters);
    if collab.binder.supports_binding() {
        if let Err(err) = collab.binder.set_parameters(popup.as_ref(), &parameters).await {
            log::warn!("forwarding navigation parameters to view-model failed: {:#}", err);
        }
    }

    let args = PopupEventArgs::new(popup.clone());
    inner.events.opening.emit(&args);
    popup.on_popup_opening(args.clone()).await;

    // Materialize the native view; the entry joins the visible stack only
    // once this succeeded, so no reader ever observes a handleless entry.
    let handle = collab
        .presenter
        .show(&popup)
        .await
        .map_err(|err| PopupError::NativeShow(Arc::new(err)))?;
    entry.set_native(handle);
    inner.stack.lock().unwrap().push(entry.clone());

    popup.on_appearing();

    if let Some(animation) = popup.appearing_animation() {
        run_animation(animation.as_ref(), &popup).await?;
    }

    // Early-return milestone: callers awaiting `shown` resume here while the
    // open sequence still runs to completion below.
    if let Some(tx) = shown_tx.take() {
        let _ = tx.send(Ok(()));
    }

    inner.events.opened.emit(&args);
    popup.on_popup_opened(args.clone()).await;

    inner.events.pushed.emit(&args);
    inner.events.stack_changed.emit(&StackChangedEventArgs {
        stack: snapshot(inner),
    });

    log::debug!("popup pushed, stack depth {}", inner.stack.lock().unwrap().len());
    Ok(())
}

async fn run_close_sequence(
    inner: &Arc<ServiceInner>,
    collab: &Collaborators,
    entry: &Arc<StackEntry>,
) -> Result<(), PopupError> {
    // The entry may have been removed by a pop queued ahead of this one;
    // treat that like pop-of-missing (no-op).
    if !inner
        .stack
        .lock()
        .unwrap()
        .iter()
        .any(|e| Arc::ptr_eq(e, entry))
    {
        return Ok(());
    }

    let popup = entry.popup.clone();
    let args = PopupEventArgs::new(popup.clone());

    inner.events.closing.emit(&args);
    popup.on_popup_closing(args.clone()).await;

    popup.on_disappearing();

    if let Some(animation) = popup.disappearing_animation() {
        run_animation(animation.as_ref(), &popup).await?;
    }

    if let Some(handle) = entry.native() {
        collab
            .presenter
            .close(&handle)
            .await
            .map_err(|err| PopupError::NativeTeardown(Arc::new(err)))?;
    }

    // The list mutation happens here, only after teardown succeeded.
    inner.stack.lock().unwrap().retain(|e| !Arc::ptr_eq(e, entry));

    inner.events.closed.emit(&args);
    popup.on_popup_closed(args.clone()).await;

    inner.events.popped.emit(&args);
    inner.events.stack_changed.emit(&StackChangedEventArgs {
        stack: snapshot(inner),
    });

    // Resolved on the UI context: the pusher's `closed` future must see the
    // success even when the pop caller abandoned its await mid-flight.
    entry.resolve(Ok(()));

    log::debug!("popup popped, stack depth {}", inner.stack.lock().unwrap().len());
    Ok(())
}

async fn run_animation(
    animation: &dyn PopupAnimation,
    popup: &Arc<dyn Popup>,
) -> Result<(), PopupError> {
    animation.prepare(popup.as_ref());

    let disable = popup.disable_input_while_animating();
    if disable {
        popup.set_interaction_enabled(false);
    }

    match animation.run(popup.as_ref()).await {
        Ok(()) => {}
        // Cancellation means the animation finished early, not that the
        // lifecycle failed.
        Err(AnimationError::Cancelled) => {
            log::debug!("popup animation cancelled");
        }
        Err(AnimationError::Failed(err)) => return Err(PopupError::Animation(err)),
    }

    if disable {
        popup.set_interaction_enabled(true);
    }
    Ok(())
}
