use std::sync::{Arc, Mutex};

use crate::popup::{Popup, PopupEventArgs};

/// Snapshot delivered with the `stack_changed` event.
#[derive(Clone)]
pub struct StackChangedEventArgs {
    /// The stack after the mutation, in front-to-back push order.
    pub stack: Vec<Arc<dyn Popup>>,
}

/// One ordered list of callbacks for a single event, invoked synchronously in
/// registration order.
///
/// Listeners are cloned out before invocation so a callback may subscribe
/// further listeners without deadlocking.
pub(crate) struct ListenerList<A> {
    listeners: Mutex<Vec<Arc<dyn Fn(&A) + Send + Sync>>>,
}

impl<A> ListenerList<A> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&A) + Send + Sync + 'static) {
        self.listeners.lock().unwrap().push(Arc::new(listener));
    }

    pub fn emit(&self, args: &A) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(args);
        }
    }
}

/// The seven service-level events, one subscriber list each.
pub(crate) struct ServiceEvents {
    pub pushed: ListenerList<PopupEventArgs>,
    pub popped: ListenerList<PopupEventArgs>,
    pub stack_changed: ListenerList<StackChangedEventArgs>,
    pub opening: ListenerList<PopupEventArgs>,
    pub opened: ListenerList<PopupEventArgs>,
    pub closing: ListenerList<PopupEventArgs>,
    pub closed: ListenerList<PopupEventArgs>,
}

impl ServiceEvents {
    pub fn new() -> Self {
        Self {
            pushed: ListenerList::new(),
            popped: ListenerList::new(),
            stack_changed: ListenerList::new(),
            opening: ListenerList::new(),
            opened: ListenerList::new(),
            closing: ListenerList::new(),
            closed: ListenerList::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_fire_in_registration_order() {
        let list: ListenerList<u32> = ListenerList::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            list.subscribe(move |n: &u32| log.lock().unwrap().push(format!("{tag}:{n}")));
        }

        list.emit(&1);
        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "c:1"]);
    }

    #[test]
    fn listener_may_subscribe_during_emit() {
        let list: Arc<ListenerList<u32>> = Arc::new(ListenerList::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_list = list.clone();
        let inner_log = log.clone();
        list.subscribe(move |_| {
            let log = inner_log.clone();
            inner_list.subscribe(move |n: &u32| log.lock().unwrap().push(*n));
        });

        list.emit(&1);
        list.emit(&2);
        // The listener added while emitting 1 only sees later emits.
        assert_eq!(*log.lock().unwrap(), vec![2]);
    }
}
