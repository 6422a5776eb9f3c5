use std::future::Future;
use std::pin::Pin;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

/// A unit of work to run on the UI-affinity context.
pub type UiWork = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Marshals work onto the single UI-affinity execution context.
///
/// The dispatcher is the serialization primitive for the whole popup service:
/// implementations must run enqueued units strictly one at a time, each
/// awaited to completion, in dispatch order. Push uses the fire-and-forget
/// form; pop uses the awaitable form so its caller cannot resume before
/// teardown is visually complete.
pub trait UiDispatcher: Send + Sync {
    /// Enqueue work without waiting for it.
    fn dispatch(&self, work: UiWork);

    /// Enqueue work and return a future that resolves once it has run to
    /// completion. The default adapts `dispatch` with a completion channel.
    fn dispatch_async(&self, work: UiWork) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(Box::pin(async move {
            work.await;
            let _ = tx.send(());
        }));
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

/// [`UiDispatcher`] backed by a tokio task draining an unbounded queue.
///
/// Each unit is awaited to completion before the next is picked up, which
/// gives the no-interleaving guarantee the service relies on. Embedders with
/// a real UI thread (or event loop) supply their own `UiDispatcher` instead.
pub struct SerialDispatcher {
    queue: mpsc::UnboundedSender<UiWork>,
}

impl SerialDispatcher {
    /// Spawn the consumer loop on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiWork>();
        tokio::spawn(async move {
            while let Some(work) = rx.recv().await {
                work.await;
            }
        });
        Self { queue: tx }
    }
}

impl UiDispatcher for SerialDispatcher {
    fn dispatch(&self, work: UiWork) {
        if self.queue.send(work).is_err() {
            log::warn!("ui dispatch loop is gone, dropping dispatched work");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    #[tokio::test]
    async fn units_run_one_at_a_time_in_dispatch_order() {
        let dispatcher = SerialDispatcher::spawn();
        let log = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Notify::new());

        let (log1, gate1) = (log.clone(), gate.clone());
        dispatcher.dispatch(Box::pin(async move {
            log1.lock().unwrap().push("first:start");
            gate1.notified().await;
            log1.lock().unwrap().push("first:end");
        }));

        let log2 = log.clone();
        dispatcher.dispatch(Box::pin(async move {
            log2.lock().unwrap().push("second");
        }));

        gate.notify_one();
        // Barrier: everything enqueued before this has finished.
        dispatcher.dispatch_async(Box::pin(async {})).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:start", "first:end", "second"]
        );
    }

    #[tokio::test]
    async fn dispatch_async_resolves_after_the_work_ran() {
        let dispatcher = SerialDispatcher::spawn();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner = log.clone();
        dispatcher
            .dispatch_async(Box::pin(async move {
                inner.lock().unwrap().push("ran");
            }))
            .await;

        assert_eq!(*log.lock().unwrap(), vec!["ran"]);
    }
}
