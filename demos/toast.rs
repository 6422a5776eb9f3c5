//! Minimal headless walkthrough: a console "presenter" renders toast popups
//! as log lines while the service drives the full lifecycle.
//!
//! Run with `cargo run --example toast`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use popstack::{
    BasicPopup, NativeHandle, NativePresenter, NavigationParams, Popup, PopupService,
    SerialDispatcher,
};

/// Renders popups to stdout instead of a real windowing layer.
struct ConsolePresenter;

#[async_trait]
impl NativePresenter for ConsolePresenter {
    async fn show(&self, popup: &Arc<dyn Popup>) -> anyhow::Result<NativeHandle> {
        let text = popup
            .as_any()
            .downcast_ref::<BasicPopup>()
            .and_then(|p| p.content_as::<String>())
            .cloned()
            .unwrap_or_else(|| "(empty)".to_string());
        println!("┌─ {text}");
        Ok(Arc::new(text))
    }

    async fn close(&self, handle: &NativeHandle) -> anyhow::Result<()> {
        let text = handle.downcast_ref::<String>().cloned().unwrap_or_default();
        println!("└─ {text}");
        Ok(())
    }
}

fn toast(message: &str) -> Arc<dyn Popup> {
    Arc::new(
        BasicPopup::new()
            .with_content(message.to_string())
            .with_close_on_background_click(true),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let service = PopupService::new();
    service.initialize(
        Arc::new(ConsolePresenter),
        Arc::new(SerialDispatcher::spawn()),
        None,
    );

    service.on_stack_changed(|args| println!("   stack depth: {}", args.stack.len()));

    let first = toast("Saved!");
    let second = toast("Sync complete");

    let first_handle = service.push(first.clone(), NavigationParams::new())?;
    first_handle.shown.await?;

    let second_handle = service.push(second, NavigationParams::new().with("msg", "done"))?;
    second_handle.shown.await?;

    tokio::time::sleep(Duration::from_millis(300)).await;

    // A background tap on the first toast dismisses it even though it is not
    // on top; the second stays put.
    service.handle_background_click(&first).await?;

    service.pop_all().await?;
    second_handle.closed.await?;
    Ok(())
}
