use anyhow::Result;
use async_trait::async_trait;

use crate::params::NavigationParams;
use crate::popup::Popup;

/// Optional collaborator that resolves a presentation-logic object for a
/// popup and forwards navigation parameters to it.
///
/// Both operations are best-effort from the service's point of view: a
/// failure is logged and the popup is presented anyway.
#[async_trait]
pub trait ViewModelBinder: Send + Sync {
    /// Whether this strategy assigns view-models at all. When false the
    /// service skips the binder entirely.
    fn supports_binding(&self) -> bool {
        true
    }

    /// True if the popup already carries a view-model; assignment is skipped
    /// for those.
    fn has_view_model(&self, popup: &dyn Popup) -> bool;

    /// Resolve and attach a view-model to the popup.
    fn assign_view_model(&self, popup: &dyn Popup) -> Result<()>;

    /// Forward navigation parameters to the bound view-model.
    async fn set_parameters(&self, popup: &dyn Popup, parameters: &NavigationParams)
        -> Result<()>;
}

/// Binder used when none is registered; binds nothing.
pub struct NoBinder;

#[async_trait]
impl ViewModelBinder for NoBinder {
    fn supports_binding(&self) -> bool {
        false
    }

    fn has_view_model(&self, _popup: &dyn Popup) -> bool {
        false
    }

    fn assign_view_model(&self, _popup: &dyn Popup) -> Result<()> {
        Ok(())
    }

    async fn set_parameters(
        &self,
        _popup: &dyn Popup,
        _parameters: &NavigationParams,
    ) -> Result<()> {
        Ok(())
    }
}
