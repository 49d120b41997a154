use crate::domain::handles::{ButtonHandle, ControllerHandle, TokenRequestId};
use crate::domain::intent::PurchaseIntent;
use crate::domain::ports::{ButtonOptions, ClickBinding, Navigator, TransferGateway, WidgetProvider};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-process stand-in for the vendor widget SDK.
///
/// Enforces the invariants the real SDK enforces on the page: a DOM anchor
/// holds at most one live button, handles must exist to be bound, enabled or
/// destroyed. Records bindings and the high-water mark of simultaneously
/// live buttons so callers can assert lifecycle discipline.
#[derive(Default, Clone)]
pub struct InMemoryWidgetProvider {
    state: Arc<RwLock<WidgetState>>,
}

#[derive(Default)]
struct WidgetState {
    next_id: u64,
    buttons: HashMap<u64, ButtonRecord>,
    controllers: HashSet<u64>,
    bindings: Vec<BindingRecord>,
    fail_next_bind: Option<String>,
    fail_next_destroy_button: Option<String>,
    max_live_buttons: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRecord {
    pub anchor: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRecord {
    pub controller: ControllerHandle,
    pub button: ButtonHandle,
    pub binding: ClickBinding,
}

impl InMemoryWidgetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `bind_button_click` fail with a widget error.
    pub async fn fail_next_bind(&self, message: impl Into<String>) {
        self.state.write().await.fail_next_bind = Some(message.into());
    }

    /// Makes the next `destroy_button` fail with a widget error; the button
    /// is left live, as a real SDK would after a failed destroy.
    pub async fn fail_next_destroy_button(&self, message: impl Into<String>) {
        self.state.write().await.fail_next_destroy_button = Some(message.into());
    }

    pub async fn live_buttons(&self) -> usize {
        self.state.read().await.buttons.len()
    }

    pub async fn live_controllers(&self) -> usize {
        self.state.read().await.controllers.len()
    }

    /// Highest number of buttons that were ever live at the same time.
    pub async fn max_live_buttons(&self) -> usize {
        self.state.read().await.max_live_buttons
    }

    pub async fn last_binding(&self) -> Option<BindingRecord> {
        self.state.read().await.bindings.last().cloned()
    }

    pub async fn bindings(&self) -> Vec<BindingRecord> {
        self.state.read().await.bindings.clone()
    }

    pub async fn button_enabled(&self, button: &ButtonHandle) -> Option<bool> {
        self.state
            .read()
            .await
            .buttons
            .get(&button.0)
            .map(|record| record.enabled)
    }
}

#[async_trait]
impl WidgetProvider for InMemoryWidgetProvider {
    async fn create_button(&self, anchor: &str, options: ButtonOptions) -> Result<ButtonHandle> {
        let mut state = self.state.write().await;
        if state.buttons.values().any(|record| record.anchor == anchor) {
            return Err(CheckoutError::Widget(format!(
                "anchor {anchor:?} already holds a live button"
            )));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.buttons.insert(
            id,
            ButtonRecord {
                anchor: anchor.to_string(),
                label: options.label,
                enabled: false,
            },
        );
        state.max_live_buttons = state.max_live_buttons.max(state.buttons.len());
        Ok(ButtonHandle(id))
    }

    async fn create_controller(&self) -> Result<ControllerHandle> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;
        state.controllers.insert(id);
        Ok(ControllerHandle(id))
    }

    async fn bind_button_click(
        &self,
        controller: &ControllerHandle,
        button: &ButtonHandle,
        binding: ClickBinding,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(message) = state.fail_next_bind.take() {
            return Err(CheckoutError::Widget(message));
        }
        if !state.buttons.contains_key(&button.0) {
            return Err(CheckoutError::Widget("bind on destroyed button".to_string()));
        }
        if !state.controllers.contains(&controller.0) {
            return Err(CheckoutError::Widget(
                "bind on destroyed controller".to_string(),
            ));
        }
        state.bindings.push(BindingRecord {
            controller: *controller,
            button: *button,
            binding,
        });
        Ok(())
    }

    async fn enable_button(&self, button: &ButtonHandle) -> Result<()> {
        let mut state = self.state.write().await;
        match state.buttons.get_mut(&button.0) {
            Some(record) => {
                record.enabled = true;
                Ok(())
            }
            None => Err(CheckoutError::Widget(
                "enable on destroyed button".to_string(),
            )),
        }
    }

    async fn destroy_button(&self, button: ButtonHandle) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(message) = state.fail_next_destroy_button.take() {
            return Err(CheckoutError::Widget(message));
        }
        match state.buttons.remove(&button.0) {
            Some(_) => Ok(()),
            None => Err(CheckoutError::Widget("double destroy of button".to_string())),
        }
    }

    async fn destroy_controller(&self, controller: ControllerHandle) -> Result<()> {
        let mut state = self.state.write().await;
        if state.controllers.remove(&controller.0) {
            Ok(())
        } else {
            Err(CheckoutError::Widget(
                "double destroy of controller".to_string(),
            ))
        }
    }
}

/// A transfer gateway returning a canned token request id, or a canned
/// failure. Records the paths it was called with.
#[derive(Clone)]
pub struct StaticTransferGateway {
    token: String,
    failure: Option<String>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl StaticTransferGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            failure: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            token: String::new(),
            failure: Some(message.into()),
            calls: Arc::default(),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl TransferGateway for StaticTransferGateway {
    async fn initiate(&self, path: &str, _intent: &PurchaseIntent) -> Result<TokenRequestId> {
        self.calls.write().await.push(path.to_string());
        match &self.failure {
            Some(message) => Err(CheckoutError::TransferInitiation(message.clone())),
            None => Ok(TokenRequestId::new(self.token.clone())),
        }
    }
}

/// Records every URL the browser would have been navigated to.
#[derive(Default, Clone)]
pub struct RecordingNavigator {
    visited: Arc<RwLock<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn visited(&self) -> Vec<String> {
        self.visited.read().await.clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn assign(&self, url: &str) -> Result<()> {
        self.visited.write().await.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anchor_exclusivity() {
        let provider = InMemoryWidgetProvider::new();
        let first = provider
            .create_button("tokenPayBtn", ButtonOptions::default())
            .await
            .unwrap();

        let second = provider
            .create_button("tokenPayBtn", ButtonOptions::default())
            .await;
        assert!(matches!(second, Err(CheckoutError::Widget(_))));

        provider.destroy_button(first).await.unwrap();
        assert!(
            provider
                .create_button("tokenPayBtn", ButtonOptions::default())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_double_destroy_is_an_error() {
        let provider = InMemoryWidgetProvider::new();
        let button = provider
            .create_button("tokenPayBtn", ButtonOptions::default())
            .await
            .unwrap();
        provider.destroy_button(button).await.unwrap();
        assert!(matches!(
            provider.destroy_button(button).await,
            Err(CheckoutError::Widget(_))
        ));
    }

    #[tokio::test]
    async fn test_bind_requires_live_handles() {
        let provider = InMemoryWidgetProvider::new();
        let button = provider
            .create_button("tokenPayBtn", ButtonOptions::default())
            .await
            .unwrap();
        let controller = provider.create_controller().await.unwrap();
        provider.destroy_controller(controller).await.unwrap();

        let result = provider
            .bind_button_click(&controller, &button, ClickBinding::Redirect)
            .await;
        assert!(matches!(result, Err(CheckoutError::Widget(_))));
    }

    #[tokio::test]
    async fn test_recording_navigator_keeps_order() {
        let navigator = RecordingNavigator::new();
        navigator.assign("/a").await.unwrap();
        navigator.assign("/b").await.unwrap();
        assert_eq!(navigator.visited().await, vec!["/a", "/b"]);
    }
}
