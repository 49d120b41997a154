use super::handles::{ButtonHandle, ControllerHandle, TokenRequestId};
use super::intent::PurchaseIntent;
use crate::error::Result;
use async_trait::async_trait;

/// Options passed to the widget provider when creating a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonOptions {
    pub label: String,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            label: "Token Quick Checkout".to_string(),
        }
    }
}

/// Interaction protocol handed to the provider at bind time. Mirrors the
/// vendor SDK's popup/redirect options flag; in popup mode the provider also
/// receives the token request it will open in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickBinding {
    Redirect,
    Popup { token_request_id: TokenRequestId },
}

/// Capability interface over the external, opaque payment-widget SDK.
#[async_trait]
pub trait WidgetProvider: Send + Sync {
    async fn create_button(&self, anchor: &str, options: ButtonOptions) -> Result<ButtonHandle>;
    async fn create_controller(&self) -> Result<ControllerHandle>;
    async fn bind_button_click(
        &self,
        controller: &ControllerHandle,
        button: &ButtonHandle,
        binding: ClickBinding,
    ) -> Result<()>;
    async fn enable_button(&self, button: &ButtonHandle) -> Result<()>;
    async fn destroy_button(&self, button: ButtonHandle) -> Result<()>;
    async fn destroy_controller(&self, controller: ControllerHandle) -> Result<()>;
}

/// The external transfer-initiation endpoint.
#[async_trait]
pub trait TransferGateway: Send + Sync {
    async fn initiate(&self, path: &str, intent: &PurchaseIntent) -> Result<TokenRequestId>;
}

/// Browser navigation side effect.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn assign(&self, url: &str) -> Result<()>;
}

pub type WidgetProviderBox = Box<dyn WidgetProvider>;
pub type TransferGatewayBox = Box<dyn TransferGateway>;
pub type NavigatorBox = Box<dyn Navigator>;
