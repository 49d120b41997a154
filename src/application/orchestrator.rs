use crate::domain::handles::{ButtonHandle, ControllerHandle, Generation};
use crate::domain::intent::{PurchaseIntent, encode_component};
use crate::domain::ports::{
    ButtonOptions, ClickBinding, NavigatorBox, TransferGatewayBox, WidgetProviderBox,
};
use crate::domain::routes::{ButtonMode, TransferType};
use crate::error::{CheckoutError, Result};
use tokio::sync::RwLock;

/// Anchor element id the payment button is rendered into.
pub const DEFAULT_ANCHOR: &str = "tokenPayBtn";

/// Coordinates the lifecycle of a payment button against an external widget
/// provider and an external transfer-initiation endpoint.
///
/// `CheckoutOrchestrator` owns the current (button, controller) pair and
/// guarantees at most one pair is live at a time: any re-configuration tears
/// the previous pair down before mounting the next one. Every asynchronous
/// completion is stamped with the [`Generation`] of the pair it belongs to,
/// so responses that outlive their pair are dropped instead of acting on
/// state they no longer own.
pub struct CheckoutOrchestrator {
    provider: WidgetProviderBox,
    gateway: TransferGatewayBox,
    navigator: NavigatorBox,
    anchor: String,
    options: ButtonOptions,
    intent: PurchaseIntent,
    state: RwLock<FlowState>,
}

#[derive(Default)]
struct FlowState {
    generation: u64,
    mounted: Option<Mounted>,
}

struct Mounted {
    mode: ButtonMode,
    transfer_type: TransferType,
    button: ButtonHandle,
    controller: ControllerHandle,
    generation: u64,
    enabled: bool,
}

/// Observable snapshot of the currently mounted pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowStatus {
    pub mode: ButtonMode,
    pub transfer_type: TransferType,
    pub enabled: bool,
    pub generation: Generation,
}

impl CheckoutOrchestrator {
    /// Creates a new orchestrator for one purchase intent.
    ///
    /// # Arguments
    ///
    /// * `provider` - The external payment-widget SDK.
    /// * `gateway` - The transfer-initiation endpoint.
    /// * `navigator` - The browser-navigation side effect.
    /// * `anchor` - DOM anchor id the button is rendered into.
    /// * `intent` - The purchase parameters, immutable for this attempt.
    pub fn new(
        provider: WidgetProviderBox,
        gateway: TransferGatewayBox,
        navigator: NavigatorBox,
        anchor: impl Into<String>,
        intent: PurchaseIntent,
    ) -> Self {
        Self {
            provider,
            gateway,
            navigator,
            anchor: anchor.into(),
            options: ButtonOptions::default(),
            intent,
            state: RwLock::new(FlowState::default()),
        }
    }

    pub fn with_button_options(mut self, options: ButtonOptions) -> Self {
        self.options = options;
        self
    }

    pub fn intent(&self) -> &PurchaseIntent {
        &self.intent
    }

    /// Mounts a button for the requested mode and transfer type.
    ///
    /// No-op returning the live generation when the requested pair is already
    /// mounted and enabled. Otherwise the previous pair is released first,
    /// then a fresh pair is created, bound, and enabled. In popup mode the
    /// intent is POSTed to the transfer-initiation endpoint before binding;
    /// the button stays disabled until that round-trip and the bind both
    /// succeed.
    ///
    /// A popup mount overtaken by a concurrent re-configuration still returns
    /// `Ok` with the generation it was issued; that generation is dead on
    /// arrival and every event entry point ignores it.
    pub async fn configure(
        &self,
        mode: ButtonMode,
        transfer_type: TransferType,
    ) -> Result<Generation> {
        let generation = {
            let mut state = self.state.write().await;
            if let Some(mounted) = &state.mounted
                && mounted.mode == mode
                && mounted.transfer_type == transfer_type
                && mounted.enabled
            {
                return Ok(Generation(mounted.generation));
            }
            self.release(&mut state).await?;
            state.generation += 1;
            let generation = state.generation;
            let button = self
                .provider
                .create_button(&self.anchor, self.options.clone())
                .await?;
            let controller = self.provider.create_controller().await?;
            state.mounted = Some(Mounted {
                mode,
                transfer_type,
                button,
                controller,
                generation,
                enabled: false,
            });
            tracing::debug!(%mode, %transfer_type, generation, "mounted checkout pair");
            generation
        };

        match mode {
            ButtonMode::Redirect => {
                self.bind(generation, ClickBinding::Redirect).await?;
            }
            ButtonMode::Popup => {
                // The state lock is not held across this call: a
                // re-configuration that lands while the request is in flight
                // wins, and the generation check in `bind` drops the response.
                let token_request_id = self
                    .gateway
                    .initiate(transfer_type.popup_path(), &self.intent)
                    .await?;
                self.bind(generation, ClickBinding::Popup { token_request_id })
                    .await?;
            }
        }
        Ok(Generation(generation))
    }

    /// Releases the live pair. No-op when nothing is mounted.
    pub async fn teardown(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.release(&mut state).await
    }

    /// Click event from the widget.
    ///
    /// In redirect mode this navigates to the transfer path with the intent
    /// in the query string, derived synchronously. In popup mode the widget
    /// itself opens the overlay from the token request it was bound with, so
    /// there is nothing to do here. Stale generations and disabled buttons
    /// are ignored.
    pub async fn handle_click(&self, generation: Generation) -> Result<()> {
        let url = {
            let state = self.state.read().await;
            match &state.mounted {
                Some(mounted) if mounted.generation == generation.0 && mounted.enabled => {
                    match mounted.mode {
                        ButtonMode::Redirect => Some(format!(
                            "{}?{}",
                            mounted.transfer_type.redirect_path(),
                            self.intent.to_query()
                        )),
                        ButtonMode::Popup => None,
                    }
                }
                _ => None,
            }
        };
        if let Some(url) = url {
            self.navigator.assign(&url).await?;
        }
        Ok(())
    }

    /// Success event from the controller: navigates to the redeem path with
    /// the payload JSON under the `data` query key. Stale generations and
    /// pairs that never finished binding are dropped without navigating.
    pub async fn handle_success(
        &self,
        generation: Generation,
        payload: serde_json::Value,
    ) -> Result<()> {
        let redeem_path = {
            let state = self.state.read().await;
            match &state.mounted {
                Some(mounted) if mounted.generation == generation.0 && mounted.enabled => {
                    mounted.transfer_type.redeem_path()
                }
                _ => {
                    tracing::warn!(generation = generation.0, "dropping stale success event");
                    return Ok(());
                }
            }
        };
        let data = serde_json::to_string(&payload)?;
        let url = format!("{redeem_path}?data={}", encode_component(&data));
        self.navigator.assign(&url).await
    }

    /// Error event from the controller. Fatal for the current attempt: the
    /// error is surfaced to the caller, nothing is retried and no navigation
    /// occurs. The host re-configures to retry. Stale generations are dropped.
    pub async fn handle_error(
        &self,
        generation: Generation,
        message: impl Into<String>,
    ) -> Result<()> {
        let state = self.state.read().await;
        match &state.mounted {
            Some(mounted) if mounted.generation == generation.0 => {
                Err(CheckoutError::Widget(message.into()))
            }
            _ => {
                tracing::warn!(generation = generation.0, "dropping stale error event");
                Ok(())
            }
        }
    }

    /// Snapshot of the mounted pair, if any.
    pub async fn status(&self) -> Option<FlowStatus> {
        let state = self.state.read().await;
        state.mounted.as_ref().map(|mounted| FlowStatus {
            mode: mounted.mode,
            transfer_type: mounted.transfer_type,
            enabled: mounted.enabled,
            generation: Generation(mounted.generation),
        })
    }

    async fn bind(&self, generation: u64, binding: ClickBinding) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(mounted) = state
            .mounted
            .as_mut()
            .filter(|mounted| mounted.generation == generation)
        else {
            tracing::warn!(generation, "dropping bind for torn-down pair");
            return Ok(());
        };
        self.provider
            .bind_button_click(&mounted.controller, &mounted.button, binding)
            .await?;
        self.provider.enable_button(&mounted.button).await?;
        mounted.enabled = true;
        Ok(())
    }

    async fn release(&self, state: &mut FlowState) -> Result<()> {
        if let Some(mounted) = state.mounted.take() {
            // Both handles are always released, even when the first destroy
            // fails; the first error is reported after both attempts.
            let button = self.provider.destroy_button(mounted.button).await;
            let controller = self.provider.destroy_controller(mounted.controller).await;
            tracing::debug!(generation = mounted.generation, "released checkout pair");
            return button.and(controller);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::{Amount, CurrencyCode};
    use crate::infrastructure::in_memory::{
        InMemoryWidgetProvider, RecordingNavigator, StaticTransferGateway,
    };
    use rust_decimal_macros::dec;

    fn intent() -> PurchaseIntent {
        PurchaseIntent::new(
            Amount::new(dec!(4.99)).unwrap(),
            CurrencyCode::new("EUR").unwrap(),
            "Book Purchase",
            None,
        )
    }

    fn orchestrator(
        provider: &InMemoryWidgetProvider,
        navigator: &RecordingNavigator,
        gateway: TransferGatewayBox,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            Box::new(provider.clone()),
            gateway,
            Box::new(navigator.clone()),
            DEFAULT_ANCHOR,
            intent(),
        )
    }

    #[tokio::test]
    async fn test_redirect_mount_enables_button() {
        let provider = InMemoryWidgetProvider::new();
        let navigator = RecordingNavigator::new();
        let flow = orchestrator(
            &provider,
            &navigator,
            Box::new(StaticTransferGateway::new("tok")),
        );

        flow.configure(ButtonMode::Redirect, TransferType::OneStep)
            .await
            .unwrap();

        let status = flow.status().await.unwrap();
        assert_eq!(status.mode, ButtonMode::Redirect);
        assert_eq!(status.transfer_type, TransferType::OneStep);
        assert!(status.enabled);
    }

    #[tokio::test]
    async fn test_popup_bind_carries_token_request() {
        let provider = InMemoryWidgetProvider::new();
        let navigator = RecordingNavigator::new();
        let gateway = StaticTransferGateway::new("abc123");
        let flow = orchestrator(&provider, &navigator, Box::new(gateway.clone()));

        flow.configure(ButtonMode::Popup, TransferType::SingleImmediate)
            .await
            .unwrap();

        assert_eq!(gateway.calls().await, vec!["/transfer-popup".to_string()]);
        let binding = provider.last_binding().await.unwrap();
        match binding.binding {
            ClickBinding::Popup { token_request_id } => {
                assert_eq!(token_request_id.as_str(), "abc123");
            }
            other => panic!("expected popup binding, got {other:?}"),
        }
        assert!(flow.status().await.unwrap().enabled);
    }

    #[tokio::test]
    async fn test_failed_initiation_leaves_button_disabled() {
        let provider = InMemoryWidgetProvider::new();
        let navigator = RecordingNavigator::new();
        let flow = orchestrator(
            &provider,
            &navigator,
            Box::new(StaticTransferGateway::failing("server returned 500")),
        );

        let result = flow
            .configure(ButtonMode::Popup, TransferType::SingleImmediate)
            .await;

        assert!(matches!(result, Err(CheckoutError::TransferInitiation(_))));
        assert!(!flow.status().await.unwrap().enabled);
        assert!(navigator.visited().await.is_empty());
    }

    #[tokio::test]
    async fn test_teardown_is_noop_when_unmounted() {
        let provider = InMemoryWidgetProvider::new();
        let navigator = RecordingNavigator::new();
        let flow = orchestrator(
            &provider,
            &navigator,
            Box::new(StaticTransferGateway::new("tok")),
        );

        flow.teardown().await.unwrap();
        flow.teardown().await.unwrap();
        assert!(flow.status().await.is_none());
    }

    #[tokio::test]
    async fn test_click_on_disabled_button_is_ignored() {
        let provider = InMemoryWidgetProvider::new();
        let navigator = RecordingNavigator::new();
        let flow = orchestrator(
            &provider,
            &navigator,
            Box::new(StaticTransferGateway::failing("boom")),
        );

        let err = flow
            .configure(ButtonMode::Popup, TransferType::OneStep)
            .await
            .unwrap_err();
        // mount happened, bind did not; a click must not navigate
        assert!(matches!(err, CheckoutError::TransferInitiation(_)));
        let status = flow.status().await.unwrap();
        flow.handle_click(status.generation).await.unwrap();
        assert!(navigator.visited().await.is_empty());
    }
}
