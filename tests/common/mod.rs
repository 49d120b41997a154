#![allow(dead_code)]

use checkout_flow::application::orchestrator::{CheckoutOrchestrator, DEFAULT_ANCHOR};
use checkout_flow::domain::intent::{Amount, CurrencyCode, PurchaseIntent};
use checkout_flow::domain::ports::TransferGatewayBox;
use checkout_flow::infrastructure::in_memory::{
    InMemoryWidgetProvider, RecordingNavigator, StaticTransferGateway,
};
use rust_decimal_macros::dec;

pub struct Harness {
    pub flow: CheckoutOrchestrator,
    pub provider: InMemoryWidgetProvider,
    pub navigator: RecordingNavigator,
}

pub fn book_intent() -> PurchaseIntent {
    PurchaseIntent::new(
        Amount::new(dec!(4.99)).unwrap(),
        CurrencyCode::new("EUR").unwrap(),
        "Book Purchase",
        None,
    )
}

pub fn harness_with_gateway(gateway: TransferGatewayBox) -> Harness {
    let provider = InMemoryWidgetProvider::new();
    let navigator = RecordingNavigator::new();
    let flow = CheckoutOrchestrator::new(
        Box::new(provider.clone()),
        gateway,
        Box::new(navigator.clone()),
        DEFAULT_ANCHOR,
        book_intent(),
    );
    Harness {
        flow,
        provider,
        navigator,
    }
}

pub fn harness(token: &str) -> Harness {
    harness_with_gateway(Box::new(StaticTransferGateway::new(token)))
}
