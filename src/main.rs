use checkout_flow::application::orchestrator::{CheckoutOrchestrator, DEFAULT_ANCHOR};
use checkout_flow::domain::intent::{Amount, CurrencyCode, Destination, PurchaseIntent};
use checkout_flow::domain::ports::{ClickBinding, TransferGatewayBox};
use checkout_flow::domain::routes::{ButtonMode, TransferType};
use checkout_flow::infrastructure::http::HttpTransferGateway;
use checkout_flow::infrastructure::in_memory::{
    InMemoryWidgetProvider, RecordingNavigator, StaticTransferGateway,
};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interaction mode: POPUP or REDIRECT
    #[arg(long, default_value = "REDIRECT")]
    mode: String,

    /// Transfer type: ONE_STEP, STANDING_ORDER, FUTURE_DATED, CROSS_BORDER
    /// or SINGLE_IMMEDIATE
    #[arg(long, default_value = "SINGLE_IMMEDIATE")]
    transfer_type: String,

    #[arg(long, default_value = "4.99")]
    amount: Decimal,

    #[arg(long, default_value = "EUR")]
    currency: String,

    #[arg(long, default_value = "Book Purchase")]
    description: String,

    /// SEPA IBAN to route the transfer to (optional)
    #[arg(long)]
    iban: Option<String>,

    /// BIC for the SEPA destination
    #[arg(long, requires = "iban")]
    bic: Option<String>,

    /// Base URL of a transfer-initiation server (optional). If provided,
    /// popup mode POSTs to it; otherwise a canned in-process gateway is used.
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mode: ButtonMode = cli.mode.parse().into_diagnostic()?;
    let transfer_type: TransferType = cli.transfer_type.parse().into_diagnostic()?;
    let amount = Amount::new(cli.amount).into_diagnostic()?;
    let currency = CurrencyCode::new(cli.currency).into_diagnostic()?;
    let destination = cli.iban.map(|iban| Destination::Sepa { iban, bic: cli.bic });
    let intent = PurchaseIntent::new(amount, currency, cli.description, destination);

    let gateway: TransferGatewayBox = if let Some(endpoint) = cli.endpoint {
        // Use a live transfer-initiation server
        Box::new(HttpTransferGateway::new(endpoint))
    } else {
        // Use a canned in-process gateway
        Box::new(StaticTransferGateway::new("demo-token-request"))
    };

    let provider = InMemoryWidgetProvider::new();
    let navigator = RecordingNavigator::new();
    let orchestrator = CheckoutOrchestrator::new(
        Box::new(provider.clone()),
        gateway,
        Box::new(navigator.clone()),
        DEFAULT_ANCHOR,
        intent,
    );

    // Mount the button, then walk one checkout attempt through the flow.
    let generation = orchestrator
        .configure(mode, transfer_type)
        .await
        .into_diagnostic()?;
    orchestrator
        .handle_click(generation)
        .await
        .into_diagnostic()?;

    if mode == ButtonMode::Popup {
        // The widget would report the redeemed token from the overlay; feed
        // the token request it was bound with back through the success path.
        if let Some(binding) = provider.last_binding().await
            && let ClickBinding::Popup { token_request_id } = binding.binding
        {
            orchestrator
                .handle_success(
                    generation,
                    serde_json::json!({ "tokenId": token_request_id.as_str() }),
                )
                .await
                .into_diagnostic()?;
        }
    }

    for url in navigator.visited().await {
        println!("navigate: {url}");
    }

    Ok(())
}
