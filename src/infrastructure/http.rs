use crate::domain::handles::TokenRequestId;
use crate::domain::intent::PurchaseIntent;
use crate::domain::ports::TransferGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Transfer-initiation gateway over HTTP.
///
/// POSTs the purchase intent as JSON to `<base_url><path>` and returns the
/// response body as the token request id. Transport errors and non-2xx
/// statuses both surface as [`CheckoutError::TransferInitiation`]; nothing
/// is retried.
pub struct HttpTransferGateway {
    client: Client,
    base_url: String,
}

impl HttpTransferGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl TransferGateway for HttpTransferGateway {
    async fn initiate(&self, path: &str, intent: &PurchaseIntent) -> Result<TokenRequestId> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "initiating transfer");
        let response = self
            .client
            .post(&url)
            .json(intent)
            .send()
            .await
            .map_err(|err| CheckoutError::TransferInitiation(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::TransferInitiation(format!(
                "unexpected status {status} from {url}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| CheckoutError::TransferInitiation(err.to_string()))?;
        Ok(TokenRequestId::new(body))
    }
}
