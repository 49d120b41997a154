use crate::error::CheckoutError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything except RFC 3986 unreserved characters gets percent-encoded,
/// matching `encodeURIComponent` for the characters that matter here
/// (spaces become `%20`, never `+`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a single query-string component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Represents a positive monetary amount for a checkout attempt.
///
/// Ensures that purchase amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CheckoutError::Configuration(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An ISO-4217 currency code: exactly three ASCII uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Result<Self, CheckoutError> {
        let code = code.into();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(CheckoutError::Configuration(format!(
                "invalid ISO-4217 currency code: {code:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The payment account a transfer is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Destination {
    #[serde(rename_all = "camelCase")]
    Sepa {
        iban: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bic: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    FasterPayments {
        sort_code: String,
        account_number: String,
    },
}

/// The static purchase parameters for one checkout attempt.
///
/// Immutable once constructed. Serialized as a JSON body for the popup
/// transfer-initiation call and as a URL query string for the redirect flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseIntent {
    amount: Amount,
    currency: CurrencyCode,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<Destination>,
}

impl PurchaseIntent {
    pub fn new(
        amount: Amount,
        currency: CurrencyCode,
        description: impl Into<String>,
        destination: Option<Destination>,
    ) -> Self {
        Self {
            amount,
            currency,
            description: description.into(),
            destination,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Serializes the intent as a URL query string, field order fixed.
    pub fn to_query(&self) -> String {
        let mut pairs = vec![
            ("amount", self.amount.value().to_string()),
            ("currency", self.currency.as_str().to_string()),
            ("description", self.description.clone()),
        ];
        match &self.destination {
            Some(Destination::Sepa { iban, bic }) => {
                pairs.push(("iban", iban.clone()));
                if let Some(bic) = bic {
                    pairs.push(("bic", bic.clone()));
                }
            }
            Some(Destination::FasterPayments {
                sort_code,
                account_number,
            }) => {
                pairs.push(("sortCode", sort_code.clone()));
                pairs.push(("accountNumber", account_number.clone()));
            }
            None => {}
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
