use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interaction protocol used by the payment button.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonMode {
    Popup,
    Redirect,
}

impl fmt::Display for ButtonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonMode::Popup => write!(f, "POPUP"),
            ButtonMode::Redirect => write!(f, "REDIRECT"),
        }
    }
}

impl FromStr for ButtonMode {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POPUP" => Ok(ButtonMode::Popup),
            "REDIRECT" => Ok(ButtonMode::Redirect),
            other => Err(CheckoutError::Configuration(format!(
                "unknown button mode: {other:?}"
            ))),
        }
    }
}

/// Transfer flavor; selects the transfer-initiation and redeem routes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferType {
    OneStep,
    StandingOrder,
    FutureDated,
    CrossBorder,
    #[default]
    SingleImmediate,
}

impl TransferType {
    pub const ALL: [TransferType; 5] = [
        TransferType::OneStep,
        TransferType::StandingOrder,
        TransferType::FutureDated,
        TransferType::CrossBorder,
        TransferType::SingleImmediate,
    ];

    /// Path navigated to on click in redirect mode, intent in the query string.
    pub fn redirect_path(&self) -> &'static str {
        match self {
            TransferType::OneStep => "/one-step-payment",
            TransferType::StandingOrder => "/standing-order",
            TransferType::FutureDated => "/future-dated",
            TransferType::CrossBorder => "/cross-border",
            TransferType::SingleImmediate => "/transfer",
        }
    }

    /// Path POSTed to in popup mode, intent in the JSON body.
    pub fn popup_path(&self) -> &'static str {
        match self {
            TransferType::OneStep => "/one-step-payment-popup",
            TransferType::StandingOrder => "/standing-order-popup",
            TransferType::FutureDated => "/future-dated-popup",
            TransferType::CrossBorder => "/cross-border-popup",
            TransferType::SingleImmediate => "/transfer-popup",
        }
    }

    /// Path navigated to after a successful payment, payload in the query string.
    pub fn redeem_path(&self) -> &'static str {
        match self {
            TransferType::OneStep => "/redeem-one-step-payment-popup",
            TransferType::StandingOrder => "/redeem-standing-order-popup",
            TransferType::FutureDated => "/redeem-future-dated-popup",
            TransferType::CrossBorder => "/redeem-cross-border-popup",
            TransferType::SingleImmediate => "/redeem-popup",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferType::OneStep => "ONE_STEP",
            TransferType::StandingOrder => "STANDING_ORDER",
            TransferType::FutureDated => "FUTURE_DATED",
            TransferType::CrossBorder => "CROSS_BORDER",
            TransferType::SingleImmediate => "SINGLE_IMMEDIATE",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TransferType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONE_STEP" => Ok(TransferType::OneStep),
            "STANDING_ORDER" => Ok(TransferType::StandingOrder),
            "FUTURE_DATED" => Ok(TransferType::FutureDated),
            "CROSS_BORDER" => Ok(TransferType::CrossBorder),
            "SINGLE_IMMEDIATE" => Ok(TransferType::SingleImmediate),
            other => Err(CheckoutError::Configuration(format!(
                "unknown transfer type: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_table() {
        let expected = [
            (
                TransferType::OneStep,
                "/one-step-payment",
                "/one-step-payment-popup",
                "/redeem-one-step-payment-popup",
            ),
            (
                TransferType::StandingOrder,
                "/standing-order",
                "/standing-order-popup",
                "/redeem-standing-order-popup",
            ),
            (
                TransferType::FutureDated,
                "/future-dated",
                "/future-dated-popup",
                "/redeem-future-dated-popup",
            ),
            (
                TransferType::CrossBorder,
                "/cross-border",
                "/cross-border-popup",
                "/redeem-cross-border-popup",
            ),
            (
                TransferType::SingleImmediate,
                "/transfer",
                "/transfer-popup",
                "/redeem-popup",
            ),
        ];
        for (tt, redirect, popup, redeem) in expected {
            assert_eq!(tt.redirect_path(), redirect);
            assert_eq!(tt.popup_path(), popup);
            assert_eq!(tt.redeem_path(), redeem);
        }
    }

    #[test]
    fn test_default_transfer_type() {
        assert_eq!(TransferType::default(), TransferType::SingleImmediate);
    }

    #[test]
    fn test_parse_round_trip() {
        for tt in TransferType::ALL {
            assert_eq!(tt.to_string().parse::<TransferType>().unwrap(), tt);
        }
        for mode in [ButtonMode::Popup, ButtonMode::Redirect] {
            assert_eq!(mode.to_string().parse::<ButtonMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(matches!(
            "IFRAME".parse::<ButtonMode>(),
            Err(CheckoutError::Configuration(_))
        ));
        assert!(matches!(
            "BULK".parse::<TransferType>(),
            Err(CheckoutError::Configuration(_))
        ));
    }
}
