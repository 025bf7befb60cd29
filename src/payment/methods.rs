//! Payment submission checks per payment method, and the simulated payment.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validators::{
    card_suffix, is_expiry_format, validate_card_number, validate_cvv, validate_expiry,
    validate_upi_id,
};

/// What the customer submitted on the payment page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    Upi {
        #[serde(default)]
        app: Option<String>,
        #[serde(default)]
        upi_id: String,
    },
    Card {
        #[serde(default)]
        number: String,
        #[serde(default)]
        expiry: String,
        #[serde(default)]
        cvv: String,
        #[serde(default)]
        holder_name: String,
    },
    NetBanking {
        #[serde(default)]
        bank: Option<String>,
    },
    Wallet {
        #[serde(default)]
        wallet: Option<String>,
    },
}

/// Why a payment submission was refused. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentRejection {
    #[error("Please select a UPI app")]
    MissingUpiApp,
    #[error("Please enter your UPI ID")]
    MissingUpiId,
    #[error("Please enter a valid UPI ID")]
    InvalidUpiId,
    #[error("Please enter a valid card number")]
    InvalidCardNumber,
    #[error("Please enter a valid expiry date (MM/YY)")]
    InvalidExpiryFormat,
    #[error("Card has expired")]
    CardExpired,
    #[error("Please enter a valid CVV")]
    InvalidCvv,
    #[error("Please enter cardholder name")]
    MissingCardholderName,
    #[error("Please select your bank")]
    MissingBank,
    #[error("Please select a wallet")]
    MissingWallet,
    #[error("Payment amount must be positive")]
    InvalidAmount,
}

impl PaymentRejection {
    /// Form field the rejection refers to.
    pub fn field(&self) -> &'static str {
        match self {
            PaymentRejection::MissingUpiApp => "app",
            PaymentRejection::MissingUpiId | PaymentRejection::InvalidUpiId => "upi_id",
            PaymentRejection::InvalidCardNumber => "number",
            PaymentRejection::InvalidExpiryFormat | PaymentRejection::CardExpired => "expiry",
            PaymentRejection::InvalidCvv => "cvv",
            PaymentRejection::MissingCardholderName => "holder_name",
            PaymentRejection::MissingBank => "bank",
            PaymentRejection::MissingWallet => "wallet",
            PaymentRejection::InvalidAmount => "amount",
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl PaymentDetails {
    /// Short method name used in receipts and logs.
    pub fn method_name(&self) -> &'static str {
        match self {
            PaymentDetails::Upi { .. } => "upi",
            PaymentDetails::Card { .. } => "card",
            PaymentDetails::NetBanking { .. } => "net_banking",
            PaymentDetails::Wallet { .. } => "wallet",
        }
    }

    /// Check the submission, reporting the first problem in form order.
    pub fn validate(&self, today: NaiveDate) -> Result<(), PaymentRejection> {
        match self {
            PaymentDetails::Upi { app, upi_id } => {
                if is_blank(app) {
                    return Err(PaymentRejection::MissingUpiApp);
                }
                let upi_id = upi_id.trim();
                if upi_id.is_empty() {
                    return Err(PaymentRejection::MissingUpiId);
                }
                if !validate_upi_id(upi_id) {
                    return Err(PaymentRejection::InvalidUpiId);
                }
                Ok(())
            }
            PaymentDetails::Card {
                number,
                expiry,
                cvv,
                holder_name,
            } => {
                if !validate_card_number(number) {
                    return Err(PaymentRejection::InvalidCardNumber);
                }
                if !is_expiry_format(expiry) {
                    return Err(PaymentRejection::InvalidExpiryFormat);
                }
                if !validate_expiry(expiry, today) {
                    return Err(PaymentRejection::CardExpired);
                }
                if !validate_cvv(cvv) {
                    return Err(PaymentRejection::InvalidCvv);
                }
                if holder_name.trim().is_empty() {
                    return Err(PaymentRejection::MissingCardholderName);
                }
                Ok(())
            }
            PaymentDetails::NetBanking { bank } => {
                if is_blank(bank) {
                    return Err(PaymentRejection::MissingBank);
                }
                Ok(())
            }
            PaymentDetails::Wallet { wallet } => {
                if is_blank(wallet) {
                    return Err(PaymentRejection::MissingWallet);
                }
                Ok(())
            }
        }
    }
}

/// Confirmation of a simulated payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub method: &'static str,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Validate and "charge" a payment. No gateway is contacted; every valid
/// submission succeeds.
pub fn process_payment(
    details: &PaymentDetails,
    amount: Decimal,
    currency: &str,
    now: DateTime<Utc>,
) -> Result<PaymentReceipt, PaymentRejection> {
    details.validate(now.date_naive())?;
    if amount <= Decimal::ZERO {
        return Err(PaymentRejection::InvalidAmount);
    }

    let card_last4 = match details {
        PaymentDetails::Card { number, .. } => card_suffix(number),
        _ => None,
    };

    let receipt = PaymentReceipt {
        transaction_id: Uuid::new_v4(),
        method: details.method_name(),
        amount,
        currency: currency.to_string(),
        card_last4,
        paid_at: now,
    };

    tracing::info!(
        transaction_id = %receipt.transaction_id,
        method = receipt.method,
        amount = %receipt.amount,
        "Payment accepted"
    );

    Ok(receipt)
}
