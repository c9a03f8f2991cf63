//! Payment records
//!
//! A payment is immutable once created: no edit or delete operation
//! exists anywhere in the engine. Corrections happen by issuing further
//! invoices, never by rewriting payment history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use core_kernel::{FacilityId, InvoiceId, Money, PaymentId, UserId};

/// How a payment was made
///
/// Parsed from the caller's tag; `Wallet` is the only method that touches
/// the patient's prepaid balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Wallet,
}

/// Error parsing a payment method tag
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

impl PaymentMethod {
    /// Returns true if this method draws on the patient's wallet
    pub fn is_wallet(&self) -> bool {
        matches!(self, PaymentMethod::Wallet)
    }

    /// The tag used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "BankTransfer",
            PaymentMethod::Wallet => "Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "banktransfer" | "bank_transfer" | "transfer" => Ok(PaymentMethod::BankTransfer),
            "wallet" => Ok(PaymentMethod::Wallet),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// An applied payment against one invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Facility scope
    pub facility_id: FacilityId,
    /// Invoice being paid
    pub invoice_id: InvoiceId,
    /// Amount, strictly positive, two-decimal
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// Caller-supplied idempotency token, if any
    pub idempotency_key: Option<String>,
    /// User who submitted the payment
    pub created_by: UserId,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment record
    pub fn new(
        facility_id: FacilityId,
        invoice_id: InvoiceId,
        amount: Money,
        method: PaymentMethod,
        idempotency_key: Option<String>,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            facility_id,
            invoice_id,
            amount,
            method,
            idempotency_key,
            created_by,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "wallet".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Wallet
        );
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_only_wallet_is_wallet() {
        assert!(PaymentMethod::Wallet.is_wallet());
        assert!(!PaymentMethod::Cash.is_wallet());
        assert!(!PaymentMethod::Card.is_wallet());
        assert!(!PaymentMethod::BankTransfer.is_wallet());
    }
}
