use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic nature of a wallet revision.
///
/// Persisted as its decimal code in string form. Paired variants always sit on
/// adjacent codes, the receiving side one above the sending side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TxType {
    Publish,
    PaymentSent,
    PaymentReceived,
    PaymentCancelSent,
    PaymentCancelReceived,
    RemittanceSent,
    RemittanceReceived,
    RemittanceCancelSent,
    RemittanceCancelReceived,
    /// Wallet created, no transaction applied yet.
    #[default]
    Init,
}

impl TxType {
    pub fn code(self) -> u8 {
        match self {
            TxType::Publish => 0,
            TxType::PaymentSent => 1,
            TxType::PaymentReceived => 2,
            TxType::PaymentCancelSent => 3,
            TxType::PaymentCancelReceived => 4,
            TxType::RemittanceSent => 5,
            TxType::RemittanceReceived => 6,
            TxType::RemittanceCancelSent => 7,
            TxType::RemittanceCancelReceived => 8,
            TxType::Init => 10,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let tx_type = match code {
            0 => TxType::Publish,
            1 => TxType::PaymentSent,
            2 => TxType::PaymentReceived,
            3 => TxType::PaymentCancelSent,
            4 => TxType::PaymentCancelReceived,
            5 => TxType::RemittanceSent,
            6 => TxType::RemittanceReceived,
            7 => TxType::RemittanceCancelSent,
            8 => TxType::RemittanceCancelReceived,
            10 => TxType::Init,
            _ => return None,
        };
        Some(tx_type)
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<TxType> for String {
    fn from(tx_type: TxType) -> Self {
        tx_type.to_string()
    }
}

impl TryFrom<String> for TxType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_decimal("transaction type", &value)
            .ok()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(TxType::from_code)
            .ok_or_else(|| format!("unknown transaction type code '{value}'"))
    }
}

/// The kinds of transfer a caller may request, named by the sending side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Payment,
    PaymentCancel,
    Remittance,
    RemittanceCancel,
}

impl TransferKind {
    pub const ALL: [TransferKind; 4] = [
        TransferKind::Payment,
        TransferKind::PaymentCancel,
        TransferKind::Remittance,
        TransferKind::RemittanceCancel,
    ];

    /// Type recorded on the sender's wallet.
    pub fn sent(self) -> TxType {
        match self {
            TransferKind::Payment => TxType::PaymentSent,
            TransferKind::PaymentCancel => TxType::PaymentCancelSent,
            TransferKind::Remittance => TxType::RemittanceSent,
            TransferKind::RemittanceCancel => TxType::RemittanceCancelSent,
        }
    }

    /// Type recorded on the receiver's wallet.
    pub fn received(self) -> TxType {
        match self {
            TransferKind::Payment => TxType::PaymentReceived,
            TransferKind::PaymentCancel => TxType::PaymentCancelReceived,
            TransferKind::Remittance => TxType::RemittanceReceived,
            TransferKind::RemittanceCancel => TxType::RemittanceCancelReceived,
        }
    }
}

impl TryFrom<TxType> for TransferKind {
    type Error = TxType;

    fn try_from(tx_type: TxType) -> Result<Self, Self::Error> {
        match tx_type {
            TxType::PaymentSent => Ok(TransferKind::Payment),
            TxType::PaymentCancelSent => Ok(TransferKind::PaymentCancel),
            TxType::RemittanceSent => Ok(TransferKind::Remittance),
            TxType::RemittanceCancelSent => Ok(TransferKind::RemittanceCancel),
            other => Err(other),
        }
    }
}

impl FromStr for TransferKind {
    type Err = LedgerError;

    /// Parses a caller-supplied sender-side type code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| LedgerError::InvalidArgument {
            name: "transaction type",
            value: s.to_string(),
            reason,
        };

        let code = parse_decimal("transaction type", s)?;
        let tx_type = u8::try_from(code)
            .ok()
            .and_then(TxType::from_code)
            .ok_or_else(|| invalid("unknown type code".to_string()))?;

        TransferKind::try_from(tx_type).map_err(|_| {
            invalid("not a sender-side transfer type (expected 1, 3, 5 or 7)".to_string())
        })
    }
}

/// Parses an unsigned decimal argument.
///
/// Only ASCII digits are accepted: a sign or surrounding whitespace is rejected.
pub fn parse_decimal(name: &'static str, value: &str) -> Result<u64, LedgerError> {
    let invalid = |reason: String| LedgerError::InvalidArgument {
        name,
        value: value.to_string(),
        reason,
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected decimal digits only".to_string()));
    }
    value
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))
}

/// The record of the most recent transaction applied to a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxInfo {
    /// The other party of the event.
    pub trader: String,
    pub amount: u64,
    /// Caller-supplied timestamp, stored verbatim.
    pub date: String,
    #[serde(rename = "txType")]
    pub tx_type: TxType,
}
