//! Ledger entries and the document each one came from.

use chrono::NaiveDate;
use loomledger_shared::types::{
    AccountTypeId, BranchId, ExternalChequeId, LedgerEntryId, PaymentId, PersonId,
    PersonalChequeId, RawDebitId, RawTransactionId, TransactionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::Nature;

/// The source document a ledger row was generated from.
///
/// Each posting module creates rows with exactly one origin; rows typed in
/// by hand are [`Origin::Manual`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Finished-goods sale, purchase or return.
    Transaction {
        /// Transaction id.
        id: TransactionId,
        /// Branch serial of the transaction.
        serial: i64,
    },
    /// Cheque received from a person.
    ExternalCheque {
        /// Cheque id.
        id: ExternalChequeId,
        /// Branch serial of the cheque.
        serial: i64,
    },
    /// Cheque we issued.
    PersonalCheque {
        /// Cheque id.
        id: PersonalChequeId,
        /// Branch serial of the cheque.
        serial: i64,
    },
    /// Cash or bank payment.
    Payment {
        /// Payment id.
        id: PaymentId,
        /// Branch serial of the payment.
        serial: i64,
    },
    /// Raw lot purchase.
    RawTransaction {
        /// Raw transaction id.
        id: RawTransactionId,
        /// Lot number of the purchase.
        lot_number: i64,
    },
    /// Raw lot sale or return.
    RawDebit {
        /// Raw debit id.
        id: RawDebitId,
        /// Branch serial of the raw debit.
        serial: i64,
    },
    /// Typed in by hand.
    Manual,
}

/// Flat, persistence-friendly view of an [`Origin`].
///
/// At most one id is set; `source_serial` is set whenever an id is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginLinks {
    /// Finished-goods transaction reference.
    pub transaction_id: Option<Uuid>,
    /// External cheque reference.
    pub external_cheque_id: Option<Uuid>,
    /// Personal cheque reference.
    pub personal_cheque_id: Option<Uuid>,
    /// Payment reference.
    pub payment_id: Option<Uuid>,
    /// Raw lot purchase reference.
    pub raw_transaction_id: Option<Uuid>,
    /// Raw debit reference.
    pub raw_debit_id: Option<Uuid>,
    /// Serial (or lot number) of the referenced document.
    pub source_serial: Option<i64>,
}

impl Origin {
    /// Short kind label, used in logs and error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transaction { .. } => "transaction",
            Self::ExternalCheque { .. } => "external_cheque",
            Self::PersonalCheque { .. } => "personal_cheque",
            Self::Payment { .. } => "payment",
            Self::RawTransaction { .. } => "raw_transaction",
            Self::RawDebit { .. } => "raw_debit",
            Self::Manual => "manual",
        }
    }

    /// Flattens into nullable columns.
    #[must_use]
    pub fn links(&self) -> OriginLinks {
        let mut links = OriginLinks::default();
        match *self {
            Self::Transaction { id, serial } => {
                links.transaction_id = Some(id.into_inner());
                links.source_serial = Some(serial);
            }
            Self::ExternalCheque { id, serial } => {
                links.external_cheque_id = Some(id.into_inner());
                links.source_serial = Some(serial);
            }
            Self::PersonalCheque { id, serial } => {
                links.personal_cheque_id = Some(id.into_inner());
                links.source_serial = Some(serial);
            }
            Self::Payment { id, serial } => {
                links.payment_id = Some(id.into_inner());
                links.source_serial = Some(serial);
            }
            Self::RawTransaction { id, lot_number } => {
                links.raw_transaction_id = Some(id.into_inner());
                links.source_serial = Some(lot_number);
            }
            Self::RawDebit { id, serial } => {
                links.raw_debit_id = Some(id.into_inner());
                links.source_serial = Some(serial);
            }
            Self::Manual => {}
        }
        links
    }

    /// Rebuilds an origin from stored columns.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AmbiguousOrigin`] if more than one reference is set
    /// - [`LedgerError::MissingSerial`] if a reference has no serial
    /// - [`LedgerError::MissingDetail`] if a manual row has no detail
    pub fn from_links(links: &OriginLinks, detail: Option<&str>) -> Result<Self, LedgerError> {
        let candidates = [
            links.transaction_id.map(|id| ("transaction", id)),
            links.external_cheque_id.map(|id| ("external_cheque", id)),
            links.personal_cheque_id.map(|id| ("personal_cheque", id)),
            links.payment_id.map(|id| ("payment", id)),
            links.raw_transaction_id.map(|id| ("raw_transaction", id)),
            links.raw_debit_id.map(|id| ("raw_debit", id)),
        ];
        let mut set = candidates.into_iter().flatten();

        let Some((kind, id)) = set.next() else {
            return match detail {
                Some(d) if !d.trim().is_empty() => Ok(Self::Manual),
                _ => Err(LedgerError::MissingDetail),
            };
        };
        let extra = set.count();
        if extra > 0 {
            return Err(LedgerError::AmbiguousOrigin { count: extra + 1 });
        }

        let serial = links.source_serial.ok_or(LedgerError::MissingSerial(kind))?;
        Ok(match kind {
            "transaction" => Self::Transaction { id: id.into(), serial },
            "external_cheque" => Self::ExternalCheque { id: id.into(), serial },
            "personal_cheque" => Self::PersonalCheque { id: id.into(), serial },
            "payment" => Self::Payment { id: id.into(), serial },
            "raw_transaction" => Self::RawTransaction {
                id: id.into(),
                lot_number: serial,
            },
            _ => Self::RawDebit { id: id.into(), serial },
        })
    }

    /// Human label of the source document, e.g. `Cheque #12`.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Transaction { serial, .. } => Some(format!("Transaction #{serial}")),
            Self::ExternalCheque { serial, .. } => Some(format!("Cheque #{serial}")),
            Self::PersonalCheque { serial, .. } => Some(format!("Personal cheque #{serial}")),
            Self::Payment { serial, .. } => Some(format!("Payment #{serial}")),
            Self::RawTransaction { lot_number, .. } => Some(format!("Lot #{lot_number}")),
            Self::RawDebit { serial, .. } => Some(format!("Raw debit #{serial}")),
            Self::Manual => None,
        }
    }
}

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row id.
    pub id: LedgerEntryId,
    /// Owning branch.
    pub branch_id: BranchId,
    /// Posting date.
    pub date: NaiveDate,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Credit or debit.
    pub nature: Nature,
    /// Party the row is posted against.
    pub person_id: PersonId,
    /// Money account (cash, bank, cheque account), if any.
    pub account_type_id: Option<AccountTypeId>,
    /// Source document.
    pub origin: Origin,
    /// Free text.
    pub detail: Option<String>,
    /// Draft rows are excluded from balances unless asked for.
    pub draft: bool,
}

impl LedgerEntry {
    /// Amount signed by nature: credits positive, debits negative.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.nature.signed(self.amount)
    }

    /// Description shown on statements.
    #[must_use]
    pub fn description(&self) -> String {
        match (self.origin.label(), self.detail.as_deref()) {
            (Some(label), Some(detail)) => format!("{label}: {detail}"),
            (Some(label), None) => label,
            (None, Some(detail)) => detail.to_string(),
            (None, None) => "Manual entry".to_string(),
        }
    }
}

/// Input for a new ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    /// Posting date.
    pub date: NaiveDate,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Credit or debit.
    pub nature: Nature,
    /// Party the row is posted against.
    pub person_id: PersonId,
    /// Money account, if any.
    pub account_type_id: Option<AccountTypeId>,
    /// Source document.
    pub origin: Origin,
    /// Free text.
    pub detail: Option<String>,
    /// Excluded from balances by default.
    pub draft: bool,
}

impl NewLedgerEntry {
    /// Builds a non-draft row with no detail.
    #[must_use]
    pub const fn posted(
        date: NaiveDate,
        amount: Decimal,
        nature: Nature,
        person_id: PersonId,
        account_type_id: Option<AccountTypeId>,
        origin: Origin,
    ) -> Self {
        Self {
            date,
            amount,
            nature,
            person_id,
            account_type_id,
            origin,
            detail: None,
            draft: false,
        }
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
