use crate::model::{Amount, Category};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Whether a transaction brings money in or takes it out. Derived from the sign of the amount.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

impl Kind {
    /// Strictly positive amounts are income; everything else, including zero, is an expense.
    pub fn of(amount: Amount) -> Self {
        if amount.is_positive() {
            Kind::Income
        } else {
            Kind::Expense
        }
    }
}

/// The unique identifier of a transaction. Ids are opaque text because ledgers written by other
/// front ends may use any id scheme.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a fresh random (v4 UUID) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded monetary event. Transactions are immutable once created.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Record", into = "Record")]
pub struct Transaction {
    id: TransactionId,
    description: String,
    amount: Amount,
    category: Category,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        description: impl Into<String>,
        amount: Amount,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount,
            category,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> Kind {
        Kind::of(self.amount)
    }
}

impl Display for Transaction {
    /// Renders a history line, e.g. `Coffee (Food) -$4.50`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) {}",
            self.description,
            self.category,
            self.amount.signed()
        )
    }
}

/// The persisted shape of a transaction:
/// `{"id": "...", "text": "Coffee", "amount": -4.5, "category": "Food", "type": "expense"}`.
///
/// `type` is written for readers of the stored data but is never trusted on read; the kind is
/// always derived from `amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    id: TransactionId,
    text: String,
    amount: Amount,
    #[serde(default)]
    category: Category,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<Kind>,
}

impl From<Record> for Transaction {
    fn from(record: Record) -> Self {
        Transaction::new(record.id, record.text, record.amount, record.category)
    }
}

impl From<Transaction> for Record {
    fn from(transaction: Transaction) -> Self {
        let kind = Some(transaction.kind());
        Record {
            id: transaction.id,
            text: transaction.description,
            amount: transaction.amount,
            category: transaction.category,
            kind,
        }
    }
}
