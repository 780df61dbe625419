//! The transaction ledger: the ordered list of transactions for a session.
//!
//! The ledger owns its transactions, newest first, and a `Store` to which it writes the full
//! sequence after every add and delete. All figures shown to the user (`Aggregates`, `Breakdown`,
//! `CategoryBreakdown`) are computed from the sequence on request and never held.

use crate::model::{Amount, Category, Transaction, TransactionId};
use crate::store::Store;
use crate::summary::{Aggregates, Breakdown, CategoryBreakdown};
use crate::Result;
use anyhow::{bail, ensure, Context};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// The ordered collection of transactions and the store they are mirrored to.
pub struct Ledger {
    transactions: Vec<Transaction>,
    store: Box<dyn Store + Send>,
}

impl Ledger {
    /// Loads the ledger from `store`.
    ///
    /// Nothing persisted yet means an empty ledger. A store that cannot be read, or that holds
    /// data that does not parse, also yields an empty ledger; the problem is logged, not returned.
    /// If the persisted data repeats an id, only the first (newest) occurrence is kept.
    pub async fn load(mut store: Box<dyn Store + Send>) -> Self {
        let transactions = match store.read().await {
            Ok(Some(transactions)) => dedup(transactions),
            Ok(None) => {
                debug!("No persisted transactions, starting with an empty ledger");
                Vec::new()
            }
            Err(e) => {
                warn!("Unable to load persisted transactions, starting with an empty ledger: {e:#}");
                Vec::new()
            }
        };
        debug!("Loaded {} transactions", transactions.len());
        Self {
            transactions,
            store,
        }
    }

    /// Records a new transaction at the head of the ledger and persists the ledger.
    ///
    /// If `description` or `amount_text` is blank, nothing happens and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// - Returns an error, leaving the ledger untouched, if `amount_text` is not a number.
    /// - Returns an error, leaving the ledger untouched, if the amount would push the income or
    ///   expense total beyond what can be represented.
    /// - Returns an error, leaving the ledger untouched, if the store write fails.
    pub async fn add(
        &mut self,
        description: &str,
        amount_text: &str,
        category: Category,
    ) -> Result<Option<Transaction>> {
        let description = description.trim();
        let amount_text = amount_text.trim();
        if description.is_empty() || amount_text.is_empty() {
            debug!("Ignoring a transaction with a blank description or amount");
            return Ok(None);
        }
        let amount = Amount::from_str(amount_text)
            .with_context(|| format!("Cannot add '{description}'"))?;
        ensure_readable(amount).with_context(|| format!("Cannot add '{description}'"))?;

        let transaction = Transaction::new(self.fresh_id(), description, amount, category);
        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(transaction.clone());
        next.extend(self.transactions.iter().cloned());
        if Aggregates::try_compute(&next).is_none() {
            bail!(
                "Cannot add '{description}': the ledger totals would exceed the largest amount \
                that can be recorded"
            )
        }
        self.commit(next).await?;

        info!(
            "Added {} {} of {} ({})",
            transaction.kind(),
            transaction.id(),
            transaction.amount(),
            transaction.category()
        );
        Ok(Some(transaction))
    }

    /// Removes the transaction with `id`, keeping the order of the others, and persists the
    /// ledger. Removing an id that is not present changes nothing and is not an error.
    ///
    /// Returns the removed transaction, if there was one.
    pub async fn delete(&mut self, id: impl AsRef<str>) -> Result<Option<Transaction>> {
        let id = id.as_ref();
        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) = self
            .transactions
            .iter()
            .cloned()
            .partition(|t| t.id().as_str() == id);
        self.commit(kept).await?;

        let removed = removed.into_iter().next();
        match &removed {
            Some(t) => info!("Deleted transaction {}", t.id()),
            None => debug!("No transaction with id '{id}' to delete"),
        }
        Ok(removed)
    }

    /// The transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Finds a transaction by id.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Transaction> {
        let id = id.as_ref();
        self.transactions.iter().find(|t| t.id().as_str() == id)
    }

    /// The number of transactions recorded.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Balance, total income and total expenses, rounded to cents.
    pub fn aggregates(&self) -> Aggregates {
        Aggregates::compute(&self.transactions)
    }

    /// Income versus expense totals and their shares.
    pub fn breakdown(&self) -> Breakdown {
        Breakdown::compute(&self.transactions)
    }

    /// Totals for each category in use.
    pub fn category_breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::compute(&self.transactions)
    }

    /// Writes `next` to the store and, only once that succeeds, makes it the ledger's contents.
    async fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        self.store
            .write(&next)
            .await
            .context("Unable to persist transactions")?;
        self.transactions = next;
        Ok(())
    }

    fn fresh_id(&self) -> TransactionId {
        loop {
            let id = TransactionId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Fails unless `amount` reads back unchanged from its persisted JSON form.
fn ensure_readable(amount: Amount) -> Result<()> {
    let json = serde_json::to_string(&amount).context("Unable to serialize the amount")?;
    let stored: Amount = serde_json::from_str(&json)
        .with_context(|| format!("The amount {json} could not be read back once stored"))?;
    ensure!(
        stored == amount,
        "The amount {} would be stored as {}",
        amount.value(),
        stored.value()
    );
    Ok(())
}

/// Keeps the first occurrence of each id.
fn dedup(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let total = transactions.len();
    let unique: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| seen.insert(t.id().clone()))
        .collect();
    if unique.len() < total {
        warn!(
            "Dropped {} persisted transactions with duplicate ids",
            total - unique.len()
        );
    }
    unique
}
