//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Transaction;
use crate::{Config, Result};

/// Records a new transaction at the top of the history.
///
/// A unique transaction ID is generated and returned with the transaction on success. A blank
/// description or amount is not an error; nothing is recorded and the output says so.
///
/// # Errors
///
/// - Returns an error if the amount is not a number.
/// - Returns an error if the transactions file cannot be written.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut ledger = config.ledger().await;
    let added = ledger
        .add(args.description(), args.amount(), args.category())
        .await?;
    Ok(match added {
        Some(transaction) => {
            let message = format!("Added transaction with ID: {}", transaction.id());
            Out::new(message, transaction.clone()).with_report(transaction.to_string())
        }
        None => "Nothing added: a description and an amount are both required".into(),
    })
}
