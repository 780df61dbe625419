//! List command handler.

use crate::commands::{plural, Out};
use crate::model::Transaction;
use crate::{Config, Result};

/// Returns the transaction history, newest first.
///
/// The report shows one line per transaction: description, category, signed amount and ID.
pub async fn list(config: Config) -> Result<Out<Vec<Transaction>>> {
    let ledger = config.ledger().await;
    let transactions = ledger.transactions().to_vec();
    let report = if transactions.is_empty() {
        String::from("No transactions recorded.")
    } else {
        transactions
            .iter()
            .map(|t| format!("{t}  [{}]", t.id()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let message = format!("Listed {}", plural(transactions.len(), "transaction"));
    Ok(Out::new(message, transactions).with_report(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list(env.config()).await.unwrap();
        assert_eq!(out.report(), Some("No transactions recorded."));
        assert!(out.structure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let env = TestEnv::new().await;
        let salary = env.add("Salary", "2000", Category::Salary).await;
        let coffee = env.add("Coffee", "-4.5", Category::Food).await;

        let out = list(env.config()).await.unwrap();
        assert_eq!(out.message(), "Listed 2 transactions");
        let expected = format!(
            "Coffee (Food) -$4.50  [{}]\nSalary (Salary) +$2,000.00  [{}]",
            coffee.id(),
            salary.id()
        );
        assert_eq!(out.report(), Some(expected.as_str()));
    }
}
