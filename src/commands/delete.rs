//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{plural, Out};
use crate::model::Transaction;
use crate::{Config, Result};
use tracing::warn;

/// Deletes one or more transactions by ID.
///
/// IDs that do not match any transaction are skipped with a warning. The remaining transactions
/// keep their order.
///
/// # Errors
///
/// - Returns an error if the transactions file cannot be written. Deletions made before the
///   failure remain in effect.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<Transaction>>> {
    let mut ledger = config.ledger().await;
    let mut deleted = Vec::new();
    for id in args.ids() {
        match ledger.delete(id).await? {
            Some(transaction) => deleted.push(transaction),
            None => warn!("No transaction found with ID: {id}"),
        }
    }

    let message = format!("Deleted {}", plural(deleted.len(), "transaction"));
    Ok(Out::new(message, deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_success() {
        let env = TestEnv::new().await;
        let a = env.add("a", "1", Category::Food).await;
        let b = env.add("b", "-2", Category::Rent).await;
        let c = env.add("c", "3", Category::Salary).await;

        let out = delete(env.config(), DeleteArgs::new([b.id().as_str()]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 1 transaction");
        assert_eq!(out.structure().unwrap(), &vec![b]);
        assert_eq!(env.transactions().await, vec![c, a]);
    }

    #[tokio::test]
    async fn test_delete_multiple_and_missing() {
        let env = TestEnv::new().await;
        let a = env.add("a", "1", Category::Food).await;
        let b = env.add("b", "-2", Category::Rent).await;

        let args = DeleteArgs::new([a.id().as_str(), "missing", b.id().as_str()]);
        let out = delete(env.config(), args).await.unwrap();
        assert_eq!(out.message(), "Deleted 2 transactions");
        assert!(env.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_only() {
        let env = TestEnv::new().await;
        let a = env.add("a", "1", Category::Food).await;

        let out = delete(env.config(), DeleteArgs::new(["missing"]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 0 transactions");
        assert_eq!(env.transactions().await, vec![a]);
    }
}
