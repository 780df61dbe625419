//! Summary command handler.

use crate::commands::Out;
use crate::summary::{Aggregates, Breakdown, CategoryBreakdown};
use crate::{Config, Result};
use serde::Serialize;

/// The dashboard figures for the current ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub aggregates: Aggregates,
    pub breakdown: Breakdown,
    pub categories: CategoryBreakdown,
}

/// Computes the balance, total income and total expenses, along with the income versus expense
/// breakdown and the per-category totals.
pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let ledger = config.ledger().await;
    let summary = Summary {
        aggregates: ledger.aggregates(),
        breakdown: ledger.breakdown(),
        categories: ledger.category_breakdown(),
    };

    let mut report = format!("{}\n\n{}", summary.aggregates, summary.breakdown);
    if !summary.categories.rows().is_empty() {
        report.push_str(&format!("\n\n{}", summary.categories));
    }
    let message = format!("Balance is {}", summary.aggregates.balance);
    Ok(Out::new(message, summary).with_report(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        env.add("Salary", "2000", Category::Salary).await;
        env.add("Rent", "-800", Category::Rent).await;
        env.add("Coffee", "-4.5", Category::Food).await;

        let out = summary(env.config()).await.unwrap();
        assert_eq!(out.message(), "Balance is $1,195.50");

        let s = out.structure().unwrap();
        assert_eq!(s.aggregates.expense.value(), Decimal::from_str("804.5").unwrap());
        assert_eq!(s.categories.rows().len(), 3);

        let report = out.report().unwrap();
        assert!(report.contains("Total Income:   $2,000.00"));
        assert!(report.contains("Salary"));
    }

    #[tokio::test]
    async fn test_summary_empty() {
        let env = TestEnv::new().await;
        let out = summary(env.config()).await.unwrap();
        assert_eq!(out.message(), "Balance is $0.00");
        assert!(out.structure().unwrap().categories.rows().is_empty());
    }
}
