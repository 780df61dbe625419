//! Derived figures computed from a sequence of transactions.
//!
//! Nothing in here is ever stored. Every value is recomputed from the transactions it is given, so
//! it can never go stale relative to the ledger.

use crate::model::{Amount, Category, Transaction};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Totals shown on the dashboard, each rounded to cents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Aggregates {
    /// Sum of all amounts. May be negative.
    pub balance: Amount,
    /// Sum of the strictly positive amounts.
    pub income: Amount,
    /// Magnitude of the sum of the strictly negative amounts.
    pub expense: Amount,
}

impl Aggregates {
    /// Computes the totals. A total too large to represent is clamped to the largest amount.
    pub fn compute(transactions: &[Transaction]) -> Self {
        Self::from_totals(Totals::saturating(transactions.iter()))
    }

    /// Computes the totals, or returns `None` if any of them would be too large to represent.
    pub fn try_compute(transactions: &[Transaction]) -> Option<Self> {
        Totals::checked(transactions.iter()).map(Self::from_totals)
    }

    fn from_totals(totals: Totals) -> Self {
        Self {
            balance: totals.net().rounded(),
            income: totals.income.rounded(),
            expense: totals.expense.rounded(),
        }
    }
}

impl Display for Aggregates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Balance:  {}", self.balance)?;
        writeln!(f, "Total Income:   {}", self.income)?;
        write!(f, "Total Expenses: {}", self.expense)
    }
}

/// The two-slice income versus expense view used for a proportional chart.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Breakdown {
    pub income: Amount,
    pub expense: Amount,
    /// Share of `income + expense` that is income, in percent with one decimal place.
    pub income_percent: Decimal,
    /// Share of `income + expense` that is expense, in percent with one decimal place.
    pub expense_percent: Decimal,
}

impl Breakdown {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let totals = Totals::saturating(transactions.iter());
        // Shares are taken of tenths so the sum stays representable even at the largest totals
        let income = totals.income.value() / Decimal::TEN;
        let expense = totals.expense.value() / Decimal::TEN;
        let whole = income + expense;
        Self {
            income: totals.income.rounded(),
            expense: totals.expense.rounded(),
            income_percent: percent(income, whole),
            expense_percent: percent(expense, whole),
        }
    }
}

impl Display for Breakdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Income   {:>6}%  {}",
            self.income_percent.to_string(),
            self.income
        )?;
        write!(
            f,
            "Expense  {:>6}%  {}",
            self.expense_percent.to_string(),
            self.expense
        )
    }
}

/// Per-category totals for one category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: Category,
    pub count: usize,
    pub income: Amount,
    pub expense: Amount,
    pub net: Amount,
}

/// Totals for each category present in the ledger, in the fixed category order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    rows: Vec<CategoryTotals>,
}

impl CategoryBreakdown {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut grouped: BTreeMap<Category, Vec<&Transaction>> = BTreeMap::new();
        for t in transactions {
            grouped.entry(t.category()).or_default().push(t);
        }
        let rows = grouped
            .into_iter()
            .map(|(category, items)| {
                let totals = Totals::saturating(items.iter().copied());
                CategoryTotals {
                    category,
                    count: items.len(),
                    income: totals.income.rounded(),
                    expense: totals.expense.rounded(),
                    net: totals.net().rounded(),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[CategoryTotals] {
        &self.rows
    }

    pub fn get(&self, category: Category) -> Option<&CategoryTotals> {
        self.rows.iter().find(|row| row.category == category)
    }
}

impl Display for CategoryBreakdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (ix, row) in self.rows.iter().enumerate() {
            if ix > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:<14}{:>3}  in {:>12}  out {:>12}  net {:>12}",
                row.category.to_string(),
                row.count,
                row.income.to_string(),
                row.expense.to_string(),
                row.net.to_string()
            )?;
        }
        Ok(())
    }
}

/// Unrounded income and expense sums. Zero amounts land in neither.
struct Totals {
    income: Amount,
    expense: Amount,
}

impl Totals {
    /// Sums with each total clamped at the largest representable amount.
    fn saturating<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Self {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for amount in transactions.map(Transaction::amount) {
            if amount.is_positive() {
                income = income.saturating_add(amount.value());
            } else if amount.is_negative() {
                expense = expense.saturating_sub(amount.value());
            }
        }
        Self::new(income, expense)
    }

    /// Sums, or `None` as soon as a total overflows.
    fn checked<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Option<Self> {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for amount in transactions.map(Transaction::amount) {
            if amount.is_positive() {
                income = income.checked_add(amount.value())?;
            } else if amount.is_negative() {
                expense = expense.checked_sub(amount.value())?;
            }
        }
        Some(Self::new(income, expense))
    }

    fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income: Amount::new(income),
            expense: Amount::new(expense),
        }
    }

    /// Both totals are non-negative, so the difference cannot overflow.
    fn net(&self) -> Amount {
        Amount::new(self.income.value() - self.expense.value())
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn txn(id: &str, amount: &str, category: Category) -> Transaction {
        Transaction::new(id, id, Amount::from_str(amount).unwrap(), category)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("coffee", "-4.5", Category::Food),
            txn("rent", "-800", Category::Rent),
            txn("salary", "2000", Category::Salary),
        ]
    }

    #[test]
    fn test_aggregates_scenario() {
        let agg = Aggregates::compute(&sample());
        assert_eq!(agg.balance.value(), dec("1195.50"));
        assert_eq!(agg.income.value(), dec("2000.00"));
        assert_eq!(agg.expense.value(), dec("804.50"));
    }

    #[test]
    fn test_aggregates_empty() {
        let agg = Aggregates::compute(&[]);
        assert!(agg.balance.is_zero());
        assert!(agg.income.is_zero());
        assert!(agg.expense.is_zero());
    }

    #[test]
    fn test_zero_amount_is_neither_income_nor_expense() {
        let ts = vec![txn("z", "0", Category::Food), txn("a", "-1", Category::Food)];
        let agg = Aggregates::compute(&ts);
        assert!(agg.income.is_zero());
        assert_eq!(agg.expense.value(), dec("1"));
        assert_eq!(agg.balance.value(), dec("-1"));
    }

    #[test]
    fn test_balance_is_income_minus_expense() {
        let ts = vec![
            txn("a", "0.105", Category::Food),
            txn("b", "-0.335", Category::Shopping),
            txn("c", "19.999", Category::Salary),
            txn("d", "-7", Category::Entertainment),
        ];
        let agg = Aggregates::compute(&ts);
        let diff = agg.balance.value() - (agg.income.value() - agg.expense.value());
        assert!(diff.abs() <= dec("0.01"), "diff was {diff}");
    }

    #[test]
    fn test_aggregates_display() {
        let text = Aggregates::compute(&sample()).to_string();
        assert!(text.contains("Total Balance:  $1,195.50"));
        assert!(text.contains("Total Expenses: $804.50"));
    }

    #[test]
    fn test_breakdown_percentages() {
        let ts = vec![txn("a", "300", Category::Salary), txn("b", "-100", Category::Rent)];
        let b = Breakdown::compute(&ts);
        assert_eq!(b.income.value(), dec("300"));
        assert_eq!(b.expense.value(), dec("100"));
        assert_eq!(b.income_percent, dec("75.0"));
        assert_eq!(b.expense_percent, dec("25.0"));
    }

    #[test]
    fn test_breakdown_empty_has_no_shares() {
        let b = Breakdown::compute(&[txn("z", "0", Category::Food)]);
        assert!(b.income_percent.is_zero());
        assert!(b.expense_percent.is_zero());
    }

    #[test]
    fn test_category_breakdown() {
        let mut ts = sample();
        ts.push(txn("lunch", "-12", Category::Food));
        ts.push(txn("refund", "5", Category::Food));
        let cb = CategoryBreakdown::compute(&ts);

        let categories: Vec<Category> = cb.rows().iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![Category::Food, Category::Salary, Category::Rent]
        );

        let food = cb.get(Category::Food).unwrap();
        assert_eq!(food.count, 3);
        assert_eq!(food.income.value(), dec("5"));
        assert_eq!(food.expense.value(), dec("16.5"));
        assert_eq!(food.net.value(), dec("-11.5"));
        assert!(cb.get(Category::Shopping).is_none());
    }

    #[test]
    fn test_overflowing_totals_are_clamped() {
        let big = "50000000000000000000000000000";
        let ts = vec![
            txn("a", big, Category::Salary),
            txn("b", big, Category::Salary),
            txn("c", &format!("-{big}"), Category::Rent),
            txn("d", &format!("-{big}"), Category::Rent),
        ];
        assert!(Aggregates::try_compute(&ts).is_none());

        let agg = Aggregates::compute(&ts);
        assert_eq!(agg.income.value(), Decimal::MAX);
        assert_eq!(agg.expense.value(), Decimal::MAX);
        assert!(agg.balance.is_zero());

        let b = Breakdown::compute(&ts);
        assert_eq!(b.income_percent, dec("50"));
        let salary = CategoryBreakdown::compute(&ts);
        assert_eq!(salary.get(Category::Salary).unwrap().income.value(), Decimal::MAX);
    }

    #[test]
    fn test_try_compute_matches_compute() {
        assert_eq!(Aggregates::try_compute(&sample()), Some(Aggregates::compute(&sample())));
    }
}
