//! These structs provide the CLI interface for the expense CLI.

use crate::model::Category;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expense: record your income and expenses and see where your money goes.
///
/// Transactions are kept in a data directory (see --home). Positive amounts are income, negative
/// amounts are expenses. Run `expense init` once before anything else.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and its configuration file.
    Init,
    /// Record a new transaction. Use a negative amount for an expense, e.g. -4.50.
    Add(AddArgs),
    /// Delete one or more transactions by ID.
    Delete(DeleteArgs),
    /// Show the transaction history, newest first.
    List,
    /// Show the balance, total income and total expenses, with breakdowns.
    Summary,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where transactions and configuration are held. Defaults to
    /// ~/expense-tracker
    #[arg(long, global = true, env = "EXPENSE_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// A short description, e.g. "Coffee".
    description: String,

    /// The amount. Positive for income, negative for an expense. A leading `$` and thousands
    /// separators are accepted, e.g. -$1,200.00
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// The category to file the transaction under.
    #[arg(long, short, value_enum, ignore_case = true, default_value_t = Category::Food)]
    category: Category,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Args for the `expense delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The IDs of the transactions to delete, as shown by `expense list`.
    #[arg(required = true)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expense-tracker"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSE_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("expense-tracker")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_add_negative_amount() {
        let args = parse(&["expense", "--home", "/tmp/x", "add", "Coffee", "-4.5"]);
        match args.command() {
            Command::Add(add) => {
                assert_eq!(add.description(), "Coffee");
                assert_eq!(add.amount(), "-4.5");
                assert_eq!(add.category(), Category::Food);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.common().home().path(), Path::new("/tmp/x"));
    }

    #[test]
    fn test_parse_add_with_category() {
        let args = parse(&["expense", "add", "Pay", "2000", "--category", "salary"]);
        match args.command() {
            Command::Add(add) => assert_eq!(add.category(), Category::Salary),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_rejects_unknown_category() {
        assert!(Args::try_parse_from(["expense", "add", "x", "1", "-c", "groceries"]).is_err());
    }

    #[test]
    fn test_parse_delete_requires_ids() {
        assert!(Args::try_parse_from(["expense", "delete"]).is_err());
        let args = parse(&["expense", "delete", "a", "b"]);
        match args.command() {
            Command::Delete(delete) => assert_eq!(delete.ids(), ["a", "b"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_level() {
        let args = parse(&["expense", "list", "--log-level", "debug"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
