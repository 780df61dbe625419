/// The error type used throughout the crate.
pub type Error = anyhow::Error;

/// A `Result` with the crate's `Error` type.
pub type Result<T> = std::result::Result<T, Error>;
