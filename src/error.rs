pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Month parsing errors
    #[error("Invalid month {0:?}, expected MM-YYYY or YYYY-MM")]
    InvalidMonthFormat(String),
    // Parsing/validation errors
    #[error("{0}")]
    ParsingError(String),
    // Lookup errors
    #[error("Subscription {0} not found")]
    NotFound(i32),
    // Database errors
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
}
