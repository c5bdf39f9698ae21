use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history write budget exhausted; {operation} rejected")]
    WriteBudgetExhausted { operation: &'static str },
}

pub type HistoryResult<T> = Result<T, HistoryError>;
