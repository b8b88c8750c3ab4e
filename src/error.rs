use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised by a store adapter. The engine treats them as opaque.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("write conflict on key '{key}'")]
    Conflict { key: String },
    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Incorrect number of arguments for {function}. Expecting {expected}, got {actual}")]
    Arity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Received unknown invoke function name: {0}")]
    UnknownFunction(String),
    #[error("Invalid {name} '{value}': {reason}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("Could not locate wallet '{0}'")]
    NotFound(String),
    #[error("Wallet '{0}' already exists")]
    AlreadyExists(String),
    #[error("{account} has insufficient balance: {balance} available, {requested} requested")]
    InsufficientFunds {
        account: String,
        balance: u64,
        requested: u64,
    },
    #[error("Balance of '{0}' would overflow")]
    Overflow(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    /// Stable tag reported to callers alongside the message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Arity { .. } => "ArityError",
            Self::UnknownFunction(_) => "UnknownFunction",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyExists(_) => "AlreadyExists",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::Overflow(_) => "Overflow",
            Self::Store(_) => "StoreError",
            Self::Codec(_) => "CodecError",
            Self::Io(_) => "IoError",
            Self::Csv(_) => "CsvError",
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}
