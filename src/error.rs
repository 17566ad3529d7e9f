use thiserror::Error;

/// Failure to read a sheet from its backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet '{0}' not available")]
    Unavailable(String),
}

/// Problem with a single roster row. The row is dropped, the rest of the sheet is still read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row {row}: census value '{value}' is not a number")]
    InvalidCensus { row: usize, value: String },
}

/// Errors that end the current action.
#[derive(Error, Debug)]
pub enum CensusError {
    #[error("Failed to read sheet '{sheet}' after {attempts} attempts: {source}")]
    Backend {
        sheet: String,
        attempts: u32,
        #[source]
        source: BackendError,
    },

    #[error("No header cell containing 'green' in the roster sheet")]
    HeaderAnchorMissing,

    #[error("Directory sheet has no '{0}' column")]
    MissingDirectoryColumn(&'static str),

    #[error("Another action is already in progress")]
    Busy,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CensusResult<T> = Result<T, CensusError>;
