use thiserror::Error;

#[derive(Error, Debug)]
pub enum BugdeckError {
    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid sort field '{0}'")]
    InvalidSortField(String),

    #[error("invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("invalid reporter '{0}': reporter names cannot contain commas")]
    InvalidReporter(String),

    #[error("invalid filter dimension '{0}'")]
    InvalidDimension(String),

    #[error("invalid pagination mode '{0}', expected 'client' or 'server'")]
    InvalidPaginationMode(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' cannot be hidden")]
    ColumnLocked(String),

    #[error("invalid date '{0}': {1}")]
    InvalidDate(String, String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BugdeckError>;
