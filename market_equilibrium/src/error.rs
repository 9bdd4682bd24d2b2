use thiserror::Error;

/// Errors raised while solving a market.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("invalid parameter {name}: {value} (must be a nonzero finite number)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("demand and supply are parallel, no intersection exists")]
    NoIntersection,

    #[error("invalid price domain: {0}")]
    InvalidDomain(String),
}

/// Errors raised while loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Errors raised while writing results to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
