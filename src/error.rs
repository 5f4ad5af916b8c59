use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Parameter store error: {0}")]
    ParameterStoreError(String),
    #[error("Batch total of {subsidiary} does not fit in 64 bits")]
    AmountOverflowError { subsidiary: String },
    #[error("Document name {0:?} is not a plain file name")]
    DocumentNameError(String),
    #[error("XML error on {subsidiary}: {source}")]
    DocumentError {
        subsidiary: String,
        #[source]
        source: Box<ExportError>,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
