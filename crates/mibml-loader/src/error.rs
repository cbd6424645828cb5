//! Error types for template loading.

use thiserror::Error;

/// Errors that can occur while loading and rendering template files.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// An I/O error occurred while reading or copying a template file.
    #[error("I/O error loading template")]
    Io(#[from] std::io::Error),

    /// Neither the output copy nor the default-asset input exists.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The rendered DSL exceeded the delivery size cap.
    ///
    /// The output is never truncated; oversized templates are an
    /// authoring error.
    #[error("rendered output is {size} bytes, over the {limit} byte cap")]
    OutputTooLarge { size: usize, limit: usize },

    /// The template itself failed to compile.
    #[error(transparent)]
    Compile(#[from] mibml::MarkupError),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
