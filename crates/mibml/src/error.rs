//! Error types for markup compilation.
//!
//! The compiler distinguishes hard failures (malformed script blocks,
//! policy violations such as the reserved root id or an unsupported CSS
//! property) from best-effort leniency, where an author typo in optional
//! decoration is skipped and the property left unset. Only the former
//! surface through this module.

use thiserror::Error;

/// Errors that can occur while compiling markup into the Custom UI DSL.
///
/// # Examples
///
/// ```rust
/// use mibml::MarkupError;
///
/// // The reserved root id is rejected on every authored element.
/// let result = mibml::parse(r#"<div id="MIBRoot"></div>"#);
/// assert!(matches!(result, Err(MarkupError::ReservedId(_))));
/// ```
#[derive(Error, Debug)]
pub enum MarkupError {
    /// A script-block line could not be parsed.
    ///
    /// The string contains the offending line, e.g. an `@Name` assignment
    /// without `=`, an invalid left-hand identifier, or an unterminated
    /// quoted string.
    #[error("script syntax error: {0}")]
    InvalidSyntax(String),

    /// The reserved id `MIBRoot` was used on an authored element.
    ///
    /// The runtime assigns this id to the implicit page root, so no
    /// element in the markup may claim it.
    #[error("reserved id used on element: {0}")]
    ReservedId(String),

    /// A `style` declaration named a property outside the allow-list.
    ///
    /// Unknown properties are a hard failure, not a silent skip, so that
    /// authoring mistakes are caught at compile time.
    #[error("unsupported style property: {0}")]
    UnsupportedProperty(String),

    /// A color value could not be converted to the target `#RRGGBB` form.
    ///
    /// Named colors (`white`, `red`, ...) are deliberately not supported.
    #[error("unsupported color value: {0}")]
    UnsupportedColor(String),
}

/// Convenience alias used throughout the compiler.
pub type Result<T> = std::result::Result<T, MarkupError>;
