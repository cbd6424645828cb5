//! Facade crate re-exporting the mibml compiler and its loader.
//!
//! Most users want [`parse`] (or [`parse_with_config`]) plus
//! [`RenderSettings`]; the loader surface lives under [`loader`].

pub use mibml::{
    CompilerConfig, CustomTag, CustomTagFactory, MarkupError, RenderSettings, Template, Value,
    parse, parse_with_config,
};

pub use mibml_loader as loader;
