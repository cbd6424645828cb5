//! # mibml — markup to Custom UI DSL compiler
//!
//! Compiles an HTML-like markup dialect into the textual Custom UI
//! description language consumed by the game client. The pipeline is a
//! one-directional transform:
//!
//! ```text
//! raw text → tag scanner → (variables, attributes, styles) →
//!     component tree builder → serializer → DSL text
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mibml::{RenderSettings, parse};
//!
//! let markup = r#"
//!     <div id="panel" style="width:100px">
//!         <h1>Hi</h1>
//!     </div>
//! "#;
//!
//! let mut template = parse(markup).expect("valid markup");
//! let dsl = template.render(&RenderSettings::default());
//! assert!(dsl.contains("Group #Panel {"));
//! assert!(dsl.contains("@MIBH1"));
//! ```
//!
//! ## Supported Markup
//!
//! - Layout tags (`div`, `section`, `group`, ...) → `Group` components
//! - Text tags (`h1`..`h6`, `span`, `p`, `label`) → generated `@MIB`
//!   style aliases
//! - Form tags: `button`, `input` (text and checkbox), `select` with
//!   `Options`, `img`
//! - A declarative `<script type="text/customui">` block for `@Name`
//!   template variables, `$Name` import aliases, and root properties
//! - `style="..."` attributes over a strict property allow-list
//! - `:name="..."` binding attributes parsed as a small literal grammar
//! - `m-show`/`m-if` visibility flags
//!
//! ## Modules
//!
//! - [`scanner`]: regex tag recognition, comments, script isolation
//! - [`attrs`]: attribute splitting and PascalCase normalization
//! - [`variables`]: script-block variable/alias extraction
//! - [`style`]: CSS-like declarations to style/property entries
//! - [`builder`]: recursive-descent component tree construction
//! - [`serializer`]: DSL text generation
//! - [`template`]: compiled templates and the render cache
//! - [`config`]: per-compile configuration and custom tags
//! - [`error`]: error types for compilation failures

pub mod attrs;
pub mod builder;
pub mod config;
pub mod error;
pub mod node;
pub mod scanner;
pub mod serializer;
pub mod style;
pub mod template;
pub mod value;
pub mod variables;

pub use builder::compile;
pub use config::{CompilerConfig, CustomTag, CustomTagFactory};
pub use error::{MarkupError, Result};
pub use node::{Child, ComponentNode, NodeArena, NodeId};
pub use template::{RenderSettings, Template};
pub use value::Value;
pub use variables::{InterfaceVariable, VariableKind};

/// Compiles markup with a default [`CompilerConfig`].
pub fn parse(source: &str) -> Result<Template> {
    builder::compile(source, &CompilerConfig::default())
}

/// Compiles markup with an explicit configuration.
pub fn parse_with_config(source: &str, config: &CompilerConfig) -> Result<Template> {
    builder::compile(source, config)
}
