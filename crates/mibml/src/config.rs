//! Compiler configuration.
//!
//! Everything that used to be process-wide state — the root directory for
//! relative asset lookups and the custom tag registry — is an explicit
//! value threaded into the compile entry point.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::value::Value;

/// A component produced by a custom-tag factory.
#[derive(Clone, Debug, Default)]
pub struct CustomTag {
    /// Component kind emitted for this tag.
    pub kind: String,
    /// Default properties; markup attributes overwrite them.
    pub properties: BTreeMap<String, Value>,
    /// Component-scoped DSL variables, emitted as `@name = value;` lines
    /// inside the block.
    pub variables: BTreeMap<String, String>,
    /// DSL comments emitted at the top of the block.
    pub comments: Vec<String>,
    /// Optional raw DSL text injected as the component's first child.
    pub raw_body: Option<String>,
}

impl CustomTag {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

/// Factory invoked when the builder meets a registered custom tag.
pub type CustomTagFactory = Box<dyn Fn() -> CustomTag + Send + Sync>;

/// Configuration for one compile run.
#[derive(Default)]
pub struct CompilerConfig {
    /// Base directory used by loaders to resolve relative template paths.
    pub root_dir: Option<PathBuf>,
    custom_tags: HashMap<String, CustomTagFactory>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for a tag name (matched case-insensitively).
    pub fn register_tag(&mut self, name: &str, factory: CustomTagFactory) {
        self.custom_tags.insert(name.to_ascii_lowercase(), factory);
    }

    /// Instantiates the custom component for `name`, if registered.
    pub fn custom_tag(&self, name: &str) -> Option<CustomTag> {
        self.custom_tags
            .get(&name.to_ascii_lowercase())
            .map(|factory| factory())
    }
}

impl fmt::Debug for CompilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.custom_tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CompilerConfig")
            .field("root_dir", &self.root_dir)
            .field("custom_tags", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_tag_lookup_is_case_insensitive() {
        let mut config = CompilerConfig::new();
        config.register_tag("Gauge", Box::new(|| CustomTag::new("ProgressBar")));

        assert_eq!(config.custom_tag("gauge").unwrap().kind, "ProgressBar");
        assert_eq!(config.custom_tag("GAUGE").unwrap().kind, "ProgressBar");
        assert!(config.custom_tag("dial").is_none());
    }
}
