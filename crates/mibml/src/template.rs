//! Compiled templates and the render cache.
//!
//! A [`Template`] is the output of one `parse` call: the arena-backed
//! component tree, the typed template variables, and the used-tag/alias
//! sets the serializer consults. Rendering is cached per settings;
//! mutating a variable marks the template dirty and forces the next
//! render to re-walk the tree.

use std::collections::{BTreeMap, BTreeSet};

use crate::node::{ComponentNode, NodeArena, NodeId};
use crate::serializer;
use crate::variables::{InterfaceVariable, VariableKind};

/// Output formatting options.
///
/// Pretty output indents two spaces per nesting depth and separates
/// child blocks with blank lines; minimal output drops both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSettings {
    pub minimal: bool,
}

impl RenderSettings {
    pub fn minimal() -> Self {
        Self { minimal: true }
    }
}

/// A compiled markup template.
#[derive(Clone, Debug)]
pub struct Template {
    arena: NodeArena,
    root: NodeId,
    variables: BTreeMap<String, InterfaceVariable>,
    aliases: BTreeMap<String, String>,
    used_tags: BTreeSet<String>,
    used_aliases: BTreeSet<String>,
    dirty: bool,
    cache: Option<(RenderSettings, String)>,
}

impl Template {
    pub(crate) fn new(
        arena: NodeArena,
        root: NodeId,
        variables: BTreeMap<String, InterfaceVariable>,
        aliases: BTreeMap<String, String>,
        used_tags: BTreeSet<String>,
        used_aliases: BTreeSet<String>,
    ) -> Self {
        Self {
            arena,
            root,
            variables,
            aliases,
            used_tags,
            used_aliases,
            dirty: false,
            cache: None,
        }
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &ComponentNode {
        self.arena.get(self.root)
    }

    pub fn variable(&self, name: &str) -> Option<&InterfaceVariable> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &BTreeMap<String, InterfaceVariable> {
        &self.variables
    }

    pub fn used_tags(&self) -> &BTreeSet<String> {
        &self.used_tags
    }

    pub fn used_aliases(&self) -> &BTreeSet<String> {
        &self.used_aliases
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Overwrites a template variable with a string-typed value.
    ///
    /// This is the override-variable path of the public API; it marks the
    /// template dirty so the next render recomputes instead of returning
    /// the cached text.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(
            name.into(),
            InterfaceVariable::new(value.into(), VariableKind::String),
        );
        self.dirty = true;
    }

    /// Renders the template, reusing the cached output when neither the
    /// variables nor the settings changed since the last call.
    pub fn render(&mut self, settings: &RenderSettings) -> String {
        if !self.dirty {
            if let Some((cached_settings, output)) = &self.cache {
                if cached_settings == settings {
                    log::trace!("returning cached render");
                    return output.clone();
                }
            }
        }

        let output = serializer::render(
            &self.arena,
            self.root,
            &self.variables,
            &self.aliases,
            &self.used_tags,
            &self.used_aliases,
            settings,
        );
        self.dirty = false;
        self.cache = Some((settings.clone(), output.clone()));
        output
    }
}
