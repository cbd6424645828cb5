//! Recursive-descent component tree construction.
//!
//! The builder walks the scanned tags with a single mutable [`ParseCursor`]
//! and produces arena-allocated [`ComponentNode`]s, applying tag-specific
//! semantics: text tags become `@MIB` style-alias references, inputs branch
//! on their `type`, `select` collects its options without recursing, and
//! layout tags become `Group` components whose text is hoisted into a
//! synthetic `Label` child (the target Group component has no text
//! property).
//!
//! Tags and namespace prefixes discovered along the way are recorded so
//! the serializer emits only the style aliases and imports actually
//! referenced.

use std::collections::{BTreeMap, BTreeSet};

use crate::attrs::{capitalize_property_name, parse_attributes};
use crate::config::CompilerConfig;
use crate::error::{MarkupError, Result};
use crate::node::{ComponentNode, NodeArena, NodeId};
use crate::scanner::{self, TagToken};
use crate::style::apply_style;
use crate::template::Template;
use crate::value::{Value, parse_literal};
use crate::variables::{InterfaceVariable, VariableKind, parse_script_block};

/// The id the runtime assigns to the implicit page root.
pub const RESERVED_ROOT_ID: &str = "MIBRoot";

/// Tags compiled to the `Group` layout component.
const GROUP_TAGS: &[&str] = &[
    "div", "section", "article", "header", "footer", "nav", "main", "group",
];

/// Tags emitted as `@MIB<PascalTag>` style-alias references.
const TEXT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "span", "p", "label",
];

/// Tokens accepted as "true" by the visibility attributes.
const TRUTHY: &[&str] = &["true", "1", "yes"];

/// Single-threaded scan state shared by the recursive descent.
struct ParseCursor {
    text: String,
    position: usize,
    variables: BTreeMap<String, InterfaceVariable>,
    aliases: BTreeMap<String, String>,
    used_tags: BTreeSet<String>,
    used_aliases: BTreeSet<String>,
}

struct TreeBuilder<'a> {
    config: &'a CompilerConfig,
    cursor: ParseCursor,
    arena: NodeArena,
}

/// Compiles markup into a [`Template`].
///
/// Comments are stripped and script blocks isolated first; the remaining
/// element tree is walked into an arena rooted at a synthetic `Group`.
pub fn compile(source: &str, config: &CompilerConfig) -> Result<Template> {
    let stripped = scanner::strip_comments(source);
    let harvest = scanner::extract_scripts(&stripped);

    let bindings = match &harvest.declarations {
        Some(block) => parse_script_block(block)?,
        None => Default::default(),
    };

    let mut aliases: BTreeMap<String, String> = harvest.imports.into_iter().collect();
    // Explicit $Name statements win over javascript imports.
    aliases.extend(bindings.aliases);

    let mut builder = TreeBuilder {
        config,
        cursor: ParseCursor {
            text: harvest.markup,
            position: 0,
            variables: bindings.variables,
            aliases,
            used_tags: BTreeSet::new(),
            used_aliases: BTreeSet::new(),
        },
        arena: NodeArena::new(),
    };

    let root = builder.arena.alloc(ComponentNode::new("Group"));
    builder.build_children(root, None)?;

    for (name, value) in bindings.root_properties {
        if builder.cursor.variables.contains_key(&name)
            || builder.cursor.aliases.contains_key(&name)
        {
            continue;
        }
        builder
            .arena
            .get_mut(root)
            .set_property(name, parse_literal(&value));
    }
    builder.hoist_group_text(root);

    let ParseCursor {
        variables,
        aliases,
        used_tags,
        used_aliases,
        ..
    } = builder.cursor;
    Ok(Template::new(
        builder.arena,
        root,
        variables,
        aliases,
        used_tags,
        used_aliases,
    ))
}

impl TreeBuilder<'_> {
    /// Builds the children of `parent` until its closing tag (or end of
    /// input when `parent_tag` is `None`).
    ///
    /// Content that is only text becomes the parent's `Text` property;
    /// text interleaved with sibling elements is synthesized into `Label`
    /// children in document order.
    fn build_children(&mut self, parent: NodeId, parent_tag: Option<&str>) -> Result<()> {
        let mut saw_element = false;
        loop {
            let token = scanner::next_tag(&self.cursor.text, self.cursor.position);
            let text_end = token
                .as_ref()
                .map(|t| t.start)
                .unwrap_or(self.cursor.text.len());
            let chunk = self.cursor.text[self.cursor.position..text_end]
                .trim()
                .to_string();

            match token {
                None => {
                    self.cursor.position = self.cursor.text.len();
                    self.finish_text(parent, chunk, saw_element);
                    return Ok(());
                }
                Some(token)
                    if token.closing
                        && parent_tag.map(|name| token.is_named(name)).unwrap_or(false) =>
                {
                    self.cursor.position = token.end;
                    self.finish_text(parent, chunk, saw_element);
                    return Ok(());
                }
                Some(token) if token.closing => {
                    // Stray close for an element we never opened.
                    log::warn!("skipping unmatched closing tag </{}>", token.name);
                    self.cursor.position = token.end;
                    if !chunk.is_empty() {
                        self.add_text_label(parent, chunk);
                        saw_element = true;
                    }
                }
                Some(token) => {
                    self.cursor.position = token.end;
                    if !chunk.is_empty() {
                        self.add_text_label(parent, chunk);
                    }
                    saw_element = true;
                    self.build_element(parent, token)?;
                }
            }
        }
    }

    /// Trailing text handling at a close or end of input.
    fn finish_text(&mut self, parent: NodeId, chunk: String, saw_element: bool) {
        if chunk.is_empty() {
            return;
        }
        if saw_element {
            self.add_text_label(parent, chunk);
        } else {
            self.arena
                .get_mut(parent)
                .set_property("Text", Value::String(chunk));
        }
    }

    fn add_text_label(&mut self, parent: NodeId, text: String) {
        let mut label = ComponentNode::new("Label");
        label.set_property("Text", Value::String(text));
        let id = self.arena.alloc(label);
        self.arena.add_child(parent, id);
    }

    fn build_element(&mut self, parent: NodeId, open: TagToken) -> Result<()> {
        let lower = open.name.to_ascii_lowercase();
        let mut attrs = parse_attributes(&open.attrs);
        let mut raw_body = None;

        let mut node = if let Some(prefix) = &open.prefix {
            // Common./C./$Common./$C. all normalize to a $-prefixed alias
            // reference; the alias token is recorded as used.
            let alias = prefix.trim_start_matches('$').to_string();
            self.cursor.used_aliases.insert(alias.clone());
            ComponentNode::new(format!("${}.{}", alias, capitalize_property_name(&open.name)))
        } else if let Some(custom) = self.config.custom_tag(&lower) {
            let mut node = ComponentNode::new(custom.kind);
            node.properties = custom.properties;
            node.variables = custom.variables;
            node.comments = custom.comments;
            raw_body = custom.raw_body;
            node
        } else {
            self.builtin_node(&lower)
        };

        self.apply_attributes(&mut node, &lower, &mut attrs)?;
        let is_group = node.kind == "Group";

        let id = self.arena.alloc(node);
        self.arena.add_child(parent, id);
        if let Some(body) = raw_body {
            self.arena.add_raw(id, body);
        }

        if lower == "select" {
            if !open.self_closing {
                self.collect_options(id)?;
            }
        } else {
            let container = !open.self_closing
                && scanner::find_matching_close(&self.cursor.text, open.end, &open.name).is_some();
            if container {
                self.build_children(id, Some(&open.name))?;
            }
        }

        if is_group {
            self.hoist_group_text(id);
        }
        Ok(())
    }

    fn builtin_node(&mut self, lower: &str) -> ComponentNode {
        if GROUP_TAGS.contains(&lower) {
            return ComponentNode::new("Group");
        }
        if TEXT_TAGS.contains(&lower) {
            self.cursor.used_tags.insert(lower.to_string());
            return ComponentNode::new(format!("@MIB{}", capitalize_property_name(lower)));
        }
        match lower {
            "button" => ComponentNode::new("Button"),
            "img" => ComponentNode::new("Image"),
            "select" => ComponentNode::new("ComboBox"),
            "input" => ComponentNode::new("TextField"),
            other => ComponentNode::new(capitalize_property_name(other)),
        }
    }

    fn apply_attributes(
        &mut self,
        node: &mut ComponentNode,
        lower_tag: &str,
        attrs: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        if let Some(id) = attrs.remove("Id") {
            let id = capitalize_property_name(&id);
            if id == RESERVED_ROOT_ID {
                return Err(MarkupError::ReservedId(id));
            }
            node.id = Some(id);
        }

        if let Some(css) = attrs.remove("Style") {
            apply_style(node, &css)?;
        }

        self.apply_visibility(node, attrs);

        match lower_tag {
            "button" => {
                if let Some(text) = attrs.remove("Value").or_else(|| attrs.remove("Text")) {
                    node.set_property("Text", Value::String(text));
                }
            }
            "input" => self.apply_input_attributes(node, attrs),
            "img" => {
                if let Some(src) = attrs.remove("Src") {
                    node.set_property("Source", Value::String(src));
                }
                if let Some(alt) = attrs.remove("Alt") {
                    node.set_property("Tooltip", Value::String(alt));
                }
            }
            _ => {}
        }

        let remaining = std::mem::take(attrs);
        for (name, value) in remaining {
            if let Some(binding) = name.strip_prefix(':') {
                let parsed = self.substitute(parse_literal(&value));
                node.set_property(binding.to_string(), parsed);
            } else {
                node.set_property(name, Value::String(value));
            }
        }
        Ok(())
    }

    /// `m-show`/`m-if` (any dash/underscore/case variant) map to the
    /// `Visible` property; `m-show` wins when both are present.
    fn apply_visibility(&mut self, node: &mut ComponentNode, attrs: &mut BTreeMap<String, String>) {
        let mut show = None;
        let mut condition = None;
        for key in attrs.keys().cloned().collect::<Vec<_>>() {
            let folded: String = key
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            match folded.as_str() {
                "mshow" => show = attrs.remove(&key),
                "mif" => condition = attrs.remove(&key),
                _ => {}
            }
        }
        if let Some(raw) = show.or(condition) {
            node.set_property("Visible", visibility_value(&raw));
        }
    }

    fn apply_input_attributes(
        &mut self,
        node: &mut ComponentNode,
        attrs: &mut BTreeMap<String, String>,
    ) {
        let input_type = attrs
            .remove("Type")
            .unwrap_or_default()
            .to_ascii_lowercase();

        if input_type == "checkbox" {
            node.kind = "CheckBox".to_string();
            if let Some(text) = attrs.remove("Value") {
                node.set_property("Text", Value::String(text));
            }
            let checked = attrs.remove("Checked").is_some();
            node.set_property("Value", Value::Boolean(checked));
            return;
        }

        if let Some(placeholder) = attrs.remove("Placeholder") {
            node.set_property("PlaceholderText", Value::String(placeholder));
        }
        if let Some(value) = attrs.remove("Value") {
            node.set_property("Value", Value::String(value));
        }
        if let Some(raw) = attrs.remove("Maxlength").or_else(|| attrs.remove("MaxLength")) {
            // Author typo in optional decoration; skip rather than abort.
            match raw.trim().parse::<i64>() {
                Ok(max) => node.set_property("MaxLength", Value::Integer(max)),
                Err(_) => log::debug!("ignoring non-numeric maxlength: {raw}"),
            }
        }
        if attrs.remove("Readonly").is_some() {
            node.set_property("ReadOnly", Value::Boolean(true));
        }
    }

    /// `select` does not recurse: its `<option>` entries are collected
    /// into an `Options` list property up to the matching `</select>`,
    /// located with the same depth counter the element walk uses.
    fn collect_options(&mut self, node: NodeId) -> Result<()> {
        let close = scanner::find_matching_close(&self.cursor.text, self.cursor.position, "select");
        let limit = close
            .as_ref()
            .map(|t| t.start)
            .unwrap_or(self.cursor.text.len());

        let mut options = Vec::new();
        while let Some(token) = scanner::next_tag(&self.cursor.text, self.cursor.position) {
            if token.start >= limit {
                break;
            }
            self.cursor.position = token.end;
            if token.closing || !token.is_named("option") {
                continue;
            }

            let attrs = parse_attributes(&token.attrs);
            if let Some(value) = attrs.get("Value") {
                options.push(Value::String(value.clone()));
                continue;
            }
            // Fall back to the option's inner text.
            let inner_end = scanner::next_tag(&self.cursor.text, token.end)
                .map(|t| t.start)
                .unwrap_or(limit)
                .min(limit);
            let inner = self.cursor.text[token.end..inner_end].trim().to_string();
            options.push(Value::String(inner));
        }
        self.cursor.position = close.map(|t| t.end).unwrap_or(self.cursor.text.len());

        self.arena
            .get_mut(node)
            .set_property("Options", Value::List(options));
        Ok(())
    }

    /// The target `Group` component has no text property: any `Text`
    /// that ended up on a group is re-materialized as a synthetic
    /// `Label` first child.
    fn hoist_group_text(&mut self, id: NodeId) {
        if self.arena.get(id).kind != "Group" {
            return;
        }
        let Some(text) = self.arena.get_mut(id).properties.remove("Text") else {
            return;
        };
        let mut label = ComponentNode::new("Label");
        label.set_property("Text", text);
        let label_id = self.arena.alloc(label);
        self.arena.add_first_child(id, label_id);
    }

    fn substitute(&self, value: Value) -> Value {
        match value {
            Value::Literal(text) => match text
                .strip_prefix('@')
                .and_then(|name| self.cursor.variables.get(name))
            {
                Some(variable) => substituted_value(variable),
                None => Value::Literal(text),
            },
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, self.substitute(value)))
                    .collect(),
            ),
            Value::List(items) => {
                Value::List(items.into_iter().map(|item| self.substitute(item)).collect())
            }
            Value::Call(name, args) => Value::Call(
                name,
                args.into_iter().map(|arg| self.substitute(arg)).collect(),
            ),
            other => other,
        }
    }
}

fn substituted_value(variable: &InterfaceVariable) -> Value {
    match variable.kind() {
        VariableKind::Boolean => Value::Boolean(variable.value() == "true"),
        VariableKind::Color | VariableKind::String => Value::String(variable.value().to_string()),
        VariableKind::Literal => Value::Literal(variable.value().to_string()),
    }
}

fn visibility_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('@') {
        return Value::Literal(trimmed.to_string());
    }
    if trimmed.starts_with('(') || trimmed.parse::<f64>().is_ok() {
        return parse_literal(trimmed);
    }
    Value::Boolean(TRUTHY.iter().any(|t| trimmed.eq_ignore_ascii_case(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_tokens() {
        assert_eq!(visibility_value("true"), Value::Boolean(true));
        assert_eq!(visibility_value("YES"), Value::Boolean(true));
        assert_eq!(visibility_value("1"), Value::Integer(1));
        assert_eq!(visibility_value("off"), Value::Boolean(false));
        assert_eq!(visibility_value("@Flag"), Value::Literal("@Flag".into()));
    }
}
