//! Rendering a component tree into the textual Custom UI DSL.
//!
//! Emission order is fixed: `$Alias = "path";` imports for every used
//! alias, one generated `@MIB<Tag>` style block per used text tag,
//! `@Name = value;` template variable lines, and finally the component
//! tree itself.
//!
//! Value formatting rules (the quoting contract of the target format):
//!
//! - `%` i18n paths are rewritten to camelCase — the target forbids
//!   separators in i18n keys
//! - `@` references, numbers, booleans, and `#hex` colors (3-digit form
//!   expanded) pass through unquoted
//! - everything else is double-quoted with embedded quotes escaped
//! - inside a `Style` map nothing is quoted at all; style values are
//!   always bare tokens

use std::collections::{BTreeMap, BTreeSet};

use phf::phf_map;

use crate::node::{Child, NodeArena, NodeId};
use crate::template::RenderSettings;
use crate::value::Value;
use crate::variables::{InterfaceVariable, VariableKind};

/// Import path used for the `Common`/`C` aliases when the markup never
/// declared one explicitly.
const DEFAULT_COMMON_PATH: &str = "../Common.ui";

/// Default font sizes for the generated heading style blocks.
static HEADING_SIZES: phf::Map<&'static str, i64> = phf_map! {
    "h1" => 28,
    "h2" => 24,
    "h3" => 20,
    "h4" => 18,
    "h5" => 16,
    "h6" => 14,
};

/// Renders a full template to DSL text.
pub fn render(
    arena: &NodeArena,
    root: NodeId,
    variables: &BTreeMap<String, InterfaceVariable>,
    aliases: &BTreeMap<String, String>,
    used_tags: &BTreeSet<String>,
    used_aliases: &BTreeSet<String>,
    settings: &RenderSettings,
) -> String {
    let mut out = String::new();

    for name in used_aliases {
        let path = match aliases.get(name) {
            Some(path) => path.as_str(),
            None if name == "Common" || name == "C" => DEFAULT_COMMON_PATH,
            None => {
                log::warn!("no import path recorded for alias ${name}");
                continue;
            }
        };
        out.push_str(&format!("${name} = \"{path}\";\n"));
    }

    for tag in used_tags {
        write_style_alias(&mut out, tag, settings);
    }

    for (name, variable) in variables {
        out.push_str(&format!(
            "@{name} = {};\n",
            format_variable(variable)
        ));
    }

    if !settings.minimal && !out.is_empty() {
        out.push('\n');
    }
    write_node(&mut out, arena, root, 0, settings);
    out
}

/// One generated `@MIB<PascalTag> = Label { ... };` block.
fn write_style_alias(out: &mut String, tag: &str, settings: &RenderSettings) {
    let name = format!("@MIB{}", crate::attrs::capitalize_property_name(tag));
    let body = if let Some(size) = HEADING_SIZES.get(tag) {
        Some(format!("Style: (FontSize: {size}, RenderBold: true);"))
    } else if tag == "p" {
        Some("Anchor: (Bottom: 8);".to_string())
    } else {
        None
    };

    match (body, settings.minimal) {
        (None, _) => out.push_str(&format!("{name} = Label {{}};\n")),
        (Some(body), true) => out.push_str(&format!("{name} = Label {{ {body} }};\n")),
        (Some(body), false) => {
            out.push_str(&format!("{name} = Label {{\n  {body}\n}};\n"));
        }
    }
}

/// `@Name = value;` formatting: booleans and literals stay bare, strings
/// and colors are quoted unless the author already quoted them.
fn format_variable(variable: &InterfaceVariable) -> String {
    match variable.kind() {
        VariableKind::Boolean | VariableKind::Literal => variable.value().to_string(),
        VariableKind::String | VariableKind::Color => {
            let value = variable.value();
            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                value.to_string()
            } else {
                format!("\"{}\"", value.replace('"', "\\\""))
            }
        }
    }
}

fn write_node(
    out: &mut String,
    arena: &NodeArena,
    id: NodeId,
    depth: usize,
    settings: &RenderSettings,
) {
    let node = arena.get(id);
    let indent = indent_for(depth, settings);
    let inner = indent_for(depth + 1, settings);

    out.push_str(&indent);
    out.push_str(&node.kind);
    if let Some(node_id) = &node.id {
        out.push_str(&format!(" #{node_id}"));
    }
    out.push_str(" {\n");

    for comment in &node.comments {
        out.push_str(&format!("{inner}// {comment}\n"));
    }
    for (name, value) in &node.variables {
        out.push_str(&format!("{inner}@{name} = {value};\n"));
    }
    for (name, value) in &node.properties {
        out.push_str(&format!(
            "{inner}{name}: {};\n",
            format_value(value, false)
        ));
    }
    if !node.styles.is_empty() {
        let entries: Vec<String> = node
            .styles
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        out.push_str(&format!("{inner}Style: ({});\n", entries.join(", ")));
    }

    for child in &node.children {
        match child {
            Child::Node(child_id) => {
                if !settings.minimal {
                    out.push('\n');
                }
                write_node(out, arena, *child_id, depth + 1, settings);
            }
            Child::Raw(text) => {
                for line in text.lines() {
                    out.push_str(&format!("{inner}{line}\n"));
                }
            }
        }
    }

    out.push_str(&indent);
    out.push_str("}\n");
}

fn indent_for(depth: usize, settings: &RenderSettings) -> String {
    if settings.minimal {
        String::new()
    } else {
        "  ".repeat(depth)
    }
}

/// Formats one property value. `bare` suppresses quoting entirely (the
/// `Style` map contract).
pub fn format_value(value: &Value, bare: bool) -> String {
    match value {
        Value::String(text) => format_scalar(text, bare),
        Value::Integer(int) => int.to_string(),
        Value::Float(float) => float.to_string(),
        Value::Boolean(flag) => flag.to_string(),
        Value::Literal(text) => text.clone(),
        Value::Map(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{key}: {}", format_value(value, bare)))
                .collect();
            format!("({})", rendered.join(", "))
        }
        Value::List(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| format_value(item, bare))
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Call(name, args) => {
            let rendered: Vec<String> = args
                .iter()
                .map(|arg| format_value(arg, bare))
                .collect();
            format!("{name}({})", rendered.join(", "))
        }
    }
}

fn format_scalar(text: &str, bare: bool) -> String {
    if bare {
        return text.to_string();
    }
    if let Some(key) = text.strip_prefix('%') {
        return format!("%{}", camel_case_key(key));
    }
    if text.starts_with('@') {
        return text.to_string();
    }
    if text == "true" || text == "false" {
        return text.to_string();
    }
    if text.parse::<i64>().is_ok() || text.parse::<f64>().is_ok() {
        return text.to_string();
    }
    if let Some(expanded) = expand_hex(text) {
        return expanded;
    }
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// `#abc` → `#aabbcc`; longer canonical hex (with an optional opacity
/// suffix) passes through. Returns `None` for anything that is not a
/// color token.
fn expand_hex(text: &str) -> Option<String> {
    let body = text.strip_prefix('#')?;
    let (hex, suffix) = match body.find('(') {
        Some(at) => (&body[..at], &body[at..]),
        None => (body, ""),
    };
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if hex.len() == 3 {
        let mut expanded = String::from("#");
        for c in hex.chars() {
            expanded.push(c);
            expanded.push(c);
        }
        expanded.push_str(suffix);
        return Some(expanded);
    }
    Some(text.to_string())
}

/// The target format forbids separators in i18n keys: snake, kebab, and
/// dot segments merge into one camelCase identifier.
fn camel_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (index, segment) in key
        .split(|c| matches!(c, '.' | '_' | '-'))
        .filter(|s| !s.is_empty())
        .enumerate()
    {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else { continue };
        if index == 0 {
            out.extend(first.to_lowercase());
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(chars.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i18n_keys_lose_their_separators() {
        assert_eq!(camel_case_key("menu.main_title"), "menuMainTitle");
        assert_eq!(camel_case_key("hud.score-label"), "hudScoreLabel");
        assert_eq!(camel_case_key("Single"), "single");
    }

    #[test]
    fn scalar_quoting() {
        assert_eq!(format_scalar("hello", false), "\"hello\"");
        assert_eq!(format_scalar("say \"hi\"", false), "\"say \\\"hi\\\"\"");
        assert_eq!(format_scalar("42", false), "42");
        assert_eq!(format_scalar("true", false), "true");
        assert_eq!(format_scalar("@Var", false), "@Var");
        assert_eq!(format_scalar("#abc", false), "#aabbcc");
        assert_eq!(format_scalar("#FF0000(0.5)", false), "#FF0000(0.5)");
        assert_eq!(format_scalar("%menu.title", false), "%menuTitle");
    }

    #[test]
    fn style_values_are_never_quoted() {
        assert_eq!(format_scalar("hello", true), "hello");
    }

    #[test]
    fn nested_maps_keep_quoting_outside_style() {
        let value = Value::Map(BTreeMap::from([
            ("Label".to_string(), Value::String("hi".to_string())),
            ("Width".to_string(), Value::Integer(3)),
        ]));
        assert_eq!(format_value(&value, false), "(Label: \"hi\", Width: 3)");
    }

    #[test]
    fn lists_and_calls() {
        let list = Value::List(vec![
            Value::String("a".to_string()),
            Value::String("B".to_string()),
        ]);
        assert_eq!(format_value(&list, false), "[\"a\", \"B\"]");

        let call = Value::Call("Lerp".to_string(), vec![Value::Integer(0), Value::Integer(1)]);
        assert_eq!(format_value(&call, false), "Lerp(0, 1)");
    }
}
