//! Script-block extraction: template variables, aliases, and root
//! property statements.
//!
//! The declarative script block holds three statement shapes:
//!
//! - `@Name = value` — a typed template variable
//! - `$Name = "path"` — an alias to an external DSL file
//! - `Name = value` — a property applied to the root component
//!
//! Extraction runs two regex passes per statement shape, quoted form
//! first. The unquoted patterns can re-match inside an already-consumed
//! quoted assignment, so the scan keeps a high-water offset and a
//! seen-name check: quoted wins, first match wins. This mirrors the
//! historical extraction behavior on purpose; tightening it to a single
//! pass would silently change accepted input.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MarkupError, Result};
use crate::style::convert_color;

static QUOTED_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@([A-Za-z_][A-Za-z0-9_]*)\s*=\s*"((?:[^"\\]|\\.)*)""#).expect("variable pattern")
});

static UNQUOTED_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([^"\s;][^;\r\n]*)"#).expect("variable pattern")
});

static QUOTED_ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\$([A-Za-z_][A-Za-z0-9_]*)\s*=\s*"([^"]*)""#).expect("alias pattern")
});

static UNQUOTED_ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\$([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([^"\s;]+)"#).expect("alias pattern")
});

static ROOT_PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.+?);?\s*$"#).expect("property pattern")
});

static VAR_LHS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^@[A-Za-z_][A-Za-z0-9_]*$"#).expect("identifier pattern"));

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#[0-9a-fA-F]{3,8}$"#).expect("hex pattern"));

/// Classification of a template variable's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Emitted unquoted as `true`/`false`.
    Boolean,
    /// Canonical `#RRGGBB[(opacity)]`, emitted quoted.
    Color,
    /// Emitted quoted.
    String,
    /// Raw unquoted text, emitted verbatim.
    Literal,
}

/// A typed `@Name` template variable. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceVariable {
    value: String,
    kind: VariableKind,
}

impl InterfaceVariable {
    pub fn new(value: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }
}

/// Everything extracted from one declarative script block.
#[derive(Clone, Debug, Default)]
pub struct ScriptBindings {
    /// Template variables keyed by name without the `@` sigil.
    pub variables: BTreeMap<String, InterfaceVariable>,
    /// Alias name → relative import path.
    pub aliases: BTreeMap<String, String>,
    /// Free-standing `Name = value` statements, applied to the root
    /// component once parsing completes.
    pub root_properties: Vec<(String, String)>,
}

/// Validates and extracts a script block.
pub fn parse_script_block(block: &str) -> Result<ScriptBindings> {
    validate_script(block)?;

    let mut bindings = ScriptBindings::default();
    extract_variables(block, &mut bindings)?;
    extract_aliases(block, &mut bindings);
    extract_root_properties(block, &mut bindings);
    Ok(bindings)
}

/// Syntax validation, run before any extraction.
///
/// Fails with the offending line when an `@` statement lacks `=`, the
/// left-hand side is not a valid `@Name` token, or a line carries an odd
/// number of unescaped quotes.
fn validate_script(block: &str) -> Result<()> {
    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        if unescaped_quote_count(trimmed) % 2 != 0 {
            return Err(MarkupError::InvalidSyntax(format!(
                "unterminated string: {trimmed}"
            )));
        }

        if trimmed.starts_with('@') {
            let Some((lhs, _)) = trimmed.split_once('=') else {
                return Err(MarkupError::InvalidSyntax(format!(
                    "variable statement without '=': {trimmed}"
                )));
            };
            if !VAR_LHS_RE.is_match(lhs.trim()) {
                return Err(MarkupError::InvalidSyntax(format!(
                    "invalid variable name: {trimmed}"
                )));
            }
        }
    }
    Ok(())
}

fn unescaped_quote_count(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => count += 1,
            _ => escaped = false,
        }
        if c != '\\' {
            escaped = false;
        }
    }
    count
}

fn extract_variables(block: &str, bindings: &mut ScriptBindings) -> Result<()> {
    struct Assignment<'a> {
        start: usize,
        end: usize,
        name: &'a str,
        value: &'a str,
        quoted: bool,
    }

    let mut assignments = Vec::new();
    for caps in QUOTED_VAR_RE.captures_iter(block) {
        let whole = caps.get(0).expect("match");
        assignments.push(Assignment {
            start: whole.start(),
            end: whole.end(),
            name: caps.get(1).expect("name").as_str(),
            value: caps.get(2).expect("value").as_str(),
            quoted: true,
        });
    }
    for caps in UNQUOTED_VAR_RE.captures_iter(block) {
        let whole = caps.get(0).expect("match");
        assignments.push(Assignment {
            start: whole.start(),
            end: whole.end(),
            name: caps.get(1).expect("name").as_str(),
            value: caps.get(2).expect("value").as_str(),
            quoted: false,
        });
    }
    // Position order, quoted before unquoted on a tie; a match starting
    // inside an already-consumed assignment is a regex double-match and
    // gets dropped.
    assignments.sort_by_key(|a| (a.start, !a.quoted));

    let mut last_end = 0;
    for assignment in assignments {
        if assignment.start < last_end || bindings.variables.contains_key(assignment.name) {
            continue;
        }
        let variable = if assignment.quoted {
            classify_quoted(&unescape_quoted(assignment.value))?
        } else {
            classify_unquoted(assignment.value.trim())?
        };
        bindings.variables.insert(assignment.name.to_string(), variable);
        last_end = assignment.end;
    }
    Ok(())
}

/// Reverses the `\"` and `\\` escapes of a quoted capture. Stored
/// values hold real characters; the serializer re-escapes on emission.
fn unescape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Quoted values are strings unless they look like a color.
fn classify_quoted(value: &str) -> Result<InterfaceVariable> {
    if HEX_COLOR_RE.is_match(value) && (value.len() == 7 || value.len() == 9) {
        return Ok(InterfaceVariable::new(value, VariableKind::Color));
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        let converted = convert_color(value)?;
        return Ok(InterfaceVariable::new(converted, VariableKind::Color));
    }
    Ok(InterfaceVariable::new(value, VariableKind::String))
}

/// Unquoted values: booleans and colors get their kinds, the rest stays
/// a raw literal emitted without quotes.
fn classify_unquoted(value: &str) -> Result<InterfaceVariable> {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return Ok(InterfaceVariable::new(
            value.to_ascii_lowercase(),
            VariableKind::Boolean,
        ));
    }
    if HEX_COLOR_RE.is_match(value) {
        let converted = convert_color(value)?;
        return Ok(InterfaceVariable::new(converted, VariableKind::Color));
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        let converted = convert_color(value)?;
        return Ok(InterfaceVariable::new(converted, VariableKind::Color));
    }
    Ok(InterfaceVariable::new(value, VariableKind::Literal))
}

fn extract_aliases(block: &str, bindings: &mut ScriptBindings) {
    for caps in QUOTED_ALIAS_RE.captures_iter(block) {
        bindings
            .aliases
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].to_string());
    }
    // Quoted form takes precedence over an unquoted duplicate.
    for caps in UNQUOTED_ALIAS_RE.captures_iter(block) {
        bindings
            .aliases
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].to_string());
    }
}

fn extract_root_properties(block: &str, bindings: &mut ScriptBindings) {
    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('@')
            || trimmed.starts_with('$')
            || trimmed.starts_with("//")
        {
            continue;
        }
        let Some(caps) = ROOT_PROPERTY_RE.captures(trimmed) else {
            continue;
        };
        let name = caps[1].to_string();
        let value = caps[2].trim().trim_matches('"').to_string();
        bindings.root_properties.push((name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_classification() {
        let bindings = parse_script_block(
            "@Title = \"Hello\"\n@Accent = \"#FFCC00\"\n@Faded = \"rgba(255, 0, 0, 0.5)\"",
        )
        .unwrap();
        assert_eq!(bindings.variables["Title"].kind(), VariableKind::String);
        assert_eq!(bindings.variables["Accent"].kind(), VariableKind::Color);
        let faded = &bindings.variables["Faded"];
        assert_eq!(faded.kind(), VariableKind::Color);
        assert_eq!(faded.value(), "#FF0000(0.5)");
    }

    #[test]
    fn unquoted_classification() {
        let bindings =
            parse_script_block("@Shown = true\n@Accent = #abc\n@Count = 3").unwrap();
        assert_eq!(bindings.variables["Shown"].kind(), VariableKind::Boolean);
        let accent = &bindings.variables["Accent"];
        assert_eq!(accent.kind(), VariableKind::Color);
        assert_eq!(accent.value(), "#aabbcc");
        assert_eq!(bindings.variables["Count"].kind(), VariableKind::Literal);
    }

    #[test]
    fn quoted_wins_over_unquoted() {
        let bindings = parse_script_block("@Name = \"quoted value\"").unwrap();
        let name = &bindings.variables["Name"];
        assert_eq!(name.kind(), VariableKind::String);
        assert_eq!(name.value(), "quoted value");
        assert_eq!(bindings.variables.len(), 1);
    }

    #[test]
    fn quoted_escapes_are_unescaped() {
        let bindings =
            parse_script_block("@Msg = \"say \\\"hi\\\"\"\n@Path = \"C:\\\\ui\"").unwrap();
        assert_eq!(bindings.variables["Msg"].value(), "say \"hi\"");
        assert_eq!(bindings.variables["Path"].value(), "C:\\ui");
    }

    #[test]
    fn missing_equals_is_rejected() {
        let result = parse_script_block("@Broken");
        assert!(matches!(result, Err(MarkupError::InvalidSyntax(m)) if m.contains("@Broken")));
    }

    #[test]
    fn invalid_lhs_is_rejected() {
        let result = parse_script_block("@Bad Name = 1");
        assert!(matches!(result, Err(MarkupError::InvalidSyntax(_))));
    }

    #[test]
    fn odd_quotes_are_rejected() {
        let result = parse_script_block("@Name = \"oops");
        assert!(matches!(result, Err(MarkupError::InvalidSyntax(m)) if m.contains("unterminated")));
    }

    #[test]
    fn aliases_prefer_quoted_form() {
        let bindings =
            parse_script_block("$Common = \"../Shared.ui\"\n$Extra = ../Extra.ui").unwrap();
        assert_eq!(bindings.aliases["Common"], "../Shared.ui");
        assert_eq!(bindings.aliases["Extra"], "../Extra.ui");
    }

    #[test]
    fn root_properties_are_collected() {
        let bindings =
            parse_script_block("@Var = 1\nBackgroundColor = \"#000000\"\nLocked = true").unwrap();
        assert_eq!(
            bindings.root_properties,
            vec![
                ("BackgroundColor".to_string(), "#000000".to_string()),
                ("Locked".to_string(), "true".to_string()),
            ]
        );
    }
}
