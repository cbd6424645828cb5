//! Attribute string parsing and name normalization.
//!
//! Splits the raw attribute substring of a tag into a name → value map.
//! Attribute names are normalized to PascalCase (`max-length` →
//! `MaxLength`, `placeholder` → `Placeholder`); a leading `:` marks a
//! binding attribute and is kept on the normalized key so the tree
//! builder can route the value through the binding grammar.
//!
//! Values beginning with `%` (i18n path) or `@` (variable reference) are
//! stored verbatim; substitution happens at render time in the host
//! runtime, never here.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(:?[a-zA-Z_][a-zA-Z0-9_-]*)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>]+)))?"#)
        .expect("attribute pattern")
});

/// Parses a raw attribute substring into normalized name → raw value.
///
/// Standalone attributes (no `=`) get the literal value `"true"`. Later
/// duplicates overwrite earlier ones.
pub fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    for caps in ATTR_RE.captures_iter(raw) {
        let name = capitalize_property_name(&caps[1]);
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "true".to_string());
        attrs.insert(name, value);
    }
    attrs
}

/// Normalizes an attribute or property name to PascalCase.
///
/// Kebab-case segments are split on `-` and each capitalized
/// (`prop-name` → `PropName`); camelCase and lowercase names simply get
/// their first character upper-cased. A leading `:` (binding marker) is
/// preserved.
pub fn capitalize_property_name(name: &str) -> String {
    let (marker, rest) = match name.strip_prefix(':') {
        Some(rest) => (":", rest),
        None => ("", name),
    };

    let mut out = String::with_capacity(name.len());
    out.push_str(marker);
    for segment in rest.split('-') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_normalization() {
        assert_eq!(capitalize_property_name("value"), "Value");
        assert_eq!(capitalize_property_name("max-length"), "MaxLength");
        assert_eq!(capitalize_property_name("maxLength"), "MaxLength");
        assert_eq!(capitalize_property_name(":visible"), ":Visible");
        assert_eq!(capitalize_property_name(":font-size"), ":FontSize");
    }

    #[test]
    fn quoted_and_standalone() {
        let attrs = parse_attributes(r#"id="Login" readonly value='Ok'"#);
        assert_eq!(attrs["Id"], "Login");
        assert_eq!(attrs["Readonly"], "true");
        assert_eq!(attrs["Value"], "Ok");
    }

    #[test]
    fn binding_marker_is_kept() {
        let attrs = parse_attributes(r#":visible="@Flag""#);
        assert_eq!(attrs[":Visible"], "@Flag");
    }

    #[test]
    fn sigil_values_pass_through() {
        let attrs = parse_attributes(r#"text="%menu.title" color="@Primary""#);
        assert_eq!(attrs["Text"], "%menu.title");
        assert_eq!(attrs["Color"], "@Primary");
    }

    #[test]
    fn last_write_wins() {
        let attrs = parse_attributes(r#"value="a" value="b""#);
        assert_eq!(attrs["Value"], "b");
    }
}
