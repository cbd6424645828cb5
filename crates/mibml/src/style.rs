//! CSS-like style declarations mapped to target style/property entries.
//!
//! `apply_style` handles the constrained declaration set the dialect
//! supports. The property allow-list is strict — an unknown property name
//! is a hard [`MarkupError::UnsupportedProperty`] — while value handling
//! is lenient: a declaration missing its colon or a size that fails to
//! parse is skipped and the property left unset.
//!
//! Box declarations (`top`/`left`/`right`/`bottom`/`width`/`height` and
//! the `margin` variants) accumulate into the node's nested `Anchor` map.
//! Visual declarations land in the node's style map.

use phf::phf_set;

use crate::error::{MarkupError, Result};
use crate::node::ComponentNode;
use crate::value::Value;

/// `font-weight` values that switch on bold rendering.
static BOLD_WEIGHTS: phf::Set<&'static str> = phf_set! {
    "bold",
    "700",
    "800",
    "900",
};

/// Applies a `style="..."` attribute to a node.
///
/// Declarations are split on `;`, then on the first `:`. Property names
/// are case-insensitive.
pub fn apply_style(node: &mut ComponentNode, css: &str) -> Result<()> {
    for declaration in css.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let Some((name, value)) = declaration.split_once(':') else {
            log::debug!("skipping style declaration without colon: {declaration}");
            continue;
        };
        apply_declaration(node, &name.trim().to_ascii_lowercase(), value.trim())?;
    }
    Ok(())
}

fn apply_declaration(node: &mut ComponentNode, name: &str, value: &str) -> Result<()> {
    match name {
        "color" => {
            let color = convert_color(value)?;
            node.styles.insert("Color".to_string(), color);
        }
        "background" | "background-color" => {
            let color = convert_color(value)?;
            node.styles.insert("BackgroundColor".to_string(), color);
        }
        "text-outline-color" => {
            let color = convert_color(value)?;
            node.styles.insert("TextOutlineColor".to_string(), color);
        }

        "top" | "left" | "right" | "bottom" | "width" | "height" => {
            set_anchor_entry(node, name, value);
        }
        "margin-top" => set_anchor_entry(node, "top", value),
        "margin-right" => set_anchor_entry(node, "right", value),
        "margin-bottom" => set_anchor_entry(node, "bottom", value),
        "margin-left" => set_anchor_entry(node, "left", value),
        "margin" => apply_margin_shorthand(node, value),

        "padding" => {
            if let Some(size) = convert_size(value) {
                node.styles.insert("Padding".to_string(), size);
            }
        }

        "display" => {
            let visible = !value.eq_ignore_ascii_case("none");
            node.set_property("Visible", Value::Boolean(visible));
        }

        "font-weight" => {
            if BOLD_WEIGHTS.contains(value.to_ascii_lowercase().as_str()) {
                node.styles.insert("RenderBold".to_string(), "true".to_string());
            }
        }
        "font-size" => {
            if let Some(size) = convert_size(value) {
                node.styles.insert("FontSize".to_string(), size);
            }
        }
        "font-name" | "font-family" => {
            let name = value.trim_matches(|c| c == '"' || c == '\'');
            node.styles.insert("FontName".to_string(), name.to_string());
        }

        "text-align" => {
            if let Some(alignment) = horizontal_alignment(value) {
                node.styles.insert("TextAlign".to_string(), alignment.to_string());
            }
        }
        "vertical-align" => {
            if let Some(alignment) = vertical_alignment(value) {
                node.styles
                    .insert("VerticalAlign".to_string(), alignment.to_string());
            }
        }
        "text-transform" => match value.to_ascii_lowercase().as_str() {
            "uppercase" => {
                node.styles
                    .insert("RenderUppercase".to_string(), "true".to_string());
            }
            "none" | "normal" => {
                node.styles
                    .insert("RenderUppercase".to_string(), "false".to_string());
            }
            other => log::debug!("ignoring text-transform value: {other}"),
        },
        "text-decoration" => match value.to_ascii_lowercase().as_str() {
            "underline" => {
                node.styles
                    .insert("RenderUnderline".to_string(), "true".to_string());
            }
            "none" | "normal" => {
                node.styles
                    .insert("RenderUnderline".to_string(), "false".to_string());
            }
            other => log::debug!("ignoring text-decoration value: {other}"),
        },
        "word-wrap" => {
            let wrap = !value.eq_ignore_ascii_case("normal");
            node.styles
                .insert("WordWrap".to_string(), wrap.to_string());
        }
        "letter-spacing" => {
            if let Some(size) = convert_size(value) {
                node.styles.insert("LetterSpacing".to_string(), size);
            }
        }

        other => return Err(MarkupError::UnsupportedProperty(other.to_string())),
    }
    Ok(())
}

fn set_anchor_entry(node: &mut ComponentNode, side: &str, value: &str) {
    let key = crate::attrs::capitalize_property_name(side);
    if let Some(size) = convert_size(value) {
        node.set_anchor(&key, Value::Literal(size));
    }
}

/// `margin: a`, `margin: v h`, `margin: t r b l`.
fn apply_margin_shorthand(node: &mut ComponentNode, value: &str) {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let sides: [(usize, &str); 4] = match parts.len() {
        1 => [(0, "Top"), (0, "Right"), (0, "Bottom"), (0, "Left")],
        2 => [(0, "Top"), (1, "Right"), (0, "Bottom"), (1, "Left")],
        4 => [(0, "Top"), (1, "Right"), (2, "Bottom"), (3, "Left")],
        _ => {
            log::debug!("ignoring margin shorthand: {value}");
            return;
        }
    };
    for (index, side) in sides {
        if let Some(size) = convert_size(parts[index]) {
            node.set_anchor(side, Value::Literal(size));
        }
    }
}

fn horizontal_alignment(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "left" | "start" => Some("Left"),
        "center" => Some("Center"),
        "right" | "end" => Some("Right"),
        _ => None,
    }
}

fn vertical_alignment(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "top" | "start" => Some("Top"),
        "center" | "middle" => Some("Center"),
        "bottom" | "end" => Some("Bottom"),
        _ => None,
    }
}

/// Converts a CSS color literal into the target `#RRGGBB[(opacity)]` form.
///
/// - `#RGB` expands to `#RRGGBB`; 6- and 8-digit hex pass through.
/// - `rgb(r, g, b)` becomes uppercase `#RRGGBB`.
/// - `rgba(r, g, b, a)` becomes `#RRGGBB(opacity)` with the opacity
///   normalized to 0–1; an alpha above 1 is read as 0–255.
/// - `@Variable` references pass through unresolved.
///
/// Anything else — named colors included — is a hard error.
pub fn convert_color(input: &str) -> Result<String> {
    let input = input.trim();
    if input.starts_with('@') {
        return Ok(input.to_string());
    }

    if let Some(body) = input.strip_prefix('#') {
        // Keep an existing "(opacity)" suffix so canonical output is a
        // fixed point of this conversion.
        let (hex, suffix) = match body.find('(') {
            Some(at) => (&body[..at], &body[at..]),
            None => (body, ""),
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MarkupError::UnsupportedColor(input.to_string()));
        }
        return match hex.len() {
            3 => {
                let mut expanded = String::from("#");
                for c in hex.chars() {
                    expanded.push(c);
                    expanded.push(c);
                }
                expanded.push_str(suffix);
                Ok(expanded)
            }
            6 | 8 => Ok(input.to_string()),
            _ => Err(MarkupError::UnsupportedColor(input.to_string())),
        };
    }

    let lower = input.to_ascii_lowercase();
    if (lower.starts_with("rgb(") || lower.starts_with("rgba(")) && lower.ends_with(')') {
        let open = input.find('(').expect("checked prefix");
        let args: Vec<&str> = input[open + 1..input.len() - 1].split(',').collect();
        if args.len() != 3 && args.len() != 4 {
            return Err(MarkupError::UnsupportedColor(input.to_string()));
        }

        let mut channels = [0u8; 3];
        for (slot, arg) in channels.iter_mut().zip(&args) {
            let channel: f64 = arg
                .trim()
                .parse()
                .map_err(|_| MarkupError::UnsupportedColor(input.to_string()))?;
            *slot = channel.round().clamp(0.0, 255.0) as u8;
        }
        let hex = format!("#{:02X}{:02X}{:02X}", channels[0], channels[1], channels[2]);

        if args.len() == 4 {
            let mut alpha: f64 = args[3]
                .trim()
                .parse()
                .map_err(|_| MarkupError::UnsupportedColor(input.to_string()))?;
            if alpha > 1.0 {
                alpha /= 255.0;
            }
            let alpha = alpha.clamp(0.0, 1.0);
            return Ok(format!("{hex}({})", format_opacity(alpha)));
        }
        return Ok(hex);
    }

    Err(MarkupError::UnsupportedColor(input.to_string()))
}

/// At most two decimals, trailing zeros trimmed.
fn format_opacity(alpha: f64) -> String {
    let formatted = format!("{alpha:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts a CSS size to a bare numeric token.
///
/// Strips `px`, converts `em` at 16px/em, and approximates `%` with a
/// fixed ×10 scalar (there is no parent-size awareness in this dialect).
/// Returns `None` when the value is not numeric; callers skip the
/// declaration in that case.
pub fn convert_size(value: &str) -> Option<String> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();

    let (number, scale) = if let Some(body) = lower.strip_suffix("px") {
        (body.trim().to_string(), 1.0)
    } else if let Some(body) = lower.strip_suffix("em") {
        (body.trim().to_string(), 16.0)
    } else if let Some(body) = lower.strip_suffix('%') {
        (body.trim().to_string(), 10.0)
    } else {
        (lower.clone(), 1.0)
    };

    let parsed: f64 = match number.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            log::debug!("ignoring non-numeric size: {value}");
            return None;
        }
    };
    Some(format_number(parsed * scale))
}

fn format_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_expansion() {
        assert_eq!(convert_color("#abc").unwrap(), "#aabbcc");
        assert_eq!(convert_color("#aabbcc").unwrap(), "#aabbcc");
    }

    #[test]
    fn rgb_conversion() {
        assert_eq!(convert_color("rgb(255, 0, 0)").unwrap(), "#FF0000");
        assert_eq!(convert_color("rgba(255, 0, 0, 0.5)").unwrap(), "#FF0000(0.5)");
        assert_eq!(convert_color("rgba(255, 0, 0, 128)").unwrap(), "#FF0000(0.5)");
    }

    #[test]
    fn canonical_hex_is_a_fixed_point() {
        for input in ["#abc", "rgb(255,0,0)", "rgba(12, 34, 56, 0.25)"] {
            let once = convert_color(input).unwrap();
            assert_eq!(convert_color(&once).unwrap(), once);
        }
    }

    #[test]
    fn named_colors_are_rejected() {
        assert!(matches!(
            convert_color("white"),
            Err(MarkupError::UnsupportedColor(_))
        ));
    }

    #[test]
    fn variable_reference_passes_through() {
        assert_eq!(convert_color("@Primary").unwrap(), "@Primary");
    }

    #[test]
    fn size_units() {
        assert_eq!(convert_size("100px").unwrap(), "100");
        assert_eq!(convert_size("1.5em").unwrap(), "24");
        assert_eq!(convert_size("50%").unwrap(), "500");
        assert_eq!(convert_size("7").unwrap(), "7");
        assert_eq!(convert_size("0.5px").unwrap(), "0.5");
        assert!(convert_size("wide").is_none());
    }

    #[test]
    fn unsupported_property_is_a_hard_error() {
        let mut node = ComponentNode::new("Group");
        let result = apply_style(&mut node, "z-index: 5");
        assert!(matches!(result, Err(MarkupError::UnsupportedProperty(p)) if p == "z-index"));
    }

    #[test]
    fn box_properties_accumulate_into_anchor() {
        let mut node = ComponentNode::new("Group");
        apply_style(&mut node, "width: 100px; top: 2em").unwrap();
        apply_style(&mut node, "margin-left: 4px").unwrap();

        let Some(Value::Map(anchor)) = node.property("Anchor") else {
            panic!("expected anchor map");
        };
        assert_eq!(anchor["Width"], Value::Literal("100".into()));
        assert_eq!(anchor["Top"], Value::Literal("32".into()));
        assert_eq!(anchor["Left"], Value::Literal("4".into()));
    }

    #[test]
    fn display_none_hides() {
        let mut node = ComponentNode::new("Group");
        apply_style(&mut node, "display: none").unwrap();
        assert_eq!(node.property("Visible"), Some(&Value::Boolean(false)));

        apply_style(&mut node, "display: flex").unwrap();
        assert_eq!(node.property("Visible"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn malformed_declaration_is_skipped() {
        let mut node = ComponentNode::new("Group");
        apply_style(&mut node, "just-noise; width: oops").unwrap();
        assert!(node.property("Anchor").is_none());
    }
}
