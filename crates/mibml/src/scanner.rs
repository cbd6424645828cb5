//! Regex-driven tag scanning.
//!
//! The scanner recognizes opening, closing, and self-closing tags (with an
//! optional `Prefix.` namespace), strips HTML comments, and isolates the
//! declarative `<script type="text/customui">` block plus any
//! `<script type="text/javascript">` import-only blocks before the tree
//! builder walks the remaining markup.
//!
//! Closing tags are matched with a depth counter rather than a grammar:
//! scanning forward from an opening tag, every same-named opening tag
//! increments depth and every same-named closing tag decrements it. An
//! element with no matching close is treated as self-closing.

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;

/// Tags that never take children, with or without a trailing slash.
static SELF_CLOSING_TAGS: phf::Set<&'static str> = phf_set! {
    "img",
    "input",
};

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<(/?)\s*(?:([a-zA-Z_$][a-zA-Z0-9_]*)\s*\.\s*)?([a-zA-Z][a-zA-Z0-9_-]*)((?:"[^"]*"|'[^']*'|[^<>"'])*?)(/?)\s*>"#,
    )
    .expect("tag pattern")
});

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));

static SCRIPT_UI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']text/customui["'][^>]*>(.*?)</script\s*>"#)
        .expect("script pattern")
});

static SCRIPT_JS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']text/javascript["'][^>]*>(.*?)</script\s*>"#)
        .expect("script pattern")
});

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s+([A-Za-z_][A-Za-z0-9_]*)\s+from\s+["']([^"']+)["']"#)
        .expect("import pattern")
});

/// A single recognized tag in the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct TagToken {
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    /// True for `</name>` tokens.
    pub closing: bool,
    /// Namespace token before the dot, e.g. `Common` in `<Common.Button>`.
    pub prefix: Option<String>,
    /// The tag name as written (case preserved).
    pub name: String,
    /// The raw attribute substring between name and `>`.
    pub attrs: String,
    /// True when the tag carries a trailing slash or is on the
    /// always-self-closing allow-list.
    pub self_closing: bool,
}

impl TagToken {
    /// Case-insensitive tag name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Finds the next tag at or after `from`, or `None` if the remainder of
/// the input is plain text.
pub fn next_tag(text: &str, from: usize) -> Option<TagToken> {
    let caps = TAG_RE.captures_at(text, from)?;
    let whole = caps.get(0).expect("match");
    let closing = !caps[1].is_empty();
    let name = caps[3].to_string();
    let self_closing =
        !caps[5].is_empty() || SELF_CLOSING_TAGS.contains(name.to_ascii_lowercase().as_str());

    Some(TagToken {
        start: whole.start(),
        end: whole.end(),
        closing,
        prefix: caps.get(2).map(|m| m.as_str().to_string()),
        name,
        attrs: caps[4].trim().to_string(),
        self_closing,
    })
}

/// Finds the closing tag matching an opening tag of `name`, scanning
/// forward from `from` (just past the opening tag).
///
/// Same-named opening tags increment a depth counter, same-named closing
/// tags decrement it; the close that brings the depth to zero wins.
/// Returns `None` when the input ends first, in which case the element is
/// treated as self-closing.
pub fn find_matching_close(text: &str, from: usize, name: &str) -> Option<TagToken> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(token) = next_tag(text, pos) {
        pos = token.end;
        if !token.is_named(name) {
            continue;
        }
        if token.closing {
            depth -= 1;
            if depth == 0 {
                return Some(token);
            }
        } else if !token.self_closing {
            depth += 1;
        }
    }
    None
}

/// Removes all `<!-- ... -->` comments from the source.
pub fn strip_comments(source: &str) -> String {
    COMMENT_RE.replace_all(source, "").into_owned()
}

/// Script content isolated from the markup body.
#[derive(Clone, Debug, Default)]
pub struct ScriptHarvest {
    /// The markup with all script blocks removed.
    pub markup: String,
    /// Body of the declarative `text/customui` block, if present.
    pub declarations: Option<String>,
    /// Alias declarations harvested from javascript `import` statements,
    /// with a leading `@/` rewritten to `../`.
    pub imports: Vec<(String, String)>,
}

/// Splits script blocks out of the source.
///
/// At most one `text/customui` block is honored; extra blocks are dropped
/// with a warning. Javascript blocks are only mined for
/// `import Name from "path"` statements.
pub fn extract_scripts(source: &str) -> ScriptHarvest {
    let mut declarations: Option<String> = None;
    for caps in SCRIPT_UI_RE.captures_iter(source) {
        if declarations.is_some() {
            log::warn!("ignoring extra text/customui script block");
            break;
        }
        declarations = Some(caps[1].to_string());
    }

    let mut imports = Vec::new();
    for caps in SCRIPT_JS_RE.captures_iter(source) {
        for import in IMPORT_RE.captures_iter(&caps[1]) {
            let name = import[1].to_string();
            let path = import[2].to_string();
            let path = match path.strip_prefix("@/") {
                Some(rest) => format!("../{rest}"),
                None => path,
            };
            imports.push((name, path));
        }
    }

    let without_ui = SCRIPT_UI_RE.replace_all(source, "");
    let markup = SCRIPT_JS_RE.replace_all(&without_ui, "").into_owned();

    ScriptHarvest {
        markup,
        declarations,
        imports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_open_and_close() {
        let text = "hello <div id=\"x\"> world </div>";
        let open = next_tag(text, 0).unwrap();
        assert!(!open.closing);
        assert_eq!(open.name, "div");
        assert_eq!(open.attrs, "id=\"x\"");

        let close = next_tag(text, open.end).unwrap();
        assert!(close.closing);
        assert!(close.is_named("DIV"));
    }

    #[test]
    fn recognizes_prefix() {
        let token = next_tag("<Common.Button value=\"Ok\"/>", 0).unwrap();
        assert_eq!(token.prefix.as_deref(), Some("Common"));
        assert_eq!(token.name, "Button");
        assert!(token.self_closing);
    }

    #[test]
    fn allow_listed_tags_are_self_closing() {
        let token = next_tag("<img src=\"a.png\">", 0).unwrap();
        assert!(token.self_closing);
        let token = next_tag("<INPUT type=\"text\">", 0).unwrap();
        assert!(token.self_closing);
    }

    #[test]
    fn depth_counter_skips_nested_same_name() {
        let text = "<div><div>inner</div>tail</div>done";
        let open = next_tag(text, 0).unwrap();
        let close = find_matching_close(text, open.end, "div").unwrap();
        assert_eq!(&text[close.start..close.end], "</div>");
        assert_eq!(&text[close.end..], "done");
    }

    #[test]
    fn missing_close_reports_none() {
        let text = "<div><span>loose";
        let open = next_tag(text, 0).unwrap();
        assert!(find_matching_close(text, open.end, "div").is_none());
    }

    #[test]
    fn strips_comments() {
        let text = "a <!-- remove\nme --> b";
        assert_eq!(strip_comments(text), "a  b");
    }

    #[test]
    fn harvests_scripts() {
        let text = concat!(
            "<script type=\"text/customui\">@A = true</script>",
            "<script type=\"text/javascript\">import Widgets from \"@/Widgets.ui\";</script>",
            "<div></div>",
        );
        let harvest = extract_scripts(text);
        assert_eq!(harvest.declarations.as_deref(), Some("@A = true"));
        assert_eq!(
            harvest.imports,
            vec![("Widgets".to_string(), "../Widgets.ui".to_string())]
        );
        assert_eq!(harvest.markup, "<div></div>");
    }
}
