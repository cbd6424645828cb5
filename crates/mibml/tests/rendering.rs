//! Integration tests for DSL text generation.
//!
//! Exercises the full pipeline end to end: emission order, the quoting
//! contract, generated style-alias blocks, pretty vs minimal formatting,
//! and the per-template render cache.

use mibml::{RenderSettings, parse};

// ============================================================================
// FULL DOCUMENTS
// ============================================================================

#[test]
fn test_pretty_document() {
    let source = r#"
        <script type="text/customui">
            @Title = "Quests"
        </script>
        <div id="panel" style="width: 100px; color: #abc">
            <h1>Hi</h1>
        </div>
    "#;

    let mut template = parse(source).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert_eq!(
        dsl,
        "@MIBH1 = Label {\n  Style: (FontSize: 28, RenderBold: true);\n};\n\
         @Title = \"Quests\";\n\
         \n\
         Group {\n\
         \n  Group #Panel {\n\
         \x20   Anchor: (Width: 100);\n\
         \x20   Style: (Color: #aabbcc);\n\
         \n    @MIBH1 {\n\
         \x20     Text: \"Hi\";\n\
         \x20   }\n\
         \x20 }\n\
         }\n"
    );
}

#[test]
fn test_minimal_document() {
    let source = r#"
        <script type="text/customui">
            @Title = "Quests"
        </script>
        <div id="panel" style="width: 100px; color: #abc">
            <h1>Hi</h1>
        </div>
    "#;

    let mut template = parse(source).unwrap();
    let dsl = template.render(&RenderSettings::minimal());
    assert_eq!(
        dsl,
        "@MIBH1 = Label { Style: (FontSize: 28, RenderBold: true); };\n\
         @Title = \"Quests\";\n\
         Group {\n\
         Group #Panel {\n\
         Anchor: (Width: 100);\n\
         Style: (Color: #aabbcc);\n\
         @MIBH1 {\n\
         Text: \"Hi\";\n\
         }\n\
         }\n\
         }\n"
    );
    assert!(!dsl.contains("\n\n"));
    assert!(!dsl.contains("  "));
}

// ============================================================================
// EMISSION ORDER AND HEADERS
// ============================================================================

#[test]
fn test_alias_imports_come_first_and_sorted() {
    let source = r#"
        <script type="text/customui">$Widgets = "../Shared/Widgets.ui"</script>
        <Widgets.Panel/>
        <Common.Button value="Ok"/>
    "#;
    let mut template = parse(source).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.starts_with(
        "$Common = \"../Common.ui\";\n$Widgets = \"../Shared/Widgets.ui\";\n"
    ));
    assert!(dsl.contains("$Common.Button {"));
    assert!(dsl.contains("$Widgets.Panel {"));
}

#[test]
fn test_unknown_alias_without_default_is_dropped() {
    let mut template = parse("<Mystery.Panel/>").unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(!dsl.contains("$Mystery ="));
    assert!(dsl.contains("$Mystery.Panel {"));
}

#[test]
fn test_generated_style_blocks() {
    let mut template = parse("<p>body</p><span>hint</span><h3>head</h3>").unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("@MIBH3 = Label {\n  Style: (FontSize: 20, RenderBold: true);\n};\n"));
    assert!(dsl.contains("@MIBP = Label {\n  Anchor: (Bottom: 8);\n};\n"));
    assert!(dsl.contains("@MIBSpan = Label {};\n"));
}

#[test]
fn test_only_used_tags_get_style_blocks() {
    let mut template = parse("<h1>one</h1>").unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("@MIBH1 = Label {"));
    assert!(!dsl.contains("@MIBH2"));
    assert!(!dsl.contains("@MIBSpan"));
}

#[test]
fn test_variable_lines_follow_their_kinds() {
    let source = r#"
        <script type="text/customui">
            @A = true
            @B = 14
            @C = #abc
            @D = "hi"
        </script>
        <div></div>
    "#;
    let mut template = parse(source).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("@A = true;\n@B = 14;\n@C = \"#aabbcc\";\n@D = \"hi\";\n"));
}

// ============================================================================
// QUOTING CONTRACT
// ============================================================================

#[test]
fn test_i18n_paths_are_camel_cased_and_bare() {
    let mut template = parse(r#"<span text="%menu.main_title"></span>"#).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("Text: %menuMainTitle;"));
}

#[test]
fn test_variable_references_stay_bare() {
    let mut template = parse(r#"<div color="@Primary"></div>"#).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("Color: @Primary;"));
}

#[test]
fn test_option_lists_keep_string_quoting() {
    let mut template =
        parse(r#"<select><option value="a">A</option><option>B</option></select>"#).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("Options: [\"a\", \"B\"];"));
}

#[test]
fn test_numeric_looking_strings_are_bare() {
    let mut template = parse(r#"<div rows="3" label="3 rows"></div>"#).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("Rows: 3;"));
    assert!(dsl.contains("Label: \"3 rows\";"));
}

#[test]
fn test_escaped_quotes_round_trip_through_variables() {
    let source = r##"
        <script type="text/customui">
            @Msg = "say \"hi\""
        </script>
        <div></div>
    "##;
    let mut template = parse(source).unwrap();
    let dsl = template.render(&RenderSettings::default());
    assert!(dsl.contains("@Msg = \"say \\\"hi\\\"\";\n"));
}

// ============================================================================
// RENDER CACHE
// ============================================================================

#[test]
fn test_rendering_is_deterministic() {
    let source = r#"<div id="a" style="color: #fff; width: 10px"><span>x</span></div>"#;
    let mut first = parse(source).unwrap();
    let mut second = parse(source).unwrap();
    assert_eq!(
        first.render(&RenderSettings::default()),
        second.render(&RenderSettings::default())
    );
}

#[test]
fn test_repeat_renders_reuse_the_cache() {
    let mut template = parse("<div><h1>Hi</h1></div>").unwrap();
    let settings = RenderSettings::default();
    let first = template.render(&settings);
    assert!(!template.is_dirty());
    assert_eq!(template.render(&settings), first);
}

#[test]
fn test_setting_a_variable_invalidates_the_cache() {
    let source = r#"
        <script type="text/customui">@Title = "Hello"</script>
        <div></div>
    "#;
    let mut template = parse(source).unwrap();
    let settings = RenderSettings::default();
    let before = template.render(&settings);
    assert!(before.contains("@Title = \"Hello\";"));

    template.set_variable("Title", "Goodbye");
    assert!(template.is_dirty());
    let after = template.render(&settings);
    assert!(after.contains("@Title = \"Goodbye\";"));
    assert!(!template.is_dirty());
}

#[test]
fn test_changing_settings_recomputes() {
    let mut template = parse("<div><h1>Hi</h1></div>").unwrap();
    let pretty = template.render(&RenderSettings::default());
    let minimal = template.render(&RenderSettings::minimal());
    assert_ne!(pretty, minimal);
    assert_eq!(template.render(&RenderSettings::default()), pretty);
}
