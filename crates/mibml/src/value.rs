//! The typed property value union and the binding-attribute grammar.
//!
//! Every component property carries a [`Value`] rather than a raw string,
//! so the serializer can apply its quoting rules per kind instead of
//! sniffing string contents at emit time.
//!
//! Binding attributes (`:visible="@Flag"`, `:anchor="(Top: 2, Left: 4)"`)
//! are parsed with a small nom grammar:
//!
//! - `@Name` variable references (substituted later by the tree builder)
//! - `(Key: value, Key2: value2)` object literals, recursively nested
//! - `Name(arg, arg)` function calls
//! - booleans, integers, doubles
//! - quoted or bare strings

use std::collections::BTreeMap;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, multispace0},
    combinator::map,
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair, tuple},
};

/// A single property value in the component tree.
///
/// `Literal` carries raw unquoted text that is emitted verbatim (variable
/// references, pre-formatted numbers from the style mapper). `Call` and
/// `List` cover the `Name(args)` and `[a, b]` forms of the target DSL.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A parenthesized `(Key: value, ...)` block, recursively nested.
    Map(BTreeMap<String, Value>),
    /// Raw text emitted without quoting.
    Literal(String),
    /// A `Name(arg, arg)` invocation with ordered arguments.
    Call(String, Vec<Value>),
    /// A `[a, b]` list, e.g. the `Options` of a combo box.
    List(Vec<Value>),
}

impl Value {
    /// Returns the variable name if this is a `@Name` reference literal.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Value::Literal(text) => text.strip_prefix('@'),
            _ => None,
        }
    }
}

/// Parses a binding-attribute value.
///
/// Falls back to treating the whole input as a plain string when the
/// grammar does not consume it entirely; binding values are authored
/// decoration and a stray token should not abort the compile.
pub fn parse_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    match parse_value(trimmed) {
        Ok((rest, value)) if rest.trim().is_empty() => value,
        _ => Value::String(trimmed.to_string()),
    }
}

/// Parses a single value of the binding grammar.
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    preceded(
        multispace0,
        alt((parse_map, parse_quoted, parse_call, parse_bare)),
    )(input)
}

/// Parses a parenthesized `(Key: value, ...)` object literal.
fn parse_map(input: &str) -> IResult<&str, Value> {
    let (input, pairs) = delimited(
        char('('),
        separated_list0(
            preceded(multispace0, char(',')),
            separated_pair(
                preceded(multispace0, parse_key),
                preceded(multispace0, char(':')),
                parse_value,
            ),
        ),
        preceded(multispace0, char(')')),
    )(input)?;

    let mut entries = BTreeMap::new();
    for (key, value) in pairs {
        entries.insert(key.to_string(), value);
    }
    Ok((input, Value::Map(entries)))
}

fn parse_key(input: &str) -> IResult<&str, &str> {
    nom::bytes::complete::take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn parse_quoted(input: &str) -> IResult<&str, Value> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(input)
    .map(|(rest, text)| (rest, Value::String(text.to_string())))
}

/// Parses a `Name(arg, arg)` function call.
fn parse_call(input: &str) -> IResult<&str, Value> {
    map(
        tuple((
            parse_key,
            char('('),
            separated_list0(preceded(multispace0, char(',')), parse_value),
            preceded(multispace0, char(')')),
        )),
        |(name, _, args, _)| Value::Call(name.to_string(), args),
    )(input)
}

/// Parses a bare token and classifies it.
///
/// `@Name` stays a literal so the builder can substitute known template
/// variables; `true`/`false` and numeric tokens get their typed variants;
/// anything else is a plain string.
fn parse_bare(input: &str) -> IResult<&str, Value> {
    let (rest, token) = nom::bytes::complete::take_while1(|c: char| {
        !matches!(c, ',' | '(' | ')') && !c.is_whitespace()
    })(input)?;

    let value = if token.starts_with('@') {
        Value::Literal(token.to_string())
    } else if token.eq_ignore_ascii_case("true") {
        Value::Boolean(true)
    } else if token.eq_ignore_ascii_case("false") {
        Value::Boolean(false)
    } else if let Ok(int) = token.parse::<i64>() {
        Value::Integer(int)
    } else if let Ok(float) = token.parse::<f64>() {
        Value::Float(float)
    } else {
        Value::String(token.to_string())
    };
    Ok((rest, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tokens() {
        assert_eq!(parse_literal("true"), Value::Boolean(true));
        assert_eq!(parse_literal("False"), Value::Boolean(false));
        assert_eq!(parse_literal("42"), Value::Integer(42));
        assert_eq!(parse_literal("-3.5"), Value::Float(-3.5));
        assert_eq!(parse_literal("hello"), Value::String("hello".into()));
        assert_eq!(parse_literal("@Flag"), Value::Literal("@Flag".into()));
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(
            parse_literal(r#""hello world""#),
            Value::String("hello world".into())
        );
        assert_eq!(parse_literal("'single'"), Value::String("single".into()));
    }

    #[test]
    fn object_literal() {
        let value = parse_literal("(Top: 2, Left: 4)");
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(entries["Top"], Value::Integer(2));
        assert_eq!(entries["Left"], Value::Integer(4));
    }

    #[test]
    fn nested_object_literal() {
        let value = parse_literal("(Anchor: (Top: 1), Visible: true)");
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(
            entries["Anchor"],
            Value::Map(BTreeMap::from([("Top".to_string(), Value::Integer(1))]))
        );
        assert_eq!(entries["Visible"], Value::Boolean(true));
    }

    #[test]
    fn function_call() {
        let value = parse_literal("Lerp(0, 10)");
        assert_eq!(
            value,
            Value::Call("Lerp".into(), vec![Value::Integer(0), Value::Integer(10)])
        );
    }

    #[test]
    fn unparseable_falls_back_to_string() {
        assert_eq!(
            parse_literal("not (quite valid"),
            Value::String("not (quite valid".into())
        );
    }
}
