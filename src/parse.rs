//! Parse pest pairs into icon trees
//!
//! The literal is read by the grammar in `literal.pest`; this module walks the
//! resulting pairs and keeps only the `{attr, child}` shape icons use.

use pest::Parser;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;

use crate::ast::{Attributes, IconDefinition, IconNode};
use crate::errors::ParseError;
use crate::{LiteralParser, Rule};

/// Parse one isolated literal into an icon definition
pub fn parse(name: &str, literal: &str) -> Result<IconDefinition, ParseError> {
    let pairs = LiteralParser::parse(Rule::literal, literal)
        .map_err(|e| syntax_error(name, literal, e))?;

    let root = pairs
        .flatten()
        .find(|p| p.as_rule() == Rule::object)
        .ok_or_else(|| ParseError::UnexpectedToken {
            name: name.to_string(),
            offset: 0,
            expected: "an object literal".to_string(),
        })?;
    let root_offset = root.as_span().start();

    let mut root_attributes = None;
    let mut children = None;
    for (key, value) in members(root) {
        match key.as_str() {
            "attr" => {
                let value = expect(name, value, Rule::object, "an attribute object")?;
                root_attributes = Some(read_attributes(name, value)?);
            }
            "child" => {
                let value = expect(name, value, Rule::array, "an array of child nodes")?;
                children = Some(read_children(name, value)?);
            }
            // `tag` is always "svg" at the root; the renderer writes its own.
            _ => {}
        }
    }

    let missing = |key| ParseError::MissingRequiredKey {
        name: name.to_string(),
        key,
        offset: root_offset,
    };
    Ok(IconDefinition {
        name: name.to_string(),
        root_attributes: root_attributes.ok_or_else(|| missing("attr"))?,
        children: children.ok_or_else(|| missing("child"))?,
    })
}

fn is_punctuation(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::lbrace | Rule::rbrace | Rule::lbracket | Rule::rbracket | Rule::colon | Rule::comma
    )
}

/// Inner pairs without the punctuation tokens
fn significant(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
    pair.into_inner().filter(|p| !is_punctuation(p.as_rule()))
}

/// Key/value pairs of an `object` pair, in source order
fn members(object: Pair<'_, Rule>) -> impl Iterator<Item = (String, Pair<'_, Rule>)> {
    significant(object).filter_map(|member| {
        let mut inner = significant(member);
        let key = inner.next()?;
        let value = inner.next()?;
        Some((key_text(key), value))
    })
}

fn key_text(key: Pair<'_, Rule>) -> String {
    // key -> string | ident
    match key.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::string => string_text(inner).to_string(),
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    }
}

/// Contents of a string literal, without quotes. Escapes are kept as written.
fn string_text<'i>(pair: Pair<'i, Rule>) -> &'i str {
    pair.into_inner().next().map_or("", |inner| inner.as_str())
}

fn expect<'i>(
    name: &str,
    pair: Pair<'i, Rule>,
    rule: Rule,
    expected: &str,
) -> Result<Pair<'i, Rule>, ParseError> {
    if pair.as_rule() == rule {
        Ok(pair)
    } else {
        Err(unexpected(name, &pair, expected))
    }
}

fn unexpected(name: &str, pair: &Pair<'_, Rule>, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        name: name.to_string(),
        offset: pair.as_span().start(),
        expected: expected.to_string(),
    }
}

fn read_attributes(name: &str, object: Pair<'_, Rule>) -> Result<Attributes, ParseError> {
    let mut attributes = Attributes::new();
    for (key, value) in members(object) {
        let text = match value.as_rule() {
            Rule::string => string_text(value).to_string(),
            Rule::number | Rule::boolean => value.as_str().to_string(),
            Rule::null => continue,
            _ => {
                return Err(unexpected(
                    name,
                    &value,
                    "a string, number or boolean attribute value",
                ));
            }
        };
        attributes.insert(key, text);
    }
    Ok(attributes)
}

fn read_children(name: &str, array: Pair<'_, Rule>) -> Result<Vec<IconNode>, ParseError> {
    let mut children = Vec::new();
    for value in significant(array) {
        let object = expect(name, value, Rule::object, "a child node object")?;
        if let Some(node) = read_node(name, object)? {
            children.push(node);
        }
    }
    Ok(children)
}

/// Read one child node. Nodes without a tag are dropped.
fn read_node(name: &str, object: Pair<'_, Rule>) -> Result<Option<IconNode>, ParseError> {
    let mut tag = None;
    let mut attributes = Attributes::new();
    let mut children = Vec::new();

    for (key, value) in members(object.clone()) {
        if value.as_rule() == Rule::null {
            continue;
        }
        match key.as_str() {
            "tag" => {
                let value = expect(name, value, Rule::string, "a tag name string")?;
                tag = Some(string_text(value).to_string());
            }
            "attr" => {
                let value = expect(name, value, Rule::object, "an attribute object")?;
                attributes = read_attributes(name, value)?;
            }
            "child" => {
                let value = expect(name, value, Rule::array, "an array of child nodes")?;
                children = read_children(name, value)?;
            }
            _ => {}
        }
    }

    match tag.filter(|t| !t.is_empty()) {
        Some(tag) => Ok(Some(IconNode {
            tag,
            attributes,
            children,
        })),
        None => {
            crate::log::warn!(
                icon = name,
                offset = object.as_span().start(),
                "dropping child node without a tag"
            );
            Ok(None)
        }
    }
}

/// Turn a grammar failure into a located error
fn syntax_error(name: &str, literal: &str, err: pest::error::Error<Rule>) -> ParseError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    if let Some(start) = unterminated_string(literal) {
        return ParseError::UnterminatedString {
            name: name.to_string(),
            offset: start,
        };
    }

    let expected = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let mut names: Vec<&str> = positives.iter().map(|r| describe(*r)).collect();
            names.dedup();
            names.join(" or ")
        }
        _ => "valid literal syntax".to_string(),
    };

    ParseError::UnexpectedToken {
        name: name.to_string(),
        offset,
        expected,
    }
}

fn describe(rule: Rule) -> &'static str {
    match rule {
        Rule::object => "an object",
        Rule::array => "an array",
        Rule::member | Rule::key | Rule::ident => "a key",
        Rule::string => "a string",
        Rule::number => "a number",
        Rule::boolean | Rule::null => "a keyword",
        Rule::lbrace => "`{`",
        Rule::rbrace => "`}`",
        Rule::lbracket => "`[`",
        Rule::rbracket => "`]`",
        Rule::colon => "`:`",
        Rule::comma => "`,`",
        Rule::EOI => "end of input",
        _ => "a value",
    }
}

/// Start offset of a quote that is never closed, if any. Comments are skipped.
fn unterminated_string(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                let start = i;
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Some(start),
                        Some(b'\\') => i += 2,
                        Some(&b) if b == quote => break,
                        Some(_) => i += 1,
                    }
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = text[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 1);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;

    #[test]
    fn parses_quoted_keys() {
        let def = parse(
            "FaHome",
            r#"{"tag":"svg","attr":{"viewBox":"0 0 512 512"},"child":[{"tag":"path","attr":{"d":"M1 2"},"child":[]}]}"#,
        )
        .unwrap();
        assert_eq!(def.name, "FaHome");
        assert_eq!(def.root_attributes["viewBox"], "0 0 512 512");
        assert_eq!(def.children, vec![IconNode::new("path").with_attr("d", "M1 2")]);
    }

    #[test]
    fn parses_loose_notation() {
        let def = parse(
            "Loose",
            "{ tag: 'svg', attr: { viewBox: '0 0 24 24', strokeWidth: 2, }, child: [ { tag: 'circle', attr: { cx: 12, cy: 12, r: 10 } }, ], }",
        )
        .unwrap();
        assert_eq!(def.root_attributes["strokeWidth"], "2");
        let circle = &def.children[0];
        assert_eq!(circle.tag, "circle");
        let keys: Vec<_> = circle.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["cx", "cy", "r"]);
        assert!(circle.children.is_empty());
    }

    #[test]
    fn keeps_attribute_order() {
        let def = parse(
            "Order",
            r#"{"attr":{},"child":[{"tag":"rect","attr":{"y":"1","x":"2","width":"3","fill":"none"}}]}"#,
        )
        .unwrap();
        let keys: Vec<_> = def.children[0].attributes.keys().cloned().collect();
        assert_eq!(keys, ["y", "x", "width", "fill"]);
    }

    #[test]
    fn nested_children() {
        let def = parse(
            "Nested",
            r#"{"attr":{},"child":[{"tag":"g","attr":{"id":"a"},"child":[{"tag":"path","attr":{"d":"M0 0"},"child":[]},{"tag":"path","attr":{"d":"M1 1"},"child":[]}]}]}"#,
        )
        .unwrap();
        let group = &def.children[0];
        assert_eq!(group.tag, "g");
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[1].attributes["d"], "M1 1");
    }

    #[test]
    fn comments_are_ignored() {
        let def = parse("C", "{ /* root */ attr: {}, // none\n child: [] }").unwrap();
        assert!(def.children.is_empty());
    }

    #[test]
    fn missing_attr_is_reported() {
        let err = parse("NoAttr", r#"{"tag":"svg","child":[]}"#).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingRequiredKey {
                name: "NoAttr".into(),
                key: "attr",
                offset: 0,
            }
        );
    }

    #[test]
    fn missing_child_is_reported() {
        let err = parse("NoChild", r#"{"attr":{}}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredKey { key: "child", .. }));
    }

    #[test]
    fn unexpected_token_has_offset() {
        let err = parse("Bad", "{attr {}, child: []}").unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                name,
                offset,
                expected,
            } => {
                assert_eq!(name, "Bad");
                assert_eq!(offset, 6);
                assert_eq!(expected, "`:`");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_is_reported() {
        let err = parse("Open", r#"{"attr":{"d":"M0 0},"child":[]}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { .. }), "{err:?}");
    }

    #[test]
    fn expressions_are_rejected() {
        let err = parse("Expr", "{attr: {d: require('fs')}, child: []}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let err = parse("Shape", "{attr: [], child: []}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { offset: 7, .. }), "{err:?}");

        let err = parse("Shape", "{attr: {}, child: [\"path\"]}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));

        let err = parse("Shape", "{attr: {style: {color: 'red'}}, child: []}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn tagless_children_are_dropped() {
        let def = parse("T", "{attr: {}, child: [{attr: {d: 'M0'}}, {tag: 'path'}]}").unwrap();
        assert_eq!(def.children, vec![IconNode::new("path")]);
    }

    #[test]
    fn null_attributes_are_skipped() {
        let def = parse("N", "{attr: {fill: null, d: 'M0'}, child: [{tag: 'path', attr: null}]}").unwrap();
        assert_eq!(def.root_attributes.len(), 1);
        assert!(def.children[0].attributes.is_empty());
    }

    #[test]
    fn finds_unterminated_quote() {
        assert_eq!(unterminated_string(r#"{"a":"b"}"#), None);
        assert_eq!(unterminated_string(r#"{"a":"b\"}"#), Some(5));
        assert_eq!(unterminated_string("{a:'it''s}"), Some(7));
        assert_eq!(unterminated_string("{a: 1 /* don't */, b: 'x'}"), None);
    }
}
