//! CSS selector subset understood by the fake DOM.
//!
//! Supports type, `#id`, `.class`, `[attr]`, `[attr=value]`, `[attr*=value]`,
//! descendant and `>` child combinators. Anything else is rejected.

use crate::result::{TackleError, TackleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrSel {
    pub name: String,
    pub op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSel>,
}

/// A parsed selector: compounds joined by combinators, left to right.
/// The combinator at index `i` joins compound `i - 1` to compound `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedSelector {
    pub parts: Vec<(Combinator, Compound)>,
}

fn unsupported(selector: &str, why: &str) -> TackleError {
    TackleError::driver(format!("unsupported selector `{selector}`: {why}"))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub(crate) fn parse(selector: &str) -> TackleResult<ParsedSelector> {
    let chars: Vec<char> = selector.trim().chars().collect();
    let mut parts = Vec::new();
    let mut pos = 0;
    let mut pending = Combinator::Descendant;

    while pos < chars.len() {
        let mut saw_space = false;
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
            saw_space = true;
        }
        if pos >= chars.len() {
            break;
        }
        if chars[pos] == '>' {
            pending = Combinator::Child;
            pos += 1;
            continue;
        }
        if saw_space && pending != Combinator::Child {
            pending = Combinator::Descendant;
        }
        let (compound, next) = parse_compound(selector, &chars, pos)?;
        parts.push((pending, compound));
        pending = Combinator::Descendant;
        pos = next;
    }

    if parts.is_empty() {
        return Err(unsupported(selector, "empty"));
    }
    Ok(ParsedSelector { parts })
}

fn read_ident(chars: &[char], mut pos: usize) -> (String, usize) {
    let start = pos;
    while pos < chars.len() && is_ident_char(chars[pos]) {
        pos += 1;
    }
    (chars[start..pos].iter().collect(), pos)
}

fn parse_compound(
    selector: &str,
    chars: &[char],
    mut pos: usize,
) -> TackleResult<(Compound, usize)> {
    let mut compound = Compound::default();
    let start = pos;

    if chars[pos] == '*' {
        pos += 1;
    } else if is_ident_char(chars[pos]) {
        let (tag, next) = read_ident(chars, pos);
        compound.tag = Some(tag.to_ascii_lowercase());
        pos = next;
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                let (id, next) = read_ident(chars, pos + 1);
                if id.is_empty() {
                    return Err(unsupported(selector, "empty id"));
                }
                compound.id = Some(id);
                pos = next;
            }
            '.' => {
                let (class, next) = read_ident(chars, pos + 1);
                if class.is_empty() {
                    return Err(unsupported(selector, "empty class"));
                }
                compound.classes.push(class);
                pos = next;
            }
            '[' => {
                let (attr, next) = parse_attr(selector, chars, pos + 1)?;
                compound.attrs.push(attr);
                pos = next;
            }
            c if c.is_whitespace() || c == '>' => break,
            ':' => return Err(unsupported(selector, "pseudo-classes")),
            ',' => return Err(unsupported(selector, "selector lists")),
            c => return Err(unsupported(selector, &format!("unexpected `{c}`"))),
        }
    }

    if pos == start {
        return Err(unsupported(selector, "empty compound"));
    }
    Ok((compound, pos))
}

fn parse_attr(selector: &str, chars: &[char], pos: usize) -> TackleResult<(AttrSel, usize)> {
    let (name, mut pos) = read_ident(chars, pos);
    if name.is_empty() {
        return Err(unsupported(selector, "empty attribute name"));
    }
    let op_kind = match chars.get(pos) {
        Some(']') => return Ok((AttrSel { name, op: AttrOp::Exists }, pos + 1)),
        Some('=') => {
            pos += 1;
            '='
        }
        Some('*') if chars.get(pos + 1) == Some(&'=') => {
            pos += 2;
            '*'
        }
        _ => return Err(unsupported(selector, "attribute operator")),
    };

    let value = match chars.get(pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            let begin = pos + 1;
            let end = chars[begin..]
                .iter()
                .position(|&c| c == quote)
                .map(|offset| begin + offset)
                .ok_or_else(|| unsupported(selector, "unterminated string"))?;
            pos = end + 1;
            chars[begin..end].iter().collect::<String>()
        }
        _ => {
            let (raw, next) = read_ident(chars, pos);
            pos = next;
            raw
        }
    };

    if chars.get(pos) != Some(&']') {
        return Err(unsupported(selector, "missing `]`"));
    }
    let op = if op_kind == '*' {
        AttrOp::Contains(value)
    } else {
        AttrOp::Equals(value)
    };
    Ok((AttrSel { name, op }, pos + 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_parts() {
        let parsed = parse("div.pf-c-toolbar__group.pf-m-filter-group#main").unwrap();
        assert_eq!(parsed.parts.len(), 1);
        let c = &parsed.parts[0].1;
        assert_eq!(c.tag.as_deref(), Some("div"));
        assert_eq!(c.id.as_deref(), Some("main"));
        assert_eq!(c.classes, vec!["pf-c-toolbar__group", "pf-m-filter-group"]);
    }

    #[test]
    fn test_quoted_attribute_with_space() {
        let parsed = parse("td[data-label=\"Tag type\"]").unwrap();
        let attr = &parsed.parts[0].1.attrs[0];
        assert_eq!(attr.name, "data-label");
        assert_eq!(attr.op, AttrOp::Equals("Tag type".into()));
    }

    #[test]
    fn test_combinators() {
        let parsed = parse(".pf-c-table > tbody > tr td").unwrap();
        let combinators: Vec<Combinator> = parsed.parts.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::Child,
                Combinator::Descendant
            ]
        );
    }

    #[test]
    fn test_child_without_spaces() {
        let parsed = parse("li>button[data-action='per-page-20']").unwrap();
        assert_eq!(parsed.parts[1].0, Combinator::Child);
        assert_eq!(
            parsed.parts[1].1.attrs[0].op,
            AttrOp::Equals("per-page-20".into())
        );
    }

    #[test]
    fn test_rejects_pseudo_classes() {
        assert!(parse("tr:not(.x)").is_err());
        assert!(parse("a, b").is_err());
        assert!(parse("").is_err());
    }
}
