//! Hand-rolled parser for the handlebars subset used in layout content.
//!
//! Covers mustaches (`{{name}}`), raw mustaches (`{{{name}}}` and
//! `{{& name}}`), the `#each` / `#if` / `#unless` block helpers with an
//! optional `{{else}}` branch, partials (`{{> name}}`) and comments.
//! Block helpers outside that set still parse, as [`BlockKind::Other`],
//! so extraction can walk into their bodies.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("tag opened at byte {at} is never closed")]
    UnclosedTag { at: usize },
    #[error("empty tag at byte {at}")]
    EmptyTag { at: usize },
    #[error("comment opened at byte {at} is never closed")]
    UnclosedComment { at: usize },
    #[error("block `{{{{#{name}}}}}` is never closed")]
    UnclosedBlock { name: String },
    #[error("closing tag `{{{{/{found}}}}}` does not match open block `{{{{#{expected}}}}}`")]
    MismatchedClose { expected: String, found: String },
    #[error("closing tag `{{{{/{name}}}}}` has no matching open block")]
    UnexpectedClose { name: String },
}

/// Parsed template. `Default` is the empty document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// `{{path}}`, or `{{{path}}}` / `{{& path}}` when `raw`.
    Mustache { path: String, raw: bool },
    /// `{{> name}}`
    Partial(String),
    Block {
        kind: BlockKind,
        path: String,
        body: Vec<Node>,
        else_body: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Each,
    If,
    Unless,
    Other(String),
}

impl BlockKind {
    fn from_name(name: &str) -> BlockKind {
        match name {
            "each" => BlockKind::Each,
            "if" => BlockKind::If,
            "unless" => BlockKind::Unless,
            other => BlockKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BlockKind::Each => "each",
            BlockKind::If => "if",
            BlockKind::Unless => "unless",
            BlockKind::Other(name) => name,
        }
    }
}

struct Frame {
    kind: BlockKind,
    path: String,
    body: Vec<Node>,
    else_body: Vec<Node>,
    in_else: bool,
}

/// Body currently being appended to: the innermost open block (or its
/// else branch), falling back to the document root.
fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut Vec<Frame>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) if frame.in_else => &mut frame.else_body,
        Some(frame) => &mut frame.body,
        None => root,
    }
}

pub fn parse(input: &str) -> Result<Ast, TemplateError> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i + 1 < len {
        if bytes[i] != b'{' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }
        if text_start < i {
            current(&mut root, &mut stack).push(Node::Text(input[text_start..i].to_string()));
        }
        let at = i;
        let rest = &input[i..];

        if let Some(comment) = rest.strip_prefix("{{!--") {
            let end = comment
                .find("--}}")
                .ok_or(TemplateError::UnclosedComment { at })?;
            i += 5 + end + 4;
        } else if let Some(comment) = rest.strip_prefix("{{!") {
            let end = comment
                .find("}}")
                .ok_or(TemplateError::UnclosedComment { at })?;
            i += 3 + end + 2;
        } else if let Some(raw_tag) = rest.strip_prefix("{{{") {
            let end = raw_tag
                .find("}}}")
                .ok_or(TemplateError::UnclosedTag { at })?;
            let path = raw_tag[..end].trim().trim_matches('~').trim();
            if path.is_empty() {
                return Err(TemplateError::EmptyTag { at });
            }
            current(&mut root, &mut stack).push(Node::Mustache {
                path: path.to_string(),
                raw: true,
            });
            i += 3 + end + 3;
        } else {
            let tag = &rest[2..];
            let end = tag.find("}}").ok_or(TemplateError::UnclosedTag { at })?;
            let inner = tag[..end].trim().trim_matches('~').trim();
            i += 2 + end + 2;
            if inner.is_empty() {
                return Err(TemplateError::EmptyTag { at });
            }
            match inner.as_bytes()[0] {
                b'#' => {
                    let mut parts = inner[1..].split_whitespace();
                    let name = parts.next().unwrap_or_default();
                    if name.is_empty() {
                        return Err(TemplateError::EmptyTag { at });
                    }
                    stack.push(Frame {
                        kind: BlockKind::from_name(name),
                        path: parts.next().unwrap_or_default().to_string(),
                        body: Vec::new(),
                        else_body: Vec::new(),
                        in_else: false,
                    });
                }
                b'/' => {
                    let name = inner[1..].trim();
                    let frame = stack.pop().ok_or_else(|| TemplateError::UnexpectedClose {
                        name: name.to_string(),
                    })?;
                    if frame.kind.name() != name {
                        return Err(TemplateError::MismatchedClose {
                            expected: frame.kind.name().to_string(),
                            found: name.to_string(),
                        });
                    }
                    current(&mut root, &mut stack).push(Node::Block {
                        kind: frame.kind,
                        path: frame.path,
                        body: frame.body,
                        else_body: frame.else_body,
                    });
                }
                b'>' => {
                    let name = inner[1..].trim();
                    if name.is_empty() {
                        return Err(TemplateError::EmptyTag { at });
                    }
                    current(&mut root, &mut stack).push(Node::Partial(name.to_string()));
                }
                b'&' => {
                    let path = inner[1..].trim();
                    if path.is_empty() {
                        return Err(TemplateError::EmptyTag { at });
                    }
                    current(&mut root, &mut stack).push(Node::Mustache {
                        path: path.to_string(),
                        raw: true,
                    });
                }
                _ => match (inner, stack.last_mut()) {
                    ("else", Some(frame)) => frame.in_else = true,
                    _ => current(&mut root, &mut stack).push(Node::Mustache {
                        path: inner.to_string(),
                        raw: false,
                    }),
                },
            }
        }
        text_start = i;
    }

    if text_start < len {
        current(&mut root, &mut stack).push(Node::Text(input[text_start..].to_string()));
    }
    if let Some(frame) = stack.pop() {
        return Err(TemplateError::UnclosedBlock {
            name: frame.kind.name().to_string(),
        });
    }
    Ok(Ast { body: root })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mustache(path: &str) -> Node {
        Node::Mustache {
            path: path.to_string(),
            raw: false,
        }
    }

    #[test]
    fn empty_input_gives_empty_body() {
        assert_eq!(parse("").unwrap(), Ast::default());
    }

    #[test]
    fn plain_text_is_a_single_node() {
        let ast = parse("<p>hello</p>").unwrap();
        assert_eq!(ast.body, vec![Node::Text("<p>hello</p>".to_string())]);
    }

    #[test]
    fn parses_mustache_between_text() {
        let ast = parse("Hi {{ firstName }}!").unwrap();
        assert_eq!(
            ast.body,
            vec![
                Node::Text("Hi ".to_string()),
                mustache("firstName"),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn triple_stache_and_ampersand_are_raw() {
        let ast = parse("{{{body}}}{{& footer }}").unwrap();
        assert_eq!(
            ast.body,
            vec![
                Node::Mustache {
                    path: "body".to_string(),
                    raw: true,
                },
                Node::Mustache {
                    path: "footer".to_string(),
                    raw: true,
                },
            ]
        );
    }

    #[test]
    fn parses_nested_blocks() {
        let ast = parse("{{#each items}}{{#if this.urgent}}!{{/if}}{{name}}{{/each}}").unwrap();
        let Node::Block { kind, path, body, else_body } = &ast.body[0] else {
            panic!("expected block, got {:?}", ast.body[0]);
        };
        assert_eq!(*kind, BlockKind::Each);
        assert_eq!(path, "items");
        assert!(else_body.is_empty());
        assert!(matches!(&body[0], Node::Block { kind: BlockKind::If, .. }));
        assert_eq!(body[1], mustache("name"));
    }

    #[test]
    fn else_splits_the_block_body() {
        let ast = parse("{{#if vip}}gold{{else}}plain{{/if}}").unwrap();
        let Node::Block { body, else_body, .. } = &ast.body[0] else {
            panic!("expected block");
        };
        assert_eq!(*body, vec![Node::Text("gold".to_string())]);
        assert_eq!(*else_body, vec![Node::Text("plain".to_string())]);
    }

    #[test]
    fn else_outside_a_block_is_a_plain_mustache() {
        let ast = parse("{{else}}").unwrap();
        assert_eq!(ast.body, vec![mustache("else")]);
    }

    #[test]
    fn unknown_helpers_parse_as_other() {
        let ast = parse("{{#with user}}{{name}}{{/with}}").unwrap();
        assert!(matches!(
            &ast.body[0],
            Node::Block { kind: BlockKind::Other(name), .. } if name == "with"
        ));
    }

    #[test]
    fn parses_partial() {
        let ast = parse("{{> header}}").unwrap();
        assert_eq!(ast.body, vec![Node::Partial("header".to_string())]);
    }

    #[test]
    fn comments_produce_no_nodes() {
        let ast = parse("a{{! ignore }}b{{!-- also }} ignored --}}c").unwrap();
        assert_eq!(
            ast.body,
            vec![
                Node::Text("a".to_string()),
                Node::Text("b".to_string()),
                Node::Text("c".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_control_markers_are_stripped() {
        let ast = parse("{{~title~}}").unwrap();
        assert_eq!(ast.body, vec![mustache("title")]);

        let ast = parse("{{{~body~}}}").unwrap();
        assert_eq!(
            ast.body,
            vec![Node::Mustache {
                path: "body".to_string(),
                raw: true,
            }]
        );
    }

    #[test]
    fn unclosed_tag_is_an_error() {
        assert_eq!(parse("Hi {{firstName"), Err(TemplateError::UnclosedTag { at: 3 }));
        assert_eq!(parse("{{{body}}"), Err(TemplateError::UnclosedTag { at: 0 }));
    }

    #[test]
    fn empty_tag_is_an_error() {
        assert_eq!(parse("{{  }}"), Err(TemplateError::EmptyTag { at: 0 }));
    }

    #[test]
    fn unclosed_comment_is_an_error() {
        assert_eq!(
            parse("{{!-- open --"),
            Err(TemplateError::UnclosedComment { at: 0 })
        );
    }

    #[test]
    fn unclosed_block_is_an_error() {
        assert_eq!(
            parse("{{#each items}}{{name}}"),
            Err(TemplateError::UnclosedBlock { name: "each".to_string() })
        );
    }

    #[test]
    fn mismatched_close_is_an_error() {
        assert_eq!(
            parse("{{#if a}}{{/each}}"),
            Err(TemplateError::MismatchedClose {
                expected: "if".to_string(),
                found: "each".to_string(),
            })
        );
    }

    #[test]
    fn close_without_open_is_an_error() {
        assert_eq!(
            parse("{{/if}}"),
            Err(TemplateError::UnexpectedClose { name: "if".to_string() })
        );
    }

    #[test]
    fn lone_braces_stay_text() {
        let ast = parse("a { b } c {").unwrap();
        assert_eq!(ast.body, vec![Node::Text("a { b } c {".to_string())]);
    }
}
