//! Sample rendering for the preview tab.
//!
//! Substitutes each variable's default value where one is set and keeps
//! the `{{placeholder}}` text where none is. Conditionals follow the
//! boolean reading of the default; `#each` bodies render one sample pass.

use crate::state::layout::TemplateVariable;

use super::parser::{Ast, BlockKind, Node};

pub fn render_preview(ast: &Ast, variables: &[TemplateVariable]) -> String {
    let mut out = String::new();
    render_nodes(&ast.body, variables, &mut out);
    out
}

fn render_nodes(nodes: &[Node], variables: &[TemplateVariable], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Partial(_) => {}
            Node::Mustache { path, raw } => match default_for(variables, path) {
                Some(value) if *raw => out.push_str(value),
                Some(value) => out.push_str(&escape_html(value)),
                None => {
                    let (open, close) = if *raw { ("{{{", "}}}") } else { ("{{", "}}") };
                    out.push_str(open);
                    out.push_str(path);
                    out.push_str(close);
                }
            },
            Node::Block {
                kind,
                path,
                body,
                else_body,
            } => match kind {
                BlockKind::If => {
                    if truthy(variables, path) {
                        render_nodes(body, variables, out);
                    } else {
                        render_nodes(else_body, variables, out);
                    }
                }
                BlockKind::Unless => {
                    if truthy(variables, path) {
                        render_nodes(else_body, variables, out);
                    } else {
                        render_nodes(body, variables, out);
                    }
                }
                BlockKind::Each | BlockKind::Other(_) => render_nodes(body, variables, out),
            },
        }
    }
}

fn default_for<'a>(variables: &'a [TemplateVariable], name: &str) -> Option<&'a str> {
    variables
        .iter()
        .find(|v| v.name == name)
        .and_then(|v| v.default_value.as_deref())
        .filter(|v| !v.is_empty())
}

fn truthy(variables: &[TemplateVariable], name: &str) -> bool {
    matches!(default_for(variables, name), Some("true") | Some("1"))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
