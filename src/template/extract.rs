//! Walks a parsed template and lists the variables it references.

use crate::state::layout::{TemplateVariable, VariableType};

use super::parser::{Ast, BlockKind, Node};

/// Path roots owned by the notification service. References under these
/// are filled in at send time and never surface as layout variables.
const SYSTEM_NAMESPACES: &[&str] = &[
    "body",
    "subscriber",
    "step",
    "branding",
    "preheader",
    "blocks",
];

/// Collects every user-facing variable in document order. Mustaches count
/// as strings, `#each` subjects as arrays, `#if` / `#unless` subjects as
/// booleans. Duplicates are kept; callers dedupe when merging.
pub fn extract_variables(ast: &Ast) -> Vec<TemplateVariable> {
    let mut found = Vec::new();
    walk(&ast.body, &mut found);
    found
}

fn walk(nodes: &[Node], out: &mut Vec<TemplateVariable>) {
    for node in nodes {
        match node {
            Node::Text(_) | Node::Partial(_) => {}
            Node::Mustache { path, .. } => push_variable(path, VariableType::String, out),
            Node::Block {
                kind,
                path,
                body,
                else_body,
            } => {
                match kind {
                    BlockKind::Each => push_variable(path, VariableType::Array, out),
                    BlockKind::If | BlockKind::Unless => {
                        push_variable(path, VariableType::Boolean, out)
                    }
                    BlockKind::Other(_) => {}
                }
                walk(body, out);
                walk(else_body, out);
            }
        }
    }
}

fn push_variable(path: &str, var_type: VariableType, out: &mut Vec<TemplateVariable>) {
    if is_user_variable(path) {
        out.push(TemplateVariable::new(path, var_type));
    }
}

/// A path names a user variable unless it is empty, a handlebars keyword,
/// a data variable (`@index`, `@key`, ...) or rooted in a system namespace.
fn is_user_variable(path: &str) -> bool {
    if path.is_empty() || path.starts_with('@') || path == "else" {
        return false;
    }
    let root = path.split('.').next().unwrap_or(path);
    root != "this" && !SYSTEM_NAMESPACES.contains(&root)
}
