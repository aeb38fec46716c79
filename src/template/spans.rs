//! Lightweight per-line tag scanner for editor highlighting.
//!
//! Unlike [`super::parser`], this never fails: the editor colors whatever
//! is on screen, including half-typed tags. Spans are byte ranges into
//! the scanned line.

/// How the editor should color a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `{{name}}`, `{{{name}}}` or `{{& name}}`; carries the path.
    Variable(String),
    /// `{{#each items}}`, `{{/each}}`, `{{else}}`, `{{> partial}}`.
    Keyword,
    /// `{{! ... }}` and `{{!-- ... --}}`.
    Comment,
}

/// Scans one line of content for complete `{{...}}` tags.
pub fn tag_spans(line: &str) -> Vec<(usize, usize, TagKind)> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] != b'{' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }
        let start = i;
        let rest = &line[i..];
        let (inner, tag_len) = if let Some(raw_tag) = rest.strip_prefix("{{{") {
            match raw_tag.find("}}}") {
                Some(end) => (&raw_tag[..end], 3 + end + 3),
                None => break,
            }
        } else {
            match rest[2..].find("}}") {
                Some(end) => (&rest[2..2 + end], 2 + end + 2),
                None => break,
            }
        };
        let inner = inner.trim().trim_matches('~').trim();
        let kind = match inner.as_bytes().first() {
            None => TagKind::Comment,
            Some(b'!') => TagKind::Comment,
            Some(b'#') | Some(b'/') | Some(b'>') => TagKind::Keyword,
            Some(b'&') => TagKind::Variable(inner[1..].trim().to_string()),
            _ if inner == "else" => TagKind::Keyword,
            _ => TagKind::Variable(inner.to_string()),
        };
        spans.push((start, start + tag_len, kind));
        i = start + tag_len;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_variable_spans() {
        let spans = tag_spans("Hi {{user}}, bye");
        assert_eq!(spans, vec![(3, 11, TagKind::Variable("user".to_string()))]);
    }

    #[test]
    fn classifies_block_tags_as_keywords() {
        let spans = tag_spans("{{#if a}}x{{else}}y{{/if}}");
        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(|(_, _, kind)| *kind == TagKind::Keyword));
    }

    #[test]
    fn triple_stache_is_a_variable() {
        let spans = tag_spans("{{{body}}}");
        assert_eq!(spans, vec![(0, 10, TagKind::Variable("body".to_string()))]);
    }

    #[test]
    fn half_typed_tags_are_ignored() {
        assert!(tag_spans("Hi {{use").is_empty());
    }

    #[test]
    fn comments_are_marked() {
        let spans = tag_spans("{{! note }}");
        assert_eq!(spans, vec![(0, 11, TagKind::Comment)]);
    }
}
