use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlights rendered layout markup as HTML, one styled [`Line`] per
/// input line. Falls back to plain text when the bundled assets are
/// missing a piece.
pub fn highlight_html(markup: &str) -> Text<'static> {
    let Some((syntax, theme)) = html_assets() else {
        return Text::raw(markup.to_string());
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for line in LinesWithEndings::from(markup) {
        let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
            lines.push(Line::raw(line.trim_end_matches('\n').to_string()));
            continue;
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, content)| {
                let fg = style.foreground;
                Span::styled(
                    content.trim_end_matches('\n').to_string(),
                    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn html_assets() -> Option<(&'static SyntaxReference, &'static Theme)> {
    let syntax = SYNTAX_SET.find_syntax_by_extension("html")?;
    let theme = THEME_SET.themes.get("Solarized (dark)")?;
    Some((syntax, theme))
}
