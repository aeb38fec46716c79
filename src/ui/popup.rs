use ratatui::layout::Rect;

/// Rect centered in `area`, sized as a percentage of it. Degenerate
/// areas collapse the popup instead of underflowing.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    place_centered(
        percent_of(area.width, percent_x),
        percent_of(area.height, percent_y),
        area,
    )
}

/// Rect centered in `area` with a percentage width but a fixed height,
/// for short prompts that should not stretch on tall terminals.
pub fn centered_prompt(percent_x: u16, height: u16, area: Rect) -> Rect {
    place_centered(percent_of(area.width, percent_x), height.min(area.height), area)
}

fn percent_of(extent: u16, percent: u16) -> u16 {
    let scaled = (u32::from(extent) * u32::from(percent) / 100).max(1);
    scaled.min(u32::from(extent)) as u16
}

fn place_centered(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
