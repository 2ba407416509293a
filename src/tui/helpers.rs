// Small layout and formatting helpers for the TUI
use ratatui::layout::{Constraint, Flex, Layout, Rect};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Ratio of `done` over `total` for a gauge, clamped to `0.0..=1.0`
pub fn calculate_progress(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64).min(1.0)
}

/// Spinner frame for a millisecond timestamp; advances every 100ms
pub fn spinner_frame(millis: u128) -> &'static str {
    SPINNER_FRAMES[(millis / 100) as usize % SPINNER_FRAMES.len()]
}

/// A rect of `percent_x` by `percent_y` centered inside `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [band] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(band);
    popup
}
