// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;
pub mod terminal;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, centered_rect, spinner_frame};
pub use input::{handle_confirm_input, handle_key_event, route_key, KeyAction, KeyRoute};
pub use terminal::{TerminalSession, Tui};

use crate::controller::{Controller, JobKind, Phase};
use crate::domain::{FileBatch, Tally};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

/// Presentation-only overlays on top of the controller's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Plain frame for the current phase
    Browsing,
    /// Help overlay visible
    Help,
    /// Waiting for the user to confirm a delete
    ConfirmDelete,
}

/// Run settings shown on screen
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo<'a> {
    pub target: Option<&'a Path>,
    pub dry_run: bool,
}

/// Renders the frame for the controller's current phase plus any overlay
pub fn render(frame: &mut Frame, ctrl: &Controller, view: ViewState, info: &FrameInfo) {
    match ctrl.phase() {
        Phase::FileManage | Phase::Processing => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4), // Header with progress
                    Constraint::Min(0),    // Current file
                    Constraint::Length(3), // Footer
                ])
                .split(frame.area());

            render_header(frame, chunks[0], ctrl);
            render_content(frame, chunks[1], ctrl, info);
            render_footer(frame, chunks[2]);

            if ctrl.phase() == Phase::Processing {
                render_processing_overlay(frame, ctrl);
            } else {
                match view {
                    ViewState::Help => render_help_overlay(frame),
                    ViewState::ConfirmDelete => {
                        if let Some(name) = ctrl.batch().current() {
                            render_confirm_delete_overlay(frame, name, info.dry_run);
                        }
                    }
                    ViewState::Browsing => {}
                }
            }
        }
        Phase::End => render_summary(frame, ctrl.batch(), &ctrl.tally(), info.dry_run),
        Phase::Error => render_error(
            frame,
            ctrl.error_message().unwrap_or("unknown error"),
            ctrl.batch().current(),
        ),
    }
}

/// Key bindings shown in the help overlay: keys, meaning, key color
const KEYMAP: [(&str, &str, Color); 5] = [
    ("k  →", "Keep file", ACCENT_SECONDARY),
    ("d  ←", "Delete file", ACCENT_PRIMARY),
    ("s  ↓", "Skip file", TEXT_SECONDARY),
    ("q  ^C", "Quit", TEXT_SECONDARY),
    ("?  Esc", "Close this help", TEXT_SECONDARY),
];

/// One-line account of how far the batch got
pub fn progress_headline(batch: &FileBatch) -> String {
    if batch.is_complete() {
        format!("Processed {} files", batch.total())
    } else {
        format!("Stopped at file {} of {}", batch.progress(), batch.total())
    }
}

/// Clears a centered popup, draws its frame and returns the inner area
fn popup(
    frame: &mut Frame,
    percent_x: u16,
    percent_y: u16,
    title: &str,
    accent: Color,
) -> Rect {
    let area = centered_rect(percent_x, percent_y, frame.area());
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    inner
}

fn dim(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(TEXT_SECONDARY)))
}

fn tally_row(
    mark: &'static str,
    label: &'static str,
    count: usize,
    color: Color,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::raw(format!("{:<9}", label)),
        Span::styled(
            count.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Renders the summary screen at the end
pub fn render_summary(frame: &mut Frame, batch: &FileBatch, tally: &Tally, dry_run: bool) {
    let title = if dry_run {
        " Session Complete [DRY RUN] "
    } else {
        " Session Complete "
    };
    let inner = popup(frame, 60, 50, title, ACCENT_HIGHLIGHT);

    let headline = Line::from(Span::styled(
        progress_headline(batch),
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ));

    let lines = vec![
        Line::from(""),
        headline,
        Line::from(""),
        tally_row("✓ ", "Kept:", tally.kept, ACCENT_SECONDARY),
        tally_row("✗ ", "Deleted:", tally.deleted, ACCENT_PRIMARY),
        tally_row("○ ", "Skipped:", tally.skipped, TEXT_SECONDARY),
        Line::from(""),
        dim("Press any key to exit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders a failed operation's message
pub fn render_error(frame: &mut Frame, message: &str, file: Option<&str>) {
    let inner = popup(frame, 70, 50, " [!] Error ", ACCENT_PRIMARY);

    let mut lines = vec![Line::from("")];
    if let Some(name) = file {
        lines.push(Line::from(vec![
            Span::styled("File: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                name,
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        message,
        Style::default().fg(ACCENT_PRIMARY),
    )));
    lines.push(Line::from(""));
    lines.push(dim("Press any key to exit"));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the help overlay from [`KEYMAP`]
pub fn render_help_overlay(frame: &mut Frame) {
    let inner = popup(frame, 50, 60, " Keys ", ACCENT_HIGHLIGHT);

    let mut lines = vec![Line::from("")];
    lines.extend(KEYMAP.iter().map(|&(keys, meaning, color)| {
        Line::from(vec![
            Span::styled(
                format!("{:>8}  ", keys),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(meaning),
        ])
    }));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the confirmation dialog for delete action
pub fn render_confirm_delete_overlay(frame: &mut Frame, name: &str, dry_run: bool) {
    let inner = popup(frame, 50, 50, " ⚠ Confirm Delete ", ACCENT_PRIMARY);

    let consequence = if dry_run {
        "Dry run: nothing will be removed."
    } else {
        "This file will be permanently deleted."
    };

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this file?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(name, Style::default().fg(TEXT_PRIMARY))),
        Line::from(""),
        dim(consequence),
        Line::from(""),
        Line::from(vec![
            Span::styled("y/Enter", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" delete    "),
            Span::styled("n/Esc", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw(" cancel"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(confirm_lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the spinner shown while a keep or delete is in flight
fn render_processing_overlay(frame: &mut Frame, ctrl: &Controller) {
    let inner = popup(frame, 40, 30, " Working ", ACCENT_HIGHLIGHT);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let verb = match ctrl.pending() {
        Some(JobKind::Delete) => "Deleting",
        _ => "Keeping",
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {} ", spinner_frame(now)),
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::styled(format!("{} ", verb), Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                ctrl.batch().current().unwrap_or_default(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Renders the header: "File N of M" and a progress gauge
fn render_header(frame: &mut Frame, area: Rect, ctrl: &Controller) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let batch = ctrl.batch();
    let title_line = Line::from(vec![
        Span::styled(
            format!(" File {} of {} ", batch.progress(), batch.total()),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(vec![title_line])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    // Same 1-based position as the title, so the two never disagree
    let ratio = calculate_progress(batch.progress(), batch.total());

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(ratio)
        .label(format!("{}%", (ratio * 100.0) as u16));

    frame.render_widget(gauge, chunks[1]);
}

/// Renders the current filename and where a keep would put it
fn render_content(frame: &mut Frame, area: Rect, ctrl: &Controller, info: &FrameInfo) {
    let name = ctrl.batch().current().unwrap_or_default();

    let destination = match info.target {
        Some(dir) => Span::styled(
            dir.display().to_string(),
            Style::default().fg(ACCENT_SECONDARY),
        ),
        None => Span::styled("left in place", Style::default().fg(TEXT_SECONDARY)),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            name,
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Kept files go to: ", Style::default().fg(TEXT_SECONDARY)),
            destination,
        ]),
    ];

    if info.dry_run {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[DRY RUN] No files will be moved or deleted",
            Style::default().fg(ACCENT_HIGHLIGHT),
        )));
    }

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Current file "),
        )
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(content, area);
}

/// Renders the footer with styled controls
fn render_footer(frame: &mut Frame, area: Rect) {
    let controls = Line::from(vec![
        Span::styled(
            " k ",
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Keep", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            "d ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Delete", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("s ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Skip", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}
