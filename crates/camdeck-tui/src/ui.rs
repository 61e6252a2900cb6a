//! Frame rendering. Pure functions from state to widgets; all mutation
//! happens in the action loop.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use camdeck_core::{AiIndicator, DeviceRecord, DeviceStatus, Gallery, bust, format};

use crate::action::{Focus, Notification, NotificationLevel};
use crate::form_view::{FIELDS, FormView};
use crate::pane::TuiCardPane;

const ONLINE: Color = Color::Green;
const OFFLINE: Color = Color::Red;
const FOCUSED: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::new().fg(FOCUSED)
    } else {
        Style::new().fg(DIM)
    };
    Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .title(format!(" {title} "))
}

pub fn render_header(frame: &mut Frame, area: Rect, device_count: usize, refreshing: bool) {
    let mut spans = vec![
        Span::styled("camdeck", Style::new().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {device_count} device(s)")),
    ];
    if refreshing {
        spans.push(Span::styled("  refreshing…", Style::new().fg(DIM)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Device list with online/offline chips and the AI reachability mark.
pub fn render_device_list(frame: &mut Frame, area: Rect, pane: &TuiCardPane, focused: bool) {
    let items: Vec<ListItem> = pane
        .cards()
        .iter()
        .map(|card| {
            let Some(content) = &card.content else {
                return ListItem::new(card.device_id.clone());
            };
            let status_style = if content.status == DeviceStatus::Online {
                Style::new().fg(ONLINE)
            } else {
                Style::new().fg(OFFLINE)
            };
            let mut title = vec![
                Span::styled("● ", status_style),
                Span::styled(
                    content.device_id.clone(),
                    Style::new().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(content.status.label(), status_style),
            ];
            match content.ai {
                AiIndicator::Unknown => {}
                AiIndicator::Online => {
                    title.push(Span::styled("  AI✓", Style::new().fg(ONLINE)));
                }
                AiIndicator::Offline => {
                    title.push(Span::styled("  AI✗", Style::new().fg(OFFLINE)));
                }
            }
            let detail = Line::from(Span::styled(
                format!(
                    "  {}  {}  {}  {}",
                    content.ip, content.rssi, content.framesize, content.last_seen
                ),
                Style::new().fg(DIM),
            ));
            ListItem::new(vec![Line::from(title), detail])
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("Devices", focused))
        .highlight_style(Style::new().bg(Color::Indexed(236)));

    let mut state = ListState::default();
    state.select(pane.cursor_index());
    frame.render_stateful_widget(list, area, &mut state);
}

/// Preview pane: main image URL, the thumbnail window, and the pager.
pub fn render_preview(
    frame: &mut Frame,
    area: Rect,
    gallery: &Gallery,
    bust_token: u64,
    focused: bool,
) {
    let mut lines = Vec::new();
    match gallery.main() {
        Some(main) => {
            lines.push(Line::from(vec![
                Span::styled("Main: ", Style::new().fg(DIM)),
                Span::raw(bust(main, bust_token)),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "No captures yet",
            Style::new().fg(DIM),
        ))),
    }
    lines.push(Line::raw(""));
    for (i, url) in gallery.window().iter().enumerate() {
        let marker = if gallery.is_main(url) { "▶" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {} ", i + 1), Style::new().fg(FOCUSED)),
            Span::raw(url.clone()),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("Page {}   ←/→ page, 1-4 main, o open", gallery.page_label()),
        Style::new().fg(DIM),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(pane_block("Preview", focused)),
        area,
    );
}

/// Last AI analysis for the selected device, with the generation
/// settings it was produced under.
pub fn render_analysis(frame: &mut Frame, area: Rect, record: Option<&DeviceRecord>) {
    let mut lines = Vec::new();
    if let Some(record) = record {
        let text = record.last_analysis.as_deref().unwrap_or("No analysis yet");
        lines.push(Line::raw(text.to_owned()));
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("Prompt: ", Style::new().fg(DIM)),
            Span::raw(format::fmt_str(record.ai_prompt.as_deref()).to_owned()),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                format::fmt_str(record.ai_host.as_deref()),
                format::fmt_str(record.ai_model.as_deref()),
                format::fmt_epoch_or_dash(record.last_analysis_time),
            ),
            Style::new().fg(DIM),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "ctx {} · predict {}",
                format::fmt_num(record.ai_num_ctx),
                format::fmt_num(record.ai_num_predict),
            ),
            Style::new().fg(DIM),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No device selected",
            Style::new().fg(DIM),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(pane_block("Analysis", false)),
        area,
    );
}

/// Config form, windowed around the cursor. Places the terminal cursor
/// inside the focused text field.
pub fn render_form(frame: &mut Frame, area: Rect, form: &mut FormView, focused: bool) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let first = form
        .cursor()
        .saturating_sub(inner_height.saturating_sub(1) / 2)
        .min(FIELDS.len().saturating_sub(inner_height.max(1)));

    let mut lines = Vec::new();
    for index in first..(first + inner_height.max(1)).min(FIELDS.len()) {
        let label = FIELDS[index].label;
        let value = form.display_value(index);
        let style = if index == form.cursor() && focused {
            Style::new().add_modifier(Modifier::BOLD)
        } else {
            Style::new()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<24}"), style.fg(DIM)),
            Span::styled(value, style),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(pane_block("Config (^S save)", focused)),
        area,
    );

    if focused {
        if let Some(col) = form.input_cursor() {
            let row = form.cursor() - first;
            #[allow(clippy::cast_possible_truncation)]
            frame.set_cursor_position(Position::new(
                area.x + 1 + 24 + col as u16,
                area.y + 1 + row as u16,
            ));
        }
    }
}

/// Footer: key hints on the left, the transient note on the right.
pub fn render_footer(frame: &mut Frame, area: Rect, status: Option<&Notification>) {
    let [hints_area, status_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(48)]).areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " q quit · r refresh · Tab pane · Enter select/toggle",
            Style::new().fg(DIM),
        )),
        hints_area,
    );

    if let Some(note) = status {
        let color = match note.level {
            NotificationLevel::Info => Color::White,
            NotificationLevel::Success => ONLINE,
            NotificationLevel::Error => OFFLINE,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(note.message.clone(), Style::new().fg(color)))
                .right_aligned(),
            status_area,
        );
    }
}

/// Full-pane placeholder shown while the first device list is still
/// being fetched.
pub fn render_loading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled("Loading devices…", Style::new().fg(DIM))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .centered()
            .block(pane_block("Devices", false)),
        area,
    );
}

/// Full-pane error shown when the very first list fetch fails.
pub fn render_fatal(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Could not reach the registry",
            Style::new().fg(OFFLINE).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw(message.to_owned()),
        Line::raw(""),
        Line::from(Span::styled(
            "Press r to retry, q to quit.",
            Style::new().fg(DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(pane_block("Error", true)),
        area,
    );
}
