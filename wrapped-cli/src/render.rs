use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use wrapped_core::Viewer;

use crate::app::{ANALYZING, App, Field};
use crate::copy::{self, SlideCopy};
use crate::layout::{self, NEXT_GLYPH, NavBar, PREV_GLYPH};

const ACCENT: Color = Color::Green;
pub const NAV_HINT: &str = "Use ← → keys to navigate";

pub fn draw(f: &mut Frame, app: &mut App, now_ms: u64) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    match app.session.viewer() {
        Some(viewer) => {
            draw_header(f, chunks[0], Some(viewer));
            draw_stage(f, chunks[1], viewer, now_ms);
            let bar = NavBar::layout(chunks[2], viewer.slide_count());
            draw_nav_bar(f, &bar, viewer);
            draw_hint(f, chunks[3], NAV_HINT);
            app.nav_bar = Some(bar);
        }
        None => {
            draw_header(f, chunks[0], None);
            draw_upload(f, chunks[1], app);
            draw_hint(f, chunks[3], "Tab switch field, Enter upload, Esc quit");
            app.nav_bar = None;
        }
    }
}

fn draw_header(f: &mut Frame, area: Rect, viewer: Option<&Viewer>) {
    let mut spans = vec![Span::styled(
        " M-PESA Wrapped",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    if let Some(v) = viewer {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            counter(v.current_index(), v.slide_count()),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "3 / 9", one-based.
pub fn counter(current_index: usize, slide_count: usize) -> String {
    format!("{} / {}", current_index + 1, slide_count)
}

fn draw_hint(f: &mut Frame, area: Rect, hint: &str) {
    let p = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    f.render_widget(p, area);
}

fn draw_stage(f: &mut Frame, stage: Rect, viewer: &Viewer, now_ms: u64) {
    // Back to front; the active card is last.
    for sp in viewer.placements() {
        let p = &sp.placement;
        if p.interactive {
            let rect = if viewer.is_transitioning() {
                let progress = viewer.transition_progress(now_ms);
                layout::sliding_card_rect(stage, viewer.direction(), progress)
            } else {
                layout::card_rect(stage, p)
            };
            draw_active_card(f, rect, viewer);
        } else {
            let rect = layout::card_rect(stage, p);
            let grey = Color::Indexed(layout::grey_for_opacity(p.opacity));
            f.render_widget(Clear, rect);
            f.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(grey)),
                rect,
            );
        }
    }
}

fn draw_active_card(f: &mut Frame, rect: Rect, viewer: &Viewer) {
    let def = viewer.active_slide();
    let c = copy::slide_copy(def, &viewer.active_facts());

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            format!(" {} ", c.title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let body = Paragraph::new(card_text(&c, inner.width))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(body, inner);
}

fn card_text(c: &SlideCopy, width: u16) -> Text<'static> {
    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            c.headline.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    lines.extend(c.lines.iter().map(|l| Line::raw(l.clone())));
    if !c.bars.is_empty() {
        lines.push(Line::raw(""));
        let label_w = c.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        let value_w = c.bars.iter().map(|b| b.value.chars().count()).max().unwrap_or(0);
        let track = (width as usize).saturating_sub(label_w + value_w + 6).min(40);
        for b in &c.bars {
            let fill = bar_fill(b.percent, track);
            let pad = " ".repeat(track - fill.chars().count());
            lines.push(Line::from(vec![
                Span::raw(format!("{:<label_w$} ", b.label)),
                Span::styled(fill, Style::default().fg(ACCENT)),
                Span::raw(pad),
                Span::raw(format!(" {:>value_w$}", b.value)),
            ]));
        }
    }
    Text::from(lines)
}

/// Filled part of a bar of `track` cells.
pub fn bar_fill(percent: f64, track: usize) -> String {
    let cells = ((percent.clamp(0.0, 100.0) / 100.0) * track as f64).round() as usize;
    "█".repeat(cells.min(track))
}

fn draw_nav_bar(f: &mut Frame, bar: &NavBar, viewer: &Viewer) {
    let enabled = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let prev_style = if viewer.can_go_previous() { enabled } else { disabled };
    let next_style = if viewer.can_go_next() { enabled } else { disabled };
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {PREV_GLYPH} "), prev_style)),
        bar.prev,
    );
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {NEXT_GLYPH} "), next_style)),
        bar.next,
    );

    for (i, dot) in bar.dots.iter().enumerate() {
        let (glyph, style) = if i == viewer.current_index() {
            ("●", enabled)
        } else {
            ("○", Style::default().fg(Color::Gray))
        };
        f.render_widget(Paragraph::new(Span::styled(glyph, style)), *dot);
    }
}

fn draw_upload(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let width = area.width.min(64);
    let card = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(14) / 2,
        width,
        height: area.height.min(14),
    };

    let focused = |field: Field| {
        if form.focus == field && !form.is_submitting() {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let cursor = |field: Field| {
        if form.focus == field && !form.is_submitting() {
            "▏"
        } else {
            ""
        }
    };
    let masked: String = "•".repeat(form.password.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "Discover your M-PESA spending story",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled("M-PESA Statement (PDF file)", focused(Field::File))),
        Line::raw(format!("{}{}", form.path, cursor(Field::File))),
        Line::raw(""),
        Line::from(Span::styled(
            "PDF Password (if your statement is protected)",
            focused(Field::Password),
        )),
        Line::raw(format!("{masked}{}", cursor(Field::Password))),
        Line::raw(""),
    ];

    if form.is_submitting() {
        lines.push(Line::from(Span::styled(ANALYZING, Style::default().fg(Color::Yellow))));
    } else if let Some(err) = app.session.last_error() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    } else {
        lines.push(Line::from(Span::styled(
            "Press Enter to upload",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Safaricom sends the statement password via SMS.",
        Style::default().fg(Color::DarkGray),
    )));

    let p = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" upload "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(p, card);
}
