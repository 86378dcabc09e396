use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::i18n::{translate, Text};

use super::colors;
use super::layout::OverlayLayout;

pub fn render_handle(f: &mut Frame, layout: &OverlayLayout) {
    if layout.handle.is_empty() {
        return;
    }
    let handle = Paragraph::new("DEV")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(colors::NIGHT)
                .fg(colors::WHITE)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(Clear, layout.handle);
    f.render_widget(handle, layout.handle);
}

pub fn render_panel(f: &mut Frame, layout: &OverlayLayout) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::MUTED))
        .style(Style::default().bg(colors::NIGHT).fg(colors::WHITE));
    f.render_widget(Clear, layout.panel);
    f.render_widget(block, layout.panel);
}

/// One button per language; the active one is drawn inverted.
pub fn render_languages(f: &mut Frame, app: &App, layout: &OverlayLayout) {
    let current = app.language();
    for (lang, rect) in &layout.languages {
        let style = if *lang == current {
            Style::default()
                .bg(colors::WHITE)
                .fg(colors::NIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(colors::NIGHT).fg(colors::WHITE)
        };
        let button = Paragraph::new(lang.label())
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors::BORDER)),
            );
        f.render_widget(button, *rect);
    }
}

/// Bottom row: transient copy confirmation, or the key hints.
pub fn render_status(f: &mut Frame, app: &App, area: Rect) {
    if area.is_empty() {
        return;
    }
    let lang = app.language();
    let line = match &app.flash {
        Some(flash) => {
            let color = if flash.text == Text::CopyFailed {
                colors::FLASH_ERR
            } else {
                colors::FLASH_OK
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", translate(lang, flash.text)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(flash.detail.as_str(), Style::default().fg(colors::WHITE)),
            ])
        }
        None => Line::from(Span::styled(
            translate(lang, Text::Help),
            Style::default().fg(colors::MUTED),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
