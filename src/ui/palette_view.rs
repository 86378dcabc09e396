use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::palette::Swatch;

use super::layout::OverlayLayout;

pub fn render(f: &mut Frame, app: &App, layout: &OverlayLayout) {
    let swatches = app.palette.swatches();
    for &(index, rect) in &layout.swatches {
        let Some(swatch) = swatches.get(index) else {
            continue;
        };
        render_tile(f, swatch, rect, index == app.selected_swatch);
    }
}

/// A tile filled with the color, its name centered on the middle row.
fn render_tile(f: &mut Frame, swatch: &Swatch, rect: Rect, selected: bool) {
    let mut label_style = Style::default().fg(swatch.fg);
    if selected {
        label_style = label_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let name = truncate(&swatch.name, rect.width as usize);
    let mut lines = vec![Line::from("")];
    lines.push(Line::styled(name, label_style));
    let tile = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(swatch.bg));
    f.render_widget(tile, rect);
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut out: String = name.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
