use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;

use crate::app::App;
use crate::i18n::{translate, Text};
use crate::usage::{percent_label, UsageSample};

use super::colors;
use super::layout::SOURCE_HEIGHT;

/// Sources in name order: a label row with the latest value, then a
/// sparkline of the window.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.is_empty() {
        return;
    }
    if app.usage.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                translate(app.language(), Text::NoSamples),
                Style::default().fg(colors::MUTED),
            )),
            area,
        );
        return;
    }

    let mut y = area.y;
    for (name, window) in app.usage.iter() {
        if y >= area.bottom() {
            break;
        }
        let height = SOURCE_HEIGHT.min(area.bottom() - y);
        let slot = Rect::new(area.x, y, area.width, height);
        y += SOURCE_HEIGHT;

        let latest = window.back().map_or(f64::NAN, |s| s.value);
        let label = percent_label(latest);
        let pad = (area.width as usize).saturating_sub(name.chars().count() + label.len());
        let header = Line::from(vec![
            Span::styled(name, Style::default().fg(colors::WHITE).add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(pad)),
            Span::styled(label, Style::default().fg(colors::MUTED)),
        ]);
        f.render_widget(Paragraph::new(header), Rect { height: 1, ..slot });

        if slot.height > 1 {
            let chart = Rect {
                y: slot.y + 1,
                height: slot.height - 1,
                ..slot
            };
            let sparkline = Sparkline::default()
                .data(sparkline_data(window))
                .style(Style::default().fg(colors::CHART))
                .absent_value_style(Style::default().fg(colors::CHART_GAP))
                .absent_value_symbol("·");
            f.render_widget(sparkline, chart);
        }
    }
}

/// Tallest bar the sparkline is given. The widget multiplies each bar by
/// the chart height, so unbounded values would overflow.
pub const BAR_CEILING: f64 = 1_000_000.0;

/// Bars for the sparkline; `NaN` samples become gaps, negatives clamp to 0,
/// huge and infinite values clamp to [`BAR_CEILING`].
pub fn sparkline_data<'a>(
    window: impl IntoIterator<Item = &'a UsageSample>,
) -> Vec<Option<u64>> {
    window
        .into_iter()
        .map(|s| {
            if s.value.is_nan() {
                None
            } else {
                Some(s.value.clamp(0.0, BAR_CEILING).round() as u64)
            }
        })
        .collect()
}
