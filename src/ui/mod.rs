pub mod colors;
pub mod layout;
pub mod palette_view;
pub mod shell;
pub mod usage_view;

use ratatui::Frame;

use crate::app::App;

use layout::OverlayLayout;

pub fn render(f: &mut Frame, app: &App) {
    let layout = OverlayLayout::compute(f.area(), app);

    shell::render_handle(f, &layout);
    if layout.panel.is_empty() {
        return;
    }
    shell::render_panel(f, &layout);
    shell::render_languages(f, app, &layout);
    palette_view::render(f, app, &layout);
    usage_view::render(f, app, layout.usage);
    shell::render_status(f, app, layout.status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use crate::app::helpers::*;
    use crate::i18n::Language;
    use crate::overlay::SLIDE_DURATION;

    fn draw(app: &App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
    }

    fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let height = terminal.backend().buffer().area.height;
        (0..height)
            .map(|y| row_text(terminal, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Find the cell where `text` starts.
    fn find(terminal: &Terminal<TestBackend>, text: &str) -> Option<(u16, u16)> {
        let height = terminal.backend().buffer().area.height;
        (0..height).find_map(|y| {
            let row: Vec<String> = {
                let buf = terminal.backend().buffer();
                (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
            };
            let joined = row.concat();
            let byte = joined.find(text)?;
            // Map byte offset back to a cell index.
            let mut acc = 0;
            for (x, sym) in row.iter().enumerate() {
                if acc == byte {
                    return Some((x as u16, y));
                }
                acc += sym.len();
            }
            None
        })
    }

    fn open(app: &mut App) {
        app.toggle();
        app.tick(app.now + SLIDE_DURATION);
    }

    #[test]
    fn closed_overlay_shows_only_handle() {
        let app = test_app();
        let terminal = draw(&app, 100, 30);
        assert!(row_text(&terminal, 29).contains("DEV"));
        let text = screen_text(&terminal);
        assert!(!text.contains("english"));
        assert!(!text.contains("night"));
    }

    #[test]
    fn open_overlay_shows_languages_and_palette() {
        let mut app = test_app();
        open(&mut app);
        let terminal = draw(&app, 100, 30);
        let text = screen_text(&terminal);
        assert!(text.contains("français"));
        assert!(text.contains("english"));
        assert!(text.contains("black"));
        assert!(text.contains("night"));
        assert!(text.contains("no samples yet"));
        assert!(!row_text(&terminal, 29).contains("DEV"));
    }

    #[test]
    fn current_language_is_highlighted() {
        let mut app = test_app();
        open(&mut app);
        let terminal = draw(&app, 100, 30);
        let buf = terminal.backend().buffer();

        let (x, y) = find(&terminal, "english").unwrap();
        assert_eq!(buf[(x, y)].bg, colors::WHITE);
        assert_eq!(buf[(x, y)].fg, colors::NIGHT);

        let (x, y) = find(&terminal, "fran").unwrap();
        assert_eq!(buf[(x, y)].bg, colors::NIGHT);

        app.change_language(Language::Fr);
        let terminal = draw(&app, 100, 30);
        let buf = terminal.backend().buffer();
        let (x, y) = find(&terminal, "fran").unwrap();
        assert_eq!(buf[(x, y)].bg, colors::WHITE);
        assert!(screen_text(&terminal).contains("aucun échantillon"));
    }

    #[test]
    fn swatch_uses_its_color_and_contrasting_text() {
        let mut app = test_app();
        open(&mut app);
        let terminal = draw(&app, 100, 30);
        let buf = terminal.backend().buffer();

        // Darkest tokens come first.
        let (x, y) = find(&terminal, "black").unwrap();
        assert_eq!(buf[(x, y)].bg, Color::Rgb(0, 0, 0));
        assert_eq!(buf[(x, y)].fg, colors::WHITE);
    }

    #[test]
    fn usage_sources_sorted_with_rounded_labels() {
        let mut app = test_app();
        open(&mut app);
        for i in 1..=12 {
            app.handle_message(&usage_msg("main", &format!("{i}.0")));
        }
        app.handle_message(&usage_msg("gpu", "abc"));
        app.handle_message(&usage_msg("renderer", "33.6"));

        let terminal = draw(&app, 100, 30);
        let (_, gpu_row) = find(&terminal, "gpu").unwrap();
        let (_, main_row) = find(&terminal, "main").unwrap();
        let (_, renderer_row) = find(&terminal, "renderer").unwrap();
        assert!(gpu_row < main_row && main_row < renderer_row);

        assert!(row_text(&terminal, gpu_row).contains("NaN%"));
        assert!(row_text(&terminal, main_row).contains("12%"));
        assert!(row_text(&terminal, renderer_row).contains("34%"));
        assert!(!screen_text(&terminal).contains("no samples yet"));
    }

    #[test]
    fn huge_and_infinite_usage_values_render() {
        let mut app = test_app();
        open(&mut app);
        app.handle_message(&usage_msg("main", "1e30"));
        app.handle_message(&usage_msg("main", "5"));
        app.handle_message(&usage_msg("gpu", "Infinity"));
        app.handle_message(&usage_msg("gpu", "12"));

        let terminal = draw(&app, 100, 30);
        let (_, gpu_row) = find(&terminal, "gpu").unwrap();
        let (_, main_row) = find(&terminal, "main").unwrap();
        assert!(row_text(&terminal, gpu_row).contains("12%"));
        assert!(row_text(&terminal, main_row).contains("5%"));

        // Latest value unbounded: the label shows it, the bars stay capped.
        app.handle_message(&usage_msg("gpu", "Infinity"));
        let terminal = draw(&app, 100, 30);
        assert!(row_text(&terminal, gpu_row).contains("Infinity%"));
    }

    #[test]
    fn copy_confirmation_in_status_row() {
        let mut app = test_app();
        open(&mut app);
        app.copy_swatch(0);
        let terminal = draw(&app, 100, 30);
        assert!(screen_text(&terminal).contains("copied black"));
    }

    #[test]
    fn mid_slide_and_tiny_screens_render() {
        let mut app = test_app();
        app.toggle();
        app.tick(app.now + SLIDE_DURATION / 2);
        let terminal = draw(&app, 100, 30);
        assert!(screen_text(&terminal).contains("DEV"));

        app.tick(app.now + SLIDE_DURATION);
        for (w, h) in [(1, 1), (8, 3), (30, 8)] {
            draw(&app, w, h);
        }
    }
}
