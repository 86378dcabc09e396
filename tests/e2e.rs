//! End-to-end tests for the message pipeline.
//!
//! Each test exercises the full path: feed file → tailer → bus → app → frame.

use std::io::Write;
use std::sync::mpsc;

use devbar::app::App;
use devbar::bus::{MessageBus, MSG_CHANNEL};
use devbar::clipboard::Osc52Clipboard;
use devbar::events::AppEvent;
use devbar::feed::FeedTailer;
use devbar::i18n::{Catalog, Language};
use devbar::palette::{Palette, SENTINEL};
use devbar::theme;
use devbar::ui;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn usage_line(name: &str, value: &str) -> String {
    format!(r#"{{"type":"usage.cpu","data":{{"name":"{name}","value":"{value}"}}}}"#)
}

fn append(file: &mut NamedTempFile, lines: &[String]) {
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
}

fn make_app(palette: Palette) -> App {
    App::new(
        palette,
        Box::new(Catalog::new(Language::En)),
        Box::new(Osc52Clipboard::new(Vec::new(), false)),
        None,
    )
}

/// Tail the feed once, emit onto the bus, and drain the app's queue.
fn pump(tailer: &mut FeedTailer, bus: &MessageBus, rx: &mpsc::Receiver<AppEvent>, app: &mut App) {
    for entry in tailer.read_new_entries() {
        bus.emit(&entry.channel, &entry.message);
    }
    for event in rx.try_iter() {
        if let AppEvent::Message(message) = event {
            app.handle_message(&message);
        }
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| ui::render(f, app)).unwrap();
    let buf = terminal.backend().buffer();
    (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Twelve samples for one source leave the last ten, latest shown rounded.
#[test]
fn feed_to_sparkline_label() {
    let mut feed = NamedTempFile::new().unwrap();
    let mut tailer = FeedTailer::new(feed.path().to_path_buf());
    let bus = MessageBus::new();
    let (tx, rx) = mpsc::channel();

    let mut app = make_app(Palette::derive(&theme::builtin_tokens()).unwrap());
    app.mount(&bus, tx);
    app.toggle();
    app.tick(app.now + devbar::overlay::SLIDE_DURATION);

    let lines: Vec<String> = (1..=12).map(|i| usage_line("main", &format!("{i}.0"))).collect();
    append(&mut feed, &lines);
    pump(&mut tailer, &bus, &rx, &mut app);

    let values: Vec<f64> = app.usage.get("main").unwrap().iter().map(|s| s.value).collect();
    assert_eq!(values, (3..=12).map(f64::from).collect::<Vec<_>>());
    assert!(screen(&app).contains("12%"));
}

/// Other kinds and other channels never reach the usage history.
#[test]
fn foreign_messages_are_ignored() {
    let mut feed = NamedTempFile::new().unwrap();
    let mut tailer = FeedTailer::new(feed.path().to_path_buf());
    let bus = MessageBus::new();
    let (tx, rx) = mpsc::channel();
    let mut app = make_app(Palette::derive(&theme::builtin_tokens()).unwrap());
    app.mount(&bus, tx);

    append(
        &mut feed,
        &[
            r#"{"type":"usage.mem","data":{"name":"main","value":"1"}}"#.to_string(),
            r#"{"channel":"updater","type":"usage.cpu","data":{"name":"main","value":"1"}}"#
                .to_string(),
            "{broken".to_string(),
        ],
    );
    pump(&mut tailer, &bus, &rx, &mut app);
    assert!(app.usage.is_empty());

    append(&mut feed, &[usage_line("gpu", "abc")]);
    pump(&mut tailer, &bus, &rx, &mut app);
    assert!(app.usage.latest("gpu").unwrap().is_nan());
}

/// Dropping the app releases its listener; later messages go nowhere.
#[test]
fn teardown_releases_listener() {
    let bus = MessageBus::new();
    let (tx, rx) = mpsc::channel();
    {
        let mut app = make_app(Palette::derive(&theme::builtin_tokens()).unwrap());
        app.mount(&bus, tx);
        assert_eq!(bus.listener_count(MSG_CHANNEL), 1);
    }
    assert_eq!(bus.listener_count(MSG_CHANNEL), 0);

    let message = devbar::bus::HostMessage {
        kind: "usage.cpu".into(),
        data: serde_json::json!({"name": "main", "value": "1"}),
    };
    assert_eq!(bus.emit(MSG_CHANNEL, &message), 0);
    assert!(rx.try_iter().next().is_none());
}

/// A theme file replaces the built-in tokens and drives the swatches.
#[test]
fn theme_file_to_palette() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r##"{{"colors":{{"transparent":"transparent","paper":"#fafafa","ink":"#111111","brand":"hsl(220, 80%, 50%)"}}}}"##
    )
    .unwrap();
    file.flush().unwrap();

    let tokens = theme::load_tokens(file.path()).unwrap();
    let palette = Palette::derive(&tokens).unwrap();
    let names: Vec<&str> = palette.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["ink", "brand", "paper"]);
    assert!(names.iter().all(|n| *n != SENTINEL));

    let mut app = make_app(palette);
    app.toggle();
    app.tick(app.now + devbar::overlay::SLIDE_DURATION);
    let text = screen(&app);
    assert!(text.contains("ink") && text.contains("brand") && text.contains("paper"));
}

/// An invalid color in a theme file fails derivation with the token named.
#[test]
fn theme_file_with_bad_color() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"ok":"white","bad":"rgb(1,2)"}}"#).unwrap();
    file.flush().unwrap();

    let tokens = theme::load_tokens(file.path()).unwrap();
    let err = Palette::derive(&tokens).unwrap_err();
    assert_eq!(err.name, "bad");
}
