use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::Parser as ClapParser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use devbar::app::App;
use devbar::bus::MessageBus;
use devbar::clipboard::Osc52Clipboard;
use devbar::events::{self, AppEvent};
use devbar::feed::FeedTailer;
use devbar::i18n::{Catalog, Language};
use devbar::palette::Palette;
use devbar::theme;

#[derive(ClapParser, Debug)]
#[command(name = "devbar", about = "Developer overlay: theme palette, CPU sparklines, language switcher")]
struct Cli {
    /// JSONL file the host process appends messages to.
    #[arg(short, long)]
    feed: Option<PathBuf>,

    /// Replay messages already in the feed instead of starting at its end.
    #[arg(long)]
    replay: bool,

    /// JSON theme file replacing the built-in color tokens.
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Initial language.
    #[arg(short, long, value_enum, default_value_t = Language::En)]
    lang: Language,

    /// Append an action log to this file.
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Print the derived palette to stdout instead of launching the TUI.
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let tokens = match &cli.theme {
        Some(path) => theme::load_tokens(path)?,
        None => theme::builtin_tokens(),
    };
    // Derived once; every frame reads this value.
    let palette = Palette::derive(&tokens).wrap_err("deriving palette")?;

    if cli.dump {
        dump_palette(&palette);
        return Ok(());
    }

    let event_log = match &cli.event_log {
        Some(path) => Some(BufWriter::new(
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("opening event log {}", path.display()))?,
        )),
        None => None,
    };

    // Launch TUI. A panic leaves raw mode otherwise.
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        previous_hook(info);
    }));
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(
        palette,
        Box::new(Catalog::new(cli.lang)),
        Box::new(Osc52Clipboard::stdout()),
        event_log,
    );

    let result = run_tui(&mut terminal, app, cli.feed.as_deref(), cli.replay);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    feed: Option<&Path>,
    replay: bool,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Spawn input reader thread.
    events::spawn_input_reader(tx.clone());

    // Spawn tick timer (250ms).
    events::spawn_tick_timer(tx.clone(), Duration::from_millis(250));

    // The app holds the bus subscription; it is released when `app` drops,
    // whichever way this function returns.
    let bus = MessageBus::new();
    app.mount(&bus, tx.clone());

    let mut tailer = feed.map(|path| {
        if replay {
            FeedTailer::from_start(path.to_path_buf())
        } else {
            FeedTailer::new(path.to_path_buf())
        }
    });

    // Watch the feed's directory so appends wake the loop.
    let tx_feed = tx.clone();
    let _feed_watcher = match feed {
        Some(path) => {
            let watched = path.to_path_buf();
            let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
                if let Ok(event) = res {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                        && event.paths.iter().any(|p| p.file_name() == watched.file_name())
                    {
                        let _ = tx_feed.send(AppEvent::FeedChanged);
                    }
                }
            })?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            Some(watcher)
        }
        None => None,
    };

    loop {
        app.tick(Instant::now());
        let size = terminal.size()?;
        app.resize(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|f| devbar::ui::render(f, &app))?;

        // Redraw at ~60fps while the panel slides.
        let timeout = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(50)
        };

        match rx.recv_timeout(timeout) {
            Ok(AppEvent::Key(key)) => app.handle_key(key),
            Ok(AppEvent::Mouse(mouse)) => app.handle_mouse(mouse),
            Ok(AppEvent::Message(message)) => app.handle_message(&message),
            Ok(AppEvent::FeedChanged) | Ok(AppEvent::Tick) => {
                // Poll the tailer: the tick covers filesystems without events.
                if let Some(ref mut tailer) = tailer {
                    for entry in tailer.read_new_entries() {
                        bus.emit(&entry.channel, &entry.message);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn dump_palette(palette: &Palette) {
    println!("Palette ({} colors, by lightness)", palette.len());
    println!();
    for entry in palette.entries() {
        println!(
            "  {:<16} {:<28} L={:>5.1}  {}",
            entry.name,
            entry.value,
            entry.lightness,
            if entry.is_dark { "dark" } else { "light" },
        );
    }
}
