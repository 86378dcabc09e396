use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

use crate::bus::HostMessage;

/// Unified application event.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// A message delivered on the overlay's bus subscription.
    Message(HostMessage),
    /// The feed file changed on disk.
    FeedChanged,
    Tick,
}

/// Spawn a thread that polls crossterm input events and sends them to the channel.
pub fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => tx.send(AppEvent::Key(key)),
                Ok(Event::Mouse(mouse)) => tx.send(AppEvent::Mouse(mouse)),
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break;
            }
        }
    });
}

/// Send [`AppEvent::Tick`] every `period`, measured from a fixed start so
/// slow receivers do not stretch the schedule. Stops once the loop is gone.
pub fn spawn_tick_timer(tx: mpsc::Sender<AppEvent>, period: Duration) {
    std::thread::spawn(move || {
        let mut next = Instant::now();
        loop {
            next += period;
            std::thread::sleep(next.saturating_duration_since(Instant::now()));
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}
