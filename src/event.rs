use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::weather::{Coordinates, WeatherError, WeatherReport};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh and banner expiry
  Tick,
  /// Result of a background task
  Lookup(LookupEvent),
}

/// Messages from background lookup tasks
#[derive(Debug)]
pub enum LookupEvent {
  /// Geolocation resolved; start a coordinate lookup
  Located(Coordinates),
  /// Geolocation failed before any lookup started
  LocateFailed(WeatherError),
  /// A weather lookup finished
  Finished {
    seq: u64,
    result: Result<WeatherReport, WeatherError>,
  },
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let input_tx = tx.clone();

    // crossterm polling blocks, keep it off the runtime workers
    tokio::task::spawn_blocking(move || loop {
      let sent = if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
            input_tx.send(Event::Key(key))
          }
          _ => Ok(()),
        }
      } else {
        input_tx.send(Event::Tick)
      };
      if sent.is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// Sender for background tasks to report back on
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
