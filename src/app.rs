use crate::config::Config;
use crate::display::WeatherDisplay;
use crate::event::{Event, EventHandler, LookupEvent};
use crate::lookup::LookupSequencer;
use crate::ui;
use crate::ui::components::{ErrorBanner, FieldKey, SearchField};
use crate::weather::{Geolocator, Place, WeatherClient, WeatherError, WeatherReport};
use chrono::Local;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Lookup lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Loading,
  Displayed,
  Errored,
}

/// Main application state
pub struct App {
  config: Config,

  /// Weather client; owns the response cache and request throttle
  client: WeatherClient,

  geolocator: Geolocator,

  /// What the views draw
  display: WeatherDisplay,

  search: SearchField,

  banner: ErrorBanner,

  sequencer: LookupSequencer,

  phase: Phase,

  /// Last place looked up, for refresh
  last_place: Option<Place>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let api_key = config.api_key()?;
    let client = WeatherClient::new(&config, api_key)?;
    let geolocator = Geolocator::from_config(&config.location);
    // Replaced by the event handler's sender in run()
    let (event_tx, _rx) = mpsc::unbounded_channel();

    let display = WeatherDisplay::new(&config.provider.icon_host);
    let banner = ErrorBanner::new(Duration::from_millis(config.error_display_ms));

    Ok(Self {
      config,
      client,
      geolocator,
      display,
      search: SearchField::new(),
      banner,
      sequencer: LookupSequencer::new(),
      phase: Phase::Idle,
      last_place: None,
      event_tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    self.load_initial_data();

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  /// Look up the default city on start.
  fn load_initial_data(&mut self) {
    let place = Place::City {
      city: self.config.default_city.clone(),
      country: self.config.default_country.clone(),
    };
    self.start_lookup(place);
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.banner.tick(Instant::now()),
      Event::Lookup(lookup) => self.handle_lookup_event(lookup),
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // Search field gets first look at every key
    match self.search.handle_key(key) {
      FieldKey::Submitted(value) => {
        self.submit_city(&value);
        return;
      }
      FieldKey::Consumed => return,
      FieldKey::Ignored => {}
    }

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Enter => {
        let value = self.search.value().to_string();
        self.submit_city(&value);
      }
      KeyCode::Char('l') => self.request_location(),
      KeyCode::Char('r') => {
        if let Some(place) = self.last_place.clone() {
          self.start_lookup(place);
        }
      }
      _ => {}
    }
  }

  /// Search the typed city in the default country.
  fn submit_city(&mut self, raw: &str) {
    let city = raw.trim();
    if city.is_empty() {
      self.show_error(&WeatherError::Validation(
        "Please enter a city name".to_string(),
      ));
      return;
    }

    self.start_lookup(Place::City {
      city: city.to_string(),
      country: self.config.default_country.clone(),
    });
  }

  /// Resolve device coordinates; the lookup starts once they arrive.
  fn request_location(&self) {
    let geolocator = self.geolocator.clone();
    let http = self.client.http().clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match geolocator.locate(&http).await {
        Ok(coords) => LookupEvent::Located(coords),
        Err(e) => LookupEvent::LocateFailed(e),
      };
      let _ = tx.send(Event::Lookup(event));
    });
  }

  fn start_lookup(&mut self, place: Place) {
    let seq = self.sequencer.begin();
    info!(seq, ?place, "starting lookup");

    self.phase = Phase::Loading;
    self.display.show_loading();
    self.last_place = Some(place.clone());

    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = client.fetch(&place).await;
      let _ = tx.send(Event::Lookup(LookupEvent::Finished { seq, result }));
    });
  }

  fn handle_lookup_event(&mut self, event: LookupEvent) {
    match event {
      LookupEvent::Located(coords) => self.start_lookup(Place::Coords(coords)),
      LookupEvent::LocateFailed(e) => self.show_error(&e),
      LookupEvent::Finished { seq, result } => self.finish_lookup(seq, result),
    }
  }

  fn finish_lookup(&mut self, seq: u64, result: Result<WeatherReport, WeatherError>) {
    if !self.sequencer.complete(seq) {
      debug!(seq, "dropping superseded lookup result");
      return;
    }

    match result {
      Ok(report) => {
        self.display.render(&report, &Local);
        self.banner.clear();
        self.phase = Phase::Displayed;
      }
      Err(e) => {
        self.display.finish_loading();
        self.show_error(&e);
        self.phase = Phase::Errored;
      }
    }

    // An older lookup landed while a newer one is still running
    if self.sequencer.in_flight() {
      self.phase = Phase::Loading;
      self.display.loading = true;
    }
  }

  fn show_error(&mut self, error: &WeatherError) {
    self.banner.show(error.to_string(), Instant::now());
  }

  // Accessors for UI rendering
  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn display(&self) -> &WeatherDisplay {
    &self.display
  }

  pub fn search(&self) -> &SearchField {
    &self.search
  }

  pub fn banner(&self) -> &ErrorBanner {
    &self.banner
  }

  pub fn config(&self) -> &Config {
    &self.config
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{LocationConfig, LocationSource};
  use serde_json::{json, Value};
  use wiremock::matchers::{any, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn test_app(server: &MockServer, location: LocationConfig) -> (App, mpsc::UnboundedReceiver<Event>) {
    let mut config = Config::default();
    config.provider.base_url = server.uri();
    config.provider.api_key = Some("test-key".to_string());
    config.cache.min_interval_ms = 0;
    config.location = location;

    let mut app = App::new(config).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    app.event_tx = tx;
    (app, rx)
  }

  fn no_location() -> LocationConfig {
    LocationConfig {
      source: LocationSource::None,
      ..LocationConfig::default()
    }
  }

  fn current_body(name: &str, country: &str) -> Value {
    json!({
      "name": name,
      "sys": { "country": country },
      "main": { "temp": 29.4, "feels_like": 31.0, "humidity": 60, "pressure": 1005 },
      "wind": { "speed": 2.1 },
      "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }]
    })
  }

  fn forecast_body() -> Value {
    let start = 1_728_950_400_i64;
    let list: Vec<Value> = (0..40)
      .map(|i| {
        json!({
          "dt": start + i * 10_800,
          "main": { "temp": 25.0 + (i % 8) as f64 },
          "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
          "dt_txt": ""
        })
      })
      .collect();
    json!({ "list": list })
  }

  async fn mount_ok(server: &MockServer, name: &str, country: &str) {
    Mock::given(method("GET"))
      .and(path("/weather"))
      .respond_with(ResponseTemplate::new(200).set_body_json(current_body(name, country)))
      .mount(server)
      .await;
    Mock::given(method("GET"))
      .and(path("/forecast"))
      .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
      .mount(server)
      .await;
  }

  /// Feed the next background event back into the app.
  async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Event>) {
    let event = rx.recv().await.unwrap();
    app.handle_event(event);
  }

  /// Focus the field, replace its contents and submit.
  fn type_city(app: &mut App, city: &str) {
    app.handle_event(key(KeyCode::Char('/')));
    app.handle_event(Event::Key(KeyEvent::new(
      KeyCode::Char('u'),
      KeyModifiers::CONTROL,
    )));
    for c in city.chars() {
      app.handle_event(key(KeyCode::Char(c)));
    }
    app.handle_event(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_empty_input_shows_validation_error() {
    let server = MockServer::start().await;
    Mock::given(any())
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "   ");
    assert_eq!(app.phase, Phase::Idle);
    assert_eq!(app.banner().message(), Some("Please enter a city name"));

    // Activation key with an empty field behaves the same
    app.handle_event(key(KeyCode::Enter));
    assert_eq!(app.phase, Phase::Idle);
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn test_search_renders_report() {
    let server = MockServer::start().await;
    mount_ok(&server, "Mumbai", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "Mumbai");
    assert_eq!(app.phase, Phase::Loading);
    assert!(app.display().loading);

    pump(&mut app, &mut rx).await;
    assert_eq!(app.phase, Phase::Displayed);
    assert_eq!(app.display().current.location, "Mumbai, IN");
    assert_eq!(app.display().forecast.len(), 5);
    assert!(!app.display().loading);
  }

  #[tokio::test]
  async fn test_activation_key_resubmits_field() {
    let server = MockServer::start().await;
    mount_ok(&server, "Goa", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "Goa");
    pump(&mut app, &mut rx).await;

    app.handle_event(key(KeyCode::Enter));
    assert_eq!(app.phase, Phase::Loading);
    pump(&mut app, &mut rx).await;
    assert_eq!(app.phase, Phase::Displayed);
  }

  #[tokio::test]
  async fn test_not_found_shows_provider_message_and_keeps_content() {
    let server = MockServer::start().await;
    mount_ok(&server, "Delhi", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "Delhi");
    pump(&mut app, &mut rx).await;
    assert_eq!(app.display().current.location, "Delhi, IN");

    server.reset().await;
    let not_found =
      ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" }));
    Mock::given(any())
      .respond_with(not_found)
      .mount(&server)
      .await;

    type_city(&mut app, "Atlantis");
    pump(&mut app, &mut rx).await;
    assert_eq!(app.phase, Phase::Errored);
    assert_eq!(app.banner().message(), Some("city not found"));
    assert_eq!(app.display().current.location, "Delhi, IN");

    app.banner.tick(Instant::now() + Duration::from_millis(5000));
    assert_eq!(app.banner().message(), None);
  }

  #[tokio::test]
  async fn test_success_clears_error() {
    let server = MockServer::start().await;
    mount_ok(&server, "Pune", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "");
    assert!(app.banner().message().is_some());

    type_city(&mut app, "Pune");
    pump(&mut app, &mut rx).await;
    assert_eq!(app.banner().message(), None);
  }

  #[tokio::test]
  async fn test_superseded_result_is_dropped() {
    let server = MockServer::start().await;
    let (mut app, _rx) = test_app(&server, no_location());

    let first = app.sequencer.begin();
    let second = app.sequencer.begin();
    app.finish_lookup(second, Err(WeatherError::Network("late".to_string())));
    app.finish_lookup(first, Err(WeatherError::Network("early".to_string())));

    assert_eq!(app.banner().message(), Some("Weather data unavailable: late"));
  }

  #[tokio::test]
  async fn test_location_unsupported() {
    let server = MockServer::start().await;
    let (mut app, mut rx) = test_app(&server, no_location());

    app.handle_event(key(KeyCode::Char('l')));
    pump(&mut app, &mut rx).await;
    assert_eq!(app.phase, Phase::Idle);
    assert_eq!(
      app.banner().message(),
      Some("Geolocation is not supported on this system")
    );
  }

  #[tokio::test]
  async fn test_location_outside_expected_country() {
    let server = MockServer::start().await;
    mount_ok(&server, "Kathmandu", "NP").await;
    let location = LocationConfig {
      source: LocationSource::Fixed,
      latitude: Some(27.7),
      longitude: Some(85.3),
      ..LocationConfig::default()
    };
    let (mut app, mut rx) = test_app(&server, location);

    app.handle_event(key(KeyCode::Char('l')));
    pump(&mut app, &mut rx).await; // Located
    assert_eq!(app.phase, Phase::Loading);
    pump(&mut app, &mut rx).await; // Finished
    assert_eq!(app.phase, Phase::Errored);
    assert_eq!(
      app.banner().message(),
      Some("Please use this feature within IN")
    );
  }

  #[tokio::test]
  async fn test_initial_load_and_refresh() {
    let server = MockServer::start().await;
    mount_ok(&server, "Delhi", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    app.load_initial_data();
    pump(&mut app, &mut rx).await;
    assert_eq!(app.display().current.location, "Delhi, IN");

    app.handle_event(key(KeyCode::Char('r')));
    assert_eq!(app.phase, Phase::Loading);
    pump(&mut app, &mut rx).await;
    assert_eq!(app.phase, Phase::Displayed);
  }

  #[tokio::test]
  async fn test_typing_q_in_field_does_not_quit() {
    let server = MockServer::start().await;
    let (mut app, _rx) = test_app(&server, no_location());

    app.handle_event(key(KeyCode::Char('/')));
    app.handle_event(key(KeyCode::Char('q')));
    assert!(!app.should_quit);

    app.handle_event(key(KeyCode::Esc));
    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_draws_report_and_banner() {
    use ratatui::backend::TestBackend;

    let server = MockServer::start().await;
    mount_ok(&server, "Mumbai", "IN").await;
    let (mut app, mut rx) = test_app(&server, no_location());

    type_city(&mut app, "Mumbai");
    pump(&mut app, &mut rx).await;
    type_city(&mut app, "");

    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
    terminal.draw(|frame| ui::draw(frame, &app)).unwrap();
    let screen: String = terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect();

    assert!(screen.contains("Mumbai, IN"));
    assert!(screen.contains("5-day forecast"));
    assert!(screen.contains("Please enter a city name"));
  }
}
