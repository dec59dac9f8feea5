use banned_ip_map::{app_state::ViewState, config::Opt, export::ExportDocument};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    fs::File,
    io::{self, BufWriter},
    sync::mpsc::{self, Receiver as StdReceiver, Sender as StdSender},
    thread,
    time::{Duration, Instant},
};

use networking::{AssetEvent, AssetSources, LoadedAsset};

mod drawing;
pub mod logging;
pub mod networking;
mod terminal_utils;
mod widgets;

const TICK_RATE: Duration = Duration::from_millis(250);

pub enum TickedUserInput {
    Input(KeyEvent),
    Tick,
}

#[derive(PartialEq)]
pub enum ResponseToUserInput {
    Continue,
    Reload,
    Stop,
}

/// Starts the dashboard and blocks until the user quits.
pub fn run(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
    let sources = AssetSources::from(opt);
    let client = reqwest::Client::new();
    let (tx_user_input, rx_user_input) = mpsc::channel();
    let (tx_assets, rx_assets) = mpsc::channel();

    thread::spawn(move || run_user_event_loop(TICK_RATE, tx_user_input));
    let load = move |generation| {
        networking::spawn_asset_load(client.clone(), sources.clone(), generation, tx_assets.clone())
    };
    load(0);

    let state = ViewState::new(opt.grouping(), opt.mode.into());

    let mut terminal = terminal_utils::create_terminal()?;
    let result = run_app_loop(&mut terminal, rx_user_input, rx_assets, load, state);
    terminal_utils::prepare_terminal_for_app_exit(&mut terminal)?;
    result
}

/// Loads both assets, writes the export document and returns.
pub async fn export(opt: &Opt, target: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sources = AssetSources::from(opt);
    let client = reqwest::Client::new();
    let mut state = ViewState::new(opt.grouping(), opt.mode.into());

    for event in networking::load_assets(&client, &sources).await {
        apply_asset_event(&mut state, event);
    }

    let document = ExportDocument::from_state(&state);
    if target == "-" {
        document.write_to(io::stdout().lock())?;
    } else {
        document.write_to(BufWriter::new(File::create(target)?))?;
    }
    tracing::info!(
        "Exported {} markers and {} regions to {target}",
        document.markers.len(),
        document.regions.len()
    );
    Ok(())
}

fn run_app_loop(
    terminal: &mut terminal_utils::AppTerminal,
    rx_user_input: StdReceiver<TickedUserInput>,
    rx_assets: StdReceiver<LoadedAsset>,
    load: impl Fn(u64),
    mut state: ViewState,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut response_to_input = ResponseToUserInput::Continue;
    let mut generation = 0;

    while response_to_input != ResponseToUserInput::Stop {
        terminal.draw(|rect| drawing::draw(rect, &mut state))?;

        let Ok(user_input) = rx_user_input.recv() else {
            tracing::warn!("User input loop ended.");
            break;
        };
        response_to_input = handle_user_input(&user_input, &mut state);
        if response_to_input == ResponseToUserInput::Reload {
            generation += 1;
            tracing::info!("Reloading assets (load {generation}).");
            load(generation);
        }
        receive_assets(&rx_assets, &mut state, generation);
    }

    Ok(())
}

pub fn handle_user_input(user_input: &TickedUserInput, state: &mut ViewState) -> ResponseToUserInput {
    let TickedUserInput::Input(event) = user_input else {
        return ResponseToUserInput::Continue;
    };
    if event.kind != KeyEventKind::Press {
        return ResponseToUserInput::Continue;
    }
    let control = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Esc => return ResponseToUserInput::Stop,
        KeyCode::Char('c') if control => return ResponseToUserInput::Stop,
        KeyCode::F(5) => return ResponseToUserInput::Reload,
        KeyCode::Tab => state.toggle_map_mode(),
        KeyCode::Up => state.select_previous_row(),
        KeyCode::Down => state.select_next_row(),
        KeyCode::Left => state.select_previous_overlay(),
        KeyCode::Right => state.select_next_overlay(),
        KeyCode::Backspace => state.pop_search_char(),
        KeyCode::Char(c) if !control => state.push_search_char(c),
        _ => {}
    }
    ResponseToUserInput::Continue
}

pub fn run_user_event_loop(tick_rate: Duration, tx: StdSender<TickedUserInput>) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match event::poll(timeout) {
            Ok(true) => {
                if let Ok(CEvent::Key(key)) = event::read() {
                    if tx.send(TickedUserInput::Input(key)).is_err() {
                        return;
                    }
                }
            }
            Ok(false) => {}
            Err(error) => {
                tracing::error!("Failed to poll terminal events: {error}");
                return;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if tx.send(TickedUserInput::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}

/// Applies finished loads. Events from a load older than `generation` are
/// ignored so a slow earlier load cannot overwrite a newer one.
fn receive_assets(rx_assets: &StdReceiver<LoadedAsset>, state: &mut ViewState, generation: u64) {
    for loaded in rx_assets.try_iter() {
        if loaded.generation != generation {
            tracing::info!("Ignoring asset from superseded load {}.", loaded.generation);
            continue;
        }
        apply_asset_event(state, loaded.event);
    }
}

fn apply_asset_event(state: &mut ViewState, event: AssetEvent) {
    match event {
        AssetEvent::Records(Ok(records)) => state.set_records(records),
        AssetEvent::Records(Err(error)) => state.record_fetch_failure("CSV", &error),
        AssetEvent::Boundaries(Ok(boundaries)) => state.set_boundaries(boundaries),
        AssetEvent::Boundaries(Err(error)) => state.record_fetch_failure("GeoJSON", &error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banned_ip_map::{aggregation::GroupingKey, app_state::MapMode, ip_record::IpRecord};

    fn key(code: KeyCode) -> TickedUserInput {
        TickedUserInput::Input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn loaded_state() -> ViewState {
        let mut state = ViewState::new(GroupingKey::CountryCode, MapMode::Markers);
        state.set_records(vec![
            IpRecord::new("1.2.3.4", "US", "United States"),
            IpRecord::new("9.9.9.9", "FR", "France"),
        ]);
        state
    }

    #[test]
    fn typing_edits_the_search() {
        let mut state = loaded_state();
        for c in "fr".chars() {
            handle_user_input(&key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(state.search(), "fr");
        assert_eq!(state.filtered_records().len(), 1);

        handle_user_input(&key(KeyCode::Backspace), &mut state);
        assert_eq!(state.search(), "f");
    }

    #[test]
    fn control_keys() {
        let mut state = loaded_state();
        assert!(handle_user_input(&key(KeyCode::Esc), &mut state) == ResponseToUserInput::Stop);
        assert!(handle_user_input(&key(KeyCode::F(5)), &mut state) == ResponseToUserInput::Reload);
        let ctrl_c = TickedUserInput::Input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(handle_user_input(&ctrl_c, &mut state) == ResponseToUserInput::Stop);
        assert_eq!(state.search(), "");

        handle_user_input(&key(KeyCode::Tab), &mut state);
        assert_eq!(state.map_mode, MapMode::Choropleth);
        assert!(handle_user_input(&TickedUserInput::Tick, &mut state) == ResponseToUserInput::Continue);
    }

    #[test]
    fn failed_asset_events_keep_state() {
        let mut state = loaded_state();
        let error = banned_ip_map::fetch::FetchError::Io {
            path: "x.geojson".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        apply_asset_event(&mut state, AssetEvent::Boundaries(Err(error)));
        assert_eq!(state.records().len(), 2);
        assert!(state.regions().is_none());
    }

    #[test]
    fn assets_from_superseded_loads_are_ignored() {
        let mut state = ViewState::new(GroupingKey::CountryCode, MapMode::Markers);
        let (tx_assets, rx_assets) = mpsc::channel();
        let newer = vec![IpRecord::new("9.9.9.9", "FR", "France")];
        let older = vec![
            IpRecord::new("1.2.3.4", "US", "United States"),
            IpRecord::new("5.6.7.8", "US", "United States"),
        ];
        tx_assets
            .send(LoadedAsset {
                generation: 1,
                event: AssetEvent::Records(Ok(newer.clone())),
            })
            .unwrap();
        tx_assets
            .send(LoadedAsset {
                generation: 0,
                event: AssetEvent::Records(Ok(older)),
            })
            .unwrap();

        receive_assets(&rx_assets, &mut state, 1);
        assert_eq!(state.records(), newer.as_slice());
        assert_eq!(state.markers()[0].code, "FR");
    }
}
