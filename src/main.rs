use anyhow::Result;
use std::time::Duration;
use tilt_config::{AppConfig, DisplayConfig, SensorKind};
use tilt_math::{adjust, clamp_default, round};
use tilt_orientation::source::{parse_event_line, ChannelSource, SweepSource, UnsupportedSource};
use tilt_orientation::types::{OrientationState, SensorEvent};
use tilt_orientation::OrientationTracker;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One line of terminal input.
#[derive(Debug, PartialEq)]
enum Input {
    Reset,
    Quit,
    Event(SensorEvent),
    Skip,
}

/// `reset` and `quit` are always understood. Anything else is a sensor
/// event, but only when events are fed from stdin.
fn parse_input(line: &str, accept_events: bool) -> Input {
    match line.trim() {
        "" => Input::Skip,
        "reset" => Input::Reset,
        "quit" => Input::Quit,
        other if accept_events => match parse_event_line(other) {
            Ok(event) => Input::Event(event),
            Err(e) => {
                warn!(%e, "Skipping input line");
                Input::Skip
            }
        },
        other => {
            warn!(input = other, "Unknown command (expected `reset` or `quit`)");
            Input::Skip
        }
    }
}

/// Map a relative tilt onto the 0..100 parallax scale, 50 being level.
fn parallax(tilt: f64, range_deg: f64) -> f64 {
    clamp_default(adjust(tilt, -range_deg, range_deg, 0.0, 100.0))
}

fn log_state(state: &OrientationState, view: &DisplayConfig) {
    let p = view.precision;
    let range = view.tilt_range_deg;
    let (abs, rel) = (state.absolute, state.relative);
    info!(
        alpha = round(abs.alpha, p),
        beta = round(abs.beta, p),
        gamma = round(abs.gamma, p),
        rel_alpha = round(rel.alpha, p),
        rel_beta = round(rel.beta, p),
        rel_gamma = round(rel.gamma, p),
        parallax_x = round(parallax(rel.gamma, range), p),
        parallax_y = round(parallax(rel.beta, range), p),
        "Orientation"
    );
    let q = rel.to_quat();
    debug!(qx = q.x, qy = q.y, qz = q.z, qw = q.w, "Relative rotation");
}

/// Start tracking the configured source. Returns the event sender when
/// events come from stdin.
fn start_tracker(config: &AppConfig) -> (Option<mpsc::UnboundedSender<SensorEvent>>, OrientationTracker) {
    match config.sensor.kind {
        SensorKind::Stdin => {
            let (tx, source) = ChannelSource::new();
            (Some(tx), OrientationTracker::spawn(source))
        }
        SensorKind::Sweep => {
            let period = Duration::from_millis(config.sensor.sweep_interval_ms.max(1));
            let source = SweepSource::new(period, config.sensor.sweep_amplitude_deg);
            (None, OrientationTracker::spawn(source))
        }
        SensorKind::Unsupported => (None, OrientationTracker::spawn(UnsupportedSource)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Config first so its log filter can be used.
    let loaded = tilt_config::load_config();
    let default_filter = loaded
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| AppConfig::default().log_filter);

    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    info!("tilt starting");

    let config = loaded.unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    info!(sensor = ?config.sensor.kind, "Config loaded");

    let (event_tx, tracker) = start_tracker(&config);
    let mut states = tracker.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    log_state(&states.borrow_and_update(), &config.display);

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    info!("Orientation tracker stopped");
                    break;
                }
                let state = *states.borrow_and_update();
                log_state(&state, &config.display);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                match parse_input(&line, event_tx.is_some()) {
                    Input::Reset => {
                        info!("Baseline reset requested");
                        tracker.reset_baseline();
                    }
                    Input::Quit => break,
                    Input::Event(event) => {
                        if let Some(tx) = &event_tx {
                            let _ = tx.send(event);
                        }
                    }
                    Input::Skip => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}
