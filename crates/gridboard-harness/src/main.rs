#![forbid(unsafe_code)]

//! Gridboard trace harness.
//!
//! Replays an interaction trace against a fresh registry, logs every
//! controller transition and prints the resulting layout. Without a trace it
//! replays a small built-in dashboard session.
//!
//! # Running
//!
//! ```sh
//! cargo run -p gridboard-harness
//! GRIDBOARD_HARNESS_TRACE=crates/gridboard-harness/traces/demo_drag.json \
//!   GRIDBOARD_LOG=debug cargo run -p gridboard-harness
//! ```
//!
//! # Environment
//!
//! - `GRIDBOARD_HARNESS_CONFIG`: path to a `.toml` or `.json` grid config.
//! - `GRIDBOARD_HARNESS_TRACE`: path to a JSON interaction trace.
//! - `GRIDBOARD_HARNESS_GRID_WIDTH`: container width for the built-in demo
//!   (default 1200).
//! - `GRIDBOARD_HARNESS_OUTPUT`: `source` (default) or `snapshot` (JSON).
//! - `GRIDBOARD_LOG`: `tracing` filter directives (default `info`).

use std::fmt;
use std::path::Path;
use std::process::ExitCode;

use gridboard_core::{GRID_COLUMNS, Placement, PointerSample};
use gridboard_layout::{
    GridConfig, GridConfigError, InteractionEffect, InteractionTrace, ItemId, LayoutSnapshot,
    RegistryError, ReplayOutcome, ResizeEdge, TraceError, TraceEvent, layout_source,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_GRID_WIDTH: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Source,
    Snapshot,
}

#[derive(Debug)]
enum HarnessError {
    Config(GridConfigError),
    Trace(TraceError),
    Io(std::io::Error),
    Registry(RegistryError),
    Snapshot(serde_json::Error),
    Invariants(Vec<String>),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Trace(e) => write!(f, "trace: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Registry(e) => write!(f, "demo layout: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot encoding: {e}"),
            Self::Invariants(problems) => {
                write!(f, "registry invariants broken: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Trace(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Registry(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Invariants(_) => None,
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("GRIDBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: &Path) -> Result<GridConfig, HarnessError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        GridConfig::from_json_file(path)
    } else {
        GridConfig::from_toml_file(path)
    };
    config.map_err(HarnessError::Config)
}

fn load_trace(path: &Path) -> Result<InteractionTrace, HarnessError> {
    let content = std::fs::read_to_string(path).map_err(HarnessError::Io)?;
    InteractionTrace::from_json_str(&content).map_err(HarnessError::Trace)
}

fn item(raw: u64) -> Result<ItemId, HarnessError> {
    ItemId::new(raw).map_err(HarnessError::Registry)
}

/// A four-card dashboard and one session per interesting resolution path.
fn demo_trace(grid_width: f64, row: f64) -> Result<InteractionTrace, HarnessError> {
    let cell = grid_width / f64::from(GRID_COLUMNS);
    let sample = |x: f64, y: f64| PointerSample::at(x, y, grid_width);
    let (counter, chart, table, notes) = (item(1)?, item(2)?, item(3)?, item(4)?);

    Ok(InteractionTrace::new()
        .with_item(counter, Placement::new(1, 1, 3, 2), "Counter")
        .with_item(chart, Placement::new(4, 1, 6, 4), "Chart")
        .with_item(table, Placement::new(10, 1, 3, 4), "Table")
        .with_item(notes, Placement::new(1, 3, 3, 2), "Notes")
        // Diagonal drag into the chart: only the vertical move lands.
        .with_event(TraceEvent::BeginDrag {
            item: notes,
            sample: sample(0.0, 0.0),
        })
        .with_event(TraceEvent::Move {
            sample: sample(cell * 2.0, row * 3.0),
        })
        .with_event(TraceEvent::Up)
        // Widening the counter runs into the chart and is blocked.
        .with_event(TraceEvent::BeginResize {
            item: counter,
            edge: ResizeEdge::Right,
            sample: sample(0.0, 0.0),
        })
        .with_event(TraceEvent::Move {
            sample: sample(cell * 2.0, 0.0),
        })
        .with_event(TraceEvent::Up)
        // Stretching the table far down grows the grid.
        .with_event(TraceEvent::BeginResize {
            item: table,
            edge: ResizeEdge::Bottom,
            sample: sample(0.0, 0.0),
        })
        .with_event(TraceEvent::Move {
            sample: sample(0.0, row * 20.0),
        })
        .with_event(TraceEvent::CaptureLost))
}

fn log_outcome(outcome: &ReplayOutcome) {
    for transition in &outcome.transitions {
        match &transition.effect {
            InteractionEffect::Committed { item, to, change, .. } => tracing::info!(
                id = transition.transition_id,
                item = item.get(),
                %to,
                change = ?change,
                "commit"
            ),
            InteractionEffect::Blocked {
                item, collisions, ..
            } => tracing::info!(
                id = transition.transition_id,
                item = item.get(),
                collisions = ?collisions,
                "blocked"
            ),
            effect => {
                tracing::debug!(id = transition.transition_id, effect = ?effect, "transition");
            }
        }
    }
    for change in &outcome.row_changes {
        let direction = if change.is_growth() { "grew" } else { "shrank" };
        tracing::info!(from = change.from, to = change.to, direction, "container refit");
    }
    tracing::info!(
        items = outcome.state.len(),
        rows = outcome.state.row_count(),
        session_open = outcome.session_open,
        "replay finished"
    );
}

fn render(outcome: &ReplayOutcome, mode: OutputMode) -> Result<String, HarnessError> {
    match mode {
        OutputMode::Source => Ok(layout_source(&outcome.state)),
        OutputMode::Snapshot => {
            serde_json::to_string_pretty(&LayoutSnapshot::capture(&outcome.state))
                .map_err(HarnessError::Snapshot)
        }
    }
}

fn run() -> Result<String, HarnessError> {
    let config = match std::env::var("GRIDBOARD_HARNESS_CONFIG") {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => GridConfig::default(),
    };
    let grid_width = std::env::var("GRIDBOARD_HARNESS_GRID_WIDTH")
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|width| width.is_finite() && *width > 0.0)
        .unwrap_or(DEFAULT_GRID_WIDTH);
    let output = match std::env::var("GRIDBOARD_HARNESS_OUTPUT")
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "snapshot" | "json" => OutputMode::Snapshot,
        _ => OutputMode::Source,
    };

    let trace = match std::env::var("GRIDBOARD_HARNESS_TRACE") {
        Ok(path) => {
            tracing::info!(%path, "loading trace");
            load_trace(Path::new(&path))?
        }
        Err(_) => demo_trace(grid_width, config.row_height)?,
    };

    let outcome = trace.replay(&config).map_err(HarnessError::Trace)?;
    log_outcome(&outcome);

    let problems = outcome.state.check_invariants();
    if !problems.is_empty() {
        return Err(HarnessError::Invariants(problems));
    }
    render(&outcome, output)
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "harness failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use gridboard_layout::config::DEFAULT_ROW_HEIGHT;

    use super::*;

    fn placement(outcome: &ReplayOutcome, raw: u64) -> Placement {
        let id = ItemId::new(raw).expect("non-zero");
        outcome.state.get(id).expect("registered").placement
    }

    #[test]
    fn demo_trace_exercises_every_resolution() {
        let trace =
            demo_trace(DEFAULT_GRID_WIDTH, DEFAULT_ROW_HEIGHT).expect("demo ids are non-zero");
        let outcome = trace.replay(&GridConfig::default()).expect("demo replays");

        assert_eq!(placement(&outcome, 4), Placement::new(1, 6, 3, 2));
        assert_eq!(placement(&outcome, 1), Placement::new(1, 1, 3, 2));
        assert_eq!(placement(&outcome, 3), Placement::new(10, 1, 3, 24));
        assert_eq!(outcome.state.row_count(), 29);
        assert!(outcome.state.check_invariants().is_empty());
        assert!(!outcome.session_open);
        assert!(
            outcome
                .transitions
                .iter()
                .any(|t| matches!(t.effect, InteractionEffect::Blocked { .. }))
        );
    }

    #[test]
    fn bundled_trace_replays_cleanly() {
        let trace = InteractionTrace::from_json_str(include_str!("../traces/demo_drag.json"))
            .expect("bundled trace parses");
        let outcome = trace.replay(&GridConfig::default()).expect("bundled trace replays");
        assert!(outcome.state.check_invariants().is_empty());
        assert_eq!(placement(&outcome, 1), Placement::new(1, 3, 2, 2));
        assert_eq!(placement(&outcome, 2), Placement::new(3, 1, 2, 2));
    }

    #[test]
    fn config_format_follows_extension() {
        let mut json = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("temp file");
        json.write_all(br#"{ "min_rows": 6 }"#).expect("write");
        assert_eq!(load_config(json.path()).expect("json config").min_rows, 6);

        let mut toml = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        toml.write_all(b"min_rows = 7\n").expect("write");
        assert_eq!(load_config(toml.path()).expect("toml config").min_rows, 7);
    }

    #[test]
    fn snapshot_output_is_json() {
        let trace =
            demo_trace(DEFAULT_GRID_WIDTH, DEFAULT_ROW_HEIGHT).expect("demo ids are non-zero");
        let outcome = trace.replay(&GridConfig::default()).expect("demo replays");
        let text = render(&outcome, OutputMode::Snapshot).expect("encodes");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["items"][0]["label"], "Counter");

        let source = render(&outcome, OutputMode::Source).expect("renders");
        assert!(source.starts_with("export function Layout() {"));
    }
}
