use anyhow::{Context, Result};
use carbrowse::app::cli::Args;
use carbrowse::app::config::AppConfig;
use carbrowse::app::logging::setup_logging;
use carbrowse::browse::{BrowseError, NavTarget, NavigationStack};
use carbrowse::catalog::{CatalogSource, CoverArt, MemoryCatalog};
use carbrowse::surface::{ConsoleInput, ConsoleSurface, ListSurface, SurfaceId};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

// The two alternating page states and their list components
const BROWSE1: (SurfaceId, u32) = (11, 51);
const BROWSE2: (SurfaceId, u32) = (12, 63);

const DEMO_CATALOG: &str = r#"
[source]
name = "Demo"
searchable = true
play_from_search = true
latency_ms = 300

[[entries]]
id = "artists"
title = "Artists"

  [[entries.children]]
  id = "abba"
  title = "ABBA"

    [[entries.children.children]]
    id = "abba-all"
    title = "Play All"
    playable = true

    [[entries.children.children]]
    id = "abba-albums"
    title = "Albums"

      [[entries.children.children.children]]
      id = "waterloo"
      title = "Waterloo"
      subtitle = "ABBA"
      playable = true

      [[entries.children.children.children]]
      id = "arrival"
      title = "Arrival"
      subtitle = "ABBA"
      playable = true

[[entries]]
id = "playlists"
title = "Playlists"

  [[entries.children]]
  id = "road-trip"
  title = "🚗 Road Trip"
  subtitle = "12 songs"
  playable = true

[[entries]]
id = "soul"
title = "Soul Classics"
playable = true
"#;

const HELP: &str = "\
commands:
  focus <surface> | blur <surface>   focus moved onto / away from a page surface
  pull <surface> <start> <count>     the display wants rows
  hover <surface> <row>              the cursor moved onto a row
  click <surface> <row>              a row was clicked
  action <surface> <index>           a side action was clicked
  type <text>                        text entered in the input screen
  pick <index>                       a suggestion was picked
  close                              leave the input screen
  back | jump                        go up one level / jump back
  art <id>                           late artwork arrived for an entry
  state | help | quit";

fn report(result: Result<NavTarget, BrowseError>) {
    match result {
        Ok(NavTarget::Page(surface)) => println!("→ page on surface {}", surface),
        Ok(NavTarget::Playback) => println!("→ now playing"),
        Ok(NavTarget::Input) => println!("→ input screen"),
        Ok(NavTarget::Stay) => {}
        Err(e) => println!("✗ {}", e),
    }
}

fn arg<T: std::str::FromStr>(parts: &[&str], index: usize) -> Option<T> {
    parts.get(index).and_then(|s| s.parse().ok())
}

fn print_state(stack: &NavigationStack) {
    let path: Vec<&str> = stack
        .location_stack()
        .iter()
        .map(|f| f.as_ref().map(|f| f.title.as_str()).unwrap_or("/"))
        .collect();
    println!("depth {}: {}", stack.depth(), path.join(" > "));
    let top = stack.top();
    println!(
        "top: {:?}, {} items, selected {}, collapsed {}",
        top.load_state(),
        top.items().len(),
        top.selected_index(),
        top.collapse_depth()
    );
}

/// Apply one command line, returns `false` to stop
fn dispatch(stack: &mut NavigationStack, line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = parts.first() else {
        return true;
    };

    match (command, arg::<SurfaceId>(&parts, 1)) {
        ("quit" | "exit", _) => return false,
        ("help", _) => println!("{}", HELP),
        ("state", _) => print_state(stack),
        ("focus", Some(surface)) => report(stack.on_focus_changed(surface, true)),
        ("blur", Some(surface)) => report(stack.on_focus_changed(surface, false)),
        ("pull", Some(surface)) => {
            let start = arg(&parts, 2).unwrap_or(0);
            let count = arg(&parts, 3).unwrap_or(10);
            if let Err(e) = stack.on_window_requested(surface, start, count) {
                println!("✗ {}", e);
            }
        }
        ("hover", Some(surface)) => {
            if let Err(e) = stack.on_row_focused(surface, arg(&parts, 2).unwrap_or(0)) {
                println!("✗ {}", e);
            }
        }
        ("click", Some(surface)) => {
            report(stack.on_row_clicked(surface, arg(&parts, 2).unwrap_or(0)))
        }
        ("action", Some(surface)) => {
            report(stack.on_action_clicked(surface, arg(&parts, 2).unwrap_or(0)))
        }
        ("type", _) => {
            let text = line.trim_start().trim_start_matches("type").trim();
            if let Err(e) = stack.on_input_entry(text) {
                println!("✗ {}", e);
            }
        }
        ("pick", Some(index)) => report(stack.on_suggestion_selected(index as usize)),
        ("close", _) => stack.close_input(),
        ("back", _) => report(stack.go_back().map(NavTarget::Page)),
        ("jump", _) => report(Ok(stack.jump_back())),
        ("art", _) => match parts.get(1) {
            Some(id) => {
                let art = CoverArt::new(format!("cover:{}", id).into_bytes());
                if !stack.attach_cover_art(id, &art) {
                    println!("✗ no cached entry {}", id);
                }
            }
            None => println!("usage: art <id>"),
        },
        _ => println!("unknown command, try `help`"),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(timeout_ms) = args.timeout_ms {
        config.browse.loading_timeout_ms = timeout_ms;
    }

    // Keep the guard alive so buffered log lines get flushed on exit
    let _log_guard = setup_logging(&config.logging, args.log_stderr)?;

    let catalog = match &args.catalog {
        Some(path) => MemoryCatalog::load(path)?,
        None => MemoryCatalog::parse(DEMO_CATALOG).context("Built-in demo catalog is broken")?,
    };
    let catalog: Arc<dyn CatalogSource> = Arc::new(catalog);
    info!(
        "Browsing {}",
        catalog.info().map(|i| i.name).unwrap_or_default()
    );

    let surfaces: Vec<Arc<dyn ListSurface>> = vec![
        Arc::new(ConsoleSurface::new(BROWSE1.0, BROWSE1.1, args.json)),
        Arc::new(ConsoleSurface::new(BROWSE2.0, BROWSE2.1, args.json)),
    ];
    let input = Arc::new(ConsoleInput::new(args.json));
    let mut stack = NavigationStack::new(catalog, surfaces, input, config.browse.clone())?;

    report(stack.on_focus_changed(BROWSE1.0, true));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !dispatch(&mut stack, &line) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read command: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Leaving at depth {}", stack.depth());
    Ok(())
}
