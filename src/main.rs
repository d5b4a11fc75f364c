//! SystemSearch: line-oriented front end
//!
//! Every input line is treated as the new contents of the search field,
//! except for the `:` commands listed by `:help`.

use anyhow::Result;
use std::sync::Arc;
use systemsearch::{
    adapter::{RowIcon, RowType, SuggestionListAdapter},
    apps::InstalledAppsLookup,
    autocomplete::{AutoCompleteSuggestion, BrowserAutoComplete},
    config,
    controller::{Command, ControllerOptions, SearchController, ViewState},
    network::HttpClient,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Which listener a row tap went to
enum Tap {
    Immediate(AutoCompleteSuggestion),
    Editable(AutoCompleteSuggestion),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the search surface
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting SystemSearch v{}", systemsearch::VERSION);

    let settings = config::load()?;
    info!(
        "Using {} suggestions, {} apps, {} bookmarks",
        settings.search.autocomplete,
        settings.apps.len(),
        settings.bookmarks.len()
    );

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let autocomplete = BrowserAutoComplete::from_settings(&settings, client)?;
    let apps = InstalledAppsLookup::new(settings.apps.clone());

    let (controller, mut commands) = SearchController::spawn(
        Arc::new(autocomplete),
        Arc::new(apps),
        ControllerOptions::from(&settings.search),
    );

    let (tap_tx, mut taps) = mpsc::unbounded_channel();
    let edit_tx = tap_tx.clone();
    let mut adapter = SuggestionListAdapter::new(
        move |s| {
            let _ = tap_tx.send(Tap::Immediate(s.clone()));
        },
        move |s| {
            let _ = edit_tx.send(Tap::Editable(s.clone()));
        },
    )
    .shows_message_on_no_suggestions(settings.ui.shows_message_on_no_suggestions);
    adapter.set_observer(Box::new(|| debug!("Suggestion rows refreshed")));

    let mut state_rx = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let state = state_rx.borrow().clone();
                if !handle_line(&line, &controller, &adapter, &state) {
                    break;
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                adapter.update_data(&state.autocomplete_results);
                print_state(&adapter, &state);
            }
            Some(command) = commands.recv() => print_command(&command),
            Some(tap) = taps.recv() => match tap {
                Tap::Immediate(suggestion) => controller.user_submitted_query(suggestion.phrase()),
                Tap::Editable(suggestion) => {
                    println!("query: {}", suggestion.phrase());
                    controller.user_updated_query(suggestion.phrase());
                }
            },
        }
    }

    controller.shutdown().await;
    info!("Bye");
    Ok(())
}

/// Returns false when the user asked to quit
fn handle_line(
    line: &str,
    controller: &SearchController,
    adapter: &SuggestionListAdapter,
    state: &ViewState,
) -> bool {
    let (command, arg) = match line.strip_prefix(':') {
        Some(rest) => rest.split_once(' ').unwrap_or((rest, "")),
        None => {
            controller.user_updated_query(line);
            return true;
        }
    };

    match command {
        "q" | "quit" => return false,
        "clear" => controller.user_cleared_query(),
        "reset" => controller.reset_view_state(),
        "go" => controller.user_submitted_query(if arg.is_empty() {
            state.query_text.as_str()
        } else {
            arg
        }),
        "tap" | "edit" => {
            let rows = adapter.rows();
            match pick(arg, rows.len()).map(|i| &rows[i]) {
                Some(row) if command == "tap" => {
                    row.tap();
                }
                Some(row) => {
                    row.tap_edit();
                }
                None => println!("no such row: {}", arg),
            }
        }
        "app" => match pick(arg, state.app_results.len()) {
            Some(i) => controller.user_selected_app(state.app_results[i].clone()),
            None => println!("no such app: {}", arg),
        },
        "help" => print_help(),
        other => println!("unknown command :{}", other),
    }
    true
}

/// Parse a 1-based index into a 0-based one within `len`
fn pick(arg: &str, len: usize) -> Option<usize> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn print_state(adapter: &SuggestionListAdapter, state: &ViewState) {
    println!("── {:?}", state.query_text);
    for (i, row) in adapter.rows().iter().enumerate() {
        let icon = match row.icon {
            RowIcon::Search => "🔍",
            RowIcon::Globe => "🌐",
            RowIcon::Bookmark => "★",
            RowIcon::None => " ",
        };
        match (row.row_type, &row.subtitle) {
            (RowType::Empty, _) => println!("   {}", row.title),
            (_, Some(subtitle)) => println!("{:>2} {} {} ({})", i + 1, icon, row.title, subtitle),
            (_, None) => println!("{:>2} {} {}", i + 1, icon, row.title),
        }
    }
    for (i, app) in state.app_results.iter().enumerate() {
        println!("{:>2} ▣ {}", i + 1, app.short_name);
    }
}

fn print_command(command: &Command) {
    match command {
        Command::LaunchBrowser { query } => println!("→ open browser: {}", query),
        Command::LaunchApplication { intent } => match intent.activity {
            Some(ref activity) => println!("→ launch app: {}/{}", intent.package_name, activity),
            None => println!("→ launch app: {}", intent.package_name),
        },
    }
}

fn print_help() {
    println!(
        r#"Type to search. Commands:
    :go [text]   open the browser with text (default: current query)
    :tap <n>     pick suggestion n
    :edit <n>    copy suggestion n into the query
    :app <n>     launch app n
    :clear       clear the query
    :reset       reset all state
    :quit        exit"#
    );
}
