//! Search controller
//!
//! Owns the [`ViewState`] on a single worker task. User input and finished
//! autocomplete lookups both arrive on that task as events, so the state has
//! exactly one writer. Lookups run on their own tasks and are debounced;
//! each flushed query bumps a generation counter and a result is applied
//! only if it carries the current generation.

mod state;

pub use state::{Command, ViewState};

use crate::apps::{DeviceApp, DeviceAppsLookup};
use crate::autocomplete::{AutoCompleteApi, AutoCompleteResult};
use crate::config::SearchSettings;
use crate::error::Result;
use state::RawResults;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Tunables for the controller
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Quiet period before a query is sent to the autocomplete source
    pub debounce: Duration,
    /// Per-group cap when suggestions and apps are both present
    pub max_results_per_group: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(crate::DEFAULT_DEBOUNCE_MS),
            max_results_per_group: crate::DEFAULT_MAX_RESULTS_PER_GROUP,
        }
    }
}

impl From<&SearchSettings> for ControllerOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            debounce: settings.debounce(),
            max_results_per_group: settings.max_results_per_group,
        }
    }
}

enum Input {
    QueryUpdated(String),
    QueryCleared,
    QuerySubmitted(String),
    AppSelected(DeviceApp),
    Reset,
}

struct Loaded {
    generation: u64,
    result: Result<AutoCompleteResult>,
}

/// Handle to the search worker
pub struct SearchController {
    inputs: mpsc::UnboundedSender<Input>,
    state: watch::Receiver<ViewState>,
    worker: JoinHandle<()>,
}

impl SearchController {
    /// Start the worker on the current tokio runtime. The returned receiver
    /// yields each [`Command`] exactly once.
    pub fn spawn(
        autocomplete: Arc<dyn AutoCompleteApi>,
        apps: Arc<dyn DeviceAppsLookup>,
        options: ControllerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (inputs, input_rx) = mpsc::unbounded_channel();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(ViewState::default());
        let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            autocomplete,
            apps,
            options,
            state: state_tx,
            commands,
            loaded: loaded_tx,
            raw: RawResults::default(),
            pending: None,
            generation: 0,
        };
        let worker = tokio::spawn(worker.run(input_rx, loaded_rx));

        (
            Self {
                inputs,
                state,
                worker,
            },
            command_rx,
        )
    }

    /// Snapshot of the current state
    pub fn view_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Text in the search box changed; looked up once typing pauses
    pub fn user_updated_query(&self, query: impl Into<String>) {
        self.send(Input::QueryUpdated(query.into()));
    }

    /// The search box was emptied
    pub fn user_cleared_query(&self) {
        self.send(Input::QueryCleared);
    }

    /// Open `query` in the browser
    pub fn user_submitted_query(&self, query: impl Into<String>) {
        self.send(Input::QuerySubmitted(query.into()));
    }

    /// Launch the chosen application
    pub fn user_selected_app(&self, app: DeviceApp) {
        self.send(Input::AppSelected(app));
    }

    /// Drop the query, all results and any lookup in flight
    pub fn reset_view_state(&self) {
        self.send(Input::Reset);
    }

    /// Stop accepting input and wait for the worker to finish
    pub async fn shutdown(self) {
        drop(self.inputs);
        if let Err(e) = self.worker.await {
            warn!("Search worker ended abnormally: {}", e);
        }
    }

    fn send(&self, input: Input) {
        if self.inputs.send(input).is_err() {
            debug!("Search worker is gone, input dropped");
        }
    }
}

struct Worker {
    autocomplete: Arc<dyn AutoCompleteApi>,
    apps: Arc<dyn DeviceAppsLookup>,
    options: ControllerOptions,
    state: watch::Sender<ViewState>,
    commands: mpsc::UnboundedSender<Command>,
    loaded: mpsc::UnboundedSender<Loaded>,
    raw: RawResults,
    /// Query waiting out the debounce window, with its deadline
    pending: Option<(String, Instant)>,
    /// Generation of the most recently issued lookup
    generation: u64,
}

impl Worker {
    async fn run(
        mut self,
        mut inputs: mpsc::UnboundedReceiver<Input>,
        mut loaded: mpsc::UnboundedReceiver<Loaded>,
    ) {
        loop {
            let deadline = self.pending.as_ref().map(|(_, at)| *at);

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
                Some(done) = loaded.recv() => self.apply_autocomplete(done),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.issue_lookup();
                }
            }
        }
        debug!("Search worker stopped");
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::QueryUpdated(query) => self.query_updated(&query),
            Input::QueryCleared => self.query_cleared(),
            Input::QuerySubmitted(query) => self.emit(Command::LaunchBrowser { query }),
            Input::AppSelected(app) => self.emit(Command::LaunchApplication {
                intent: app.launch_intent,
            }),
            Input::Reset => self.reset(),
        }
    }

    fn query_updated(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed == self.state.borrow().query_text {
            return;
        }

        self.raw.apps = self.apps.query(trimmed);
        let query_text = trimmed.to_string();
        self.publish(|state| state.query_text = query_text);
        self.schedule_lookup(trimmed.to_string());
    }

    /// Suggestions on screen stay as shown until the empty lookup answers
    fn query_cleared(&mut self) {
        self.raw.apps.clear();
        self.state.send_modify(|state| {
            state.query_text.clear();
            state.app_results.clear();
        });
        self.schedule_lookup(String::new());
    }

    fn reset(&mut self) {
        self.raw = RawResults::default();
        self.pending = None;
        self.generation += 1;
        self.state.send_replace(ViewState::default());
    }

    fn emit(&self, command: Command) {
        debug!("Emitting {:?}", command);
        if self.commands.send(command).is_err() {
            debug!("No command receiver, command dropped");
        }
    }

    /// Start (or restart) the debounce window for `query`
    fn schedule_lookup(&mut self, query: String) {
        let deadline = Instant::now() + self.options.debounce;
        self.pending = Some((query, deadline));
    }

    fn issue_lookup(&mut self) {
        let Some((query, _)) = self.pending.take() else {
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        debug!("Looking up suggestions for {:?} (generation {})", query, generation);

        let api = self.autocomplete.clone();
        let loaded = self.loaded.clone();
        tokio::spawn(async move {
            let result = api.autocomplete(&query).await;
            // The worker may already be gone; nothing to deliver to then.
            let _ = loaded.send(Loaded { generation, result });
        });
    }

    fn apply_autocomplete(&mut self, done: Loaded) {
        if done.generation != self.generation {
            debug!(
                "Discarding suggestions from generation {} (current {})",
                done.generation, self.generation
            );
            return;
        }

        match done.result {
            Ok(result) => {
                debug!("{} suggestions for {:?}", result.suggestions.len(), result.query);
                self.raw.autocomplete = result.suggestions;
                self.publish(|_| {});
            }
            Err(e) => warn!(error = %e, "Failed to get search results"),
        }
    }

    /// Apply `update`, re-run the merge rule and publish the result once
    fn publish(&self, update: impl FnOnce(&mut ViewState)) {
        let (autocomplete_results, app_results) = self.raw.merged(self.options.max_results_per_group);
        self.state.send_modify(|state| {
            update(state);
            state.autocomplete_results = autocomplete_results;
            state.app_results = app_results;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::{InstalledAppsLookup, LaunchIntent};
    use crate::autocomplete::AutoCompleteSuggestion;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers "<query> 0" .. "<query> n-1"; empty query gives nothing
    #[derive(Default)]
    struct FakeAutoComplete {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        failing: Vec<String>,
        per_query: usize,
    }

    impl FakeAutoComplete {
        fn new(per_query: usize) -> Self {
            Self {
                per_query,
                ..Default::default()
            }
        }

        fn delayed(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        fn failing(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AutoCompleteApi for FakeAutoComplete {
        async fn autocomplete(&self, query: &str) -> Result<AutoCompleteResult> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.iter().any(|q| q == query) {
                return Err(Error::Status {
                    backend: "fake".to_string(),
                    status: 500,
                });
            }
            if query.is_empty() {
                return Ok(AutoCompleteResult::empty(query));
            }
            Ok(AutoCompleteResult {
                query: query.to_string(),
                suggestions: (0..self.per_query)
                    .map(|i| AutoCompleteSuggestion::search(format!("{} {}", query, i)))
                    .collect(),
            })
        }
    }

    fn catalog(n: usize) -> Arc<InstalledAppsLookup> {
        Arc::new(InstalledAppsLookup::new(
            (0..n)
                .map(|i| DeviceApp::new(format!("Map {}", i), format!("com.example.map{}", i)))
                .collect(),
        ))
    }

    fn start(
        api: Arc<FakeAutoComplete>,
        apps: Arc<InstalledAppsLookup>,
    ) -> (SearchController, mpsc::UnboundedReceiver<Command>) {
        SearchController::spawn(api, apps, ControllerOptions::default())
    }

    async fn wait_for(controller: &SearchController, f: impl FnMut(&ViewState) -> bool) -> ViewState {
        let mut rx = controller.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(f))
            .await
            .expect("state never matched")
            .expect("worker stopped");
        state.clone()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    fn phrases(state: &ViewState) -> Vec<&str> {
        state.autocomplete_results.iter().map(|s| s.phrase()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_update_applies_apps_immediately() {
        let api = Arc::new(FakeAutoComplete::new(2));
        let (controller, _commands) = start(api.clone(), catalog(2));

        controller.user_updated_query("  map ");
        let state = wait_for(&controller, |s| s.query_text == "map").await;

        assert_eq!(state.app_results.len(), 2);
        assert!(state.autocomplete_results.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_follows_debounce() {
        let api = Arc::new(FakeAutoComplete::new(2));
        let (controller, _commands) = start(api.clone(), catalog(0));

        controller.user_updated_query("rust");
        let state = wait_for(&controller, |s| !s.autocomplete_results.is_empty()).await;

        assert_eq!(phrases(&state), vec!["rust 0", "rust 1"]);
        assert_eq!(api.calls(), vec!["rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_collapse_to_latest() {
        let api = Arc::new(FakeAutoComplete::new(1));
        let (controller, _commands) = start(api.clone(), catalog(0));

        controller.user_updated_query("ab");
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.user_updated_query("abc");
        settle().await;

        assert_eq!(api.calls(), vec!["abc"]);
        assert_eq!(phrases(&controller.view_state()), vec!["abc 0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_in_flight_result_is_discarded() {
        let api = Arc::new(FakeAutoComplete::new(1).delayed("ab", Duration::from_secs(1)));
        let (controller, _commands) = start(api.clone(), catalog(0));

        controller.user_updated_query("ab");
        tokio::time::sleep(Duration::from_millis(400)).await;
        controller.user_updated_query("abc");
        settle().await;

        assert_eq!(api.calls(), vec!["ab", "abc"]);
        let state = controller.view_state();
        assert_eq!(state.query_text, "abc");
        assert_eq!(phrases(&state), vec!["abc 0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_trimmed_query_is_ignored() {
        let api = Arc::new(FakeAutoComplete::new(1));
        let (controller, _commands) = start(api.clone(), catalog(0));

        controller.user_updated_query("rust");
        settle().await;
        controller.user_updated_query(" rust  ");
        settle().await;

        assert_eq!(api.calls(), vec!["rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_groups_are_capped() {
        let api = Arc::new(FakeAutoComplete::new(6));
        let (controller, _commands) = start(api.clone(), catalog(6));

        controller.user_updated_query("map");
        let state = wait_for(&controller, |s| !s.autocomplete_results.is_empty()).await;

        assert_eq!(phrases(&state), vec!["map 0", "map 1", "map 2", "map 3"]);
        let names: Vec<_> = state.app_results.iter().map(|a| a.short_name.as_str()).collect();
        assert_eq!(names, vec!["Map 0", "Map 1", "Map 2", "Map 3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_group_is_shown_whole() {
        let api = Arc::new(FakeAutoComplete::new(7));
        let (controller, _commands) = start(api.clone(), catalog(6));

        controller.user_updated_query("rust");
        let state = wait_for(&controller, |s| !s.autocomplete_results.is_empty()).await;
        assert_eq!(state.autocomplete_results.len(), 7);
        assert!(state.app_results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_keeps_previous_results() {
        let api = Arc::new(FakeAutoComplete::new(2).failing("rusty"));
        let (controller, _commands) = start(api.clone(), catalog(0));

        controller.user_updated_query("rust");
        wait_for(&controller, |s| !s.autocomplete_results.is_empty()).await;
        controller.user_updated_query("rusty");
        settle().await;

        let state = controller.view_state();
        assert_eq!(state.query_text, "rusty");
        assert_eq!(phrases(&state), vec!["rust 0", "rust 1"]);
        assert_eq!(api.calls(), vec!["rust", "rusty"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_query_and_apps() {
        let api = Arc::new(FakeAutoComplete::new(6));
        let (controller, _commands) = start(api.clone(), catalog(3));

        controller.user_updated_query("map");
        let before = wait_for(&controller, |s| !s.autocomplete_results.is_empty()).await;
        assert_eq!(phrases(&before), vec!["map 0", "map 1", "map 2", "map 3"]);

        controller.user_cleared_query();
        let state = wait_for(&controller, |s| s.query_text.is_empty()).await;
        assert!(state.app_results.is_empty());
        // still capped, not re-merged into the full six
        assert_eq!(state.autocomplete_results, before.autocomplete_results);

        settle().await;
        assert_eq!(api.calls(), vec!["map", ""]);
        assert!(controller.view_state().autocomplete_results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_emits_one_launch_browser() {
        let api = Arc::new(FakeAutoComplete::new(2));
        let (controller, mut commands) = start(api, catalog(0));

        controller.user_updated_query("something else");
        controller.user_submitted_query("foo");

        assert_eq!(
            commands.recv().await,
            Some(Command::LaunchBrowser {
                query: "foo".to_string()
            })
        );
        settle().await;
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_app_emits_its_intent() {
        let api = Arc::new(FakeAutoComplete::new(0));
        let (controller, mut commands) = start(api, catalog(0));

        controller.user_selected_app(DeviceApp::new("Camera", "com.example.camera"));

        assert_eq!(
            commands.recv().await,
            Some(Command::LaunchApplication {
                intent: LaunchIntent::for_package("com.example.camera")
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_state_and_pending_lookup() {
        let api = Arc::new(FakeAutoComplete::new(2));
        let (controller, _commands) = start(api.clone(), catalog(2));

        controller.user_updated_query("map");
        wait_for(&controller, |s| s.query_text == "map").await;
        controller.reset_view_state();
        settle().await;

        assert_eq!(controller.view_state(), ViewState::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_worker() {
        let api = Arc::new(FakeAutoComplete::new(1));
        let (controller, mut commands) = start(api, catalog(0));

        controller.shutdown().await;
        assert_eq!(commands.recv().await, None);
    }
}
