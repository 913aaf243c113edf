//! Main application state and logic.

mod constants;
mod importing;
pub mod input;
mod render;
pub mod state;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;

use textdrop_core::{BatchNotice, BlobStore, FileView, ImportConfig, ViewCollection};
use textdrop_export::ConflictResolution;
use textdrop_ingest::{ImportProgress, SelectionError, select_paths};

use crate::TuiConfig;
use crate::event::KeyAction;
use crate::theme::Theme;
use crate::ui::CardListState;

use self::constants::{EVENT_CHANNEL_SIZE, SCROLL_STEP, TICK_INTERVAL_MS};
use self::importing::{start_import, start_save};
use self::input::{InputResult, InputState, parse_paths};
use self::render::{RenderContext, render_app};
use self::state::{AppEvent, AppMode, StatusMessage, UserSettings};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Main application state.
pub struct App {
    /// Current mode.
    mode: AppMode,
    /// Color theme.
    theme: Theme,
    /// Settings the app was started with.
    settings: UserSettings,
    /// Whether theme changes are written back to the settings file.
    persist_settings: bool,
    /// Import configuration shared by every batch.
    config: ImportConfig,
    /// Registry of download blobs.
    store: BlobStore,
    /// Decoded files, in arrival order.
    views: ViewCollection,
    /// Notice of the most recently completed batch.
    notice: BatchNotice,
    /// Card list selection and scroll.
    cards: CardListState,
    /// Progress of batches still decoding, by batch id.
    imports: BTreeMap<u64, ImportProgress>,
    next_batch: u64,
    /// Files to import when the event loop starts.
    initial_files: Vec<PathBuf>,
    /// Path prompt state while in `Opening` mode.
    input_state: Option<InputState>,
    /// Last footer message.
    status: Option<StatusMessage>,
    /// Directory downloads are saved to.
    output_dir: PathBuf,
    conflict: ConflictResolution,
    events_tx: mpsc::Sender<AppEvent>,
    events_rx: mpsc::Receiver<AppEvent>,
    needs_redraw: bool,
}

impl App {
    /// Create the application from a TUI configuration.
    pub fn new(config: TuiConfig) -> AppResult<Self> {
        let import_config = config.settings.import_config()?;
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let output_dir = config.settings.output_dir();

        Ok(Self {
            mode: AppMode::Normal,
            theme: Theme::from_variant(config.settings.theme),
            conflict: config.settings.conflict,
            settings: config.settings,
            persist_settings: config.persist_settings,
            config: import_config,
            store: BlobStore::new(),
            views: ViewCollection::new(),
            notice: BatchNotice::None,
            cards: CardListState::new(),
            imports: BTreeMap::new(),
            next_batch: 0,
            initial_files: config.files,
            input_state: None,
            status: None,
            output_dir,
            events_tx,
            events_rx,
            needs_redraw: true,
        })
    }

    /// Run the application main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        let initial = std::mem::take(&mut self.initial_files);
        if !initial.is_empty() {
            self.open_paths(&initial);
        }

        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key_event) = event {
                        if key_event.kind == KeyEventKind::Press {
                            self.handle_key(key_event);
                        }
                    }
                    self.needs_redraw = true;
                }

                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {}
            }
        }

        tracing::info!(files = self.views.len(), blobs = self.store.live_count(), "exiting");
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let progress = self.aggregate_progress();
        let ctx = RenderContext {
            mode: self.mode,
            theme: &self.theme,
            locale: self.config.locale,
            views: &self.views,
            cards: &mut self.cards,
            notice: &self.notice,
            progress: progress.as_ref(),
            input_state: self.input_state.as_ref(),
            status: self.status.as_ref(),
        };
        render_app(ctx, area, frame.buffer_mut());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = KeyAction::from_key_event(key);
        if action == KeyAction::ForceQuit {
            self.mode = AppMode::Quit;
        } else if self.mode == AppMode::Opening {
            self.handle_input_event(key);
        } else {
            self.handle_action(action);
        }
    }

    /// Handle a key action.
    fn handle_action(&mut self, action: KeyAction) {
        if self.mode == AppMode::Help {
            if matches!(
                action,
                KeyAction::ToggleHelp | KeyAction::Quit | KeyAction::Cancel
            ) {
                self.mode = AppMode::Normal;
            } else if action == KeyAction::ForceQuit {
                self.mode = AppMode::Quit;
            }
            return;
        }

        if matches!(
            action,
            KeyAction::MoveUp
                | KeyAction::MoveDown
                | KeyAction::JumpToTop
                | KeyAction::JumpToBottom
                | KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::ToggleExpand
        ) {
            self.status = None;
        }

        match action {
            KeyAction::MoveUp => self.cards.move_up(),
            KeyAction::MoveDown => self.cards.move_down(self.views.len()),
            KeyAction::JumpToTop => self.cards.jump_to_top(),
            KeyAction::JumpToBottom => self.cards.jump_to_bottom(self.views.len()),
            KeyAction::ScrollUp => self.cards.scroll_by(-SCROLL_STEP),
            KeyAction::ScrollDown => self.cards.scroll_by(SCROLL_STEP),
            KeyAction::ToggleExpand => self.toggle_selected(),
            KeyAction::Save => self.save_selected(),
            KeyAction::SaveAll => self.save_all(),
            KeyAction::OpenFiles => {
                self.input_state = Some(InputState::new());
                self.mode = AppMode::Opening;
            }
            KeyAction::ToggleHelp => self.mode = AppMode::Help,
            KeyAction::ToggleTheme => self.toggle_theme(),
            KeyAction::Cancel => self.status = None,
            KeyAction::Quit | KeyAction::ForceQuit => self.mode = AppMode::Quit,
            KeyAction::None => {}
        }
    }

    fn handle_input_event(&mut self, key: KeyEvent) {
        let Some(input) = self.input_state.as_mut() else {
            self.mode = AppMode::Normal;
            return;
        };

        match input.handle_key(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.close_prompt(),
            InputResult::Submit(value) => {
                let paths = parse_paths(&value);
                if paths.is_empty() {
                    // An empty selection clears the notice slot.
                    self.notice = BatchNotice::from_outcome(0, 0, Vec::new());
                    self.close_prompt();
                    return;
                }
                match self.select(&paths) {
                    Ok(()) => self.close_prompt(),
                    Err(err) => {
                        if let Some(input) = self.input_state.as_mut() {
                            input.set_error(err.to_string());
                        }
                    }
                }
            }
        }
    }

    fn close_prompt(&mut self) {
        self.input_state = None;
        self.mode = AppMode::Normal;
    }

    /// Start importing `paths`, reporting selection errors in the footer.
    fn open_paths(&mut self, paths: &[PathBuf]) {
        if let Err(err) = self.select(paths) {
            tracing::warn!(error = %err, "selection failed");
            self.status = Some(StatusMessage::error(err.to_string()));
        }
    }

    fn select(&mut self, paths: &[PathBuf]) -> Result<(), SelectionError> {
        let batch = select_paths(paths, &self.config)?;
        let batch_id = self.next_batch;
        self.next_batch += 1;

        let mut progress = ImportProgress::new();
        progress.selected = batch.len();
        self.imports.insert(batch_id, progress);
        self.status = None;

        tracing::debug!(batch = batch_id, files = batch.len(), "starting import");
        start_import(
            batch_id,
            batch,
            self.config.clone(),
            self.store.clone(),
            self.events_tx.clone(),
        );
        Ok(())
    }

    /// Apply a message from a background task.
    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ImportProgress { batch, progress } => {
                if let Some(slot) = self.imports.get_mut(&batch) {
                    *slot = progress;
                }
            }
            AppEvent::ImportComplete { batch, report } => {
                self.imports.remove(&batch);
                let was_empty = self.views.is_empty();
                self.views.extend(report.views);
                self.notice = report.notice;
                if was_empty {
                    self.cards.jump_to_top();
                }
                self.cards.clamp(self.views.len());
            }
            AppEvent::SaveComplete(outcomes) => {
                self.status = Some(summarize_saves(&outcomes));
            }
        }
    }

    fn selected_view(&self) -> Option<&FileView> {
        self.views.get_index(self.cards.selected)
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_view().map(|view| view.id) else {
            return;
        };
        if self.views.toggle(id).is_some() {
            self.cards.scroll = 0;
        }
    }

    fn save_selected(&mut self) {
        let Some(view) = self.selected_view().cloned() else {
            return;
        };
        start_save(
            vec![view],
            self.store.clone(),
            self.output_dir.clone(),
            self.conflict,
            self.events_tx.clone(),
        );
    }

    fn save_all(&mut self) {
        if self.views.is_empty() {
            return;
        }
        let views: Vec<FileView> = self.views.iter().cloned().collect();
        start_save(
            views,
            self.store.clone(),
            self.output_dir.clone(),
            self.conflict,
            self.events_tx.clone(),
        );
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.settings.theme = self.theme.variant;
        if self.persist_settings {
            if let Err(err) = self.settings.save() {
                tracing::warn!(error = %err, "failed to save settings");
            }
        }
    }

    /// Combined progress of all running batches.
    fn aggregate_progress(&self) -> Option<ImportProgress> {
        if self.imports.is_empty() {
            return None;
        }
        let mut total = ImportProgress::new();
        for progress in self.imports.values() {
            total.selected += progress.selected;
            total.accepted += progress.accepted;
            total.rejected += progress.rejected;
            total.decoded += progress.decoded;
            total.failed += progress.failed;
            total.bytes_decoded += progress.bytes_decoded;
            total.elapsed = total.elapsed.max(progress.elapsed);
            if progress.last_file.is_some() {
                total.last_file = progress.last_file.clone();
            }
        }
        Some(total)
    }
}

/// Footer message for a finished save.
fn summarize_saves(
    outcomes: &[(String, Result<textdrop_export::SaveOutcome, textdrop_export::ExportError>)],
) -> StatusMessage {
    let saved = outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, Ok(o) if o.is_saved()))
        .count();
    let errors: Vec<&str> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.is_err())
        .map(|(name, _)| name.as_str())
        .collect();

    match outcomes {
        [(_, Ok(outcome))] if outcome.is_saved() => {
            StatusMessage::success(format!("Saved {}", outcome.path().display()))
        }
        [(_, Ok(outcome))] => {
            StatusMessage::error(format!("Already exists: {}", outcome.path().display()))
        }
        [(name, Err(err))] => StatusMessage::error(format!("Could not save {name}: {err}")),
        _ if errors.is_empty() => StatusMessage::success(format!(
            "Saved {saved} of {} files",
            outcomes.len()
        )),
        _ => StatusMessage::error(format!(
            "Saved {saved} of {} files; failed: {}",
            outcomes.len(),
            errors.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn test_app(dir: &std::path::Path) -> App {
        let settings = UserSettings {
            output_dir: Some(dir.join("out")),
            ..Default::default()
        };
        App::new(TuiConfig {
            files: Vec::new(),
            settings,
            persist_settings: false,
        })
        .unwrap()
    }

    async fn next_event(app: &mut App) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(5), app.events_rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    async fn drain_import(app: &mut App) {
        while !app.imports.is_empty() {
            let event = next_event(app).await;
            app.handle_event(event);
        }
    }

    fn write_lines(dir: &std::path::Path, name: &str, lines: usize) -> PathBuf {
        let path = dir.join(name);
        let content: Vec<String> = (1..=lines).map(|i| format!("line {i}")).collect();
        std::fs::write(&path, content.join("\n")).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_appends_and_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        let txt = write_lines(dir.path(), "a.txt", 3);
        let png = dir.path().join("b.png");
        std::fs::write(&png, b"\x89PNG").unwrap();

        app.open_paths(&[txt, png]);
        drain_import(&mut app).await;

        assert_eq!(app.views.len(), 1);
        assert_eq!(app.notice, BatchNotice::SomeIgnored);

        let other = write_lines(dir.path(), "c.txt", 1);
        app.open_paths(&[other]);
        drain_import(&mut app).await;

        assert_eq!(app.views.len(), 2);
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_toggle_targets_selected_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        let first = write_lines(dir.path(), "first.txt", 80);
        app.open_paths(&[first]);
        drain_import(&mut app).await;
        let second = write_lines(dir.path(), "second.txt", 80);
        app.open_paths(&[second]);
        drain_import(&mut app).await;

        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::ToggleExpand);

        let states: Vec<bool> = app.views.iter().map(|v| v.expanded).collect();
        assert_eq!(states, [false, true]);

        app.handle_action(KeyAction::ToggleExpand);
        assert!(app.views.iter().all(|v| !v.expanded));
    }

    #[tokio::test]
    async fn test_missing_path_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.open_paths(&[dir.path().join("nope.txt")]);

        assert!(app.imports.is_empty());
        assert!(matches!(&app.status, Some(s) if !s.success));
    }

    #[tokio::test]
    async fn test_prompt_opens_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        let path = write_lines(dir.path(), "prompt.txt", 2);

        app.handle_action(KeyAction::OpenFiles);
        assert_eq!(app.mode, AppMode::Opening);
        for c in path.to_string_lossy().chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.mode, AppMode::Normal);

        drain_import(&mut app).await;
        assert_eq!(app.views.len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_keeps_error_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        app.handle_action(KeyAction::OpenFiles);
        for c in "missing.txt".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.mode, AppMode::Opening);
        assert!(app.input_state.as_ref().and_then(|i| i.error()).is_some());
    }

    #[tokio::test]
    async fn test_save_selected_writes_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        let path = write_lines(dir.path(), "report.csv", 2);
        app.open_paths(&[path]);
        drain_import(&mut app).await;

        app.handle_action(KeyAction::Save);
        loop {
            let event = next_event(&mut app).await;
            let done = matches!(event, AppEvent::SaveComplete(_));
            app.handle_event(event);
            if done {
                break;
            }
        }

        let saved = dir.path().join("out").join("arquivo_report.csv.txt");
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "line 1\nline 2");
        assert!(matches!(&app.status, Some(s) if s.success));
    }

    #[tokio::test]
    async fn test_status_cleared_by_navigation_and_new_import() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        app.status = Some(StatusMessage::success("saved"));
        app.handle_action(KeyAction::MoveDown);
        assert!(app.status.is_none());

        app.status = Some(StatusMessage::success("saved"));
        let path = write_lines(dir.path(), "next.txt", 1);
        app.open_paths(&[path]);
        assert!(app.status.is_none());
        drain_import(&mut app).await;
    }

    #[test]
    fn test_help_mode_swallows_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.handle_action(KeyAction::ToggleHelp);
        assert_eq!(app.mode, AppMode::Help);
        app.handle_action(KeyAction::MoveDown);
        assert_eq!(app.mode, AppMode::Help);
        app.handle_action(KeyAction::Cancel);
        assert_eq!(app.mode, AppMode::Normal);
        app.handle_action(KeyAction::Quit);
        assert_eq!(app.mode, AppMode::Quit);
    }

    #[test]
    fn test_theme_toggle_updates_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.handle_action(KeyAction::ToggleTheme);
        assert_eq!(app.settings.theme, crate::theme::ThemeVariant::Light);
    }
}
