use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::feed::{self, CatalogError, CatalogSource};
use crate::catalog::{Catalog, version};
use crate::config::Config;
use crate::engine::progress::ProgressStore;
use crate::session::SessionMode;
use crate::session::drill::{Drill, SessionEnd, SubmitOutcome, WordView};
use crate::session::hint::HintOutcome;
use crate::store::json_store::JsonStore;
use crate::ui::answer_input::AnswerInput;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    PackSelect,
    ConfirmReset,
    Practice,
    Quiz,
    Reward,
    QuizResult,
    EmptySession,
    BootError,
}

/// One-line reaction to the last thing the learner did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
    Blank,
    HintRevealed,
    HintsExhausted,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub pack_menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub progress: ProgressStore,
    pub catalog: Option<Catalog>,
    pub boot_error: Option<String>,
    pub drill: Option<Drill>,
    pub input: AnswerInput,
    pub feedback: Option<Feedback>,
    pub last_end: Option<SessionEnd>,
    pub last_mode: SessionMode,
    pub should_quit: bool,
    advance_at: Option<Instant>,
    rng: SmallRng,
}

impl App {
    /// Load config-driven resources from disk and boot.
    pub fn new(config: Config) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(
                theme = %config.theme,
                available = ?Theme::available_themes(),
                "unknown theme, using default"
            );
            Theme::default()
        });

        let progress = match JsonStore::with_base_dir(config.progress_path()) {
            Ok(store) => ProgressStore::open(Box::new(store)),
            Err(e) => {
                tracing::warn!(error = %e, "progress directory unavailable, progress will not be saved");
                ProgressStore::in_memory()
            }
        };

        let source = CatalogSource::from_dir(config.data_dir.as_deref());
        let catalog = feed::load_catalog(&source);

        Self::boot(config, theme, progress, catalog, SmallRng::from_entropy())
    }

    /// Merge the catalog into progress and land on the home screen, or on the
    /// error screen when the catalog could not be loaded.
    pub fn boot(
        config: Config,
        theme: Theme,
        mut progress: ProgressStore,
        catalog: Result<Catalog, CatalogError>,
        rng: SmallRng,
    ) -> Self {
        let theme: &'static Theme = Box::leak(Box::new(theme));

        let (catalog, boot_error, screen) = match catalog {
            Ok(catalog) => {
                if let Err(e) = version::sync(&catalog, &mut progress) {
                    tracing::warn!(error = %e, "failed to persist catalog version");
                }
                if progress.ensure_valid_pack(&catalog) {
                    progress.persist_or_log();
                }
                (Some(catalog), None, AppScreen::Home)
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog failed to load");
                (None, Some(e.to_string()), AppScreen::BootError)
            }
        };

        Self {
            screen,
            menu: Menu::home(theme),
            pack_menu: Menu::home(theme),
            theme,
            config,
            progress,
            catalog,
            boot_error,
            drill: None,
            input: AnswerInput::default(),
            feedback: None,
            last_end: None,
            last_mode: SessionMode::Practice,
            should_quit: false,
            advance_at: None,
            rng,
        }
    }

    pub fn selected_pack_title(&self) -> String {
        let id = self.progress.selected_pack_id();
        self.catalog
            .as_ref()
            .and_then(|c| c.pack(id))
            .map(|p| p.display_title().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn start_practice_session(&mut self) {
        self.start_session(SessionMode::Practice);
    }

    pub fn start_quiz_session(&mut self) {
        self.start_session(SessionMode::Quiz);
    }

    fn start_session(&mut self, mode: SessionMode) {
        let Some(catalog) = self.catalog.as_ref() else {
            return;
        };
        let pack_id = self.progress.selected_pack_id().to_string();
        let mut drill = Drill::start(catalog, &mut self.progress, &pack_id, mode, &mut self.rng);

        self.last_mode = mode;
        self.input.clear();
        self.feedback = None;
        self.advance_at = None;

        if let Some(end) = drill.end_if_empty() {
            self.last_end = Some(end);
            self.drill = None;
            self.screen = AppScreen::EmptySession;
            return;
        }

        self.last_end = None;
        self.drill = Some(drill);
        self.screen = match mode {
            SessionMode::Practice => AppScreen::Practice,
            SessionMode::Quiz => AppScreen::Quiz,
        };
    }

    /// Start the same kind of session again with a fresh selection.
    pub fn retry_session(&mut self) {
        self.start_session(self.last_mode);
    }

    /// Current word for rendering; creates its hint plan on first display.
    pub fn current_view(&mut self) -> Option<WordView<'_>> {
        let catalog = self.catalog.as_ref()?;
        self.drill.as_mut()?.view(catalog)
    }

    pub fn is_input_locked(&self) -> bool {
        self.advance_at.is_some()
    }

    pub fn submit_answer(&mut self, now: Instant) {
        let (Some(drill), Some(catalog)) = (self.drill.as_mut(), self.catalog.as_ref()) else {
            return;
        };
        match drill.submit(self.input.value(), catalog, &mut self.progress) {
            SubmitOutcome::Empty => self.feedback = Some(Feedback::Blank),
            SubmitOutcome::Correct => {
                self.feedback = Some(Feedback::Correct);
                let delay = Duration::from_millis(self.config.advance_delay_ms);
                self.advance_at = Some(now + delay);
                if delay.is_zero() {
                    self.advance(now);
                }
            }
            SubmitOutcome::Incorrect => {
                self.feedback = Some(Feedback::Wrong);
                if drill.mode() == SessionMode::Quiz {
                    self.input.clear();
                }
            }
            SubmitOutcome::Ignored => {}
        }
    }

    pub fn request_hint(&mut self) {
        let (Some(drill), Some(catalog)) = (self.drill.as_mut(), self.catalog.as_ref()) else {
            return;
        };
        match drill.request_hint(catalog, &mut self.progress) {
            Some(HintOutcome::Revealed(_)) => self.feedback = Some(Feedback::HintRevealed),
            Some(HintOutcome::Exhausted) => self.feedback = Some(Feedback::HintsExhausted),
            None => {}
        }
    }

    /// Called on every tick; moves on once the post-answer pause has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        self.advance(now);
    }

    fn advance(&mut self, now: Instant) {
        match self.advance_at {
            Some(at) if now >= at => {}
            _ => return,
        }
        self.advance_at = None;
        let Some(drill) = self.drill.as_mut() else {
            return;
        };

        self.input.clear();
        self.feedback = None;
        if let Some(end) = drill.advance(&mut self.progress) {
            self.last_end = Some(end);
            self.drill = None;
            self.screen = match end {
                SessionEnd::PracticeComplete { .. } => AppScreen::Reward,
                SessionEnd::QuizFinished { .. } => AppScreen::QuizResult,
                SessionEnd::Empty => AppScreen::EmptySession,
            };
        }
    }

    pub fn go_to_pack_select(&mut self) {
        let Some(catalog) = self.catalog.as_ref() else {
            return;
        };
        self.pack_menu = Menu::packs(catalog, self.progress.selected_pack_id(), self.theme);
        self.screen = AppScreen::PackSelect;
    }

    /// Select the pack at `index` in catalog order and persist the choice.
    pub fn select_pack(&mut self, index: usize) {
        let Some(pack) = self.catalog.as_ref().and_then(|c| c.packs.get(index)) else {
            return;
        };
        let id = pack.id.clone();
        self.select_pack_by_id(&id);
        self.go_home();
    }

    /// Returns false when the catalog has no such pack.
    pub fn select_pack_by_id(&mut self, pack_id: &str) -> bool {
        if !self.catalog.as_ref().is_some_and(|c| c.has_pack(pack_id)) {
            return false;
        }
        self.progress.set_selected_pack(pack_id);
        self.progress.persist_or_log();
        tracing::info!(pack = pack_id, "pack selected");
        true
    }

    pub fn confirm_reset(&mut self) {
        if self.catalog.is_some() {
            self.screen = AppScreen::ConfirmReset;
        }
    }

    pub fn reset_progress(&mut self) {
        if let Some(catalog) = self.catalog.as_ref() {
            if let Err(e) = self.progress.reset(catalog) {
                tracing::warn!(error = %e, "failed to persist reset");
            }
        }
        self.go_home();
    }

    pub fn go_home(&mut self) {
        self.drill = None;
        self.advance_at = None;
        self.feedback = None;
        self.input.clear();
        self.screen = if self.catalog.is_some() {
            AppScreen::Home
        } else {
            AppScreen::BootError
        };
    }
}
