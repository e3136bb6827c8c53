//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background assessment via the worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::adapters::heuristic::{HeuristicModel, ScoringPolicy};
use crate::application::{Advance, AssessmentService, FormSession};
use crate::domain::{Assessment, FormStep};

use super::ui::{render_processing, render_questionnaire, render_results, FormScreenState};
use super::worker::{AssessmentProgress, AssessmentWorker, AssessmentWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Questionnaire,
    Processing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessingPhase {
    Submitting,
    Scoring,
}

impl ProcessingPhase {
    fn label(self) -> &'static str {
        match self {
            Self::Submitting => "Submitting assessment...",
            Self::Scoring => "Scoring...",
        }
    }
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Assessment service
    service: Arc<AssessmentService<HeuristicModel>>,

    /// Questionnaire session (aggregate + step position)
    session: FormSession,

    /// Screen state for the section being edited
    form_state: FormScreenState,

    /// Pending assessment worker (if running)
    pending_worker: Option<AssessmentWorkerHandle>,

    /// Current worker phase (for UI animation)
    processing_phase: Option<ProcessingPhase>,

    /// When the current phase started (for UI animation)
    phase_started_at: Option<Instant>,

    /// Animated progress ratio shown while processing
    processing_progress: f64,

    /// Last completed assessment
    assessment: Option<Assessment>,
}

impl App {
    /// Create a new application instance.
    ///
    /// The scoring policy comes from `HEARTGUARD_POLICY_PATH` when set,
    /// otherwise built-in defaults.
    ///
    /// # Errors
    /// Returns error if the policy file cannot be read or parsed.
    pub fn new() -> Result<Self> {
        let policy = ScoringPolicy::from_env()?;
        let service = Arc::new(AssessmentService::new(Arc::new(HeuristicModel::new(
            policy,
        ))));

        let session = FormSession::new();
        let form_state = FormScreenState::for_step(session.step(), session.form());

        Ok(Self {
            screen: Screen::Questionnaire,
            should_quit: false,
            service,
            session,
            form_state,
            pending_worker: None,
            processing_phase: None,
            phase_started_at: None,
            processing_progress: 0.0,
            assessment: None,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Poll pending worker for progress updates
            self.poll_worker();

            // Animate processing progress (fake loading bar)
            self.tick_processing_progress();

            // Draw current screen
            terminal.draw(|f| {
                let area = f.area();
                match self.screen {
                    Screen::Questionnaire => render_questionnaire(f, area, &self.form_state),
                    Screen::Processing => {
                        let label = self
                            .processing_phase
                            .map_or("Submitting assessment...", ProcessingPhase::label);
                        render_processing(f, area, label, self.processing_progress);
                    }
                    Screen::Results => {
                        if let Some(assessment) = &self.assessment {
                            render_results(f, area, assessment);
                        }
                    }
                }
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }

        // Process all available progress messages.
        loop {
            let progress = match self
                .pending_worker
                .as_ref()
                .and_then(AssessmentWorkerHandle::try_recv)
            {
                Some(p) => p,
                None => break,
            };

            match progress {
                AssessmentProgress::Submitting => {
                    self.set_processing_phase(ProcessingPhase::Submitting);
                }
                AssessmentProgress::Scoring => {
                    self.set_processing_phase(ProcessingPhase::Scoring);
                }
                AssessmentProgress::Complete(assessment) => {
                    tracing::info!(
                        risk_level = %assessment.result.risk_level,
                        "Assessment complete"
                    );
                    self.assessment = Some(assessment);
                    self.pending_worker = None;
                    self.processing_phase = None;
                    self.phase_started_at = None;
                    self.screen = Screen::Results;
                    break;
                }
            }
        }
    }

    fn set_processing_phase(&mut self, phase: ProcessingPhase) {
        let min_start = match phase {
            ProcessingPhase::Submitting => 0.0,
            ProcessingPhase::Scoring => 0.85,
        };
        self.processing_progress = self.processing_progress.max(min_start);
        self.processing_phase = Some(phase);
        self.phase_started_at = Some(Instant::now());
    }

    fn tick_processing_progress(&mut self) {
        // Only animate while a worker is running.
        if self.pending_worker.is_none() {
            return;
        }
        let Some(phase) = self.processing_phase else {
            return;
        };
        let Some(started_at) = self.phase_started_at else {
            return;
        };

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();

        let (start_floor, target, tau) = match phase {
            ProcessingPhase::Submitting => (0.02, 0.85, 1.2),
            ProcessingPhase::Scoring => (0.85, 0.98, 0.5),
        };

        // Smooth, monotonic fake progress: asymptotically approaches the phase target.
        let k = 1.0 - (-elapsed / tau).exp();
        let desired = (start_floor + (target - start_floor) * k).clamp(0.0, target);
        self.processing_progress = desired.max(self.processing_progress).min(target);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Questionnaire => self.handle_questionnaire_key(key),
            Screen::Processing => self.handle_processing_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_questionnaire_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.retreat(),
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_left(),
            KeyCode::Right => self.form_state.cycle_right(),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Enter => self.advance(),
            _ => {}
        }
    }

    fn handle_processing_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            // Abort the pending assessment and return to the questionnaire.
            if let Some(worker) = self.pending_worker.take() {
                worker.cancel();
            }
            self.processing_phase = None;
            self.phase_started_at = None;
            self.processing_progress = 0.0;
            self.screen = Screen::Questionnaire;
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.reset_session(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Commit the current section and move forward; submit on the last one.
    fn advance(&mut self) {
        let patch = match self.form_state.to_patch(self.session.form()) {
            Ok(patch) => patch,
            Err(message) => {
                self.form_state.error_message = Some(message);
                return;
            }
        };
        self.session.update(patch);

        match self.session.advance() {
            Advance::Moved(step) => {
                self.form_state = FormScreenState::for_step(step, self.session.form());
            }
            Advance::Submit => self.submit(),
        }
    }

    /// Commit the current section and move back; a no-op on the first one.
    fn retreat(&mut self) {
        if let Ok(patch) = self.form_state.to_patch(self.session.form()) {
            self.session.update(patch);
        }
        let step = self.session.retreat();
        self.form_state = FormScreenState::for_step(step, self.session.form());
    }

    fn submit(&mut self) {
        // One submission at a time.
        if self.pending_worker.is_some() {
            tracing::warn!("Submission ignored; an assessment is already running");
            return;
        }

        tracing::info!(step = ?self.session.step(), "Submitting questionnaire");
        let snapshot = self.session.snapshot();
        self.pending_worker = Some(AssessmentWorker::spawn(Arc::clone(&self.service), snapshot));
        self.processing_progress = 0.0;
        self.set_processing_phase(ProcessingPhase::Submitting);
        self.screen = Screen::Processing;
    }

    /// Start a fresh session. Any in-flight assessment is cancelled so a
    /// stale result can never surface afterwards.
    fn reset_session(&mut self) {
        if let Some(worker) = self.pending_worker.take() {
            worker.cancel();
        }
        self.session.reset();
        self.assessment = None;
        self.processing_phase = None;
        self.phase_started_at = None;
        self.processing_progress = 0.0;
        self.form_state = FormScreenState::for_step(FormStep::first(), self.session.form());
        self.screen = Screen::Questionnaire;
    }
}
