//! Host-facing surface: a mounted [`Viewer`] and the upload/viewing [`Session`].

use tracing::info;

use crate::navigation::{
    Direction, InputSource, NavInput, NavOutcome, NavigationController, NavigationState,
};
use crate::placement::{self, SlidePlacement};
use crate::slides::{SlideDef, SlideFacts, SlideRegistry};
use crate::statement::Statement;

/// One statement on screen. Owns the model and the navigation state; both go
/// away together when the viewer is dropped.
#[derive(Debug)]
pub struct Viewer {
    statement: Statement,
    registry: SlideRegistry,
    nav: NavigationController,
}

impl Viewer {
    pub fn mount(statement: Statement, transition_ms: u64) -> Self {
        let registry = SlideRegistry;
        info!(
            slides = registry.slide_count(),
            transactions = statement.transaction_count(),
            "viewer mounted"
        );
        Self {
            statement,
            nav: NavigationController::new(registry.slide_count(), transition_ms),
            registry,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn next_slide(&mut self, now_ms: u64) -> NavOutcome {
        self.nav.go_next(now_ms)
    }

    pub fn previous_slide(&mut self, now_ms: u64) -> NavOutcome {
        self.nav.go_previous(now_ms)
    }

    pub fn jump_to_slide(&mut self, index: usize, now_ms: u64) -> NavOutcome {
        self.nav.go_to_index(index, now_ms)
    }

    pub fn dispatch(&mut self, input: NavInput, source: InputSource, now_ms: u64) -> NavOutcome {
        self.nav.dispatch(input, source, now_ms)
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.nav.tick(now_ms)
    }

    pub fn current_index(&self) -> usize {
        self.nav.current_index()
    }

    pub fn slide_count(&self) -> usize {
        self.nav.slide_count()
    }

    pub fn is_transitioning(&self) -> bool {
        self.nav.is_locked()
    }

    pub fn direction(&self) -> Direction {
        self.nav.direction()
    }

    pub fn can_go_previous(&self) -> bool {
        self.nav.can_go_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.nav.can_go_next()
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.nav.state()
    }

    pub fn transition_progress(&self, now_ms: u64) -> f64 {
        self.nav.transition_progress(now_ms)
    }

    pub fn active_slide(&self) -> &'static SlideDef {
        // current_index is always < slide_count, and slide_count comes from the registry.
        self.registry
            .get(self.nav.current_index())
            .unwrap_or(&crate::slides::SLIDES[0])
    }

    /// Facts for the active slide only; the stacked shells behind it carry none.
    pub fn active_facts(&self) -> SlideFacts {
        self.active_slide().facts(&self.statement)
    }

    pub fn placements(&self) -> Vec<SlidePlacement> {
        placement::render_order(&self.nav.state(), &self.registry)
    }
}

#[derive(Debug)]
pub enum Session {
    AwaitingUpload { last_error: Option<String> },
    Viewing(Viewer),
}

impl Default for Session {
    fn default() -> Self {
        Session::AwaitingUpload { last_error: None }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A successful upload: mount a fresh viewer at slide 0.
    pub fn accept(&mut self, statement: Statement, transition_ms: u64) {
        *self = Session::Viewing(Viewer::mount(statement, transition_ms));
    }

    /// A failed upload: stay on (or return to) the upload step with the message as given.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "upload failed");
        *self = Session::AwaitingUpload {
            last_error: Some(message),
        };
    }

    /// Drop the statement and navigation and go back to the upload step.
    pub fn reset(&mut self) {
        if matches!(self, Session::Viewing(_)) {
            info!("session reset");
        }
        *self = Session::default();
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        match self {
            Session::Viewing(v) => Some(v),
            Session::AwaitingUpload { .. } => None,
        }
    }

    pub fn viewer_mut(&mut self) -> Option<&mut Viewer> {
        match self {
            Session::Viewing(v) => Some(v),
            Session::AwaitingUpload { .. } => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            Session::AwaitingUpload { last_error } => last_error.as_deref(),
            Session::Viewing(_) => None,
        }
    }
}
