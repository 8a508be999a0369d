use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};
use wrapped_core::{InputSource, NavInput, Session, Statement};
use wrapped_ingest::IngestClient;

use crate::layout::NavBar;
use crate::render;
use crate::upload_worker::{self, UploadEvent, UploadRequest};

pub const ANALYZING: &str = "Analyzing your statement...";
pub const NOT_A_PDF: &str = "Please select a PDF file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    File,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub path: String,
    pub password: String,
    pub focus: Field,
    /// Request id of the upload in flight. Submitting is disabled while set.
    pub in_flight: Option<u64>,
}

impl UploadForm {
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::File => &mut self.path,
            Field::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session,
    pub form: UploadForm,
    transition_ms: u64,
    uploads: mpsc::UnboundedSender<UploadRequest>,
    next_request_id: u64,
    /// Navigation bar hit regions from the last frame.
    pub nav_bar: Option<NavBar>,
}

impl App {
    pub fn new(
        transition_ms: u64,
        uploads: mpsc::UnboundedSender<UploadRequest>,
        form: UploadForm,
    ) -> Self {
        Self {
            session: Session::new(),
            form,
            transition_ms,
            uploads,
            next_request_id: 1,
            nav_bar: None,
        }
    }

    pub fn mount(&mut self, statement: Statement) {
        self.form.in_flight = None;
        self.session.accept(statement, self.transition_ms);
    }

    pub fn on_key(&mut self, code: KeyCode, now_ms: u64) -> Control {
        if self.session.viewer().is_some() {
            self.on_viewer_key(code, now_ms)
        } else {
            self.on_form_key(code)
        }
    }

    fn on_viewer_key(&mut self, code: KeyCode, now_ms: u64) -> Control {
        let input = match code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('u') => {
                self.session.reset();
                self.nav_bar = None;
                self.form.password.clear();
                return Control::Continue;
            }
            KeyCode::Right | KeyCode::Char('l') => NavInput::Next,
            KeyCode::Left | KeyCode::Char('h') => NavInput::Previous,
            KeyCode::Char(c @ '1'..='9') => NavInput::JumpTo(c as usize - '1' as usize),
            _ => return Control::Continue,
        };
        if let Some(viewer) = self.session.viewer_mut() {
            viewer.dispatch(input, InputSource::Keyboard, now_ms);
        }
        Control::Continue
    }

    fn on_form_key(&mut self, code: KeyCode) -> Control {
        if code == KeyCode::Esc {
            return Control::Quit;
        }
        if self.form.is_submitting() {
            return Control::Continue;
        }
        match code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.form.focus = match self.form.focus {
                    Field::File => Field::Password,
                    Field::Password => Field::File,
                };
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.form.focused_mut().pop();
            }
            KeyCode::Char(c) => self.form.focused_mut().push(c),
            _ => {}
        }
        Control::Continue
    }

    pub fn on_click(&mut self, column: u16, row: u16, now_ms: u64) {
        let Some(input) = self.nav_bar.as_ref().and_then(|b| b.hit(column, row)) else {
            return;
        };
        if let Some(viewer) = self.session.viewer_mut() {
            viewer.dispatch(input, InputSource::Pointer, now_ms);
        }
    }

    pub fn submit(&mut self) {
        if self.form.is_submitting() {
            return;
        }
        let path = PathBuf::from(self.form.path.trim());
        if !is_pdf(&path) {
            self.session.fail(NOT_A_PDF);
            return;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let password = Some(self.form.password.clone()).filter(|p| !p.is_empty());
        let req = UploadRequest {
            request_id,
            path,
            password,
        };
        info!(request_id, path = %req.path.display(), "submitting statement");
        if self.uploads.send(req).is_err() {
            self.session.fail(wrapped_ingest::GENERIC_FAILURE);
            return;
        }
        self.form.in_flight = Some(request_id);
        // Clears any previous error while the request runs.
        self.session.reset();
    }

    pub fn on_upload_event(&mut self, ev: UploadEvent) {
        if self.form.in_flight != Some(ev.request_id()) {
            debug!(request_id = ev.request_id(), "stale upload event dropped");
            return;
        }
        match ev {
            UploadEvent::Started { .. } => {}
            UploadEvent::Completed { statement, .. } => self.mount(*statement),
            UploadEvent::Failed { message, .. } => {
                self.form.in_flight = None;
                self.session.fail(message);
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64) {
        if let Some(viewer) = self.session.viewer_mut() {
            viewer.tick(now_ms);
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

pub struct ViewOptions {
    pub statement: Option<Statement>,
    pub form: UploadForm,
    pub transition_ms: u64,
    pub mouse: bool,
}

pub fn run_view(client: IngestClient, opts: ViewOptions) -> Result<()> {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = std::sync::mpsc::channel();
    let worker = tokio::spawn(upload_worker::run_worker(client, req_rx, ev_tx));

    let mut app = App::new(opts.transition_ms, req_tx, opts.form);
    if let Some(statement) = opts.statement {
        app.mount(statement);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if opts.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = view_loop(&mut terminal, &mut app, &ev_rx);

    disable_raw_mode()?;
    if opts.mouse {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    // An upload still running after quit has nowhere to report.
    worker.abort();
    res
}

fn view_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &std::sync::mpsc::Receiver<UploadEvent>,
) -> Result<()> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    loop {
        while let Ok(ev) = events.try_recv() {
            app.on_upload_event(ev);
        }
        app.tick(now_ms());

        let now = now_ms();
        terminal.draw(|f| render::draw(f, app, now))?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key.code, now_ms()) == Control::Quit {
                    break;
                }
            }
            Event::Mouse(m) => {
                if m.kind == MouseEventKind::Down(MouseButton::Left) {
                    app.on_click(m.column, m.row, now_ms());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use wrapped_core::{SlideId, Statement};

    fn app() -> (App, mpsc::UnboundedReceiver<UploadRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(500, tx, UploadForm::default()), rx)
    }

    fn mounted() -> App {
        let (mut app, _rx) = app();
        app.mount(Statement::default());
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(KeyCode::Char(c), 0);
        }
    }

    #[test]
    fn test_viewer_arrow_keys_respect_lock() {
        let mut app = mounted();
        app.on_key(KeyCode::Right, 0);
        app.on_key(KeyCode::Right, 100);
        let v = app.session.viewer().unwrap();
        assert_eq!(v.current_index(), 1);
        assert!(v.is_transitioning());

        app.tick(500);
        app.on_key(KeyCode::Char('h'), 600);
        assert_eq!(app.session.viewer().unwrap().current_index(), 0);
    }

    #[test]
    fn test_digit_jumps() {
        let mut app = mounted();
        app.on_key(KeyCode::Char('9'), 0);
        let v = app.session.viewer().unwrap();
        assert_eq!(v.active_slide().id, SlideId::Final);
    }

    #[test]
    fn test_u_returns_to_upload() {
        let mut app = mounted();
        app.form.password = "secret".to_string();
        assert_eq!(app.on_key(KeyCode::Char('u'), 0), Control::Continue);
        assert!(app.session.viewer().is_none());
        assert!(app.form.password.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = mounted();
        assert_eq!(app.on_key(KeyCode::Char('q'), 0), Control::Quit);
        let (mut form_app, _rx) = self::app();
        // On the form `q` is just a character.
        assert_eq!(form_app.on_key(KeyCode::Char('q'), 0), Control::Continue);
        assert_eq!(form_app.form.path, "q");
        assert_eq!(form_app.on_key(KeyCode::Esc, 0), Control::Quit);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let (mut app, mut rx) = app();
        type_text(&mut app, "notes.txt");
        app.on_key(KeyCode::Enter, 0);
        assert_eq!(app.session.last_error(), Some(NOT_A_PDF));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_submit_disables_until_result() {
        let (mut app, mut rx) = app();
        type_text(&mut app, "statement.pdf");
        app.on_key(KeyCode::Tab, 0);
        type_text(&mut app, "1234");
        app.on_key(KeyCode::Enter, 0);

        let req = rx.try_recv().unwrap();
        assert_eq!(req.path, PathBuf::from("statement.pdf"));
        assert_eq!(req.password.as_deref(), Some("1234"));
        assert!(app.form.is_submitting());

        // A second Enter while in flight sends nothing.
        app.on_key(KeyCode::Enter, 0);
        assert!(rx.try_recv().is_err());

        app.on_upload_event(UploadEvent::Failed {
            request_id: req.request_id,
            message: "Wrong password or corrupted PDF file.".to_string(),
        });
        assert!(!app.form.is_submitting());
        assert_eq!(
            app.session.last_error(),
            Some("Wrong password or corrupted PDF file.")
        );
    }

    #[test]
    fn test_completed_upload_mounts_at_first_slide() {
        let (mut app, mut rx) = app();
        type_text(&mut app, "statement.pdf");
        app.on_key(KeyCode::Enter, 0);
        let req = rx.try_recv().unwrap();
        assert_eq!(req.password, None);

        app.on_upload_event(UploadEvent::Completed {
            request_id: req.request_id + 1,
            statement: Box::default(),
        });
        assert!(app.session.viewer().is_none());

        app.on_upload_event(UploadEvent::Completed {
            request_id: req.request_id,
            statement: Box::default(),
        });
        assert_eq!(app.session.viewer().unwrap().current_index(), 0);
    }

    #[test]
    fn test_click_on_nav_bar() {
        let mut app = mounted();
        let bar = NavBar::layout(Rect::new(0, 20, 41, 1), 9);
        app.nav_bar = Some(bar.clone());
        app.on_click(bar.dots[4].x, 20, 0);
        assert_eq!(app.session.viewer().unwrap().current_index(), 4);
        app.on_click(0, 0, 700);
        assert_eq!(app.session.viewer().unwrap().current_index(), 4);
    }
}
