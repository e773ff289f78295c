use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use label_core::printer::MSG_PRINT_FAILED;
use label_core::{Outcome, Printer, DEFAULT_QTY};
use providers::labelprinter::HttpPrintClient;
use ratatui::layout::Rect;
use tracing::{error, info};

use crate::persist::FilePrefs;
use crate::strings::{storage_error, MSG_BUSY, MSG_PRINTING};

pub mod history;
pub mod input;
pub mod settings;

pub use input::TextField;
pub use settings::{SettingsField, SettingsForm};

pub type LabelPrinter = Printer<FilePrefs, HttpPrintClient>;

pub const QTY_CHOICES: [u32; 3] = [1, 2, 3];
pub const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    History,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearHistory,
}

type SubmitResult = Result<Outcome, String>;

pub struct App {
    pub input: TextField,
    pub qty: u32,
    pub history_items: Vec<String>,
    pub history_selected: usize,
    // Screen rects of the rendered history chips, refreshed on every draw.
    pub history_hits: Vec<(Rect, usize)>,
    pub focus: Focus,
    pub settings_form: Option<SettingsForm>,
    pub confirm: Option<ConfirmAction>,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    pub pending: Option<mpsc::Receiver<SubmitResult>>,
    pub should_quit: bool,
    pub dirty: bool,
    printer: Arc<LabelPrinter>,
}

impl App {
    pub fn new(printer: Arc<LabelPrinter>) -> Self {
        let mut s = Self {
            input: TextField::default(),
            qty: DEFAULT_QTY,
            history_items: printer.history().items(),
            history_selected: 0,
            history_hits: Vec::new(),
            focus: Focus::Input,
            settings_form: None,
            confirm: None,
            show_help: false,
            status: None,
            pending: None,
            should_quit: false,
            dirty: true,
            printer,
        };
        // First run, or a half-configured printer: start on the settings form.
        match s.printer.settings().load() {
            Ok(cfg) if !cfg.is_complete() => {
                s.settings_form = Some(SettingsForm::from_settings(&cfg));
            }
            Ok(_) => {}
            Err(e) => {
                error!(target: "tui", "load settings failed: {}", e);
                s.set_status(storage_error(&e), StatusKind::Error);
            }
        }
        s
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
        self.dirty = true;
    }

    pub fn is_printing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cycle_qty(&mut self, forward: bool) {
        let idx = QTY_CHOICES.iter().position(|q| *q == self.qty).unwrap_or(0);
        let n = QTY_CHOICES.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        self.qty = QTY_CHOICES[next];
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.qty = DEFAULT_QTY;
    }

    pub fn submit(&mut self) {
        if self.is_printing() {
            self.set_status(MSG_BUSY, StatusKind::Error);
            return;
        }
        if self.input.is_empty() {
            self.set_status(Outcome::EmptyInput.to_string(), StatusKind::Error);
            return;
        }

        let printer = self.printer.clone();
        let text = self.input.buffer.clone();
        let qty = self.qty;
        info!(target: "tui", "submit: qty={} input_len={} chars", qty, text.len());
        let (tx, rx) = mpsc::channel::<SubmitResult>();
        std::thread::spawn(move || {
            let res = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt
                    .block_on(printer.submit(Some(&text), qty))
                    .map_err(|e| storage_error(&e)),
                Err(e) => Err(format!("{}: runtime: {}", MSG_PRINT_FAILED, e)),
            };
            let _ = tx.send(res);
        });
        self.pending = Some(rx);
        self.set_status(MSG_PRINTING, StatusKind::Info);
    }

    fn finish_submit(&mut self, res: SubmitResult) {
        match res {
            Ok(outcome) => {
                let kind = if outcome.is_printed() {
                    self.reload_history();
                    StatusKind::Info
                } else {
                    StatusKind::Error
                };
                self.set_status(outcome.to_string(), kind);
            }
            Err(e) => {
                error!(target: "tui", "submit failed: {}", e);
                self.set_status(e, StatusKind::Error);
            }
        }
    }

    pub fn on_tick(&mut self) {
        let polled = self.pending.as_ref().map(|rx| rx.try_recv());
        match polled {
            Some(Ok(res)) => {
                self.pending = None;
                self.finish_submit(res);
            }
            Some(Err(mpsc::TryRecvError::Disconnected)) => {
                self.pending = None;
                error!(target: "tui", "print worker exited without a result");
                self.set_status(
                    format!("{}: worker stopped", MSG_PRINT_FAILED),
                    StatusKind::Error,
                );
            }
            Some(Err(mpsc::TryRecvError::Empty)) | None => {}
        }

        let expired = self
            .status
            .as_ref()
            .is_some_and(|s| s.shown_at.elapsed() >= STATUS_TTL);
        if expired && !self.is_printing() {
            self.status = None;
            self.dirty = true;
        }
    }

    pub fn click_at(&mut self, x: u16, y: u16) {
        if self.settings_form.is_some() || self.confirm.is_some() || self.show_help {
            return;
        }
        let hit = self.history_hits.iter().find(|(r, _)| {
            x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
        });
        if let Some((_, idx)) = hit.copied() {
            self.use_history_entry(idx);
            self.dirty = true;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.dirty = true;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if let Some(action) = self.confirm {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    match action {
                        ConfirmAction::ClearHistory => self.clear_history(),
                    }
                    self.confirm = None;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm = None;
                }
                _ => {}
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        if self.settings_form.is_some() {
            match key.code {
                KeyCode::Esc => self.close_settings(),
                KeyCode::Enter => self.save_settings(),
                KeyCode::Char('r') if ctrl => self.request_clear_history(),
                KeyCode::Char('c') if ctrl => self.should_quit = true,
                _ => {
                    if let Some(form) = &mut self.settings_form {
                        if matches!(
                            key.code,
                            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down
                        ) {
                            form.next_field();
                        } else {
                            form.active_mut().apply_edit_key(&key);
                        }
                    }
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(1) => {
                self.show_help = true;
                return;
            }
            KeyCode::F(3) => {
                self.open_settings();
                return;
            }
            KeyCode::Tab => {
                self.cycle_qty(true);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_qty(false);
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.reset();
                self.focus = Focus::Input;
                return;
            }
            _ => {}
        }

        if self.focus == Focus::History {
            match key.code {
                KeyCode::Esc | KeyCode::F(2) => self.focus = Focus::Input,
                KeyCode::Left | KeyCode::Up => self.select_prev_history(),
                KeyCode::Right | KeyCode::Down => self.select_next_history(),
                KeyCode::Home => self.history_selected = 0,
                KeyCode::End => {
                    self.history_selected = self.history_items.len().saturating_sub(1)
                }
                KeyCode::Enter => self.use_history_entry(self.history_selected),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(2) => self.focus_history(),
            KeyCode::Enter
                if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.input.insert_text("\n");
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('?') if self.input.is_empty() => self.show_help = true,
            _ => {
                self.input.apply_edit_key(&key);
            }
        }
    }
}
