use tracing::error;

use super::{App, Focus, StatusKind};
use crate::strings::{storage_error, MSG_HISTORY_CLEARED};

impl App {
    // Resync the strip with the store after anything that changed it.
    pub fn reload_history(&mut self) {
        match self.printer.history().get_all() {
            Ok(items) => {
                self.history_items = items;
                self.history_selected = self
                    .history_selected
                    .min(self.history_items.len().saturating_sub(1));
                if self.history_items.is_empty() && self.focus == Focus::History {
                    self.focus = Focus::Input;
                }
            }
            Err(e) => {
                error!(target: "tui", "reload history failed: {}", e);
                self.set_status(storage_error(&e), StatusKind::Error);
            }
        }
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.printer.history().delete_all() {
            error!(target: "tui", "clear history failed: {}", e);
            self.set_status(storage_error(&e), StatusKind::Error);
            return;
        }
        self.reload_history();
        self.history_selected = 0;
        self.set_status(MSG_HISTORY_CLEARED, StatusKind::Info);
    }

    pub fn focus_history(&mut self) {
        if !self.history_items.is_empty() {
            self.focus = Focus::History;
        }
    }

    pub fn select_prev_history(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn select_next_history(&mut self) {
        if self.history_selected + 1 < self.history_items.len() {
            self.history_selected += 1;
        }
    }

    /// Copies a stored label into the input; printing stays a separate action.
    pub fn use_history_entry(&mut self, idx: usize) {
        if let Some(item) = self.history_items.get(idx).cloned() {
            self.input.set(&item);
            self.history_selected = idx;
            self.focus = Focus::Input;
        }
    }
}
