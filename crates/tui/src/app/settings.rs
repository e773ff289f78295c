use label_core::ConnectionSettings;
use tracing::{error, info};

use super::{App, ConfirmAction, StatusKind, TextField};
use crate::strings::{storage_error, MSG_HISTORY_ALREADY_EMPTY, MSG_SETTINGS_SAVED};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    Endpoint,
    AuthToken,
}

#[derive(Clone, Debug)]
pub struct SettingsForm {
    pub endpoint: TextField,
    pub auth_token: TextField,
    pub field: SettingsField,
}

impl SettingsForm {
    pub fn from_settings(s: &ConnectionSettings) -> Self {
        Self {
            endpoint: TextField::with_text(&s.endpoint),
            auth_token: TextField::with_text(&s.auth_token),
            field: SettingsField::Endpoint,
        }
    }

    pub fn to_settings(&self) -> ConnectionSettings {
        ConnectionSettings::new(self.endpoint.buffer.clone(), self.auth_token.buffer.clone())
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            SettingsField::Endpoint => SettingsField::AuthToken,
            SettingsField::AuthToken => SettingsField::Endpoint,
        };
    }

    pub fn active_mut(&mut self) -> &mut TextField {
        match self.field {
            SettingsField::Endpoint => &mut self.endpoint,
            SettingsField::AuthToken => &mut self.auth_token,
        }
    }
}

impl App {
    pub fn open_settings(&mut self) {
        match self.printer.settings().load() {
            Ok(s) => self.settings_form = Some(SettingsForm::from_settings(&s)),
            Err(e) => {
                error!(target: "tui", "load settings failed: {}", e);
                self.set_status(storage_error(&e), StatusKind::Error);
            }
        }
    }

    pub fn close_settings(&mut self) {
        self.settings_form = None;
    }

    pub fn save_settings(&mut self) {
        let Some(form) = &self.settings_form else {
            return;
        };
        let settings = form.to_settings();
        match self.printer.settings().save(&settings) {
            Ok(()) => {
                info!(target: "tui", "settings saved endpoint={}", settings.endpoint);
                self.settings_form = None;
                self.set_status(MSG_SETTINGS_SAVED, StatusKind::Info);
            }
            Err(e) => {
                error!(target: "tui", "save settings failed: {}", e);
                self.set_status(storage_error(&e), StatusKind::Error);
            }
        }
    }

    pub fn request_clear_history(&mut self) {
        if self.history_items.is_empty() {
            self.set_status(MSG_HISTORY_ALREADY_EMPTY, StatusKind::Info);
            return;
        }
        self.confirm = Some(ConfirmAction::ClearHistory);
    }
}
