use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prefs::{PreferenceStore, StoreError, PREF_AUTH_TOKEN, PREF_ENDPOINT};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub auth_token: String,
}

impl ConnectionSettings {
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.endpoint.is_empty() && !self.auth_token.is_empty()
    }
}

pub struct SettingsStore<P: PreferenceStore> {
    prefs: Arc<P>,
}

impl<P: PreferenceStore> SettingsStore<P> {
    pub fn new(prefs: Arc<P>) -> Self {
        Self { prefs }
    }

    pub fn load(&self) -> Result<ConnectionSettings, StoreError> {
        Ok(ConnectionSettings {
            endpoint: self.prefs.get_or_empty(PREF_ENDPOINT)?,
            auth_token: self.prefs.get_or_empty(PREF_AUTH_TOKEN)?,
        })
    }

    pub fn save(&self, settings: &ConnectionSettings) -> Result<(), StoreError> {
        self.prefs.put_all(&[
            (PREF_ENDPOINT, settings.endpoint.as_str()),
            (PREF_AUTH_TOKEN, settings.auth_token.as_str()),
        ])
    }
}
