//! One user-triggered print attempt: validate, read settings, POST, record.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::history::HistoryStore;
use crate::prefs::{PreferenceStore, StoreError};
use crate::settings::{ConnectionSettings, SettingsStore};

pub const DEFAULT_QTY: u32 = 1;

pub const MSG_EMPTY_INPUT: &str = "Please enter some label text";
pub const MSG_PRINTED: &str = "Label sent to printer";
pub const MSG_PRINT_FAILED: &str = "Print failed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub body: String,
    pub qty: u32,
}

/// Wire body: `{"items":[{"body":..,"qty":..}]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintPayload {
    pub items: Vec<PrintRequest>,
}

impl PrintPayload {
    pub fn single(body: impl Into<String>, qty: u32) -> Self {
        Self {
            items: vec![PrintRequest {
                body: body.into(),
                qty,
            }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintResponse {
    pub status: u16,
    pub reason: Option<String>,
}

impl PrintResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("timeout: {0}")] Timeout(String),
    #[error("network: {0}")] Network(String),
    #[error("{0}")] Other(String),
}

#[allow(async_fn_in_trait)]
pub trait PrintClient: Send + Sync {
    async fn send_print(
        &self,
        settings: &ConnectionSettings,
        payload: &PrintPayload,
    ) -> Result<PrintResponse, PrintError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    EmptyInput,
    Printed,
    Rejected {
        status: u16,
        description: Option<String>,
    },
    Failed(String),
}

impl Outcome {
    pub fn is_printed(&self) -> bool {
        matches!(self, Outcome::Printed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::EmptyInput => f.write_str(MSG_EMPTY_INPUT),
            Outcome::Printed => f.write_str(MSG_PRINTED),
            Outcome::Rejected {
                description: Some(d),
                ..
            } => write!(f, "{}: {}", MSG_PRINT_FAILED, d),
            Outcome::Rejected { status, .. } => write!(f, "{}: HTTP {}", MSG_PRINT_FAILED, status),
            Outcome::Failed(reason) => write!(f, "{}: {}", MSG_PRINT_FAILED, reason),
        }
    }
}

pub struct Printer<P: PreferenceStore, C: PrintClient> {
    settings: SettingsStore<P>,
    history: Arc<HistoryStore<P>>,
    client: C,
}

impl<P: PreferenceStore, C: PrintClient> Printer<P, C> {
    pub fn new(settings: SettingsStore<P>, history: Arc<HistoryStore<P>>, client: C) -> Self {
        Self {
            settings,
            history,
            client,
        }
    }

    pub fn settings(&self) -> &SettingsStore<P> {
        &self.settings
    }

    pub fn history(&self) -> &Arc<HistoryStore<P>> {
        &self.history
    }

    /// Runs one submission. Remote and transport failures come back as an
    /// [`Outcome`]; only storage errors are returned as `Err`.
    pub async fn submit(&self, text: Option<&str>, qty: u32) -> Result<Outcome, StoreError> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(Outcome::EmptyInput),
        };

        let settings = self.settings.load()?;
        let payload = PrintPayload::single(text, qty);
        info!(target: "core::printer", "submit: qty={} body_len={} endpoint={}", qty, text.len(), settings.endpoint);

        match self.client.send_print(&settings, &payload).await {
            Ok(resp) if resp.is_ok() => {
                self.history.save(text)?;
                info!(target: "core::printer", "printed, status={}", resp.status);
                Ok(Outcome::Printed)
            }
            Ok(resp) => {
                warn!(target: "core::printer", "printer rejected request status={} reason={:?}", resp.status, resp.reason);
                Ok(Outcome::Rejected {
                    status: resp.status,
                    description: resp.reason,
                })
            }
            Err(e) => {
                error!(target: "core::printer", "print transport error: {}", e);
                Ok(Outcome::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPrefs, PREF_AUTH_TOKEN, PREF_ENDPOINT};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Reply {
        Status(u16, Option<&'static str>),
        Error(&'static str),
    }

    struct MockClient {
        reply: Reply,
        calls: AtomicUsize,
        seen: Mutex<Option<(ConnectionSettings, PrintPayload)>>,
    }

    impl MockClient {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            }
        }
    }

    impl PrintClient for MockClient {
        async fn send_print(
            &self,
            settings: &ConnectionSettings,
            payload: &PrintPayload,
        ) -> Result<PrintResponse, PrintError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some((settings.clone(), payload.clone()));
            match &self.reply {
                Reply::Status(status, reason) => Ok(PrintResponse {
                    status: *status,
                    reason: reason.map(str::to_string),
                }),
                Reply::Error(e) => Err(PrintError::Network(e.to_string())),
            }
        }
    }

    fn printer(reply: Reply) -> Printer<MemoryPrefs, MockClient> {
        let prefs = Arc::new(MemoryPrefs::with_values([
            (PREF_ENDPOINT, "http://printer.local/print"),
            (PREF_AUTH_TOKEN, "tok"),
        ]));
        let history = Arc::new(HistoryStore::open(prefs.clone()).unwrap());
        Printer::new(SettingsStore::new(prefs), history, MockClient::new(reply))
    }

    #[tokio::test]
    async fn empty_or_missing_text_never_reaches_network() {
        let p = printer(Reply::Status(200, Some("OK")));
        assert_eq!(p.submit(None, 1).await.unwrap(), Outcome::EmptyInput);
        assert_eq!(p.submit(Some(""), 2).await.unwrap(), Outcome::EmptyInput);
        assert_eq!(p.client.calls.load(Ordering::SeqCst), 0);
        assert!(p.history().get_all().unwrap().is_empty());
        assert_eq!(Outcome::EmptyInput.to_string(), MSG_EMPTY_INPUT);
    }

    #[tokio::test]
    async fn ok_status_records_history() {
        let p = printer(Reply::Status(200, Some("OK")));
        let out = p.submit(Some("Coffee beans"), 3).await.unwrap();
        assert_eq!(out, Outcome::Printed);
        assert_eq!(out.to_string(), MSG_PRINTED);
        assert_eq!(p.history().get_all().unwrap(), vec!["Coffee beans"]);

        let seen = p.client.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.0, ConnectionSettings::new("http://printer.local/print", "tok"));
        assert_eq!(seen.1, PrintPayload::single("Coffee beans", 3));
    }

    #[tokio::test]
    async fn server_error_leaves_history_untouched() {
        let p = printer(Reply::Status(500, Some("Internal Server Error")));
        p.history().save("earlier").unwrap();
        let out = p.submit(Some("Tea"), 1).await.unwrap();
        assert!(matches!(out, Outcome::Rejected { status: 500, .. }));
        assert!(out.to_string().contains("Internal Server Error"));
        assert_eq!(p.history().get_all().unwrap(), vec!["earlier"]);
    }

    #[tokio::test]
    async fn non_200_success_codes_are_rejections() {
        let p = printer(Reply::Status(201, None));
        let out = p.submit(Some("Tea"), 1).await.unwrap();
        assert_eq!(out.to_string(), "Print failed: HTTP 201");
        assert!(p.history().get_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_error_is_reported_not_raised() {
        let p = printer(Reply::Error("connection refused"));
        let out = p.submit(Some("Tea"), 1).await.unwrap();
        assert!(matches!(out, Outcome::Failed(_)));
        assert!(out.to_string().contains("connection refused"));
        assert!(p.history().get_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_settings_still_reach_transport() {
        let prefs = Arc::new(MemoryPrefs::new());
        let history = Arc::new(HistoryStore::open(prefs.clone()).unwrap());
        let p = Printer::new(
            SettingsStore::new(prefs),
            history,
            MockClient::new(Reply::Error("relative URL without a base")),
        );
        let out = p.submit(Some("Tea"), DEFAULT_QTY).await.unwrap();
        assert!(matches!(out, Outcome::Failed(_)));
        assert_eq!(p.client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn payload_wire_shape() {
        let v = serde_json::to_value(PrintPayload::single("Jam", 2)).unwrap();
        assert_eq!(v, serde_json::json!({"items": [{"body": "Jam", "qty": 2}]}));
    }
}
