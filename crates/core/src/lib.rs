pub mod history;
pub mod prefs;
pub mod printer;
pub mod settings;

pub use history::{HistoryStore, HISTORY_DELIMITER, MAX_HISTORY_ITEMS};
pub use prefs::{MemoryPrefs, PreferenceStore, StoreError};
pub use printer::{
    Outcome, PrintClient, PrintError, PrintPayload, PrintRequest, PrintResponse, Printer,
    DEFAULT_QTY,
};
pub use settings::{ConnectionSettings, SettingsStore};
