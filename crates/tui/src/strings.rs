// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const APP_TITLE: &str = " Label Maker ";

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_HISTORY: &str = " Recent ";
pub const TITLE_LABEL: &str = " Label ";
pub const TITLE_QTY: &str = " Copies ";
pub const TITLE_SETTINGS: &str = " Settings ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";
pub const TITLE_CONFIRM: &str = " Confirm ";

pub const LABEL_ENDPOINT: &str = "Label printer endpoint";
pub const LABEL_AUTH_TOKEN: &str = "Auth token";

pub const PLACEHOLDER: &str = "Type label text...";
pub const HISTORY_EMPTY: &str = "No labels printed yet";

pub const MSG_PRINTING: &str = "Printing...";
pub const MSG_BUSY: &str = "A label is still printing";
pub const MSG_SETTINGS_SAVED: &str = "Settings saved";
pub const MSG_HISTORY_CLEARED: &str = "History cleared";
pub const MSG_HISTORY_ALREADY_EMPTY: &str = "History is already empty";

pub const CONFIRM_CLEAR_HISTORY: &str =
    "Delete all recent labels? This cannot be undone. Press Y to confirm, N/Esc to cancel.";

pub const SETTINGS_HINT: &str = "Tab: next field  Enter: save  Esc: close  Ctrl+R: reset history";

pub fn storage_error(e: &impl std::fmt::Display) -> String {
    format!("Storage error: {}", e)
}

// Build the status bar line with width-aware compaction.
// - focus: e.g., "Label" or "Recent"
// - qty: selected copy count
// - history_len: number of stored labels
// - pending: a submission is in flight
// - max_width: available width for the status text
pub fn build_status_line(
    focus: &str,
    qty: u32,
    history_len: usize,
    pending: bool,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    if pending {
        segments.push(format!("[{}]", MSG_PRINTING.trim_end_matches('.')));
    }
    segments.push(format!("[{}] x{}", focus, qty));
    segments.push(format!("Hist:{}", history_len));
    // Hints ordered by importance; will be appended if space allows.
    let hints: [&str; 6] = [
        "Enter: print",
        "Tab: copies",
        "F2: recent",
        "F3: settings",
        "Ctrl+L: reset",
        "F1: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Printing",
        "  Enter: Print label    Shift+Enter / Alt+Enter: Newline",
        "  Tab / Shift+Tab: Cycle copies (1-3)    Ctrl+L: Clear text and copies",
        "Editing",
        "  Arrow: Move cursor    Backspace/Delete: Delete prev/next char",
        "  Home/End: Line start/end    Ctrl+A/E: Line start/end",
        "  Ctrl+Arrow: Word move    Ctrl+W: Delete prev word    Ctrl+U/K: Kill to line start/end",
        "Recent labels",
        "  F2: Focus recent    Left/Right: Select    Enter: Use label    Esc: Back",
        "  Mouse click: Use label",
        "Settings",
        "  F3: Open settings    Tab: Switch field    Enter: Save    Ctrl+R: Reset history",
        "Other",
        "  F1 or ? (empty label): Open/close this panel    Esc/Ctrl-C: Quit",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_fits_width() {
        let s = build_status_line("Label", 2, 4, false, 30);
        assert!(UnicodeWidthStr::width(s.as_str()) <= 30);
        assert!(s.starts_with("[Label] x2"));
    }

    #[test]
    fn status_line_shows_pending_first() {
        let s = build_status_line("Label", 1, 0, true, 200);
        assert!(s.starts_with("[Printing]"));
        assert!(s.contains("F1: help"));
    }

    #[test]
    fn narrow_width_drops_everything() {
        assert_eq!(build_status_line("Label", 1, 0, false, 3), "");
    }
}
