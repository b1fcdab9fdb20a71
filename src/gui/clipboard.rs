//! Clipboard functionality

use arboard::Clipboard;

/// Text currently on the clipboard, trimmed.
pub fn get_clipboard_content() -> Result<String, String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .get_text()
        .map(|text| text.trim().to_string())
        .map_err(|e| format!("Failed to read clipboard: {}", e))
}
