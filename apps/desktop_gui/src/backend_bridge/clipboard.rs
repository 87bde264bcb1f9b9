use anyhow::Result;
use arboard::Clipboard;
use client_core::ClipboardSink;

/// System clipboard via arboard. A fresh handle per write keeps the sink
/// stateless and `Send + Sync`.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}
