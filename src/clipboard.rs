use anyhow::Result;
use arboard::Clipboard;
use std::path::PathBuf;
use std::sync::Mutex;

/// Last copied export, kept for headless environments
static YANK_BUFFER: Mutex<Option<String>> = Mutex::new(None);

/// Result of a copy operation
#[derive(Debug)]
pub enum CopyResult {
    /// Successfully copied to system clipboard
    SystemClipboard,
    /// System clipboard unavailable, saved to internal buffer (and optionally file)
    InternalBuffer { file_path: Option<PathBuf> },
}

impl CopyResult {
    pub fn describe(&self) -> String {
        match self {
            CopyResult::SystemClipboard => "copied to clipboard".to_string(),
            CopyResult::InternalBuffer {
                file_path: Some(path),
            } => format!("clipboard unavailable, saved to {}", path.display()),
            CopyResult::InternalBuffer { file_path: None } => {
                "clipboard unavailable, kept in memory".to_string()
            }
        }
    }
}

/// Copy an export to the system clipboard. Without a display server the text
/// goes to an internal buffer and to ~/.skill-timeline/yank.txt.
pub fn copy_to_clipboard(text: &str) -> Result<CopyResult> {
    match Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(text) {
            Ok(()) => {
                store_in_buffer(text);
                return Ok(CopyResult::SystemClipboard);
            }
            Err(e) => tracing::debug!("System clipboard set_text failed: {}", e),
        },
        Err(e) => tracing::debug!("System clipboard unavailable: {}", e),
    }

    store_in_buffer(text);
    let file_path = save_to_yank_file(text);
    Ok(CopyResult::InternalBuffer { file_path })
}

pub fn get_from_internal_buffer() -> Option<String> {
    YANK_BUFFER.lock().ok().and_then(|b| b.clone())
}

fn store_in_buffer(text: &str) {
    if let Ok(mut buffer) = YANK_BUFFER.lock() {
        *buffer = Some(text.to_string());
    }
}

fn save_to_yank_file(text: &str) -> Option<PathBuf> {
    let path = crate::utils::paths::get_yank_file_path().ok()?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match std::fs::write(&path, text) {
        Ok(()) => {
            tracing::debug!("Saved yank to {}", path.display());
            Some(path)
        }
        Err(e) => {
            tracing::warn!("Failed to save yank file: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_copy_always_fills_internal_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let original_home = std::env::var("HOME").ok();
        unsafe { std::env::set_var("HOME", temp_dir.path()) };

        let result = copy_to_clipboard("Skills To Learn,,,Status");
        assert!(result.is_ok());
        assert_eq!(
            get_from_internal_buffer(),
            Some("Skills To Learn,,,Status".to_string())
        );

        if let Some(home) = original_home {
            unsafe { std::env::set_var("HOME", home) };
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(CopyResult::SystemClipboard.describe(), "copied to clipboard");
        let saved = CopyResult::InternalBuffer {
            file_path: Some(PathBuf::from("/tmp/yank.txt")),
        };
        assert!(saved.describe().ends_with("/tmp/yank.txt"));
    }
}
