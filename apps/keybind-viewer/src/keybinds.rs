//! Keybind data model and the startup loader.

use crate::provider::{KeybindProvider, ProviderError, RawKeybindFile};
use feruca::Collator;
use std::cmp::Ordering;
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// An action name paired with the key combination that triggers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: String,
    pub binding: String,
}

impl Keybind {
    pub fn new(key: impl Into<String>, binding: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            binding: binding.into(),
        }
    }
}

/// A named group of keybinds, shown as one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindFile {
    pub name: String,
    pub keybinds: Vec<Keybind>,
}

impl KeybindFile {
    pub fn new(name: impl Into<String>, keybinds: Vec<Keybind>) -> Self {
        Self {
            name: name.into(),
            keybinds,
        }
    }
}

impl From<RawKeybindFile> for KeybindFile {
    fn from((name, pairs): RawKeybindFile) -> Self {
        let keybinds = pairs
            .into_iter()
            .map(|(key, binding)| Keybind { key, binding })
            .collect();
        Self { name, keybinds }
    }
}

/// Locale-aware name ordering (Unicode Collation Algorithm, CLDR root).
///
/// Accents and case only break ties, so `Éditor` sorts next to `editor`
/// and lowercase comes before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

/// Sort files into tab order.
pub fn sort_files(files: &mut [KeybindFile]) {
    let mut collator = Collator::default();
    files.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
}

/// Ask the provider for every file once and normalize into tab order.
pub fn load_files(provider: &dyn KeybindProvider) -> Result<Vec<KeybindFile>, ProviderError> {
    let mut files: Vec<KeybindFile> = provider
        .keybind_files()?
        .into_iter()
        .map(KeybindFile::from)
        .collect();
    sort_files(&mut files);
    Ok(files)
}

/// Load on a background thread so the first frame renders immediately.
///
/// A failed load is logged and published as an empty collection.
pub fn spawn_loader<P>(provider: P) -> Receiver<Vec<KeybindFile>>
where
    P: KeybindProvider + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let files = match load_files(&provider) {
            Ok(files) => {
                tracing::info!(count = files.len(), "loaded keybind files");
                files
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load keybind files");
                Vec::new()
            }
        };
        // The receiver is gone only if the UI already exited.
        let _ = tx.send(files);
    });
    rx
}
