//! Settings file change watcher.
//!
//! Other programs (a ground-station sync script, a hand edit over ssh)
//! may rewrite the settings file while the panel runs. A small poll
//! thread fingerprints the file and posts a change event whenever the
//! fingerprint moves; the model answers by reloading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use crate::events::ModelEvent;
use crate::queue::EventQueue;

/// How often the settings file is checked.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Modification time plus length. Either moving means the file changed;
/// a file that does not exist fingerprints as `None`.
fn fingerprint(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    Some((modified, meta.len()))
}

/// Watch `path` for the life of the process, posting
/// [`ModelEvent::SettingsFileChanged`] on every observed change
/// (including the file appearing or vanishing).
pub fn spawn_watcher(path: PathBuf, queue: Arc<EventQueue>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut last = fingerprint(&path);
        loop {
            std::thread::sleep(POLL_INTERVAL);
            let current = fingerprint(&path);
            if current != last {
                log::debug!("settings file {} changed on disk", path.display());
                last = current;
                queue.post(ModelEvent::SettingsFileChanged);
            }
        }
    })
}
