//! Desktop platform providers

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use directories::ProjectDirs;
use tokio::task::AbortHandle;

use rps_player_ports::outbound::{SchedulerPort, StorageProvider, TimerHandle, TimerSink};

/// Desktop storage provider using a JSON file in the platform config directory
///
/// Storage location:
/// - Linux: ~/.config/rps-online/storage.json
/// - macOS: ~/Library/Application Support/io.rps-online.player/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\rps-online\player\config\storage.json
#[derive(Clone)]
pub struct DesktopStorageProvider {
    /// Path to the storage file
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for DesktopStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopStorageProvider {
    /// Create a storage provider at the platform config location
    pub fn new() -> Self {
        let storage_path = if let Some(dirs) = ProjectDirs::from("io", "rps-online", "player") {
            dirs.config_dir().join("storage.json")
        } else {
            PathBuf::from("rps_storage.json")
        };
        Self::at(storage_path)
    }

    /// Create a storage provider backed by a specific file
    ///
    /// Loads existing data from the file if it exists.
    pub fn at(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();

        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to parse storage file");
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read storage file");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!(path = ?storage_path, "Desktop storage initialized");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Persist the cache to disk
    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(error = %e, "Failed to create storage directory");
                return;
            }
        }

        let cache = match self.cache.read() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                return;
            }
        };

        match serde_json::to_string_pretty(&*cache) {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!(error = %e, "Failed to write storage file");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize storage data");
            }
        }
    }
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire write lock for storage");
            }
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                if guard.remove(key).is_none() {
                    return;
                }
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire write lock for storage");
            }
        }
    }
}

/// One-shot timers on the ambient tokio runtime.
///
/// Each timer is a task that sleeps and then hands its handle to the sink.
/// Cancelling aborts the task.
#[derive(Clone)]
pub struct TokioScheduler {
    sink: TimerSink,
    next: Arc<AtomicU64>,
    tasks: Arc<Mutex<HashMap<TimerHandle, AbortHandle>>>,
}

impl TokioScheduler {
    pub fn new(sink: TimerSink) -> Self {
        Self {
            sink,
            next: Arc::new(AtomicU64::new(1)),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Timers that have neither fired nor been cancelled
    pub fn armed(&self) -> usize {
        self.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl SchedulerPort for TokioScheduler {
    fn schedule(&self, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next.fetch_add(1, Ordering::SeqCst));
        let sink = Arc::clone(&self.sink);
        let tasks = Arc::clone(&self.tasks);

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
            if let Ok(mut tasks) = tasks.lock() {
                tasks.remove(&handle);
            }
            sink(handle);
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(handle, task.abort_handle());
            }
            Err(e) => tracing::error!(error = %e, "Timer table lock poisoned"),
        }
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let removed = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle),
            Err(e) => {
                tracing::error!(error = %e, "Timer table lock poisoned");
                None
            }
        };
        if let Some(task) = removed {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_player_ports::outbound::storage_keys;

    fn temp_store(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rps-storage-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_values_survive_reload() {
        let path = temp_store("reload");
        let storage = DesktopStorageProvider::at(&path);
        storage.save(storage_keys::USERNAME, "ana");

        let reopened = DesktopStorageProvider::at(&path);
        assert_eq!(reopened.load(storage_keys::USERNAME).as_deref(), Some("ana"));

        reopened.remove(storage_keys::USERNAME);
        assert!(DesktopStorageProvider::at(&path)
            .load(storage_keys::USERNAME)
            .is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_store("corrupt");
        fs::write(&path, "{not json").expect("write");
        let storage = DesktopStorageProvider::at(&path);
        assert!(storage.load(storage_keys::USERNAME).is_none());
        let _ = fs::remove_file(&path);
    }

    fn recording_sink() -> (TimerSink, Arc<Mutex<Vec<TimerHandle>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&fired);
        let sink: TimerSink = Arc::new(move |h| {
            if let Ok(mut f) = out.lock() {
                f.push(h);
            }
        });
        (sink, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (sink, fired) = recording_sink();
        let scheduler = TokioScheduler::new(sink);

        let handle = scheduler.schedule(500);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(fired.lock().expect("lock").is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().expect("lock"), vec![handle]);
        assert_eq!(scheduler.armed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (sink, fired) = recording_sink();
        let scheduler = TokioScheduler::new(sink);

        let handle = scheduler.schedule(100);
        let kept = scheduler.schedule(200);
        scheduler.cancel(handle);
        scheduler.cancel(TimerHandle(999));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*fired.lock().expect("lock"), vec![kept]);
    }
}
