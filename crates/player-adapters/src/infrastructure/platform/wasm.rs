//! Browser platform providers

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use rps_player_ports::outbound::{SchedulerPort, StorageProvider, TimerHandle, TimerSink};

/// Storage backed by `window.localStorage`
///
/// Every call degrades to a no-op (or `None`) when storage is unavailable,
/// e.g. in private browsing modes that disable it.
#[derive(Clone, Default)]
pub struct LocalStorageProvider;

impl LocalStorageProvider {
    fn storage() -> Option<web_sys::Storage> {
        match web_sys::window()?.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(error = ?e, "localStorage unavailable");
                None
            }
        }
    }
}

impl StorageProvider for LocalStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(key, value) {
                tracing::error!(key, error = ?e, "Failed to write localStorage");
            }
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// One-shot timers on `setTimeout`
///
/// A fired timer only records its handle; the table entry is pruned on the
/// next `schedule`/`cancel`, never from inside the timeout callback.
#[derive(Clone)]
pub struct BrowserScheduler {
    sink: TimerSink,
    next: Rc<Cell<u64>>,
    timers: Rc<RefCell<HashMap<TimerHandle, Timeout>>>,
    fired: Rc<RefCell<Vec<TimerHandle>>>,
}

impl BrowserScheduler {
    pub fn new(sink: TimerSink) -> Self {
        Self {
            sink,
            next: Rc::new(Cell::new(1)),
            timers: Rc::new(RefCell::new(HashMap::new())),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn prune(&self) {
        let fired: Vec<TimerHandle> = self.fired.borrow_mut().drain(..).collect();
        let mut timers = self.timers.borrow_mut();
        for handle in fired {
            timers.remove(&handle);
        }
    }
}

impl SchedulerPort for BrowserScheduler {
    fn schedule(&self, delay_ms: u32) -> TimerHandle {
        self.prune();

        let handle = TimerHandle(self.next.get());
        self.next.set(handle.0 + 1);

        let sink = Rc::clone(&self.sink);
        let fired = Rc::clone(&self.fired);
        let timeout = Timeout::new(delay_ms, move || {
            fired.borrow_mut().push(handle);
            sink(handle);
        });

        self.timers.borrow_mut().insert(handle, timeout);
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.prune();
        // Dropping a pending Timeout clears it
        self.timers.borrow_mut().remove(&handle);
    }
}
