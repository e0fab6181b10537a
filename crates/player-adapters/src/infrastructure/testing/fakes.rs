//! In-memory fakes for the camera, storage, timer, randomness and view ports

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;

use rps_domain::Capture;
use rps_player_ports::outbound::{
    CameraError, CameraPermission, CameraPort, Notice, RandomProvider, ResultsView, RoomListView,
    SchedulerPort, StorageProvider, TimerHandle, ViewPort, ViewUpdate,
};

/// Camera that "captures" a fixed tiny JPEG payload
pub struct FakeCamera {
    open: Cell<bool>,
    opens: Cell<usize>,
    failure: RefCell<Option<CameraError>>,
}

impl FakeCamera {
    pub const SNAPSHOT: &'static str = "RkFLRQ==";

    pub fn new() -> Self {
        Self {
            open: Cell::new(false),
            opens: Cell::new(0),
            failure: RefCell::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Number of `open()` calls, failed ones included
    pub fn opens(&self) -> usize {
        self.opens.get()
    }

    /// Make every later `open()` fail with `error`
    pub fn fail_open_with(&self, error: CameraError) {
        *self.failure.borrow_mut() = Some(error);
    }
}

impl Default for FakeCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl CameraPort for FakeCamera {
    async fn open(&self) -> Result<(), CameraError> {
        self.opens.set(self.opens.get() + 1);
        if let Some(err) = self.failure.borrow().clone() {
            return Err(err);
        }
        self.open.set(true);
        Ok(())
    }

    fn close(&self) {
        self.open.set(false);
    }

    fn capture(&self) -> Result<Capture, CameraError> {
        if !self.open.get() {
            return Err(CameraError::NotInitialized);
        }
        Ok(Capture::from_base64_jpeg(Self::SNAPSHOT))
    }

    fn is_active(&self) -> bool {
        self.open.get()
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn query_permission(&self) -> CameraPermission {
        if self.failure.borrow().as_ref() == Some(&CameraError::PermissionDenied) {
            CameraPermission::Denied
        } else {
            CameraPermission::Granted
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl StorageProvider for MemoryStorage {
    fn save(&self, key: &str, value: &str) {
        self.seed(key, value);
    }

    fn load(&self, key: &str) -> Option<String> {
        self.value(key)
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Scheduler whose timers only fire when the test says so
///
/// Timers fire in the order they were scheduled.
pub struct ManualScheduler {
    next: Cell<u64>,
    pending: RefCell<BTreeMap<TimerHandle, u32>>,
    cancelled: RefCell<Vec<TimerHandle>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self {
            next: Cell::new(1),
            pending: RefCell::new(BTreeMap::new()),
            cancelled: RefCell::new(Vec::new()),
        }
    }
}

impl ManualScheduler {
    /// Armed timers with their delays, oldest first
    pub fn pending(&self) -> Vec<(TimerHandle, u32)> {
        self.pending
            .borrow()
            .iter()
            .map(|(handle, delay)| (*handle, *delay))
            .collect()
    }

    /// Handles that were armed when cancelled
    pub fn cancelled(&self) -> Vec<TimerHandle> {
        self.cancelled.borrow().clone()
    }

    /// Disarm the oldest timer and return its handle, as if it elapsed
    pub fn fire_next(&self) -> Option<TimerHandle> {
        self.pending.borrow_mut().pop_first().map(|(handle, _)| handle)
    }
}

impl SchedulerPort for ManualScheduler {
    fn schedule(&self, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next.get());
        self.next.set(handle.0 + 1);
        self.pending.borrow_mut().insert(handle, delay_ms);
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        if self.pending.borrow_mut().remove(&handle).is_some() {
            self.cancelled.borrow_mut().push(handle);
        }
    }
}

/// Random source that replays scripted samples, then returns 0.0
#[derive(Default)]
pub struct ScriptedRandom {
    samples: RefCell<VecDeque<f64>>,
}

impl ScriptedRandom {
    pub fn push(&self, samples: &[f64]) {
        self.samples.borrow_mut().extend(samples.iter().copied());
    }
}

impl RandomProvider for ScriptedRandom {
    fn random_f64(&self) -> f64 {
        self.samples.borrow_mut().pop_front().unwrap_or(0.0)
    }
}

/// View that records every update
#[derive(Default)]
pub struct RecordingView {
    updates: RefCell<Vec<ViewUpdate>>,
}

impl RecordingView {
    pub fn updates(&self) -> Vec<ViewUpdate> {
        self.updates.borrow().clone()
    }

    pub fn last(&self) -> Option<ViewUpdate> {
        self.updates.borrow().last().cloned()
    }

    pub fn contains(&self, update: &ViewUpdate) -> bool {
        self.updates.borrow().contains(update)
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.updates.borrow().iter().rev().find_map(|u| match u {
            ViewUpdate::Notice(n) => Some(n.clone()),
            _ => None,
        })
    }

    pub fn last_room_list(&self) -> Option<RoomListView> {
        self.updates.borrow().iter().rev().find_map(|u| match u {
            ViewUpdate::RoomList(list) => Some(list.clone()),
            _ => None,
        })
    }

    pub fn last_results(&self) -> Option<ResultsView> {
        self.updates.borrow().iter().rev().find_map(|u| match u {
            ViewUpdate::ShowResults(results) => Some(results.clone()),
            _ => None,
        })
    }
}

impl ViewPort for RecordingView {
    fn render(&self, update: ViewUpdate) {
        self.updates.borrow_mut().push(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_camera_lifecycle() {
        let camera = FakeCamera::new();
        assert_eq!(camera.capture(), Err(CameraError::NotInitialized));

        camera.open().await.expect("open");
        assert!(camera.is_active());
        assert!(camera.capture().is_ok());

        camera.close();
        camera.close();
        assert!(!camera.is_active());
        assert_eq!(camera.opens(), 1);
    }

    #[test]
    fn test_manual_scheduler_fires_in_schedule_order() {
        let scheduler = ManualScheduler::default();
        let first = scheduler.schedule(1000);
        let second = scheduler.schedule(10);
        let third = scheduler.schedule(500);
        scheduler.cancel(second);
        scheduler.cancel(second);

        assert_eq!(scheduler.cancelled(), vec![second]);
        assert_eq!(scheduler.fire_next(), Some(first));
        assert_eq!(scheduler.fire_next(), Some(third));
        assert_eq!(scheduler.fire_next(), None);
    }

    #[test]
    fn test_scripted_random_falls_back_to_zero() {
        let random = ScriptedRandom::default();
        random.push(&[0.7]);
        assert_eq!(random.random_f64(), 0.7);
        assert_eq!(random.random_f64(), 0.0);
    }
}
