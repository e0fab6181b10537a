//! Scheduler Port - cancellable one-shot timers
//!
//! Timers do not carry closures. When a timer elapses the adapter hands its
//! handle to the `TimerSink`, which feeds it back into the event loop. The
//! owning machine decides what the handle meant, and ignores handles it no
//! longer has armed.

/// Opaque identity of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Callback invoked with the handle of each elapsed timer
#[cfg(not(target_arch = "wasm32"))]
pub type TimerSink = std::sync::Arc<dyn Fn(TimerHandle) + Send + Sync>;

/// Callback invoked with the handle of each elapsed timer
#[cfg(target_arch = "wasm32")]
pub type TimerSink = std::rc::Rc<dyn Fn(TimerHandle)>;

pub trait SchedulerPort {
    /// Arm a timer that fires once after `delay_ms`.
    fn schedule(&self, delay_ms: u32) -> TimerHandle;

    /// Disarm a timer. Unknown or already fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}
