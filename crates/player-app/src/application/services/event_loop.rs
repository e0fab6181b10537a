//! Page event loop
//!
//! Connection callbacks, DOM listeners and timers only push `AppEvent`s into
//! one unbounded channel. `run_page` pops them in arrival order and hands each
//! to the page's machine, awaiting it before taking the next, so a machine
//! never sees two events at once.

use async_trait::async_trait;
use futures_channel::mpsc;
use futures_util::StreamExt;

use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::{ConnectionState, GameConnectionPort, TimerHandle, TimerSink};

/// Everything a page machine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent<A> {
    /// Connection state changed
    Connection(ConnectionState),
    /// Server event received, already translated by the adapters layer
    Server(PlayerEvent),
    /// Local user action from the page's binding table
    User(A),
    /// A scheduled timer elapsed
    TimerFired(TimerHandle),
}

/// A page controller driven by `run_page`
#[async_trait(?Send)]
pub trait PageMachine {
    type Action: std::fmt::Debug;

    /// Called once before the first event
    fn start(&mut self);

    async fn handle(&mut self, event: AppEvent<Self::Action>);

    /// The loop stops once this returns true
    fn is_finished(&self) -> bool {
        false
    }
}

/// Sending half of a page's event channel
pub struct EventSender<A> {
    tx: mpsc::UnboundedSender<AppEvent<A>>,
}

impl<A> Clone for EventSender<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Create a page event channel
pub fn channel<A>() -> (EventSender<A>, mpsc::UnboundedReceiver<AppEvent<A>>) {
    let (tx, rx) = mpsc::unbounded::<AppEvent<A>>();
    (EventSender { tx }, rx)
}

impl<A: Send + 'static> EventSender<A> {
    pub fn send(&self, event: AppEvent<A>) {
        if self.tx.unbounded_send(event).is_err() {
            tracing::debug!("Event loop has stopped, dropping event");
        }
    }

    pub fn send_action(&self, action: A) {
        self.send(AppEvent::User(action));
    }

    /// Forward connection state changes and server events into the loop.
    pub fn wire_connection(&self, connection: &dyn GameConnectionPort) {
        {
            let tx = self.tx.clone();
            connection.on_state_change(Box::new(move |state| {
                let _ = tx.unbounded_send(AppEvent::Connection(state));
            }));
        }

        {
            let tx = self.tx.clone();
            connection.on_event(Box::new(move |event| {
                let _ = tx.unbounded_send(AppEvent::Server(event));
            }));
        }
    }

    /// Sink that turns elapsed timers into `TimerFired` events
    pub fn timer_sink(&self) -> TimerSink {
        let tx = self.tx.clone();
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::sync::Arc::new(move |handle| {
                let _ = tx.unbounded_send(AppEvent::TimerFired(handle));
            })
        }
        #[cfg(target_arch = "wasm32")]
        {
            std::rc::Rc::new(move |handle| {
                let _ = tx.unbounded_send(AppEvent::TimerFired(handle));
            })
        }
    }
}

/// Run a page machine until its channel closes or it reports finished.
pub async fn run_page<M: PageMachine>(
    mut machine: M,
    mut events: mpsc::UnboundedReceiver<AppEvent<M::Action>>,
) {
    machine.start();

    while let Some(event) = events.next().await {
        machine.handle(event).await;
        if machine.is_finished() {
            tracing::info!("Page machine finished");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Step {
        Started,
        Handled(AppEvent<u8>),
    }

    /// Finishes after its third event
    #[derive(Default)]
    struct Counter {
        log: Rc<RefCell<Vec<Step>>>,
        handled: usize,
    }

    #[async_trait(?Send)]
    impl PageMachine for Counter {
        type Action = u8;

        fn start(&mut self) {
            self.log.borrow_mut().push(Step::Started);
        }

        async fn handle(&mut self, event: AppEvent<u8>) {
            self.handled += 1;
            self.log.borrow_mut().push(Step::Handled(event));
        }

        fn is_finished(&self) -> bool {
            self.handled == 3
        }
    }

    #[tokio::test]
    async fn test_events_processed_in_arrival_order() {
        let (tx, rx) = channel::<u8>();
        tx.send_action(1);
        tx.send(AppEvent::TimerFired(TimerHandle(7)));
        tx.send_action(2);
        tx.send_action(3);
        tx.send_action(4);
        drop(tx);

        let machine = Counter::default();
        let log = Rc::clone(&machine.log);
        run_page(machine, rx).await;

        assert_eq!(
            *log.borrow(),
            vec![
                Step::Started,
                Step::Handled(AppEvent::User(1)),
                Step::Handled(AppEvent::TimerFired(TimerHandle(7))),
                Step::Handled(AppEvent::User(2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_page_stops_when_channel_closes() {
        let (tx, rx) = channel::<u8>();
        tx.send_action(9);
        drop(tx);

        run_page(Counter::default(), rx).await;
    }

    #[test]
    fn test_timer_sink_feeds_the_channel() {
        let (tx, mut rx) = channel::<u8>();
        let sink = tx.timer_sink();
        sink(TimerHandle(4));

        assert_eq!(
            rx.try_next().ok().flatten(),
            Some(AppEvent::TimerFired(TimerHandle(4)))
        );
    }
}
