//! RPS Online Player Runner - composition root
//!
//! Builds one page's ports, wires them to the page's event channel and runs
//! the page machine. The browser entry point lives here too; the desktop
//! binary is in `main.rs`.

use std::rc::Rc;

use rps_player_app::application::services::{channel, run_page, EventSender, PageMachine};
use rps_player_app::application::{PortSet, SessionContext};
use rps_player_ports::outbound::{
    CameraPort, GameConnectionPort, RandomProvider, SchedulerPort, StorageProvider, TimerSink,
    ViewPort,
};
use rps_player_ports::ClientConfig;

/// Builds the scheduler once the page's timer sink exists
pub type SchedulerFactory = Box<dyn FnOnce(TimerSink) -> Rc<dyn SchedulerPort>>;

/// Platform adapters for one page
pub struct RunnerDeps {
    pub connection: Rc<dyn GameConnectionPort>,
    pub camera: Rc<dyn CameraPort>,
    pub storage: Rc<dyn StorageProvider>,
    pub random: Rc<dyn RandomProvider>,
    pub view: Rc<dyn ViewPort>,
    pub scheduler: SchedulerFactory,
    pub config: ClientConfig,
}

/// Run one page until its machine finishes or its channel closes.
///
/// `attach` receives a sender for local input (DOM listeners, a CLI) and
/// whatever it returns stays alive for as long as the page runs.
pub async fn run<M, B>(
    deps: RunnerDeps,
    make_machine: impl FnOnce(SessionContext) -> M,
    attach: impl FnOnce(EventSender<M::Action>) -> B,
) where
    M: PageMachine,
    M::Action: Send + 'static,
{
    let RunnerDeps {
        connection,
        camera,
        storage,
        random,
        view,
        scheduler,
        config,
    } = deps;

    let (sender, events) = channel::<M::Action>();
    sender.wire_connection(connection.as_ref());
    let scheduler = scheduler(sender.timer_sink());

    let machine = make_machine(SessionContext::new(
        PortSet {
            connection: Rc::clone(&connection),
            camera,
            storage,
            scheduler,
            random,
            view,
        },
        config,
    ));

    let _attached = attach(sender);

    tracing::info!(url = connection.url(), "Connecting to game server");
    if let Err(e) = connection.connect() {
        tracing::error!(error = %e, "Failed to start connection");
    }

    run_page(machine, events).await;
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use rps_player_adapters::infrastructure::camera::WebCamera;
    use rps_player_adapters::infrastructure::platform::{
        BrowserScheduler, LocalStorageProvider, ThreadRandomProvider,
    };
    use rps_player_adapters::infrastructure::view::{bind_controls, DomView};
    use rps_player_adapters::infrastructure::ConnectionFactory;
    use rps_player_app::application::machines::{
        LobbyMachine, SessionMachine, LOBBY_BINDINGS, SESSION_BINDINGS,
    };
    use rps_player_ports::outbound::{Route, SchedulerPort};
    use rps_player_ports::ClientConfig;

    use super::{run, RunnerDeps};

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_default();
        let href = location.href().unwrap_or_default();

        let mut config = ClientConfig::default();
        match ConnectionFactory::server_url_for_page(&href) {
            Some(url) => config.server_url = url,
            None => tracing::warn!(href = %href, "Cannot derive server URL, using default"),
        }

        let Some(view) = DomView::new() else {
            tracing::error!("No document to render into");
            return;
        };

        let route = Route::from_path(&path);
        tracing::info!(?route, server = %config.server_url, "Starting RPS Online player");
        if matches!(route, Route::Game(_)) && !WebCamera::browser_supports_capture() {
            tracing::warn!("This browser cannot capture from a camera");
        }

        let deps = RunnerDeps {
            connection: ConnectionFactory::create_game_connection(&config.server_url),
            camera: Rc::new(WebCamera::new(config.camera.clone())),
            storage: Rc::new(LocalStorageProvider),
            random: Rc::new(ThreadRandomProvider),
            view: Rc::new(view),
            scheduler: Box::new(|sink| -> Rc<dyn SchedulerPort> {
                Rc::new(BrowserScheduler::new(sink))
            }),
            config,
        };

        match route {
            Route::Lobby => wasm_bindgen_futures::spawn_local(run(deps, LobbyMachine::new, |s| {
                bind_controls(LOBBY_BINDINGS, s)
            })),
            Route::Game(room_id) => wasm_bindgen_futures::spawn_local(run(
                deps,
                move |ctx| SessionMachine::new(ctx, room_id),
                |s| bind_controls(SESSION_BINDINGS, s),
            )),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    use rps_player_adapters::infrastructure::testing::{
        FakeCamera, ManualScheduler, MemoryStorage, RecordingConnection, RecordingView,
        ScriptedRandom,
    };
    use rps_player_app::application::machines::{SessionAction, SessionMachine};
    use rps_player_ports::outbound::{Route, ViewUpdate};

    #[tokio::test]
    async fn test_run_connects_and_stops_when_page_is_left() {
        let connection = Rc::new(RecordingConnection::new("ws://test/ws"));
        let view = Rc::new(RecordingView::default());

        let deps = RunnerDeps {
            connection: connection.clone(),
            camera: Rc::new(FakeCamera::new()),
            storage: Rc::new(MemoryStorage::default()),
            random: Rc::new(ScriptedRandom::default()),
            view: view.clone(),
            scheduler: Box::new(|_sink| -> Rc<dyn SchedulerPort> {
                Rc::new(ManualScheduler::default())
            }),
            config: ClientConfig::default(),
        };

        run(
            deps,
            |ctx| SessionMachine::new(ctx, "room-1"),
            |sender| sender.send_action(SessionAction::Leave),
        )
        .await;

        assert_eq!(connection.connects(), 1);
        assert_eq!(view.updates().first(), Some(&ViewUpdate::ShowWaiting));
        assert!(view.contains(&ViewUpdate::Navigate(Route::Lobby)));
    }
}
