//! RPS Online Player - desktop probe
//!
//! There is no camera or page on desktop, so this binary runs the lobby
//! headless against a real server and logs every view update. Pass a display
//! name to log in, or `--room <id>` to sit in a room until it is left.
//!
//! The browser build starts from `rps_player_runner::web::start` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    desktop::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod desktop {
    use std::rc::Rc;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use rps_player_adapters::infrastructure::camera::UnsupportedCamera;
    use rps_player_adapters::infrastructure::platform::{
        DesktopStorageProvider, ThreadRandomProvider, TokioScheduler,
    };
    use rps_player_adapters::infrastructure::view::LogView;
    use rps_player_adapters::infrastructure::ConnectionFactory;
    use rps_player_app::application::machines::{LobbyAction, LobbyMachine, SessionMachine};
    use rps_player_ports::outbound::SchedulerPort;
    use rps_player_ports::ClientConfig;
    use rps_player_runner::{run, RunnerDeps};

    enum Page {
        Lobby { name: Option<String> },
        Room(String),
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Page {
        match args.next() {
            Some(flag) if flag == "--room" => match args.next() {
                Some(room_id) => Page::Room(room_id),
                None => Page::Lobby { name: None },
            },
            name => Page::Lobby { name },
        }
    }

    pub fn main() -> anyhow::Result<()> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    "rps_player=debug,rps_player_runner=debug,rps_player_app=debug,rps_player_adapters=info"
                        .into()
                }),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        let config = ClientConfig::from_env();
        tracing::info!(server = %config.server_url, "Starting RPS Online player probe");

        let deps = RunnerDeps {
            connection: ConnectionFactory::create_game_connection(&config.server_url),
            camera: Rc::new(UnsupportedCamera),
            storage: Rc::new(DesktopStorageProvider::new()),
            random: Rc::new(ThreadRandomProvider),
            view: Rc::new(LogView),
            scheduler: Box::new(|sink| -> Rc<dyn SchedulerPort> {
                Rc::new(TokioScheduler::new(sink))
            }),
            config,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let local = tokio::task::LocalSet::new();

        local.block_on(&runtime, async move {
            match parse_args(std::env::args().skip(1)) {
                Page::Lobby { name } => {
                    run(deps, LobbyMachine::new, move |sender| {
                        if let Some(name) = name {
                            sender.send_action(LobbyAction::SubmitLogin(name));
                        }
                    })
                    .await
                }
                Page::Room(room_id) => {
                    run(deps, move |ctx| SessionMachine::new(ctx, room_id), |_| ()).await
                }
            }
        });

        tracing::info!("Probe finished");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            assert!(matches!(parse_args(args(&[])), Page::Lobby { name: None }));
            assert!(
                matches!(parse_args(args(&["alice"])), Page::Lobby { name: Some(n) } if n == "alice")
            );
            assert!(matches!(parse_args(args(&["--room", "abc"])), Page::Room(r) if r == "abc"));
            assert!(matches!(parse_args(args(&["--room"])), Page::Lobby { name: None }));
        }
    }
}
