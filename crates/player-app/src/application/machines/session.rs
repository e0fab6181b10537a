//! Session View-State Machine
//!
//! Drives the game page from entering a room to the results screen and back:
//!
//! ```text
//! Waiting -> Ready -> PreparingCamera -> Countdown -> Capturing -> Processing -> Results
//!              ^                                                                  |
//!              +--------------------------- play again ---------------------------+
//! ```
//!
//! plus `Left` from anywhere. The room kind is fixed on construction and
//! selects who adjudicates rounds: human rooms trust the server's verdict,
//! automated rooms pace the countdown with local timers and decide locally.

use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use rps_domain::{DecisionAuthority, Gesture, GestureLabel, RoomKind};
use rps_player_ports::inbound::{CountdownTick, PlayerEvent, RoundResults};
use rps_player_ports::outbound::{
    AutomatedRoomMarker, ConnectionState, Notice, ParticipantView, ParticipantVisual,
    ResultsView, Route, TimerHandle, ViewUpdate,
};

use crate::application::context::{LinkChange, SessionContext};
use crate::application::error::ClientError;
use crate::application::services::{AppEvent, PageMachine};

/// Interval between status updates while the local capture window is open
const CAPTURE_STATUS_INTERVAL_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Waiting,
    Ready,
    PreparingCamera,
    Countdown,
    Capturing,
    Processing,
    Results,
    Left,
}

impl SessionPhase {
    /// Phases a round is in flight (or just finished)
    fn in_round(self) -> bool {
        matches!(
            self,
            SessionPhase::Countdown
                | SessionPhase::Capturing
                | SessionPhase::Processing
                | SessionPhase::Results
        )
    }
}

/// User actions available on the game page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Ready,
    PlayAgain,
    Leave,
}

/// What an armed timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTask {
    JoinRoom,
    AutomatedReady,
    Tick(CountdownTick),
    HideOverlay,
    CaptureWindow { remaining: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Players {
    pub player: String,
    pub opponent: String,
}

pub struct SessionMachine {
    ctx: SessionContext,
    room_id: String,
    kind: RoomKind,
    authority: DecisionAuthority,
    phase: SessionPhase,
    local_player_id: Option<String>,
    marker: Option<AutomatedRoomMarker>,
    players: Option<Players>,
    armed: HashMap<TimerHandle, TimerTask>,
    entered: bool,
}

impl SessionMachine {
    /// Build the machine for `room_id`. The room is automated iff the stored
    /// marker names this room.
    pub fn new(ctx: SessionContext, room_id: impl Into<String>) -> Self {
        let room_id = room_id.into();
        let marker = AutomatedRoomMarker::load_for_room(ctx.storage.as_ref(), &room_id);
        let kind = if marker.is_some() {
            RoomKind::Automated
        } else {
            RoomKind::Human
        };
        tracing::info!(room_id = %room_id, ?kind, "Session created");

        Self {
            ctx,
            room_id,
            kind,
            authority: kind.authority(),
            phase: SessionPhase::Waiting,
            local_player_id: None,
            marker,
            players: None,
            armed: HashMap::new(),
            entered: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn local_player_id(&self) -> Option<&str> {
        self.local_player_id.as_deref()
    }

    pub fn players(&self) -> Option<&Players> {
        self.players.as_ref()
    }

    fn is_automated(&self) -> bool {
        self.kind == RoomKind::Automated
    }

    fn set_phase(&mut self, next: SessionPhase) {
        if self.phase != next {
            tracing::debug!(from = ?self.phase, to = ?next, "Session phase");
            self.phase = next;
        }
    }

    fn status(&self, text: impl Into<String>) {
        self.ctx.render(ViewUpdate::Status(text.into()));
    }

    // =========================================================================
    // Timers
    // =========================================================================

    fn arm(&mut self, task: TimerTask, delay_ms: u32) {
        let handle = self.ctx.scheduler.schedule(delay_ms);
        self.armed.insert(handle, task);
    }

    fn cancel_timers(&mut self) {
        for (handle, _) in self.armed.drain() {
            self.ctx.scheduler.cancel(handle);
        }
    }

    fn on_timer(&mut self, handle: TimerHandle) {
        let Some(task) = self.armed.remove(&handle) else {
            tracing::debug!(?handle, "Ignoring stale timer");
            return;
        };

        match task {
            TimerTask::JoinRoom => {
                let room_id = self.room_id.clone();
                if let Err(e) = self.ctx.connection.request_join_room(&room_id) {
                    tracing::error!(error = %e, "Failed to send join_room_request");
                    self.ctx.report(&ClientError::TransportDisconnected);
                }
            }
            TimerTask::AutomatedReady if self.phase == SessionPhase::Waiting => {
                if let Some(marker) = self.marker.clone() {
                    self.enter_ready(marker.display_name, marker.opponent_name);
                }
            }
            TimerTask::Tick(tick) if self.phase == SessionPhase::Countdown => {
                self.apply_tick(tick);
                if let CountdownTick::Number(n) = tick {
                    let next = if n > 1 {
                        CountdownTick::Number(n - 1)
                    } else {
                        CountdownTick::Go
                    };
                    self.arm(TimerTask::Tick(next), self.ctx.config.pacing.tick_interval_ms);
                }
            }
            TimerTask::HideOverlay => {
                self.ctx.render(ViewUpdate::CountdownOverlay(None));
                if self.is_automated() && self.phase == SessionPhase::Capturing {
                    self.capture_window(self.ctx.config.pacing.capture_window_secs);
                }
            }
            TimerTask::CaptureWindow { remaining } if self.phase == SessionPhase::Capturing => {
                self.capture_window(remaining);
            }
            task => {
                tracing::debug!(?task, phase = ?self.phase, "Timer no longer applies");
            }
        }
    }

    // =========================================================================
    // Connection
    // =========================================================================

    fn on_connection(&mut self, state: ConnectionState) {
        match self.ctx.observe_connection(state) {
            LinkChange::Established | LinkChange::Restored => self.enter_room(),
            LinkChange::Lost if self.phase != SessionPhase::Left => {
                self.ctx.render(ViewUpdate::Notice(Notice::warning(
                    "Connection lost, reconnecting...",
                )));
            }
            _ => {}
        }
    }

    /// Runs on every (re)connect.
    fn enter_room(&mut self) {
        if self.phase == SessionPhase::Left {
            return;
        }

        if self.is_automated() {
            if !self.entered {
                self.entered = true;
                self.arm(TimerTask::AutomatedReady, self.ctx.config.pacing.entry_delay_ms);
            }
            return;
        }

        let Some(name) = self.ctx.users.stored_display_name() else {
            tracing::warn!("No stored display name, returning to lobby");
            self.ctx.render(ViewUpdate::Notice(Notice::warning(
                "Choose a display name in the lobby first",
            )));
            self.leave();
            return;
        };

        // The server keys players by socket, so identity is re-sent on every reconnect.
        if let Err(e) = self.ctx.connection.join_lobby(name.as_str()) {
            tracing::error!(error = %e, "Failed to send join_lobby");
        }

        // Room membership is lost with the socket too.
        let join_pending = self
            .armed
            .values()
            .any(|task| matches!(task, TimerTask::JoinRoom));
        if !join_pending {
            self.arm(TimerTask::JoinRoom, self.ctx.config.pacing.entry_delay_ms);
        }
    }

    // =========================================================================
    // Server events
    // =========================================================================

    fn on_server(&mut self, event: PlayerEvent) {
        if self.phase == SessionPhase::Left {
            tracing::debug!(event = event.kind(), "Session left, ignoring event");
            return;
        }

        match event {
            PlayerEvent::LobbyJoined {
                participant_id,
                display_name,
                ..
            } => {
                tracing::debug!(participant_id = %participant_id, "Identity confirmed");
                self.local_player_id = Some(participant_id);
                if let Ok(name) = rps_domain::DisplayName::new(display_name) {
                    self.ctx.confirm_identity(name);
                }
            }

            PlayerEvent::RoomFull { participants }
                if !self.is_automated()
                    && matches!(self.phase, SessionPhase::Waiting | SessionPhase::Ready) =>
            {
                if participants.len() < 2 {
                    tracing::warn!(count = participants.len(), "room_full without two players");
                    return;
                }
                let (player, opponent) = self.seat(&participants);
                self.enter_ready(player, opponent);
            }

            PlayerEvent::AutomatedRoomReady {
                display_name,
                opponent_name,
            } if self.is_automated() && self.phase == SessionPhase::Waiting => {
                self.enter_ready(display_name, opponent_name);
            }

            PlayerEvent::JoinFailed { reason } if !self.is_automated() => {
                self.ctx.report(&ClientError::JoinRejected(reason));
            }

            PlayerEvent::OpponentLeft { display_name } => {
                tracing::info!(name = %display_name, "Opponent left");
                self.ctx.render(ViewUpdate::Notice(Notice::info(format!(
                    "{} left the room",
                    display_name
                ))));
                self.leave();
            }

            PlayerEvent::CountdownTick(tick)
                if !self.is_automated() && self.phase == SessionPhase::Countdown =>
            {
                self.apply_tick(tick);
            }

            PlayerEvent::CaptureNow
                if !self.is_automated() && self.phase == SessionPhase::Capturing =>
            {
                self.capture_and_submit();
            }

            PlayerEvent::RoundResults(results)
                if self.authority == DecisionAuthority::Remote
                    && matches!(self.phase, SessionPhase::Capturing | SessionPhase::Processing) =>
            {
                self.show_server_results(results);
            }

            PlayerEvent::RoundReset { .. } if !self.is_automated() && self.phase.in_round() => {
                self.reset_round();
            }

            other => {
                tracing::debug!(
                    event = other.kind(),
                    phase = ?self.phase,
                    "Event not handled in phase"
                );
            }
        }
    }

    /// Order participants as (local player, opponent).
    fn seat(&self, participants: &[String]) -> (String, String) {
        let me = self.ctx.identity().map(|n| n.as_str().to_string());
        match me {
            Some(me) if participants.contains(&me) => {
                let opponent = participants
                    .iter()
                    .find(|p| **p != me)
                    .cloned()
                    .unwrap_or_else(|| me.clone());
                (me, opponent)
            }
            _ => (participants[0].clone(), participants[1].clone()),
        }
    }

    fn enter_ready(&mut self, player: String, opponent: String) {
        self.ctx.render(ViewUpdate::ShowPlayers {
            player: player.clone(),
            opponent: opponent.clone(),
        });
        self.players = Some(Players { player, opponent });
        self.set_phase(SessionPhase::Ready);
        self.ctx.render(ViewUpdate::ShowReadySection);
        if self.is_automated() {
            self.status("🤖 Game vs AI. Press Ready when you are!");
        } else {
            self.status("Both players are here. Press Ready when you are!");
        }
    }

    fn apply_tick(&mut self, tick: CountdownTick) {
        self.ctx
            .render(ViewUpdate::CountdownOverlay(Some(tick.label())));

        match tick {
            CountdownTick::Number(n) => self.status(format!("Countdown: {}", n)),
            CountdownTick::Go => {
                self.set_phase(SessionPhase::Capturing);
                self.status("Show your gesture now!");
                self.arm(TimerTask::HideOverlay, self.ctx.config.pacing.go_hold_ms);
            }
        }
    }

    fn capture_and_submit(&mut self) {
        let capture = match self.ctx.camera.capture() {
            Ok(capture) => capture,
            Err(e) => {
                self.ctx.report(&e.into());
                return;
            }
        };

        if let Err(e) = self.ctx.connection.submit_capture(capture) {
            tracing::error!(error = %e, "Failed to send gesture_capture");
            self.ctx.report(&ClientError::TransportDisconnected);
            return;
        }

        self.set_phase(SessionPhase::Processing);
        self.status("Analyzing gesture...");
    }

    fn show_server_results(&mut self, results: RoundResults) {
        if results.participants.len() < 2 {
            tracing::warn!(
                count = results.participants.len(),
                "round results without two participants"
            );
            return;
        }

        let participants = results
            .participants
            .into_iter()
            .map(|p| ParticipantView {
                visual: match p.capture {
                    Some(capture) => ParticipantVisual::Image(capture),
                    None => ParticipantVisual::Glyph(p.gesture.glyph().to_string()),
                },
                gesture_label: p.gesture.to_string(),
                display_name: p.display_name,
            })
            .collect();

        self.finish_round(results.summary, participants);
    }

    fn finish_round(&mut self, headline: String, participants: Vec<ParticipantView>) {
        self.set_phase(SessionPhase::Results);
        self.ctx.render(ViewUpdate::CountdownOverlay(None));
        self.status(headline.clone());
        self.ctx.render(ViewUpdate::ShowResults(ResultsView {
            headline,
            participants,
        }));
    }

    // =========================================================================
    // Local adjudication (automated rooms)
    // =========================================================================

    fn capture_window(&mut self, remaining: u32) {
        if remaining == 0 {
            self.resolve_locally();
            return;
        }
        self.status(format!("Show your gesture! ({}s)", remaining));
        self.arm(
            TimerTask::CaptureWindow {
                remaining: remaining - 1,
            },
            CAPTURE_STATUS_INTERVAL_MS,
        );
    }

    fn resolve_locally(&mut self) {
        let capture = match self.ctx.camera.capture() {
            Ok(capture) => capture,
            Err(e) => {
                self.ctx.report(&e.into());
                return;
            }
        };

        self.set_phase(SessionPhase::Processing);
        self.status("Processing result...");

        let opponent = Gesture::from_uniform(self.ctx.random.random_f64());
        let player = Gesture::guess_from_sample(self.ctx.random.random_f64());
        let Some(outcome) = self.authority.adjudicate(player, opponent) else {
            tracing::error!("Local resolution attempted under remote authority");
            return;
        };
        tracing::info!(?player, ?opponent, ?outcome, "Round decided locally");

        let players = self.players.clone().unwrap_or_else(|| Players {
            player: String::new(),
            opponent: String::new(),
        });

        let participants = vec![
            ParticipantView {
                display_name: players.player,
                visual: ParticipantVisual::Image(capture),
                gesture_label: GestureLabel::from(player).to_string(),
            },
            ParticipantView {
                display_name: players.opponent.clone(),
                visual: ParticipantVisual::Glyph(opponent.glyph().to_string()),
                gesture_label: GestureLabel::from(opponent).to_string(),
            },
        ];

        self.finish_round(outcome.headline(&players.opponent), participants);
    }

    // =========================================================================
    // User actions
    // =========================================================================

    async fn on_action(&mut self, action: SessionAction) {
        match action {
            SessionAction::Ready if self.phase == SessionPhase::Ready => self.get_ready().await,
            SessionAction::PlayAgain => self.play_again(),
            SessionAction::Leave if self.phase != SessionPhase::Left => {
                tracing::info!("Leaving room");
                self.leave();
            }
            action => {
                tracing::debug!(?action, phase = ?self.phase, "Action not available in phase");
            }
        }
    }

    async fn get_ready(&mut self) {
        if !self.is_automated() {
            if let Err(e) = self.ctx.require_connection() {
                self.ctx.report(&e);
                return;
            }
        }

        self.set_phase(SessionPhase::PreparingCamera);
        self.status("Starting camera...");

        let camera = Rc::clone(&self.ctx.camera);
        if let Err(e) = camera.open().await {
            tracing::warn!(error = %e, "Camera failed to open");
            self.set_phase(SessionPhase::Ready);
            self.ctx.report(&e.into());
            return;
        }

        if !self.is_automated() {
            if let Err(e) = self.ctx.connection.player_ready() {
                tracing::error!(error = %e, "Failed to send player_ready");
                camera.close();
                self.set_phase(SessionPhase::Ready);
                self.ctx.report(&ClientError::TransportDisconnected);
                return;
            }
        }

        self.set_phase(SessionPhase::Countdown);
        self.ctx.render(ViewUpdate::ShowCameraSection);

        if self.is_automated() {
            self.status("🤖 Get ready...");
            let first = match self.ctx.config.pacing.countdown_from {
                0 => CountdownTick::Go,
                n => CountdownTick::Number(n),
            };
            self.arm(
                TimerTask::Tick(first),
                self.ctx.config.pacing.countdown_start_delay_ms,
            );
        } else {
            self.status("Waiting for both players to be ready...");
        }
    }

    fn play_again(&mut self) {
        if self.is_automated() {
            if !self.phase.in_round() {
                tracing::debug!(phase = ?self.phase, "Nothing to restart");
                return;
            }
            self.reset_round();
            if self.ctx.is_connected() {
                if let Err(e) = self.ctx.connection.play_again() {
                    tracing::debug!(error = %e, "play_again not delivered");
                }
            }
            return;
        }

        if self.phase != SessionPhase::Results {
            tracing::debug!(phase = ?self.phase, "Play again only from results");
            return;
        }
        match self.ctx.connection.play_again() {
            Ok(()) => self.status("Waiting for the other player..."),
            Err(e) => {
                tracing::error!(error = %e, "Failed to send play_again");
                self.ctx.report(&ClientError::TransportDisconnected);
            }
        }
    }

    fn reset_round(&mut self) {
        self.cancel_timers();
        self.ctx.camera.close();
        self.set_phase(SessionPhase::Ready);
        self.ctx.render(ViewUpdate::CountdownOverlay(None));
        self.ctx.render(ViewUpdate::ShowReadySection);
        if self.is_automated() {
            self.status("🤖 New round vs AI. Get ready!");
        } else {
            self.status("New round. Press Ready when you are!");
        }
    }

    fn leave(&mut self) {
        self.cancel_timers();
        AutomatedRoomMarker::clear(self.ctx.storage.as_ref());
        self.ctx.teardown();
        self.set_phase(SessionPhase::Left);
        self.ctx.render(ViewUpdate::Navigate(Route::Lobby));
    }
}

#[async_trait(?Send)]
impl PageMachine for SessionMachine {
    type Action = SessionAction;

    fn start(&mut self) {
        self.ctx.render(ViewUpdate::ShowWaiting);
        if self.is_automated() {
            self.status("🤖 Preparing game vs AI...");
        } else {
            self.status("Waiting for an opponent...");
        }
    }

    async fn handle(&mut self, event: AppEvent<SessionAction>) {
        match event {
            AppEvent::Connection(state) => self.on_connection(state),
            AppEvent::Server(event) => self.on_server(event),
            AppEvent::User(action) => self.on_action(action).await,
            AppEvent::TimerFired(handle) => self.on_timer(handle),
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Left
    }
}
