//! View Port - what the state machines ask the page to show
//!
//! The machines never touch the DOM. They emit `ViewUpdate`s, which the web
//! adapter applies to the page and the desktop adapter writes to the log.

use rps_domain::{Capture, RoomSummary};

pub trait ViewPort {
    fn render(&self, update: ViewUpdate);
}

/// One visible change to the page
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    // Lobby page
    ShowLogin,
    ShowLobby { display_name: String },
    RoomList(RoomListView),

    // Game page
    ShowWaiting,
    ShowPlayers { player: String, opponent: String },
    ShowReadySection,
    ShowCameraSection,
    /// `None` hides the overlay
    CountdownOverlay(Option<String>),
    Status(String),
    ShowResults(ResultsView),

    // Both
    Notice(Notice),
    Navigate(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Dismissible user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Page routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Lobby,
    Game(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Lobby => "/".to_string(),
            Route::Game(room_id) => format!("/game/{}", room_id),
        }
    }

    /// Resolve a location path. Anything that is not a game path is the lobby.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/').strip_prefix("/game/") {
            Some(room_id) if !room_id.is_empty() && !room_id.contains('/') => {
                Route::Game(room_id.to_string())
            }
            _ => Route::Lobby,
        }
    }
}

/// One room card in the lobby list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCardView {
    pub room_id: String,
    /// e.g. `1/2`
    pub occupancy: String,
    pub joinable: bool,
}

/// Rendered lobby room list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomListView {
    pub count_label: String,
    pub cards: Vec<RoomCardView>,
    /// Shown instead of cards when the list is empty
    pub placeholder: Option<String>,
}

impl RoomListView {
    pub fn from_rooms(rooms: &[RoomSummary]) -> Self {
        let count_label = match rooms.len() {
            1 => "1 room".to_string(),
            n => format!("{} rooms", n),
        };

        let cards: Vec<RoomCardView> = rooms
            .iter()
            .map(|room| RoomCardView {
                room_id: room.id.clone(),
                occupancy: room.occupancy_label(),
                joinable: !room.is_full(),
            })
            .collect();

        let placeholder = cards
            .is_empty()
            .then(|| "No rooms available. Create one to start playing!".to_string());

        Self {
            count_label,
            cards,
            placeholder,
        }
    }
}

/// How a participant's throw is pictured on the results screen
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantVisual {
    Image(Capture),
    /// Gesture glyph shown where no image exists
    Glyph(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantView {
    pub display_name: String,
    pub visual: ParticipantVisual,
    /// e.g. `✂️ Scissors` or `❓ Unknown`
    pub gesture_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub headline: String,
    pub participants: Vec<ParticipantView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_room_list_shows_placeholder() {
        let view = RoomListView::from_rooms(&[]);
        assert_eq!(view.count_label, "0 rooms");
        assert!(view.cards.is_empty());
        assert!(view.placeholder.is_some());
    }

    #[test]
    fn test_room_list_with_three_rooms() {
        let rooms = vec![
            RoomSummary::new("room_1", 1, 2),
            RoomSummary::new("room_2", 2, 2),
            RoomSummary::new("room_3", 0, 2),
        ];
        let view = RoomListView::from_rooms(&rooms);

        assert_eq!(view.count_label, "3 rooms");
        assert_eq!(view.placeholder, None);
        let joinable: Vec<_> = view.cards.iter().map(|c| c.joinable).collect();
        assert_eq!(joinable, [true, false, true]);
        assert_eq!(view.cards[0].occupancy, "1/2");
    }

    #[test]
    fn test_single_room_label() {
        let view = RoomListView::from_rooms(&[RoomSummary::new("room_1", 1, 2)]);
        assert_eq!(view.count_label, "1 room");
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Lobby.path(), "/");
        assert_eq!(Route::Game("room_4".into()).path(), "/game/room_4");
        assert_eq!(Route::from_path("/game/room_4"), Route::Game("room_4".into()));
        assert_eq!(Route::from_path("/game/room_4/"), Route::Game("room_4".into()));
        assert_eq!(Route::from_path("/game/"), Route::Lobby);
        assert_eq!(Route::from_path("/"), Route::Lobby);
        assert_eq!(Route::from_path("/about"), Route::Lobby);
    }
}
