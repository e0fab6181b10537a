//! ViewPort that applies updates to the lobby and game pages
//!
//! Sections are shown and hidden with Bootstrap's `d-none` class. Element ids
//! are the ones the page templates use; a missing element is skipped so the
//! same view serves both pages.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use rps_player_ports::outbound::{
    Notice, ParticipantView, ParticipantVisual, ResultsView, RoomListView, ViewPort, ViewUpdate,
};

const HIDDEN: &str = "d-none";

mod ids {
    // Lobby page
    pub const LOGIN_SECTION: &str = "loginSection";
    pub const LOBBY_SECTION: &str = "lobbySection";
    pub const PLAYER_NAME: &str = "playerName";
    pub const ROOMS_LIST: &str = "roomsList";
    pub const ROOM_COUNT: &str = "roomCount";

    // Game page
    pub const WAITING_SECTION: &str = "waitingSection";
    pub const GAME_SECTION: &str = "gameSection";
    pub const PLAYER1_NAME: &str = "player1Name";
    pub const PLAYER2_NAME: &str = "player2Name";
    pub const READY_SECTION: &str = "readySection";
    pub const CAMERA_SECTION: &str = "cameraSection";
    pub const RESULTS_SECTION: &str = "resultsSection";
    pub const COUNTDOWN_OVERLAY: &str = "countdownOverlay";
    pub const COUNTDOWN_NUMBER: &str = "countdownNumber";
    pub const GAME_STATUS: &str = "gameStatus";
    pub const RESULT_TITLE: &str = "resultTitle";
    pub const RESULT_MESSAGE: &str = "resultMessage";

    // Both
    pub const ERROR_MODAL: &str = "errorModal";
    pub const ERROR_MESSAGE: &str = "errorMessage";
}

pub struct DomView {
    document: Document,
}

impl DomView {
    /// `None` outside a browsing context
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let view = Self { document };
        view.install_notice_dismiss();
        Some(view)
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn show(&self, id: &str) {
        if let Some(el) = self.by_id(id) {
            let _ = el.class_list().remove_1(HIDDEN);
        }
    }

    fn hide(&self, id: &str) {
        if let Some(el) = self.by_id(id) {
            let _ = el.class_list().add_1(HIDDEN);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn create(&self, tag: &str, class: &str) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        Some(el)
    }

    /// Clicking the notice dismisses it.
    fn install_notice_dismiss(&self) {
        let Some(modal) = self.by_id(ids::ERROR_MODAL) else {
            return;
        };
        let target = modal.clone();
        let on_click = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            let _ = target.class_list().remove_2("show", "d-block");
        });
        let _ = modal.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        // Lives as long as the page
        on_click.forget();
    }

    fn render_room_list(&self, list: &RoomListView) {
        self.set_text(ids::ROOM_COUNT, &list.count_label);
        let Some(container) = self.by_id(ids::ROOMS_LIST) else {
            return;
        };
        container.set_text_content(None);

        if let Some(placeholder) = &list.placeholder {
            if let Some(p) = self.create("p", "col-12 text-center text-muted") {
                p.set_text_content(Some(placeholder));
                let _ = container.append_child(&p);
            }
            return;
        }

        for card in &list.cards {
            if let Some(node) = self.room_card(&card.room_id, &card.occupancy, card.joinable) {
                let _ = container.append_child(&node);
            }
        }
    }

    fn room_card(&self, room_id: &str, occupancy: &str, joinable: bool) -> Option<Element> {
        let column = self.create("div", "col-md-6 col-lg-4 mb-3")?;
        let card = self.create("div", if joinable { "card room-card" } else { "card room-card full" })?;
        let body = self.create("div", "card-body")?;

        let title = self.create("h6", "card-title mb-2")?;
        title.set_text_content(Some(&format!("🏠 {}", room_id)));
        let players = self.create("p", "card-text small text-muted")?;
        players.set_text_content(Some(&format!("👥 {} players", occupancy)));

        let button = if joinable {
            let b = self.create("button", "btn btn-primary btn-sm w-100")?;
            b.set_attribute("data-room-id", room_id).ok()?;
            b.set_text_content(Some("Join 🚀"));
            b
        } else {
            let b = self.create("button", "btn btn-secondary btn-sm w-100")?;
            b.set_attribute("disabled", "").ok()?;
            b.set_text_content(Some("Room full"));
            b
        };

        body.append_child(&title).ok()?;
        body.append_child(&players).ok()?;
        body.append_child(&button).ok()?;
        card.append_child(&body).ok()?;
        column.append_child(&card).ok()?;
        Some(column)
    }

    fn render_results(&self, results: &ResultsView) {
        self.hide(ids::CAMERA_SECTION);
        self.hide(ids::COUNTDOWN_OVERLAY);
        self.show(ids::RESULTS_SECTION);
        self.set_text(ids::RESULT_TITLE, &results.headline);
        self.set_text(ids::RESULT_MESSAGE, "Here are the captured gestures:");

        for (slot, participant) in results.participants.iter().take(2).enumerate() {
            self.render_participant(slot + 1, participant);
        }
    }

    fn render_participant(&self, slot: usize, participant: &ParticipantView) {
        self.set_text(&format!("result{}Name", slot), &participant.display_name);
        self.set_text(&format!("result{}Gesture", slot), &participant.gesture_label);

        let image = self
            .by_id(&format!("result{}Image", slot))
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        let glyph_id = format!("result{}Glyph", slot);

        match &participant.visual {
            ParticipantVisual::Image(capture) => {
                if let Some(img) = image {
                    img.set_src(capture.as_data_url());
                    let _ = img.style().set_property("display", "block");
                }
                self.hide(&glyph_id);
            }
            ParticipantVisual::Glyph(glyph) => {
                if let Some(img) = &image {
                    let _ = img.style().set_property("display", "none");
                }
                let holder = self.by_id(&glyph_id).or_else(|| {
                    let el = self.create("div", "ai-emoji")?;
                    el.set_id(&glyph_id);
                    let img = image.as_ref()?;
                    img.after_with_node_1(&el).ok()?;
                    Some(el)
                });
                if let Some(el) = holder {
                    el.set_text_content(Some(glyph));
                    let _ = el.class_list().remove_1(HIDDEN);
                }
            }
        }
    }

    fn render_notice(&self, notice: &Notice) {
        self.set_text(ids::ERROR_MESSAGE, &notice.message);
        match self.by_id(ids::ERROR_MODAL) {
            Some(modal) => {
                let _ = modal.class_list().add_2("show", "d-block");
            }
            None => {
                // Pages without the modal still get the message somewhere
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&notice.message);
                }
            }
        }
    }

    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            tracing::error!(path, error = ?e, "Navigation failed");
        }
    }
}

impl ViewPort for DomView {
    fn render(&self, update: ViewUpdate) {
        match update {
            ViewUpdate::ShowLogin => {
                self.show(ids::LOGIN_SECTION);
                self.hide(ids::LOBBY_SECTION);
            }
            ViewUpdate::ShowLobby { display_name } => {
                self.hide(ids::LOGIN_SECTION);
                self.show(ids::LOBBY_SECTION);
                self.set_text(ids::PLAYER_NAME, &display_name);
            }
            ViewUpdate::RoomList(list) => self.render_room_list(&list),
            ViewUpdate::ShowWaiting => {
                self.show(ids::WAITING_SECTION);
                self.hide(ids::GAME_SECTION);
            }
            ViewUpdate::ShowPlayers { player, opponent } => {
                self.hide(ids::WAITING_SECTION);
                self.show(ids::GAME_SECTION);
                self.set_text(ids::PLAYER1_NAME, &player);
                self.set_text(ids::PLAYER2_NAME, &opponent);
            }
            ViewUpdate::ShowReadySection => {
                self.show(ids::READY_SECTION);
                self.hide(ids::CAMERA_SECTION);
                self.hide(ids::RESULTS_SECTION);
                self.hide(ids::COUNTDOWN_OVERLAY);
            }
            ViewUpdate::ShowCameraSection => {
                self.hide(ids::READY_SECTION);
                self.hide(ids::RESULTS_SECTION);
                self.show(ids::CAMERA_SECTION);
            }
            ViewUpdate::CountdownOverlay(Some(label)) => {
                self.set_text(ids::COUNTDOWN_NUMBER, &label);
                self.show(ids::COUNTDOWN_OVERLAY);
            }
            ViewUpdate::CountdownOverlay(None) => self.hide(ids::COUNTDOWN_OVERLAY),
            ViewUpdate::Status(text) => self.set_text(ids::GAME_STATUS, &text),
            ViewUpdate::ShowResults(results) => self.render_results(&results),
            ViewUpdate::Notice(notice) => self.render_notice(&notice),
            ViewUpdate::Navigate(route) => self.navigate(&route.path()),
        }
    }
}

