//! ViewPort that writes every update to the tracing log

use rps_player_ports::outbound::{NoticeLevel, ParticipantVisual, ViewPort, ViewUpdate};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogView;

impl ViewPort for LogView {
    fn render(&self, update: ViewUpdate) {
        match update {
            ViewUpdate::RoomList(list) => {
                tracing::info!(count = %list.count_label, "Room list");
                for card in &list.cards {
                    tracing::info!(
                        room = %card.room_id,
                        occupancy = %card.occupancy,
                        joinable = card.joinable,
                        "  room"
                    );
                }
                if let Some(placeholder) = list.placeholder {
                    tracing::info!("  {}", placeholder);
                }
            }
            ViewUpdate::ShowResults(results) => {
                tracing::info!(headline = %results.headline, "Round results");
                for p in &results.participants {
                    let visual = match &p.visual {
                        ParticipantVisual::Image(_) => "image",
                        ParticipantVisual::Glyph(glyph) => glyph.as_str(),
                    };
                    tracing::info!(player = %p.display_name, gesture = %p.gesture_label, visual, "  participant");
                }
            }
            ViewUpdate::Notice(notice) => match notice.level {
                NoticeLevel::Info => tracing::info!(message = %notice.message, "Notice"),
                NoticeLevel::Warning => tracing::warn!(message = %notice.message, "Notice"),
                NoticeLevel::Error => tracing::error!(message = %notice.message, "Notice"),
            },
            ViewUpdate::Navigate(route) => tracing::info!(path = %route.path(), "Navigate"),
            ViewUpdate::Status(text) => tracing::info!(status = %text, "Status"),
            other => tracing::debug!(update = ?other, "View update"),
        }
    }
}
