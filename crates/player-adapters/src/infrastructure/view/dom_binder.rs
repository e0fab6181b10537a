//! Attaches a page's binding table to its DOM controls

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

use rps_player_app::application::machines::{ControlBinding, ValueSource};
use rps_player_app::application::services::EventSender;

/// Listeners attached by `bind_controls`.
///
/// Dropping it invalidates the listeners; keep it for the lifetime of the page.
pub struct BoundControls {
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl BoundControls {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Attach one listener per table row whose element exists on this page.
pub fn bind_controls<A>(table: &'static [ControlBinding<A>], sender: EventSender<A>) -> BoundControls
where
    A: Send + 'static,
{
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::warn!("No document; controls not bound");
        return BoundControls {
            listeners: Vec::new(),
        };
    };

    let mut listeners = Vec::with_capacity(table.len());
    for binding in table {
        let Some(element) = document.get_element_by_id(binding.element_id) else {
            tracing::debug!(id = binding.element_id, "Control not on this page");
            continue;
        };

        let sender = sender.clone();
        let document = document.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if binding.prevents_default() {
                event.prevent_default();
            }

            let value = match binding.source {
                ValueSource::None => None,
                ValueSource::InputValue(id) => document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value()),
                ValueSource::DataAttribute(attr) => event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(&format!("[{}]", attr)).ok().flatten())
                    .and_then(|el| el.get_attribute(attr)),
            };

            if let Some(action) = (binding.action)(value) {
                sender.send_action(action);
            }
        });

        if let Err(e) = element
            .add_event_listener_with_callback(binding.event, listener.as_ref().unchecked_ref())
        {
            tracing::error!(id = binding.element_id, error = ?e, "Failed to bind control");
            continue;
        }
        listeners.push(listener);
    }

    tracing::debug!(bound = listeners.len(), "Controls bound");
    BoundControls { listeners }
}
