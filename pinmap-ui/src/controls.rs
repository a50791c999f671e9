use gtk4::prelude::*;
use pinmap_core::{Applied, MapEvent};
use crate::state::SharedState;

/// Radius input and "Add Circle" button.
///
/// `on_change` runs after a circle was added; `on_error` receives messages
/// meant for the user.
pub fn build(
    state: SharedState,
    on_change: impl Fn() + 'static,
    on_error: impl Fn(&str) + 'static,
) -> gtk4::Box {
    let container = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    container.set_valign(gtk4::Align::Center);
    container.add_css_class("radius-controls");

    let label = gtk4::Label::new(Some("Circle Radius (meters):"));
    container.append(&label);

    let initial = state.borrow().map.radius_field().text().to_string();
    let entry = gtk4::Entry::builder()
        .text(initial.as_str())
        .input_purpose(gtk4::InputPurpose::Number)
        .width_chars(8)
        .build();
    container.append(&entry);

    let add_btn = gtk4::Button::with_label("Add Circle");
    add_btn.add_css_class("btn-primary");
    container.append(&add_btn);

    // Validate on every keystroke
    let state_input = state.clone();
    entry.connect_changed(move |entry| {
        let text = entry.text().to_string();
        let applied = state_input.borrow_mut().map.apply(MapEvent::RadiusInput(text));
        match applied {
            Ok(Applied::RadiusRejected(err)) => {
                entry.add_css_class("error");
                entry.set_tooltip_text(Some(&err.to_string()));
            }
            Ok(_) => {
                entry.remove_css_class("error");
                entry.set_tooltip_text(None);
            }
            Err(e) => tracing::warn!("⚠️ [CONTROLS] Radius input failed: {}", e),
        }
    });

    let state_add = state.clone();
    add_btn.connect_clicked(move |_| {
        let result = state_add.borrow_mut().map.apply(MapEvent::AddCircle);
        match result {
            Ok(_) => on_change(),
            Err(e) => on_error(&e.to_string()),
        }
    });

    container
}
