use gtk4::prelude::*;
use crate::state::SharedState;

/// Sidebar listing the center, circles and markers. Returns the container and
/// the list box to pass to [`update_list`].
pub fn build(state: SharedState) -> (gtk4::Box, gtk4::ListBox) {
    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
    container.set_margin_start(12);
    container.set_margin_end(12);
    container.set_margin_top(12);
    container.set_margin_bottom(12);

    let title = gtk4::Label::builder()
        .label("Annotations")
        .halign(gtk4::Align::Start)
        .css_classes(vec!["heading"])
        .build();

    container.append(&title);

    let list_box = gtk4::ListBox::new();
    list_box.set_valign(gtk4::Align::Start);
    list_box.set_selection_mode(gtk4::SelectionMode::None);
    list_box.add_css_class("boxed-list");
    list_box.add_css_class("annotation-list");

    // Initial update
    update_list(&list_box, &state);

    let scroller = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&list_box)
        .build();

    container.append(&scroller);
    (container, list_box)
}

pub fn update_list(list_box: &gtk4::ListBox, state: &SharedState) {
    // Clear existing children
    while let Some(child) = list_box.first_child() {
        list_box.remove(&child);
    }

    let state = state.borrow();

    list_box.append(&make_row(
        "mark-location-symbolic",
        "Center",
        &state.map.center().to_string(),
    ));

    for circle in state.map.circles() {
        list_box.append(&make_row(
            "media-record-symbolic",
            &format!("Circle {} · {}", circle.id, circle.radius),
            &circle.center.to_string(),
        ));
    }

    for marker in state.map.markers() {
        list_box.append(&make_row(
            "find-location-symbolic",
            &format!("Marker {}", marker.id),
            &marker.position.to_string(),
        ));
    }

    if state.map.circles().is_empty() && state.map.markers().is_empty() {
        let row = gtk4::ListBoxRow::new();
        let lbl = gtk4::Label::new(Some("Click the map to drop a marker"));
        lbl.set_margin_top(12);
        lbl.set_margin_bottom(12);
        lbl.add_css_class("caption");
        row.set_child(Some(&lbl));
        list_box.append(&row);
    }
}

fn make_row(icon_name: &str, title: &str, subtitle: &str) -> gtk4::ListBoxRow {
    let row = gtk4::ListBoxRow::new();
    row.add_css_class("annotation-row");

    let hbox = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    hbox.set_margin_top(8);
    hbox.set_margin_bottom(8);
    hbox.set_margin_start(12);
    hbox.set_margin_end(12);

    let icon = gtk4::Image::from_icon_name(icon_name);
    icon.set_pixel_size(16);
    icon.set_opacity(0.8);
    hbox.append(&icon);

    let text_box = gtk4::Box::new(gtk4::Orientation::Vertical, 2);
    let title_lbl = gtk4::Label::builder()
        .label(title)
        .halign(gtk4::Align::Start)
        .ellipsize(gtk4::pango::EllipsizeMode::End)
        .build();
    let subtitle_lbl = gtk4::Label::builder()
        .label(subtitle)
        .halign(gtk4::Align::Start)
        .css_classes(vec!["caption"])
        .build();
    text_box.append(&title_lbl);
    text_box.append(&subtitle_lbl);
    hbox.append(&text_box);

    row.set_child(Some(&hbox));
    row
}
