use gtk4::prelude::*;
use libadwaita::Application;
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use pinmap_core::{MapConfig, TileClient, TileEvent};
use crate::{annotation_list, canvas, controls, state};

pub fn build(app: &Application, rx: async_channel::Receiver<TileEvent>, tiles: Rc<TileClient>, config: MapConfig) {
    // Shared State
    let state = Rc::new(RefCell::new(state::AppState::new(config)));

    // Main Content Box (Horizontal Split: Sidebar | Content)
    let main_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    main_box.add_css_class("main-window");

    // --- SIDEBAR ---
    let sidebar = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    sidebar.set_width_request(260);
    sidebar.add_css_class("sidebar");

    let logo_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    logo_box.set_margin_top(24);
    logo_box.set_margin_bottom(12);
    logo_box.set_margin_start(24);
    logo_box.set_margin_end(24);

    let logo_icon = gtk4::Image::from_icon_name("mark-location-symbolic");
    logo_icon.set_pixel_size(28);
    let title_label = gtk4::Label::builder().label("PINMAP").halign(gtk4::Align::Start).css_classes(vec!["logo-text"]).build();

    logo_box.append(&logo_icon);
    logo_box.append(&title_label);
    sidebar.append(&logo_box);

    let (annotations_widget, annotations_list) = annotation_list::build(state.clone());
    sidebar.append(&annotations_widget);

    main_box.append(&sidebar);

    // --- MAP PAGE ---
    let map_page = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    map_page.set_hexpand(true);
    map_page.add_css_class("main-content");

    let toasts = libadwaita::ToastOverlay::new();

    // Shared redraw hook for the canvas and the controls
    let canvas_slot: Rc<RefCell<Option<gtk4::DrawingArea>>> = Rc::new(RefCell::new(None));
    let refresh = {
        let canvas_slot = canvas_slot.clone();
        let state = state.clone();
        let list = annotations_list.clone();
        Rc::new(move || {
            if let Some(canvas) = canvas_slot.borrow().as_ref() {
                canvas.queue_draw();
            }
            annotation_list::update_list(&list, &state);
        })
    };

    // Header
    let header_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    header_box.set_height_request(56);
    header_box.set_margin_start(24);
    header_box.set_margin_end(12);
    header_box.set_valign(gtk4::Align::Center);

    let refresh_controls = refresh.clone();
    let toasts_err = toasts.clone();
    let controls_widget = controls::build(
        state.clone(),
        move || refresh_controls(),
        move |message| toasts_err.add_toast(libadwaita::Toast::new(message)),
    );

    let spacer_header = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    spacer_header.set_hexpand(true);

    let window_controls = gtk4::WindowControls::new(gtk4::PackType::End);

    header_box.append(&controls_widget);
    header_box.append(&spacer_header);
    header_box.append(&window_controls);

    let header_handle = gtk4::WindowHandle::new();
    header_handle.set_child(Some(&header_box));
    map_page.append(&header_handle);

    // Map
    let refresh_canvas = refresh.clone();
    let canvas_widget = canvas::build(state.clone(), tiles, move || refresh_canvas());
    canvas_widget.add_css_class("map-surface");
    *canvas_slot.borrow_mut() = Some(canvas_widget.clone());

    toasts.set_child(Some(&canvas_widget));
    toasts.set_vexpand(true);
    map_page.append(&toasts);

    main_box.append(&map_page);

    // --- TILE EVENT LOOP ---
    let state_evt = state.clone();
    let canvas_weak = canvas_widget.downgrade();

    glib::MainContext::default().spawn_local(async move {
        while let Ok(event) = rx.recv().await {
            let mut state = state_evt.borrow_mut();
            let current_zoom = state.viewport.tile_zoom();
            match event {
                TileEvent::Loaded { coord, bytes } => {
                    if coord.z != current_zoom {
                        continue; // Zoomed away while loading
                    }
                    match cairo::ImageSurface::create_from_png(&mut Cursor::new(bytes)) {
                        Ok(surface) => {
                            state.tiles.insert(coord, surface);
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ [TILES] Could not decode tile {}: {}", coord, e);
                            state.failed_tiles.insert(coord);
                        }
                    }
                }
                TileEvent::Failed { coord, reason } => {
                    tracing::debug!("[TILES] Leaving tile {} empty: {}", coord, reason);
                    if coord.z == current_zoom {
                        state.failed_tiles.insert(coord);
                    }
                }
            }
            drop(state); // Release borrow before redraw

            if let Some(w) = canvas_weak.upgrade() {
                w.queue_draw();
            }
        }
    });

    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Pinmap")
        .content(&main_box)
        .default_width(1100)
        .default_height(720)
        .build();

    window.present();
}
