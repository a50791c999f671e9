use gtk4::prelude::*;
use gtk4::{DrawingArea, EventControllerMotion, EventControllerScroll, EventControllerScrollFlags, GestureClick, GestureDrag};
use std::f64::consts::PI;
use std::rc::Rc;
use pinmap_core::{MapEvent, Rgba, ScreenOverlay, TileClient};
use pinmap_core::overlay::project_all;
use crate::state::{DragMode, SharedState};

// Pin geometry, tip at (0, 0)
const PIN_HEIGHT: f64 = 34.0;
const PIN_HEAD_RADIUS: f64 = 11.0;
const PIN_HOLE_RADIUS: f64 = 4.5;

// Movement in px after which a press is a drag, not a click
const CLICK_SLOP: f64 = 4.0;

const CENTER_PIN_COLOR: Rgba = Rgba::new(0.86, 0.20, 0.18, 1.0);
const MARKER_PIN_COLOR: Rgba = Rgba::new(0.16, 0.32, 0.75, 1.0);

pub fn build(state: SharedState, tiles: Rc<TileClient>, on_change: impl Fn() + 'static) -> DrawingArea {
    let drawing_area = DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .build();

    let on_change = Rc::new(on_change);

    let state_draw = state.clone();
    drawing_area.set_draw_func(move |_, cr, w, h| {
        {
            let mut state = state_draw.borrow_mut();
            state.viewport.resize(w as f64, h as f64);
            state.retain_visible();
        }
        let state = state_draw.borrow();

        // Base map
        let tile_px = state.viewport.tile_pixels();
        for placed in state.viewport.visible_tiles() {
            match state.tiles.get(&placed.coord) {
                Some(surface) => draw_tile(cr, surface, placed.x, placed.y, tile_px),
                None => {
                    draw_missing_tile(cr, placed.x, placed.y, tile_px);
                    if !state.failed_tiles.contains(&placed.coord) {
                        if let Err(e) = tiles.request(placed.coord) {
                            tracing::error!("❌ [CANVAS] Could not request tile {}: {}", placed.coord, e);
                        }
                    }
                }
            }
        }

        // Annotations
        let overlays = project_all(&state.map.overlays(), &state.viewport);
        for overlay in &overlays {
            match overlay {
                ScreenOverlay::Disc { x, y, radius_px, color, .. } => draw_disc(cr, *x, *y, *radius_px, *color),
                ScreenOverlay::Pin { x, y, .. } => draw_pin(cr, *x, *y, MARKER_PIN_COLOR),
                // Drawn after the loop so it stays on top
                ScreenOverlay::CenterPin { .. } => {}
            }
        }
        if let Some(ScreenOverlay::CenterPin { x, y }) = overlays.first() {
            let (x, y) = match state.drag {
                DragMode::Center { pin, offset } => (pin.0 + offset.0, pin.1 + offset.1),
                _ => (*x, *y),
            };
            draw_pin(cr, x, y, CENTER_PIN_COLOR);
        }

        draw_attribution(cr, &state.config.tiles.attribution, w as f64, h as f64);
    });

    // Pointer tracking for scroll zoom
    let motion = EventControllerMotion::new();
    let state_motion = state.clone();
    motion.connect_motion(move |_, x, y| {
        state_motion.borrow_mut().pointer = (x, y);
    });
    drawing_area.add_controller(motion);

    // Scroll wheel zoom around the pointer
    let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL | EventControllerScrollFlags::DISCRETE);
    let state_scroll = state.clone();
    let da_scroll = drawing_area.clone();
    scroll.connect_scroll(move |_, _dx, dy| {
        if dy == 0.0 {
            return gtk4::glib::Propagation::Proceed;
        }
        let mut state = state_scroll.borrow_mut();
        let target = state.config.clamp_zoom(state.viewport.zoom() - dy.signum());
        if target != state.viewport.zoom() {
            let (px, py) = state.pointer;
            state.viewport.zoom_around(target, px, py);
            tracing::debug!("[CANVAS] Zoom {}", target);
            da_scroll.queue_draw();
        }
        gtk4::glib::Propagation::Stop
    });
    drawing_area.add_controller(scroll);

    // Click: place a marker, double click zooms in
    let click = GestureClick::new();
    let state_click = state.clone();
    let da_click = drawing_area.clone();
    let on_change_click = on_change.clone();

    click.connect_released(move |_, n_press, x, y| {
        let event = {
            let state = state_click.borrow();
            if state.suppress_click {
                return;
            }
            let (cx, cy) = state.viewport.to_screen(state.map.center());
            if hit_pin(cx, cy, x, y) {
                return;
            }
            MapEvent::Click(state.viewport.to_latlng(x, y))
        };

        {
            let mut state = state_click.borrow_mut();
            if let Err(e) = state.map.apply(event) {
                tracing::warn!("⚠️ [CANVAS] Click rejected: {}", e);
            }
            if n_press == 2 {
                let target = state.config.clamp_zoom(state.viewport.zoom() + 1.0);
                state.viewport.zoom_around(target, x, y);
            }
        }

        da_click.queue_draw();
        on_change_click();
    });
    drawing_area.add_controller(click);

    // Drag: move the center marker when grabbed, otherwise pan
    let drag = GestureDrag::new();

    let state_begin = state.clone();
    drag.connect_drag_begin(move |_, x, y| {
        let mut state = state_begin.borrow_mut();
        let (cx, cy) = state.viewport.to_screen(state.map.center());
        state.suppress_click = false;
        state.drag = if hit_pin(cx, cy, x, y) {
            tracing::debug!("[CANVAS] Center marker grabbed");
            DragMode::Center { pin: (cx, cy), offset: (0.0, 0.0) }
        } else {
            DragMode::Pan { applied: (0.0, 0.0) }
        };
    });

    let state_update = state.clone();
    let da_update = drawing_area.clone();
    drag.connect_drag_update(move |_, offset_x, offset_y| {
        let mut state = state_update.borrow_mut();
        if offset_x.hypot(offset_y) > CLICK_SLOP {
            state.suppress_click = true;
        }
        let mode = state.drag;
        match mode {
            DragMode::Pan { applied } => {
                state.viewport.pan_by(offset_x - applied.0, offset_y - applied.1);
                state.drag = DragMode::Pan { applied: (offset_x, offset_y) };
            }
            DragMode::Center { pin, .. } => {
                state.drag = DragMode::Center { pin, offset: (offset_x, offset_y) };
            }
            DragMode::Idle => return,
        }
        da_update.queue_draw();
    });

    let state_end = state.clone();
    let da_end = drawing_area.clone();
    let on_change_end = on_change.clone();
    drag.connect_drag_end(move |_, offset_x, offset_y| {
        let moved_center = {
            let mut state = state_end.borrow_mut();
            let mode = std::mem::replace(&mut state.drag, DragMode::Idle);
            match mode {
                DragMode::Center { pin, .. } if offset_x.hypot(offset_y) > CLICK_SLOP => {
                    let released = state.viewport.to_latlng(pin.0 + offset_x, pin.1 + offset_y);
                    if let Err(e) = state.map.apply(MapEvent::CenterDragEnd(released)) {
                        tracing::warn!("⚠️ [CANVAS] Drag end rejected: {}", e);
                    }
                    true
                }
                _ => false,
            }
        };

        da_end.queue_draw();
        if moved_center {
            on_change_end();
        }
    });
    drawing_area.add_controller(drag);

    drawing_area
}

/// Whether `(x, y)` is on a pin whose tip is at `(tip_x, tip_y)`.
fn hit_pin(tip_x: f64, tip_y: f64, x: f64, y: f64) -> bool {
    let head_y = tip_y - PIN_HEIGHT + PIN_HEAD_RADIUS;
    let dx = x - tip_x;
    let dy = y - head_y;
    let on_head = (dx * dx + dy * dy).sqrt() <= PIN_HEAD_RADIUS + 4.0; // Slightly larger hit area
    let on_stem = dx.abs() <= PIN_HEAD_RADIUS && y >= head_y && y <= tip_y;
    on_head || on_stem
}

fn draw_tile(cr: &cairo::Context, surface: &cairo::ImageSurface, x: f64, y: f64, size: f64) {
    let scale = size / surface.width().max(1) as f64;
    cr.save().unwrap();
    cr.translate(x, y);
    cr.scale(scale, scale);
    cr.set_source_surface(surface, 0.0, 0.0).unwrap();
    cr.paint().unwrap();
    cr.restore().unwrap();
}

fn draw_missing_tile(cr: &cairo::Context, x: f64, y: f64, size: f64) {
    cr.set_source_rgb(0.87, 0.87, 0.87);
    cr.rectangle(x, y, size, size);
    cr.fill().unwrap();
}

fn draw_disc(cr: &cairo::Context, x: f64, y: f64, radius: f64, color: Rgba) {
    if !radius.is_finite() {
        return;
    }
    cr.new_sub_path();
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.set_source_rgba(color.r, color.g, color.b, color.a * 0.2);
    cr.fill_preserve().unwrap();

    cr.set_source_rgba(color.r, color.g, color.b, color.a);
    cr.set_line_width(3.0);
    cr.stroke().unwrap();
}

fn draw_pin(cr: &cairo::Context, x: f64, y: f64, color: Rgba) {
    let head_y = y - PIN_HEIGHT + PIN_HEAD_RADIUS;

    // Teardrop: head arc down to the tip
    let spread = 0.35 * PI;
    cr.new_sub_path();
    cr.arc(x, head_y, PIN_HEAD_RADIUS, PI - spread, 2.0 * PI + spread);
    cr.line_to(x, y);
    cr.close_path();

    // Shadow
    cr.save().unwrap();
    cr.translate(1.5, 1.5);
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.3);
    cr.fill_preserve().unwrap();
    cr.restore().unwrap();

    cr.set_source_rgba(color.r, color.g, color.b, color.a);
    cr.fill().unwrap();

    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.new_sub_path();
    cr.arc(x, head_y, PIN_HOLE_RADIUS, 0.0, 2.0 * PI);
    cr.fill().unwrap();
}

fn draw_attribution(cr: &cairo::Context, text: &str, w: f64, h: f64) {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(11.0);
    let extents = match cr.text_extents(text) {
        Ok(extents) => extents,
        Err(_) => return,
    };
    let pad = 4.0;
    let box_w = extents.x_advance() + pad * 2.0;
    let box_h = 16.0;

    cr.set_source_rgba(1.0, 1.0, 1.0, 0.8);
    cr.rectangle(w - box_w, h - box_h, box_w, box_h);
    cr.fill().unwrap();

    cr.set_source_rgb(0.2, 0.2, 0.2);
    cr.move_to(w - box_w + pad, h - 4.0);
    cr.show_text(text).unwrap();
}
