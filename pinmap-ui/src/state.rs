use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use pinmap_core::{MapConfig, MapState, TileCoord, Viewport};

/// What the primary-button drag is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    Idle,
    /// Panning the map; holds the offset already applied.
    Pan { applied: (f64, f64) },
    /// Dragging the center marker; `pin` is where its tip was at drag start.
    Center { pin: (f64, f64), offset: (f64, f64) },
}

pub struct AppState {
    pub map: MapState,
    pub viewport: Viewport,
    pub config: MapConfig,
    pub tiles: HashMap<TileCoord, cairo::ImageSurface>,
    pub failed_tiles: HashSet<TileCoord>,
    pub drag: DragMode,
    /// Set once a drag moved far enough that the release must not count as a click.
    pub suppress_click: bool,
    pub pointer: (f64, f64),
}

impl AppState {
    pub fn new(config: MapConfig) -> Self {
        let viewport = Viewport::new(config.initial_center, config.clamp_zoom(config.initial_zoom), 0.0, 0.0);
        Self {
            map: MapState::new(&config),
            viewport,
            config,
            tiles: HashMap::new(),
            failed_tiles: HashSet::new(),
            drag: DragMode::Idle,
            suppress_click: false,
            pointer: (0.0, 0.0),
        }
    }

    /// Drop decoded and failed tiles that are no longer on screen.
    pub fn retain_visible(&mut self) {
        let visible: HashSet<TileCoord> = self.viewport.visible_tiles().into_iter().map(|t| t.coord).collect();
        self.tiles.retain(|coord, _| visible.contains(coord));
        self.failed_tiles.retain(|coord| visible.contains(coord));
    }
}

pub type SharedState = Rc<RefCell<AppState>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_tile() -> cairo::ImageSurface {
        cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).unwrap()
    }

    #[test]
    fn test_tiles_panned_off_screen_are_dropped() {
        let mut state = AppState::new(MapConfig::default());
        state.viewport.resize(800.0, 500.0);

        let start: Vec<TileCoord> = state.viewport.visible_tiles().into_iter().map(|t| t.coord).collect();
        for &coord in &start {
            state.tiles.insert(coord, blank_tile());
        }
        state.failed_tiles.insert(start[0]);

        // Several screens east at the same zoom
        state.viewport.pan_by(-5000.0, 0.0);
        state.retain_visible();

        let now: HashSet<TileCoord> = state.viewport.visible_tiles().into_iter().map(|t| t.coord).collect();
        assert!(state.tiles.keys().all(|c| now.contains(c)));
        assert!(state.tiles.len() <= now.len());
        assert!(state.failed_tiles.iter().all(|c| now.contains(c)));
    }

    #[test]
    fn test_visible_tiles_survive_pruning() {
        let mut state = AppState::new(MapConfig::default());
        state.viewport.resize(800.0, 500.0);
        let visible: Vec<TileCoord> = state.viewport.visible_tiles().into_iter().map(|t| t.coord).collect();
        for &coord in &visible {
            state.tiles.insert(coord, blank_tile());
        }
        state.tiles.insert(TileCoord::new(3, 0, 0), blank_tile());

        state.retain_visible();

        assert_eq!(state.tiles.len(), visible.len());
        assert!(!state.tiles.contains_key(&TileCoord::new(3, 0, 0)));
    }
}
