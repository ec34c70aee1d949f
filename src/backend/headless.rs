//! A backend without a display server.
//!
//! Surfaces only exist as bookkeeping and every change is logged. The
//! daemon uses this when no toolkit binding is compiled in. Tests also use
//! it to inspect what would have been drawn.

use super::{Content, Display, MonitorInfo, Renderer, SurfaceId, TopologyError};
use corner_notifications_util::{Rect, StrutPartial, strip_markup};
use std::collections::HashMap;

const CARD_WIDTH: i32 = 300;
const ICON_ONLY_SIZE: i32 = 64;
const BASE_HEIGHT: i32 = 56;
const LINE_HEIGHT: i32 = 18;
const ACTIONS_HEIGHT: i32 = 32;
const GAUGE_HEIGHT: i32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub content: Content,
    pub opacity: f64,
    pub position: Option<(i32, i32)>,
    pub size: (i32, i32),
}

#[derive(Debug)]
pub struct HeadlessRenderer {
    next: u64,
    surfaces: HashMap<SurfaceId, SurfaceState>,
    translucent: bool,
}

impl HeadlessRenderer {
    pub fn new(translucent: bool) -> Self {
        Self {
            next: 1,
            surfaces: HashMap::new(),
            translucent,
        }
    }

    pub fn surface(&self, surface: SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.get(&surface)
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Override the natural size, as a toolkit would after a relayout.
    pub fn resize(&mut self, surface: SurfaceId, width: i32, height: i32) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.size = (width, height);
        }
    }

    fn natural_size(content: &Content) -> (i32, i32) {
        if content.icon_only {
            return (ICON_ONLY_SIZE, ICON_ONLY_SIZE);
        }

        let body = strip_markup(&content.body.to_markup());
        let lines = if body.is_empty() {
            0
        } else {
            body.lines().count() as i32
        };

        let mut height = BASE_HEIGHT + lines * LINE_HEIGHT;
        if !content.actions.is_empty() {
            height += ACTIONS_HEIGHT;
        }
        if content.gauge.is_some() {
            height += GAUGE_HEIGHT;
        }
        (CARD_WIDTH, height)
    }
}

impl Renderer for HeadlessRenderer {
    fn create_surface(&mut self, content: &Content) -> SurfaceId {
        let surface = SurfaceId(self.next);
        self.next += 1;

        tracing::info!(
            "[{}] {}: {}",
            content.app_name,
            content.summary,
            strip_markup(&content.body.to_markup())
        );
        self.surfaces.insert(
            surface,
            SurfaceState {
                content: content.clone(),
                opacity: 1.0,
                position: None,
                size: Self::natural_size(content),
            },
        );
        surface
    }

    fn update_content(&mut self, surface: SurfaceId, content: &Content) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            tracing::info!("[{}] updated: {}", content.app_name, content.summary);
            state.size = Self::natural_size(content);
            state.content = content.clone();
        }
    }

    fn set_opacity(&mut self, surface: SurfaceId, opacity: f64) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.opacity = opacity;
        }
    }

    fn move_to(&mut self, surface: SurfaceId, x: i32, y: i32) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            tracing::trace!("surface {:?} at {},{}", surface, x, y);
            state.position = Some((x, y));
        }
    }

    fn destroy(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
    }

    fn size(&self, surface: SurfaceId) -> (i32, i32) {
        self.surfaces
            .get(&surface)
            .map(|s| s.size)
            .unwrap_or((CARD_WIDTH, BASE_HEIGHT))
    }

    fn supports_translucency(&self) -> bool {
        self.translucent
    }
}

/// A fixed monitor layout
#[derive(Debug, Clone)]
pub struct StaticDisplay {
    pub monitors: Vec<MonitorInfo>,
    pub primary: usize,
    pub pointer: (i32, i32),
    pub struts: Vec<StrutPartial>,
    /// Make strut queries fail, as when a dock window disappears mid-query
    pub struts_unavailable: bool,
}

impl StaticDisplay {
    pub fn single(width: i32, height: i32) -> Self {
        Self::new(vec![Rect::new(0, 0, width, height)])
    }

    pub fn new(geometries: Vec<Rect>) -> Self {
        Self {
            monitors: geometries
                .into_iter()
                .map(|geometry| MonitorInfo { geometry, scale: 1 })
                .collect(),
            primary: 0,
            pointer: (0, 0),
            struts: Vec::new(),
            struts_unavailable: false,
        }
    }
}

impl Display for StaticDisplay {
    fn monitors(&self) -> Vec<MonitorInfo> {
        self.monitors.clone()
    }

    fn primary_monitor(&self) -> usize {
        self.primary
    }

    fn pointer_position(&self) -> (i32, i32) {
        self.pointer
    }

    fn dock_struts(&self) -> Result<Vec<StrutPartial>, TopologyError> {
        if self.struts_unavailable {
            return Err(TopologyError::WindowList("no window list".to_string()));
        }
        Ok(self.struts.clone())
    }
}
