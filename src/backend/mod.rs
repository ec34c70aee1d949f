//! Seams to the windowing toolkit.
//!
//! The daemon never talks to a display server directly. A [`Renderer`]
//! draws notification surfaces and a [`Display`] answers questions about
//! monitors, the pointer and dock windows. Toolkit bindings implement both
//! and feed [`SurfaceEvent`]s back into the event loop.

pub mod headless;

use corner_notifications_util::{
    BodyText, Image, Notification, NotificationAction, Rect, StrutPartial, body_text,
};
use std::fmt;

/// Handle of a renderer surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Everything a renderer needs to draw one notification
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub app_name: String,
    pub summary: String,
    pub body: BodyText,
    pub icon: Option<Image>,
    pub actions: Vec<NotificationAction>,
    /// Progress gauge, 0 to 100
    pub gauge: Option<u8>,
    /// Only the icon should be drawn
    pub icon_only: bool,
}

impl From<&Notification> for Content {
    fn from(n: &Notification) -> Self {
        Content {
            app_name: n.display_app_name().to_string(),
            summary: n.summary.clone(),
            body: body_text(&n.body),
            icon: n.icon(),
            actions: n.actions.clone(),
            gauge: n.gauge(),
            icon_only: n.icon_only(),
        }
    }
}

/// Input reported by a renderer for one of its surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    PointerEnter,
    PointerLeave,
    /// A click anywhere outside the action buttons
    ButtonRelease,
    ActionClicked(String),
    SizeAllocated { width: i32, height: i32 },
}

pub trait Renderer {
    fn create_surface(&mut self, content: &Content) -> SurfaceId;
    fn update_content(&mut self, surface: SurfaceId, content: &Content);
    fn set_opacity(&mut self, surface: SurfaceId, opacity: f64);
    fn move_to(&mut self, surface: SurfaceId, x: i32, y: i32);
    fn destroy(&mut self, surface: SurfaceId);
    /// Current size of the surface as (width, height)
    fn size(&self, surface: SurfaceId) -> (i32, i32);
    /// Whether the compositor can draw translucent surfaces
    fn supports_translucency(&self) -> bool;
}

/// A monitor as reported by the display server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Logical geometry
    pub geometry: Rect,
    pub scale: i32,
}

#[derive(Debug)]
pub enum TopologyError {
    /// The window list could not be read
    WindowList(String),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::WindowList(reason) => {
                write!(f, "failed to read the window list: {}", reason)
            }
        }
    }
}

impl std::error::Error for TopologyError {}

pub trait Display {
    fn monitors(&self) -> Vec<MonitorInfo>;
    fn primary_monitor(&self) -> usize;
    fn pointer_position(&self) -> (i32, i32);
    /// Strut reservations of every dock window on the screen
    fn dock_struts(&self) -> Result<Vec<StrutPartial>, TopologyError>;
}
