use crate::backend::{Display, MonitorInfo};
use corner_notifications_util::{Rect, StrutPartial};

/// Monitors and the part of each not covered by docks and panels.
#[derive(Debug, Default)]
pub struct Monitors {
    monitors: Vec<MonitorInfo>,
    workareas: Vec<Rect>,
    primary: usize,
}

impl Monitors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read monitors and struts and recompute every workarea.
    ///
    /// A failed strut query is treated as "no panels".
    pub fn refresh(&mut self, display: &impl Display) {
        self.monitors = display.monitors();
        self.primary = display.primary_monitor();

        let struts = display.dock_struts().unwrap_or_else(|err| {
            tracing::debug!("Ignoring dock struts: {}", err);
            Vec::new()
        });

        let screen = self
            .monitors
            .iter()
            .fold(Rect::default(), |screen, m| screen.union(&m.geometry));

        self.workareas = self
            .monitors
            .iter()
            .map(|monitor| workarea(monitor, screen, &struts))
            .collect();

        tracing::debug!(
            "{} monitor(s), workareas {:?}",
            self.monitors.len(),
            self.workareas
        );
    }

    pub fn count(&self) -> usize {
        self.monitors.len()
    }

    pub fn workarea(&self, index: usize) -> Option<Rect> {
        self.workareas.get(index).copied()
    }

    /// The primary monitor, falling back to the first one if the reported
    /// index is out of range.
    pub fn primary(&self) -> usize {
        if self.primary < self.count() {
            self.primary
        } else {
            0
        }
    }

    /// Monitor containing the point, or the nearest one.
    pub fn monitor_at(&self, x: i32, y: i32) -> usize {
        if let Some(index) = self
            .monitors
            .iter()
            .position(|m| m.geometry.contains_point(x, y))
        {
            return index;
        }

        self.monitors
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| {
                let g = m.geometry;
                let dx = (g.x - x).max(x - (g.right() - 1)).max(0) as i64;
                let dy = (g.y - y).max(y - (g.bottom() - 1)).max(0) as i64;
                dx * dx + dy * dy
            })
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

/// Shrink a monitor's geometry by every dock strut overlapping it.
pub fn workarea(monitor: &MonitorInfo, screen: Rect, struts: &[StrutPartial]) -> Rect {
    let mut area = monitor.geometry;

    for rect in struts
        .iter()
        .flat_map(|strut| strut.reserved_rects(screen, monitor.scale))
    {
        if let Some(overlap) = area.intersect(&rect) {
            area = area.largest_box(&overlap);
        }
    }

    area
}
