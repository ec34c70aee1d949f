use crate::constants::NOTIFICATION_SPACING;
use corner_notifications_config as config;
use corner_notifications_util::Rect;
use std::collections::{BTreeMap, HashMap};

/// Corner of the workarea notifications stack from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl TryFrom<u32> for Corner {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            config::TOP_LEFT => Ok(Corner::TopLeft),
            config::BOTTOM_LEFT => Ok(Corner::BottomLeft),
            config::TOP_RIGHT => Ok(Corner::TopRight),
            config::BOTTOM_RIGHT => Ok(Corner::BottomRight),
            other => Err(other),
        }
    }
}

impl Corner {
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }
}

/// Handle of a reserved rectangle. Later reservations compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReservationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub reservation: ReservationId,
    pub monitor: usize,
    pub rect: Rect,
    /// No free slot was found and the rectangle sits at the corner,
    /// overlapping earlier notifications
    pub fallback: bool,
}

/// Reserved rectangles per monitor and the stacking algorithm over them.
#[derive(Debug)]
pub struct PlacementEngine {
    spacing: i32,
    next: u64,
    reserved: HashMap<usize, BTreeMap<ReservationId, Rect>>,
    owners: HashMap<ReservationId, usize>,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(NOTIFICATION_SPACING)
    }
}

impl PlacementEngine {
    pub fn new(spacing: i32) -> Self {
        Self {
            spacing,
            next: 0,
            reserved: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Find a free slot for a `size` notification on `monitor` and reserve it.
    pub fn place(
        &mut self,
        workarea: Rect,
        monitor: usize,
        size: (i32, i32),
        corner: Corner,
    ) -> Placement {
        let (rect, fallback) = self.find_slot(workarea, monitor, size, corner);

        let reservation = ReservationId(self.next);
        self.next += 1;
        self.reserved
            .entry(monitor)
            .or_default()
            .insert(reservation, rect);
        self.owners.insert(reservation, monitor);

        if fallback {
            tracing::debug!("No free slot on monitor {}, stacking at the corner", monitor);
        }

        Placement {
            reservation,
            monitor,
            rect,
            fallback,
        }
    }

    /// Compute where a notification would go without reserving anything.
    pub fn find_slot(
        &self,
        workarea: Rect,
        monitor: usize,
        (width, height): (i32, i32),
        corner: Corner,
    ) -> (Rect, bool) {
        let space = self.spacing;
        let initial = Rect::new(
            if corner.is_right() {
                workarea.right() - width - space
            } else {
                workarea.x + space
            },
            if corner.is_top() {
                workarea.y + space
            } else {
                workarea.bottom() - height - space
            },
            width,
            height,
        );

        let Some(reserved) = self.reserved.get(&monitor).filter(|r| !r.is_empty()) else {
            return (initial, false);
        };

        // Each step moves strictly along the column or toward the far edge
        let mut rect = initial;
        let mut column_width = 0;
        loop {
            // newest first
            let Some(blocker) = reserved.values().rev().find(|r| r.intersects(&rect)) else {
                return (rect, false);
            };
            column_width = column_width.max(blocker.width);

            if corner.is_top() {
                rect.y = blocker.bottom() + space;
                if rect.bottom() <= workarea.bottom() {
                    continue;
                }
                rect.y = workarea.y + space;
            } else {
                rect.y = blocker.y - height - space;
                if rect.y >= workarea.y {
                    continue;
                }
                rect.y = workarea.bottom() - height - space;
            }

            // the column is full, start the next one
            if corner.is_right() {
                rect.x -= column_width + space;
                if rect.x < workarea.x {
                    return (initial, true);
                }
            } else {
                rect.x += column_width + space;
                if rect.right() > workarea.right() {
                    return (initial, true);
                }
            }
            column_width = 0;
        }
    }

    /// Drop a reservation. Unknown or already released handles are ignored.
    pub fn release(&mut self, reservation: ReservationId) -> Option<Rect> {
        let monitor = self.owners.remove(&reservation)?;
        self.reserved
            .get_mut(&monitor)
            .and_then(|list| list.remove(&reservation))
    }

    /// Forget every reservation, as after a monitor change.
    pub fn clear(&mut self) {
        self.reserved.clear();
        self.owners.clear();
    }

    pub fn rect(&self, reservation: ReservationId) -> Option<Rect> {
        let monitor = self.owners.get(&reservation)?;
        self.reserved.get(monitor)?.get(&reservation).copied()
    }

    /// Reservations on a monitor, newest first.
    pub fn reservations(&self, monitor: usize) -> impl Iterator<Item = (ReservationId, Rect)> + '_ {
        self.reserved
            .get(&monitor)
            .into_iter()
            .flat_map(|list| list.iter().rev().map(|(id, rect)| (*id, *rect)))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKAREA: Rect = Rect::new(0, 0, 1920, 1040);

    #[test]
    fn test_corner_from_u32() {
        assert_eq!(Corner::try_from(0), Ok(Corner::TopLeft));
        assert_eq!(Corner::try_from(1), Ok(Corner::BottomLeft));
        assert_eq!(Corner::try_from(2), Ok(Corner::TopRight));
        assert_eq!(Corner::try_from(3), Ok(Corner::BottomRight));
        assert_eq!(Corner::try_from(7), Err(7));
    }

    #[test]
    fn test_first_notification_at_each_corner() {
        let size = (300, 80);
        let cases = [
            (Corner::TopLeft, Rect::new(0, 0, 300, 80)),
            (Corner::BottomLeft, Rect::new(0, 960, 300, 80)),
            (Corner::TopRight, Rect::new(1620, 0, 300, 80)),
            (Corner::BottomRight, Rect::new(1620, 960, 300, 80)),
        ];

        for (corner, expected) in cases {
            let mut engine = PlacementEngine::default();
            let placed = engine.place(WORKAREA, 0, size, corner);
            assert_eq!(placed.rect, expected, "{:?}", corner);
            assert!(!placed.fallback);
        }
    }

    #[test]
    fn test_bottom_right_stacks_upward() {
        let mut engine = PlacementEngine::default();
        let first = engine.place(WORKAREA, 0, (300, 80), Corner::BottomRight);
        let second = engine.place(WORKAREA, 0, (300, 80), Corner::BottomRight);

        assert_eq!(first.rect, Rect::new(1620, 960, 300, 80));
        assert_eq!(second.rect, Rect::new(1620, 880, 300, 80));
    }

    #[test]
    fn test_top_left_stacks_downward() {
        let mut engine = PlacementEngine::default();
        engine.place(WORKAREA, 0, (300, 100), Corner::TopLeft);
        let second = engine.place(WORKAREA, 0, (250, 60), Corner::TopLeft);

        assert_eq!(second.rect, Rect::new(0, 100, 250, 60));
    }

    #[test]
    fn test_spacing_between_notifications() {
        let mut engine = PlacementEngine::new(8);
        let first = engine.place(WORKAREA, 0, (300, 80), Corner::TopRight);
        let second = engine.place(WORKAREA, 0, (300, 80), Corner::TopRight);

        assert_eq!(first.rect, Rect::new(1612, 8, 300, 80));
        assert_eq!(second.rect, Rect::new(1612, 96, 300, 80));
    }

    #[test]
    fn test_full_column_wraps_toward_center() {
        let workarea = Rect::new(0, 0, 1000, 250);
        let mut engine = PlacementEngine::default();

        let placed: Vec<_> = (0..4)
            .map(|_| engine.place(workarea, 0, (300, 100), Corner::BottomRight).rect)
            .collect();

        assert_eq!(placed[0], Rect::new(700, 150, 300, 100));
        assert_eq!(placed[1], Rect::new(700, 50, 300, 100));
        // no room for a third in the first column
        assert_eq!(placed[2], Rect::new(400, 150, 300, 100));
        assert_eq!(placed[3], Rect::new(400, 50, 300, 100));
    }

    #[test]
    fn test_no_room_falls_back_to_corner() {
        let workarea = Rect::new(0, 0, 500, 100);
        let mut engine = PlacementEngine::default();

        let first = engine.place(workarea, 0, (300, 100), Corner::TopLeft);
        let second = engine.place(workarea, 0, (300, 100), Corner::TopLeft);

        assert!(!first.fallback);
        assert!(second.fallback);
        assert_eq!(second.rect, first.rect);
    }

    #[test]
    fn test_narrow_blocker_takes_many_columns() {
        let workarea = Rect::new(0, 0, 1000, 100);
        let mut engine = PlacementEngine::default();

        // a thin full-height reservation away from the corner
        let blocker = engine.place(Rect::new(0, 0, 210, 100), 0, (10, 100), Corner::TopRight);
        assert_eq!(blocker.rect, Rect::new(200, 0, 10, 100));

        let placed = engine.place(workarea, 0, (300, 100), Corner::TopLeft);
        assert!(!placed.fallback);
        assert_eq!(placed.rect, Rect::new(210, 0, 300, 100));
    }

    #[test]
    fn test_monitors_are_independent() {
        let second_monitor = Rect::new(1920, 0, 1280, 1024);
        let mut engine = PlacementEngine::default();

        engine.place(WORKAREA, 0, (300, 80), Corner::TopRight);
        let other = engine.place(second_monitor, 1, (300, 80), Corner::TopRight);

        assert_eq!(other.rect, Rect::new(2900, 0, 300, 80));
        assert_eq!(engine.reservations(0).count(), 1);
        assert_eq!(engine.reservations(1).count(), 1);
    }

    #[test]
    fn test_release_frees_slot() {
        let mut engine = PlacementEngine::default();
        let first = engine.place(WORKAREA, 0, (300, 80), Corner::BottomRight);
        engine.place(WORKAREA, 0, (300, 80), Corner::BottomRight);

        assert_eq!(engine.release(first.reservation), Some(first.rect));
        // releasing twice is harmless
        assert_eq!(engine.release(first.reservation), None);

        let third = engine.place(WORKAREA, 0, (300, 80), Corner::BottomRight);
        assert_eq!(third.rect, first.rect);
    }

    #[test]
    fn test_reservations_newest_first() {
        let mut engine = PlacementEngine::default();
        let a = engine.place(WORKAREA, 0, (300, 80), Corner::TopLeft);
        let b = engine.place(WORKAREA, 0, (300, 80), Corner::TopLeft);

        let ids: Vec<_> = engine.reservations(0).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b.reservation, a.reservation]);
        assert_eq!(engine.rect(a.reservation), Some(a.rect));
    }

    #[test]
    fn test_placements_never_overlap_until_full() {
        let mut engine = PlacementEngine::default();
        let mut placed: Vec<Placement> = Vec::new();

        for i in 0..40 {
            let size = (200 + (i % 3) * 50, 60 + (i % 4) * 20);
            let p = engine.place(WORKAREA, 0, size, Corner::TopRight);
            if p.fallback {
                continue;
            }
            assert!(
                placed.iter().all(|q| !q.rect.intersects(&p.rect)),
                "placement {} overlaps",
                i
            );
            assert!(p.rect.x >= WORKAREA.x && p.rect.right() <= WORKAREA.right());
            assert!(p.rect.y >= WORKAREA.y && p.rect.bottom() <= WORKAREA.bottom());
            placed.push(p);
        }

        assert!(placed.len() > 1);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut engine = PlacementEngine::default();
        let a = engine.place(WORKAREA, 0, (300, 80), Corner::TopLeft);
        engine.place(WORKAREA, 1, (300, 80), Corner::TopLeft);

        engine.clear();
        assert_eq!(engine.len(), 0);
        assert_eq!(engine.rect(a.reservation), None);
        assert_eq!(engine.reservations(1).count(), 0);
    }
}
