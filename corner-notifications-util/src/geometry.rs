//! Integer rectangle math for laying out notifications.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping area, `None` when the rectangles only touch or are apart.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        let rect = Rect::new(x, y, right - x, bottom - y);
        (!rect.is_empty()).then_some(rect)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersect(other).is_some()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn scale_down(&self, factor: i32) -> Rect {
        let factor = factor.max(1);
        Rect::new(
            self.x / factor,
            self.y / factor,
            self.width / factor,
            self.height / factor,
        )
    }

    /// Largest of the four axis-aligned strips of `self` left over around `hole`.
    ///
    /// The strips above, right of, below and left of `hole` are compared by
    /// area; on a tie the first in that order wins. `hole` is expected to lie
    /// inside `self`.
    pub fn largest_box(&self, hole: &Rect) -> Rect {
        let top = hole.y - self.y;
        let left = hole.x - self.x;
        let right = self.width - left - hole.width;
        let bottom = self.height - top - hole.height;

        let candidates = [
            (
                top as i64 * self.width as i64,
                Rect::new(self.x, self.y, self.width, top),
            ),
            (
                right as i64 * self.height as i64,
                Rect::new(hole.right(), self.y, right, self.height),
            ),
            (
                bottom as i64 * self.width as i64,
                Rect::new(self.x, hole.bottom(), self.width, bottom),
            ),
            (
                left as i64 * self.height as i64,
                Rect::new(self.x, self.y, left, self.height),
            ),
        ];

        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.0 > best.0 {
                best = *candidate;
            }
        }
        best.1
    }
}

/// `_NET_WM_STRUT_PARTIAL` of a dock window, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrutPartial {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    pub left_start_y: i32,
    pub left_end_y: i32,
    pub right_start_y: i32,
    pub right_end_y: i32,
    pub top_start_x: i32,
    pub top_end_x: i32,
    pub bottom_start_x: i32,
    pub bottom_end_x: i32,
}

impl StrutPartial {
    /// Reserved rectangles in logical pixels, one per non-zero edge.
    ///
    /// `screen` is the logical bounds of the whole screen and `scale` the
    /// device scale the strut values are expressed in.
    pub fn reserved_rects(&self, screen: Rect, scale: i32) -> Vec<Rect> {
        let scale = scale.max(1);
        let s = Rect::new(
            screen.x * scale,
            screen.y * scale,
            screen.width * scale,
            screen.height * scale,
        );

        let mut rects = Vec::with_capacity(4);
        if self.left > 0 {
            rects.push(Rect::new(
                s.x,
                self.left_start_y,
                self.left,
                self.left_end_y - self.left_start_y + 1,
            ));
        }
        if self.right > 0 {
            rects.push(Rect::new(
                s.right() - self.right,
                self.right_start_y,
                self.right,
                self.right_end_y - self.right_start_y + 1,
            ));
        }
        if self.top > 0 {
            rects.push(Rect::new(
                self.top_start_x,
                s.y,
                self.top_end_x - self.top_start_x + 1,
                self.top,
            ));
        }
        if self.bottom > 0 {
            rects.push(Rect::new(
                self.bottom_start_x,
                s.bottom() - self.bottom,
                self.bottom_end_x - self.bottom_start_x + 1,
                self.bottom,
            ));
        }

        rects.into_iter().map(|r| r.scale_down(scale)).collect()
    }
}
