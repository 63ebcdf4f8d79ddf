//! Screen-space geometry shared by the sub-simulations
//!
//! Screen coordinates: origin top-left, +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Companion centre in screen pixels
pub type Position = Vec2;

/// Pixels per nominal tick
pub type Velocity = Vec2;

/// Drawable area of the display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Axis-aligned rectangle by edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Box of the given half extents around `center`
    pub fn centered(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            left: center.x - half_extents.x,
            top: center.y - half_extents.y,
            right: center.x + half_extents.x,
            bottom: center.y + half_extents.y,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.right > self.left && self.bottom > self.top)
    }

    /// Strict overlap test. Touching edges and zero-area rects never overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        other.right > other.left && self.right > other.left && self.left < other.right
    }
}

/// A foreign window or system bar reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Zero or negative area
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Collidable band along the region's top edge ("title bar")
    pub fn top_strip(&self, thickness: f32) -> Rect {
        Rect {
            left: self.x,
            top: self.y,
            right: self.right(),
            bottom: self.y + thickness.min(self.height.max(0.0)),
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect {
            left: self.x,
            top: self.y,
            right: self.right(),
            bottom: self.bottom(),
        }
    }
}
