#![forbid(unsafe_code)]

//! Pointer samples.
//!
//! A [`PointerSample`] is everything the interaction controller reads from
//! the host for one pointer event: the pointer's viewport coordinates, the
//! page scroll offset, and the rendered width of the grid container. The
//! controller never measures anything itself.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pointer coordinates in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Page scroll offset in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel movement since the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// One pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerSample {
    pub position: PointerPosition,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scroll: ScrollOffset,
    /// Rendered width of the grid container; `0.0` when not yet measured.
    pub grid_width: f64,
}

impl PointerSample {
    /// Sample at `(x, y)` with no page scroll.
    #[inline]
    pub const fn at(x: f64, y: f64, grid_width: f64) -> Self {
        Self {
            position: PointerPosition::new(x, y),
            scroll: ScrollOffset::new(0.0, 0.0),
            grid_width,
        }
    }

    /// Same sample with a page scroll offset.
    #[inline]
    #[must_use]
    pub const fn scrolled(self, x: f64, y: f64) -> Self {
        Self {
            scroll: ScrollOffset::new(x, y),
            ..self
        }
    }

    /// Pointer movement since `start`, corrected for page scrolling.
    ///
    /// `(pointer.now - pointer.start) + (scroll.now - scroll.start)` per axis,
    /// so a gesture stays anchored to the document while the page scrolls.
    pub fn adjusted_delta(&self, start: &Self) -> PixelDelta {
        PixelDelta {
            dx: (self.position.x - start.position.x) + (self.scroll.x - start.scroll.x),
            dy: (self.position.y - start.position.y) + (self.scroll.y - start.scroll.y),
        }
    }
}
