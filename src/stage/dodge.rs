//! Keeps the mascot inside the play area and moves it away from the cursor.
//!
//! Coordinates are `left`/`top` offsets in CSS pixels relative to the play area.
//! Any sprite larger than the area collapses that axis to a zero-width range,
//! so positions are never negative and never overflow.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Largest offsets that keep the sprite fully inside the area.
pub fn max_offset(area: Size, sprite: Size) -> Position {
    Position {
        x: (area.w - sprite.w).max(0.0),
        y: (area.h - sprite.h).max(0.0),
    }
}

pub fn centered(area: Size, sprite: Size) -> Position {
    Position {
        x: ((area.w - sprite.w) / 2.0).max(0.0),
        y: ((area.h - sprite.h) / 2.0).max(0.0),
    }
}

/// `[margin, max - margin]`, with the margin shrunk to half the span when the
/// area is too small to honour it.
pub fn axis_range(max: f64, margin: f64) -> (f64, f64) {
    let m = margin.max(0.0).min(max / 2.0);
    (m, max - m)
}

/// Uniformly random in-bounds point away from the edges.
pub fn dodge_target<R: Rng>(area: Size, sprite: Size, margin: f64, rng: &mut R) -> Position {
    let max = max_offset(area, sprite);
    let (x_lo, x_hi) = axis_range(max.x, margin);
    let (y_lo, y_hi) = axis_range(max.y, margin);
    Position {
        x: x_lo + rng.random::<f64>() * (x_hi - x_lo),
        y: y_lo + rng.random::<f64>() * (y_hi - y_lo),
    }
}

pub struct DodgePositioner {
    pos: Position,
    margin: f64,
}

impl DodgePositioner {
    pub fn new(margin: f64) -> Self {
        Self {
            pos: Position::default(),
            margin,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Center the sprite. `None` for either size means the element is not laid
    /// out yet and the call is skipped.
    pub fn recenter(&mut self, area: Option<Size>, sprite: Option<Size>) -> Option<Position> {
        let (area, sprite) = (area?, sprite?);
        self.pos = centered(area, sprite);
        Some(self.pos)
    }

    /// Jump to a random spot. Same readiness guard as [`Self::recenter`].
    pub fn dodge<R: Rng>(
        &mut self,
        area: Option<Size>,
        sprite: Option<Size>,
        rng: &mut R,
    ) -> Option<Position> {
        let (area, sprite) = (area?, sprite?);
        self.pos = dodge_target(area, sprite, self.margin, rng);
        Some(self.pos)
    }
}
