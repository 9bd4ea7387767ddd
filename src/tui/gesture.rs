//! Drag and resize surfaces.
//!
//! A surface tracks one gesture on one card and reports the final geometry
//! exactly once, when the gesture ends. Intermediate geometry is only used for
//! the live preview; the board is not touched until `finish`.

use crate::board::model::{Position, Size, SizeLimits};

#[derive(Debug, Clone, PartialEq)]
pub struct DragSurface {
    index: usize,
    current: Position,
    /// Pointer offset from the card's top-left corner, set by a mouse grab.
    grab: Option<(f64, f64)>,
}

impl DragSurface {
    pub fn start(index: usize, origin: Position) -> Self {
        Self {
            index,
            current: origin,
            grab: None,
        }
    }

    /// Start a pointer drag; `pointer` is where the card was grabbed.
    pub fn grab(index: usize, origin: Position, pointer: Position) -> Self {
        Self {
            index,
            current: origin,
            grab: Some((pointer.x - origin.x, pointer.y - origin.y)),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Position {
        self.current
    }

    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.set(self.current.x + dx, self.current.y + dy);
    }

    /// Follow the pointer, keeping the original grab offset.
    pub fn track(&mut self, pointer: Position) {
        let (ox, oy) = self.grab.unwrap_or((0.0, 0.0));
        self.set(pointer.x - ox, pointer.y - oy);
    }

    /// End the gesture and hand the final position to `on_stop`.
    pub fn finish(self, on_stop: impl FnOnce(usize, Position)) {
        on_stop(self.index, self.current);
    }

    fn set(&mut self, x: f64, y: f64) {
        // Coordinates stay non-negative; the far edges are unbounded.
        self.current = Position::new(x.max(0.0), y.max(0.0));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSurface {
    index: usize,
    origin: Position,
    current: Size,
    limits: SizeLimits,
}

impl ResizeSurface {
    /// `origin` is the card's top-left corner, which stays fixed while the
    /// bottom-right corner follows the gesture.
    pub fn start(index: usize, origin: Position, size: Size, limits: SizeLimits) -> Self {
        Self {
            index,
            origin,
            current: limits.clamp(size),
            limits,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Size {
        self.current
    }

    pub fn nudge(&mut self, dw: f64, dh: f64) {
        self.current = self.limits.clamp(Size::new(
            self.current.width + dw,
            self.current.height + dh,
        ));
    }

    /// Follow the pointer as the new bottom-right corner.
    pub fn track(&mut self, pointer: Position) {
        self.current = self.limits.clamp(Size::new(
            pointer.x - self.origin.x,
            pointer.y - self.origin.y,
        ));
    }

    /// End the gesture and hand the final size to `on_stop`.
    pub fn finish(self, on_stop: impl FnOnce(usize, Size)) {
        on_stop(self.index, self.current);
    }
}
