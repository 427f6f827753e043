// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/pointer.rs
//
// Unified pointer input (mouse and touch) and drag anchor state.

use crate::domain::transform::Offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the viewport; ends a drag like `Up`.
    Leave,
}

/// One pointer sample in viewport-local coordinates (origin at the top-left
/// corner of the viewport's bounding box).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            phase: PointerPhase::Down,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            phase: PointerPhase::Move,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            phase: PointerPhase::Up,
        }
    }

    pub fn leave(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            phase: PointerPhase::Leave,
        }
    }
}

/// Whether a viewport-local point lies inside the circular viewport.
pub fn hits_viewport(x: f32, y: f32, diameter: f32) -> bool {
    let radius = diameter / 2.0;
    let dx = x - radius;
    let dy = y - radius;
    dx * dx + dy * dy <= radius * radius
}

#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub anchor: Option<(f32, f32)>,
    pub anchor_offset: Option<Offset>,
}

impl DragState {
    pub fn start(&mut self, x: f32, y: f32, offset: Offset) {
        self.is_dragging = true;
        self.anchor = Some((x, y));
        self.anchor_offset = Some(offset);
    }

    /// Offset for the pointer at (x, y): pointer delta since the anchor plus the anchor offset.
    #[must_use]
    pub fn offset_at(&self, x: f32, y: f32) -> Option<Offset> {
        if !self.is_dragging {
            return None;
        }
        let (start_x, start_y) = self.anchor?;
        let start = self.anchor_offset?;
        Some(Offset::new(x - start_x + start.x, y - start_y + start.y))
    }

    pub fn end(&mut self) {
        self.is_dragging = false;
        self.anchor = None;
        self.anchor_offset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let drag = DragState::default();
        assert!(!drag.is_dragging);
        assert!(drag.offset_at(10.0, 10.0).is_none());
    }

    #[test]
    fn offset_follows_pointer_from_anchor() {
        let mut drag = DragState::default();
        drag.start(100.0, 50.0, Offset::new(20.0, -5.0));

        assert_eq!(drag.offset_at(130.0, 40.0), Some(Offset::new(50.0, -15.0)));
        assert_eq!(drag.offset_at(100.0, 50.0), Some(Offset::new(20.0, -5.0)));
    }

    #[test]
    fn end_clears_anchor() {
        let mut drag = DragState::default();
        drag.start(1.0, 1.0, Offset::ZERO);
        drag.end();

        assert!(!drag.is_dragging);
        assert!(drag.anchor.is_none());
        assert!(drag.offset_at(5.0, 5.0).is_none());
    }

    #[test]
    fn viewport_hit_test_is_circular() {
        assert!(hits_viewport(110.0, 110.0, 220.0));
        assert!(hits_viewport(110.0, 0.0, 220.0));
        // Bounding-box corner, outside the circle.
        assert!(!hits_viewport(5.0, 5.0, 220.0));
    }
}
