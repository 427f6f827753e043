// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Crop session state.

use crate::app::pointer::DragState;
use crate::domain::source::SourceImage;
use crate::domain::transform::{Framing, Transform};

// =============================================================================
// Enums
// =============================================================================

/// `Loading -> Ready -> (Dragging <-> Ready) -> Confirmed | Cancelled`.
///
/// `LoadError` is reached from `Loading` only; from there the session can only
/// be cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Dragging,
    LoadError(String),
    Confirmed,
    Cancelled,
}

impl SessionState {
    /// Drag and zoom are accepted.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Ready | Self::Dragging)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether the host should show a busy indicator.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn can_confirm(&self) -> bool {
        self.is_interactive()
    }

    /// Cancel is available in every non-terminal state.
    pub fn can_cancel(&self) -> bool {
        !self.is_finished()
    }
}

// =============================================================================
// Model
// =============================================================================

/// Everything that exists only while an image is loaded.
#[derive(Debug)]
pub struct LoadedView {
    pub image: SourceImage,
    pub framing: Framing,
    pub transform: Transform,
    pub drag: DragState,
}

impl LoadedView {
    /// Fresh view: offset zero, default zoom, base scale fitted to `diameter`.
    pub fn fit(image: SourceImage, diameter: f32) -> Self {
        let (width, height) = image.dimensions();
        Self {
            framing: Framing::new(width, height, diameter),
            image,
            transform: Transform::default(),
            drag: DragState::default(),
        }
    }
}
