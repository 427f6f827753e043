// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Crop session messages: load completion, pointer input and user actions.

use crate::app::pointer::PointerEvent;
use crate::domain::source::SourceImage;
use crate::error::LoadError;

#[derive(Debug)]
pub enum CropMessage {
    // Loading.
    Loaded(Result<SourceImage, LoadError>),

    // Drag (mouse and touch).
    Pointer(PointerEvent),

    // Zoom.
    ZoomIn,
    ZoomOut,
    SetZoom(f32),
    ResetView,

    // Session end.
    Confirm,
    Cancel,
}
