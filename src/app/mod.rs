// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Interactive crop session: state, messages and pointer handling.

pub mod message;
pub mod model;
pub mod pointer;
pub mod session;

pub use message::CropMessage;
pub use model::SessionState;
pub use pointer::{PointerEvent, PointerPhase};
pub use session::{CancelCallback, ConfirmCallback, CropSession};
