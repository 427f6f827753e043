// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/session.rs
//
// One cropper invocation: load, drag/zoom, then confirm or cancel.

use image::Rgba;

use crate::app::message::CropMessage;
use crate::app::model::{LoadedView, SessionState};
use crate::app::pointer::{PointerEvent, PointerPhase, hits_viewport};
use crate::config::CropConfig;
use crate::domain::raster::{CroppedImage, PixelSurface, RasterSurface, RenderOptions, render_crop};
use crate::domain::source::{ImageLoader, ImageSource, SourceImage};
use crate::domain::transform::{Offset, PreviewLayout, Transform};
use crate::error::{self, ConfigError, CropError};

pub type ConfirmCallback = Box<dyn FnOnce(CroppedImage)>;
pub type CancelCallback = Box<dyn FnOnce()>;

pub struct CropSession {
    config: CropConfig,
    source: ImageSource,
    state: SessionState,
    view: Option<LoadedView>,
    on_confirm: Option<ConfirmCallback>,
    on_cancel: Option<CancelCallback>,
}

impl std::fmt::Debug for CropSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSession")
            .field("source", &self.source.to_string())
            .field("state", &self.state)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl CropSession {
    /// Open a session for `source`. It starts in `Loading` until a `Loaded` message arrives.
    ///
    /// Fails if `config` does not pass `CropConfig::validate`.
    pub fn new(
        source: ImageSource,
        config: CropConfig,
        on_confirm: ConfirmCallback,
        on_cancel: CancelCallback,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!("crop session opened for {source}");
        Ok(Self {
            config,
            source,
            state: SessionState::Loading,
            view: None,
            on_confirm: Some(on_confirm),
            on_cancel: Some(on_cancel),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current pan/zoom, if an image is loaded.
    pub fn transform(&self) -> Option<Transform> {
        self.view.as_ref().map(|view| view.transform)
    }

    pub fn base_scale(&self) -> Option<f32> {
        self.view.as_ref().map(|view| view.framing.base_scale())
    }

    /// Base scale times zoom factor.
    pub fn effective_scale(&self) -> Option<f32> {
        self.view
            .as_ref()
            .map(|view| view.framing.effective_scale(&view.transform))
    }

    /// Slider label value, e.g. 150 for a zoom factor of 1.5.
    pub fn zoom_percent(&self) -> Option<u32> {
        self.transform()
            .map(|transform| (transform.zoom * 100.0).round() as u32)
    }

    /// Where to draw the preview image inside the viewport box.
    pub fn preview_layout(&self) -> Option<PreviewLayout> {
        self.view
            .as_ref()
            .map(|view| view.framing.preview_layout(&view.transform))
    }

    /// Render the current view at viewport resolution, without ending the session.
    pub fn render_preview(&self) -> Option<image::RgbaImage> {
        let view = self.view.as_ref()?;
        let size = self.config.viewport_diameter.round().max(1.0) as u32;
        let mut surface = PixelSurface::new(size, size, self.config.interpolation).ok()?;
        render_crop(
            &mut surface,
            &view.image,
            &view.framing,
            &view.transform,
            &self.render_options(),
        );
        Some(surface.into_image())
    }

    // =========================================================================
    // Update
    // =========================================================================

    pub fn update(&mut self, message: CropMessage) -> Result<(), CropError> {
        match message {
            CropMessage::Loaded(result) => {
                self.on_loaded(result);
                Ok(())
            }
            CropMessage::Pointer(event) => self.on_pointer(event),
            CropMessage::ZoomIn => self.zoom_in(),
            CropMessage::ZoomOut => self.zoom_out(),
            CropMessage::SetZoom(zoom) => self.set_zoom(zoom),
            CropMessage::ResetView => self.reset_view(),
            CropMessage::Confirm => {
                self.interactive_view()?;
                let surface = PixelSurface::new(
                    self.config.output_size,
                    self.config.output_size,
                    self.config.interpolation,
                )?;
                self.confirm_with(surface)
            }
            CropMessage::Cancel => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Load the source synchronously with `loader`.
    pub fn load_with(&mut self, loader: &dyn ImageLoader) -> Result<(), CropError> {
        let result = loader.load(&self.source);
        self.update(CropMessage::Loaded(result))
    }

    fn on_loaded(&mut self, result: Result<SourceImage, error::LoadError>) {
        if self.state != SessionState::Loading {
            log::warn!("ignoring load result in state {:?}", self.state);
            return;
        }
        match result {
            Ok(image) => {
                let view = LoadedView::fit(image, self.config.viewport_diameter);
                log::debug!(
                    "loaded {:?}, base scale {:.4}",
                    view.image,
                    view.framing.base_scale()
                );
                self.view = Some(view);
                self.state = SessionState::Ready;
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", self.source);
                self.state = SessionState::LoadError(e.to_string());
            }
        }
    }

    fn on_pointer(&mut self, event: PointerEvent) -> Result<(), CropError> {
        if self.state.is_finished() {
            return Err(CropError::Finished);
        }
        if !self.state.is_interactive() {
            log::trace!("pointer input ignored while {:?}", self.state);
            return Ok(());
        }
        if !(event.x.is_finite() && event.y.is_finite()) {
            log::warn!("ignoring pointer event at ({}, {})", event.x, event.y);
            return Ok(());
        }
        let Some(view) = self.view.as_mut() else {
            return Err(CropError::NotReady);
        };

        match event.phase {
            PointerPhase::Down => {
                if hits_viewport(event.x, event.y, view.framing.diameter()) {
                    view.drag.start(event.x, event.y, view.transform.offset);
                    self.state = SessionState::Dragging;
                }
            }
            PointerPhase::Move => {
                if let Some(offset) = view.drag.offset_at(event.x, event.y) {
                    view.transform.offset = offset;
                    view.framing
                        .limit_pan(&mut view.transform, self.config.pan_limit);
                }
            }
            PointerPhase::Up | PointerPhase::Leave => {
                if view.drag.is_dragging {
                    view.drag.end();
                    self.state = SessionState::Ready;
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    pub fn zoom_in(&mut self) -> Result<(), CropError> {
        let step = self.config.zoom_step;
        self.adjust_zoom(|zoom| zoom + step)
    }

    pub fn zoom_out(&mut self) -> Result<(), CropError> {
        let step = self.config.zoom_step;
        self.adjust_zoom(|zoom| zoom - step)
    }

    /// Set the zoom factor directly (slider). Clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), CropError> {
        if !zoom.is_finite() {
            self.interactive_view()?;
            log::warn!("ignoring non-finite zoom {zoom}");
            return Ok(());
        }
        self.adjust_zoom(|_| zoom)
    }

    /// Back to the fitted view: centered, zoom 1.
    pub fn reset_view(&mut self) -> Result<(), CropError> {
        let view = self.interactive_view()?;
        view.transform = Transform::default();
        Ok(())
    }

    fn adjust_zoom(&mut self, f: impl FnOnce(f32) -> f32) -> Result<(), CropError> {
        let range = self.config.zoom_range();
        let pan_limit = self.config.pan_limit;
        let view = self.interactive_view()?;
        view.transform.zoom = range.clamp(f(view.transform.zoom));
        view.framing.limit_pan(&mut view.transform, pan_limit);
        Ok(())
    }

    fn interactive_view(&mut self) -> Result<&mut LoadedView, CropError> {
        if self.state.is_finished() {
            return Err(CropError::Finished);
        }
        if !self.state.is_interactive() {
            return Err(CropError::NotReady);
        }
        self.view.as_mut().ok_or(CropError::NotReady)
    }

    // =========================================================================
    // Confirm / Cancel
    // =========================================================================

    /// Rasterize onto `surface`, encode it, and hand the result to the confirm callback.
    ///
    /// On encode failure the session stays `Ready` so the user can retry or cancel.
    pub fn confirm_with<S: RasterSurface>(&mut self, mut surface: S) -> Result<(), CropError> {
        let options = self.render_options();
        let view = self.interactive_view()?;
        view.drag.end();

        render_crop(
            &mut surface,
            &view.image,
            &view.framing,
            &view.transform,
            &options,
        );

        let cropped = match CroppedImage::encode(&surface) {
            Ok(cropped) => cropped,
            Err(e) => {
                log::error!("failed to encode crop: {e}");
                self.state = SessionState::Ready;
                return Err(e.into());
            }
        };

        log::info!("crop confirmed: {cropped:?}");
        self.state = SessionState::Confirmed;
        self.view = None;
        self.on_cancel = None;
        if let Some(on_confirm) = self.on_confirm.take() {
            on_confirm(cropped);
        }
        Ok(())
    }

    /// End the session without output. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if self.state.is_finished() {
            return;
        }
        log::info!("crop cancelled");
        self.state = SessionState::Cancelled;
        self.view = None;
        self.on_confirm = None;
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }

    fn render_options(&self) -> RenderOptions {
        let [r, g, b] = self.config.background;
        RenderOptions {
            background: Rgba([r, g, b, 255]),
            transparent_corners: self.config.transparent_corners,
        }
    }

    /// Pan by simulating a drag from the viewport center.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> Result<(), CropError> {
        let center = self.config.viewport_diameter / 2.0;
        self.update(CropMessage::Pointer(PointerEvent::down(center, center)))?;
        self.update(CropMessage::Pointer(PointerEvent::moved(
            center + dx,
            center + dy,
        )))?;
        self.update(CropMessage::Pointer(PointerEvent::up(
            center + dx,
            center + dy,
        )))
    }

    /// Current offset, or zero before load.
    pub fn offset(&self) -> Offset {
        self.transform()
            .map_or(Offset::ZERO, |transform| transform.offset)
    }
}
