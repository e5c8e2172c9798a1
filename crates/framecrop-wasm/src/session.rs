//! Crop session bindings.
//!
//! [`JsCropSession`] owns the live session for one crop view. File reads in
//! the browser are asynchronous, so a load is split in two: `begin_load`
//! hands out a ticket before the read starts, and `finish_load` delivers the
//! bytes. Only the newest ticket can replace the live session.
//!
//! ```typescript
//! const session = new JsCropSession(800, 480);
//!
//! const ticket = session.begin_load();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (session.finish_load(ticket, bytes)) {
//!   const geometry = session.on_viewport_resize(canvas.width, canvas.height);
//!   draw(session.display_image(), geometry);
//! }
//!
//! canvas.onpointerdown = (e) => session.on_press_at(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => redraw(session.on_drag_to(e.offsetX, e.offsetY));
//! canvas.onpointerup = () => session.on_release();
//!
//! const jpeg = session.export_jpeg();
//! ```

use framecrop_core::{
    load_image_with_config, CropConfig, LoadOutcome, LoadTicket, Orientation, Session,
    SessionSlot,
};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, to_js_error, JsDecodedImage};

/// Crop view state exposed to JavaScript.
#[wasm_bindgen]
pub struct JsCropSession {
    config: CropConfig,
    slot: SessionSlot,
    /// Generation of the most recently issued ticket.
    issued: u64,
    /// The newest ticket while its bytes are outstanding.
    pending: Option<LoadTicket>,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create an empty session cropping to `target_width x target_height`.
    #[wasm_bindgen(constructor)]
    pub fn new(target_width: u32, target_height: u32) -> JsCropSession {
        JsCropSession {
            config: CropConfig::with_target(target_width, target_height),
            slot: SessionSlot::new(),
            issued: 0,
            pending: None,
        }
    }

    /// JPEG quality for `export_jpeg`. Applies to the next load.
    pub fn set_jpeg_quality(&mut self, quality: u8) {
        self.config.jpeg_quality = quality;
    }

    /// Filter used to build the working image. Applies to the next load.
    pub fn set_working_filter(&mut self, filter: u8) {
        self.config.working_filter = filter_from_u8(filter);
    }

    /// Reserve a ticket for a load whose bytes are still being read.
    pub fn begin_load(&mut self) -> u64 {
        let ticket = self.slot.begin_load();
        self.issued = ticket.generation();
        self.pending = Some(ticket);
        ticket.generation()
    }

    /// Deliver the bytes for `ticket`.
    ///
    /// Returns `true` if the file became the live session and `false` if a
    /// newer load made it stale. A ticket that was never issued, or the newest
    /// ticket delivered twice, is an error.
    pub fn finish_load(&mut self, ticket: u64, bytes: &[u8]) -> Result<bool, JsValue> {
        let outcome = self
            .finish(ticket, bytes)
            .ok_or_else(|| to_js_error(format!("Unknown load ticket {ticket}")))?;
        self.report(outcome)
    }

    /// Load `bytes` immediately, replacing the live session on success.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let outcome = self.load_now(bytes);
        self.report(outcome).map(|_| ())
    }

    /// Whether a file name has one of this session's accepted extensions.
    pub fn accepts_file_name(&self, name: &str) -> bool {
        self.config.accepts_file_name(name)
    }

    /// Whether a load is waiting for `finish_load`.
    #[wasm_bindgen(getter)]
    pub fn is_loading(&self) -> bool {
        self.slot.is_loading()
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.slot.session().is_some()
    }

    /// `"portrait"` when the frame moves vertically, `"landscape"` when it
    /// moves horizontally, `undefined` without an image.
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> Option<String> {
        self.slot.session().map(|s| match s.orientation() {
            Orientation::Portrait => "portrait".to_string(),
            Orientation::Landscape => "landscape".to_string(),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn target_width(&self) -> u32 {
        self.config.target_width
    }

    #[wasm_bindgen(getter)]
    pub fn target_height(&self) -> u32 {
        self.config.target_height
    }

    /// Reason the orientation fell back to identity, if it did.
    #[wasm_bindgen(getter)]
    pub fn metadata_warning(&self) -> Option<String> {
        self.slot
            .session()
            .and_then(Session::metadata_warning)
            .map(ToString::to_string)
    }

    /// Lay out the image in a display area. Returns the geometry, or `null`
    /// without an image.
    ///
    /// Also `null` while a load is pending: the previous image stays live but
    /// is frozen, so the host keeps painting its last geometry until
    /// `finish_load` returns.
    pub fn on_viewport_resize(
        &mut self,
        display_width: u32,
        display_height: u32,
    ) -> Result<JsValue, JsValue> {
        let Some(session) = self.slot.session_mut() else {
            return Ok(JsValue::NULL);
        };
        let geometry = session.on_viewport_resize(display_width, display_height);
        Ok(serde_wasm_bindgen::to_value(&geometry)?)
    }

    pub fn on_press_at(&mut self, x: i32, y: i32) {
        if let Some(session) = self.slot.session_mut() {
            session.on_press_at(x, y);
        }
    }

    /// Move the pointer. Returns the updated geometry, or `null` before the
    /// first layout.
    pub fn on_drag_to(&mut self, x: i32, y: i32) -> Result<JsValue, JsValue> {
        match self.slot.session_mut().and_then(|s| s.on_drag_to(x, y)) {
            Some(geometry) => Ok(serde_wasm_bindgen::to_value(&geometry)?),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn on_release(&mut self) {
        if let Some(session) = self.slot.session_mut() {
            session.on_release();
        }
    }

    /// Current crop position as `{ x_ratio, y_ratio }`.
    pub fn crop_state(&self) -> Result<JsValue, JsValue> {
        match self.slot.session() {
            Some(session) => Ok(serde_wasm_bindgen::to_value(session.crop())?),
            None => Ok(JsValue::NULL),
        }
    }

    /// The bitmap to draw at the geometry origin.
    pub fn display_image(&self) -> Option<JsDecodedImage> {
        self.slot
            .session()
            .map(|s| JsDecodedImage::from_decoded(s.display_image().clone()))
    }

    /// The crop at exactly the target size.
    pub fn extract_crop(&self) -> Result<JsDecodedImage, JsValue> {
        let session = self.slot.session().ok_or_else(|| to_js_error("No image loaded"))?;
        session
            .extract_crop()
            .map(JsDecodedImage::from_decoded)
            .map_err(to_js_error)
    }

    /// The crop encoded as JPEG.
    pub fn export_jpeg(&self) -> Result<Vec<u8>, JsValue> {
        let session = self.slot.session().ok_or_else(|| to_js_error("No image loaded"))?;
        session.export_jpeg().map_err(to_js_error)
    }
}

impl JsCropSession {
    fn load_now(&mut self, bytes: &[u8]) -> LoadOutcome {
        let ticket = self.slot.begin_load();
        self.issued = ticket.generation();
        self.pending = None;
        self.complete(ticket, bytes)
    }

    /// `None` for a ticket this session never issued, or for the newest
    /// ticket once it has completed. Older tickets are stale and their bytes
    /// are not decoded.
    fn finish(&mut self, generation: u64, bytes: &[u8]) -> Option<LoadOutcome> {
        if generation == 0 || generation > self.issued {
            return None;
        }
        if generation < self.issued {
            return Some(LoadOutcome::Stale);
        }
        let ticket = self.pending.take()?;
        Some(self.complete(ticket, bytes))
    }

    fn complete(&mut self, ticket: LoadTicket, bytes: &[u8]) -> LoadOutcome {
        let result = load_image_with_config(bytes, &self.config);
        self.slot.complete_load(ticket, result)
    }

    fn report(&self, outcome: LoadOutcome) -> Result<bool, JsValue> {
        match outcome {
            LoadOutcome::Applied => {
                if let Some(warning) = self.metadata_warning() {
                    web_sys::console::warn_1(&format!("framecrop: {warning}").into());
                }
                Ok(true)
            }
            LoadOutcome::Stale => Ok(false),
            LoadOutcome::Failed(err) => Err(to_js_error(err)),
        }
    }
}
