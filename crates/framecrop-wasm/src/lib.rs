//! Framecrop WASM - WebAssembly bindings for Framecrop
//!
//! This crate exposes the framecrop-core crop engine to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `session` - The stateful crop view (load, layout, drag, export)
//! - `decode` - Stateless decoding helpers
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@framecrop/wasm';
//!
//! await init();
//!
//! const session = new JsCropSession(800, 480);
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! const geometry = session.on_viewport_resize(canvas.width, canvas.height);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod session;
mod types;

pub use decode::{decode_jpeg, exif_orientation, is_jpeg_file_name, normalize_jpeg, resize};
pub use session::JsCropSession;
pub use types::JsDecodedImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
