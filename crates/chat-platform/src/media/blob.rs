//! Object URLs for locally produced media (recorded WAV files).

use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

use chat_core::ports::ObjectUrlPort;
use chat_types::{ChatError, Result};

#[derive(Default)]
pub struct BlobUrls;

impl BlobUrls {
    pub fn new() -> Self {
        Self
    }
}

fn interop(e: JsValue) -> ChatError {
    ChatError::JsInterop(format!("{:?}", e))
}

impl ObjectUrlPort for BlobUrls {
    fn create_object_url(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(interop)?;
        Url::create_object_url_with_blob(&blob).map_err(interop)
    }

    fn revoke_object_url(&self, url: &str) -> Result<()> {
        Url::revoke_object_url(url).map_err(interop)
    }
}
