//! Web Share API, clipboard and download helpers.
//!
//! `navigator.share`, `navigator.canShare` and `navigator.clipboard` are
//! looked up dynamically so hosts without them degrade to no-ops.

use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FilePropertyBag, HtmlAnchorElement, Navigator, Url};

use ink2text_core::{Ink2TextError, Result, ShareOutcome, ShareTarget, SharedFile};

use crate::describe;

/// Share sheet of the current browser.
pub struct WebShare {
    navigator: Option<Navigator>,
}

impl WebShare {
    pub fn new() -> Self {
        Self {
            navigator: web_sys::window().map(|w| w.navigator()),
        }
    }

    fn method(&self, name: &str) -> Option<(&Navigator, Function)> {
        let navigator = self.navigator.as_ref()?;
        let method = Reflect::get(navigator, &JsValue::from_str(name)).ok()?;
        Some((navigator, method.dyn_into::<Function>().ok()?))
    }
}

impl Default for WebShare {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareTarget for WebShare {
    fn can_share(&self, file: &SharedFile) -> bool {
        let (Some(_), Some((navigator, can_share))) = (self.method("share"), self.method("canShare")) else {
            return false;
        };
        let Ok(data) = share_data(file) else {
            return false;
        };
        can_share
            .call1(navigator, &data)
            .map(|v| v.is_truthy())
            .unwrap_or(false)
    }

    async fn share(&self, file: SharedFile) -> Result<ShareOutcome> {
        let (navigator, share) = self
            .method("share")
            .ok_or_else(|| Ink2TextError::ShareFailed("sharing is not supported".to_string()))?;

        let data = share_data(&file)?;
        let promise: Promise = share
            .call1(navigator, &data)
            .and_then(|p| p.dyn_into())
            .map_err(|e| Ink2TextError::ShareFailed(describe(&e)))?;

        match JsFuture::from(promise).await {
            Ok(_) => Ok(ShareOutcome::Shared),
            Err(e) if is_abort(&e) => Ok(ShareOutcome::Cancelled),
            Err(e) => Err(Ink2TextError::ShareFailed(describe(&e))),
        }
    }
}

/// A dismissed share sheet rejects with `AbortError`.
pub fn is_abort(err: &JsValue) -> bool {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "AbortError")
}

fn share_data(file: &SharedFile) -> Result<JsValue> {
    let to_err = |e: JsValue| Ink2TextError::ShareFailed(describe(&e));

    let parts = Array::of1(&Uint8Array::from(file.bytes.as_slice()));
    let options = FilePropertyBag::new();
    options.set_type(&file.mime_type);
    let js_file = File::new_with_u8_array_sequence_and_options(&parts, &file.name, &options).map_err(to_err)?;

    let data = Object::new();
    Reflect::set(&data, &"files".into(), &Array::of1(&js_file)).map_err(to_err)?;
    Reflect::set(&data, &"title".into(), &JsValue::from_str(&file.title)).map_err(to_err)?;
    Reflect::set(&data, &"text".into(), &JsValue::from_str(&file.text)).map_err(to_err)?;
    Ok(data.into())
}

/// Write text to the system clipboard.
pub async fn write_clipboard(text: &str) -> std::result::Result<(), JsValue> {
    let navigator = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .navigator();
    let clipboard = Reflect::get(&navigator, &"clipboard".into())?;
    let write_text: Function = Reflect::get(&clipboard, &"writeText".into())?.dyn_into()?;
    let promise: Promise = write_text.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}

/// Offer bytes to the browser as a file download.
pub fn download(bytes: &[u8], file_name: &str, mime_type: &str) -> std::result::Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}
