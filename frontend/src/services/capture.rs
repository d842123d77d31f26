//! Boundary to the node-to-image capture service.
//!
//! The capture itself is an external collaborator (the `html-to-image`
//! script loaded by the host page); this module only hands it a painted
//! node and moves the returned raster along to a download or the native
//! share dialog. Nothing here knows how the receipt is laid out.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAnchorElement;

/// Fixed pixel-density multiplier for exported images
const PIXEL_RATIO: f64 = 2.0;

#[wasm_bindgen]
extern "C" {
    /// window.htmlToImage.toPng(node, options) -> Promise<dataUrl>
    #[wasm_bindgen(js_namespace = ["window", "htmlToImage"], js_name = toPng)]
    fn to_png(node: &web_sys::HtmlElement, options: &JsValue) -> js_sys::Promise;

    /// navigator.share(data) -> Promise<void>
    #[wasm_bindgen(js_namespace = navigator, js_name = share)]
    fn navigator_share(data: &JsValue) -> js_sys::Promise;
}

fn js_error_text(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Capture a fully painted node as a PNG data URL.
///
/// The node must be laid out before this is called; the capture service is
/// handed the element as-is.
pub async fn capture_node(node: &web_sys::HtmlElement) -> Result<String, String> {
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("pixelRatio"), &JsValue::from_f64(PIXEL_RATIO))
        .map_err(js_error_text)?;
    Reflect::set(&options, &JsValue::from_str("cacheBust"), &JsValue::TRUE)
        .map_err(js_error_text)?;

    let result = JsFuture::from(to_png(node, &options)).await.map_err(js_error_text)?;
    result
        .as_string()
        .ok_or_else(|| "Capture service returned a non-string result".to_string())
}

/// Trigger a browser download of a captured image
pub fn download_image(data_url: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "No document available".to_string())?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error_text)?
        .dyn_into()
        .map_err(|_| "Failed to create download link".to_string())?;
    anchor.set_href(data_url);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

/// Hand a captured image to the native share dialog
pub async fn share_image(data_url: &str, title: &str) -> Result<(), String> {
    let data = Object::new();
    Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(title))
        .map_err(js_error_text)?;
    Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(title))
        .map_err(js_error_text)?;
    Reflect::set(&data, &JsValue::from_str("url"), &JsValue::from_str(data_url))
        .map_err(js_error_text)?;

    JsFuture::from(navigator_share(&data)).await.map_err(js_error_text)?;
    Ok(())
}
