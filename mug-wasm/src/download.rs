use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Url};
use wrap_render::ExportArtifact;

/// Offers `artifact` as a file download through a temporary object URL.
pub fn save_artifact(document: &Document, artifact: &ExportArtifact) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&Uint8Array::from(artifact.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(artifact.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", &artifact.file_name)?;
    a.click();
    Url::revoke_object_url(&url)?;
    log::info!("download offered: {}", artifact.file_name);
    Ok(())
}
