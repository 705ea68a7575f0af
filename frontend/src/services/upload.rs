//! HTTP service for sending the survey spreadsheet to the backend.
//!
//! Every call re-sends the file: the backend keeps nothing between requests.

use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, File, FormData, HtmlAnchorElement, Url};

use crate::config::{DEFAULT_DOWNLOAD_NAME, XLSX_MIME};
use crate::types::{AppError, AppResult, UploadResponse};

/// How long the object URL outlives the download click.
const REVOKE_DELAY_MS: u32 = 1_000;

/// Upload a spreadsheet and get preview, tables and chart.
pub async fn upload_file(file: &File, backend_url: &str) -> AppResult<UploadResponse> {
    let response = post_file(file, &format!("{}/api/upload", backend_url)).await?;

    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

/// Fetch the cleaned workbook and save it through the browser.
///
/// Returns the name the file was saved under.
pub async fn download_export(file: &File, backend_url: &str) -> AppResult<String> {
    let response = post_file(file, &format!("{}/api/export", backend_url)).await?;

    let file_name = response
        .headers()
        .get("content-disposition")
        .and_then(|value| attachment_name(&value))
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string());

    let bytes = response
        .binary()
        .await
        .map_err(|e| AppError::Download(format!("Failed to read file: {}", e)))?;

    save_bytes(&bytes, &file_name, XLSX_MIME)?;
    Ok(file_name)
}

/// POST the file as the `file` field of a multipart form.
async fn post_file(file: &File, url: &str) -> AppResult<Response> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Upload(format!("Failed to create FormData: {:?}", e)))?;
    form_data
        .append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| AppError::Upload(format!("Failed to append file: {:?}", e)))?;

    let request = Request::post(url)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Server(server_message(status, &text)));
    }

    Ok(response)
}

/// Error message from a `{ "status": "error", "error": ... }` body.
fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("Server error ({}): {}", status, body))
}

/// File name from a `Content-Disposition: attachment; filename="..."` value.
fn attachment_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Hand bytes to the browser as a file download.
fn save_bytes(bytes: &[u8], file_name: &str, mime: &str) -> AppResult<()> {
    let to_err = |e: wasm_bindgen::JsValue| AppError::Download(format!("{:?}", e));

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(to_err)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(to_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document".into()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(to_err)?
        .dyn_into()
        .map_err(|_| AppError::Download("Not an anchor element".into()))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // The URL must stay valid until the browser has started the download
    Timeout::new(REVOKE_DELAY_MS, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();
    Ok(())
}
