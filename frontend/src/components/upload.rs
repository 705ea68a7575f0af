//! Step 1: pick the survey spreadsheet and send it to the backend.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

use super::logs::add_log;
use crate::services::upload_file;
use crate::{LogEntry, LogLevel, UploadResponse, ACCEPTED_FILES, BACKEND_URL, MAX_FILE_SIZE};

#[component]
pub fn UploadSection(
    set_file: WriteSignal<Option<File>>,
    set_response: WriteSignal<Option<UploadResponse>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_error.set(None);
        set_response.set(None);
        set_file.set(None);

        if file.size() > MAX_FILE_SIZE {
            let message = format!("El archivo supera el límite de {} MB", MAX_FILE_SIZE / 1024.0 / 1024.0);
            add_log(set_logs, LogLevel::Error, &message);
            set_error.set(Some(message));
            return;
        }

        spawn_local(async move {
            set_is_uploading.set(true);
            add_log(set_logs, LogLevel::Info, &format!("📤 Enviando {}...", file.name()));

            match upload_file(&file, BACKEND_URL).await {
                Ok(response) => {
                    add_log(
                        set_logs,
                        LogLevel::Success,
                        &format!(
                            "✅ {} registros, {} establecimientos, {} hospitales",
                            response.record_count,
                            response.pivot.rows.len(),
                            response.hospitals.rows.len()
                        ),
                    );
                    if let Some(reason) = &response.chart_error {
                        add_log(set_logs, LogLevel::Warning, &format!("Sin gráfico: {}", reason));
                    }
                    set_file.set(Some(file));
                    set_response.set(Some(response));
                }
                Err(e) => {
                    add_log(set_logs, LogLevel::Error, &format!("❌ {}", e));
                    set_error.set(Some(e.to_string()));
                }
            }

            set_is_uploading.set(false);
        });
    };

    // Click anywhere on the zone to open the picker
    let trigger_file_input = move |_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"))
        {
            if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                html_input.click();
            }
        }
    };

    view! {
        <section class="step">
            <h2>"Paso 1: Cargar archivo Excel"</h2>
            <div
                class="upload-section"
                id="uploadZone"
                on:click=trigger_file_input
            >
                <div class="upload-icon">"📤"</div>
                <div class="upload-text">
                    {move || if is_uploading.get() {
                        "⏳ Procesando archivo..."
                    } else {
                        "Seleccione el reporte de opiniones"
                    }}
                </div>

                <Show
                    when=move || !is_uploading.get()
                    fallback=|| view! { }
                >
                    <div class="upload-hint">"Formatos: .xlsx, .xls, .ods o .csv"</div>
                    <div class="upload-hint">
                        "El encabezado se espera en la fila 6 (se omiten las 5 primeras filas)"
                    </div>
                </Show>

                <Show
                    when=move || error.get().is_some()
                    fallback=|| view! { }
                >
                    <div class="error-message">
                        {move || error.get().unwrap_or_default()}
                    </div>
                </Show>

                <input
                    type="file"
                    id="fileInput"
                    accept=ACCEPTED_FILES
                    style="display:none"
                    on:change=on_file_change
                    on:click=|ev| ev.stop_propagation()
                />
            </div>
        </section>
    }
}
