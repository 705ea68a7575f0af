//! Step 3: save the cleaned workbook.

use leptos::*;
use web_sys::File;

use super::logs::add_log;
use crate::services::download_export;
use crate::{LogEntry, LogLevel, BACKEND_URL};

#[component]
pub fn DownloadSection(
    file: ReadSignal<Option<File>>,
    file_name: String,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_downloading, set_is_downloading) = create_signal(false);

    let on_download = move |_| {
        let Some(file) = file.get() else {
            return;
        };

        spawn_local(async move {
            set_is_downloading.set(true);
            match download_export(&file, BACKEND_URL).await {
                Ok(saved) => add_log(set_logs, LogLevel::Success, &format!("💾 Descargado: {}", saved)),
                Err(e) => add_log(set_logs, LogLevel::Error, &format!("❌ {}", e)),
            }
            set_is_downloading.set(false);
        });
    };

    view! {
        <section class="step">
            <h2>"Paso 3: Descargar archivo procesado"</h2>
            <button
                class="btn btn-primary"
                on:click=on_download
                disabled=move || is_downloading.get() || file.get().is_none()
            >
                {move || if is_downloading.get() {
                    "⏳ Generando...".to_string()
                } else {
                    "📥 Descargar archivo Excel procesado".to_string()
                }}
            </button>
            <p class="hint">{file_name}</p>
        </section>
    }
}
