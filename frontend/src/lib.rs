//! Hospivot - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend that walks an analyst through the four steps:
//! upload the survey export, review the pivoted table, download the cleaned
//! workbook, and look at the hospitals chart.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (loaded file)                                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection + PreviewSection   (Paso 1)              │
//! │  ├── PivotSection                     (Paso 2)              │
//! │  ├── DownloadSection                  (Paso 3)              │
//! │  ├── ChartSection                     (Paso 4)              │
//! │  └── LogsPanel                                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Mirrors of the backend response, logs, errors
//! - [`components`] - UI components
//! - [`services`] - Backend communication

use leptos::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Tables
    PivotRow, PivotTable, Preview,
    // Logs
    LogEntry, LogLevel,
    // API
    DownloadInfo, SourceFormat, UploadResponse,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🏥 Hospivot - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (file, set_file) = create_signal(None::<File>);
    let (response, set_response) = create_signal(None::<UploadResponse>);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // One SSE connection for the whole session
    init_sse_logs(set_logs);

    let file_name = Signal::derive(move || response.get().and_then(|r| r.file_name));

    view! {
        <Header file_name=file_name/>

        <div class="container">
            <Hero/>

            <UploadSection
                set_file=set_file
                set_response=set_response
                set_logs=set_logs
            />

            {move || response.get().map(|r| {
                let source = r.source.to_string();
                view! {
                    <PreviewSection preview=r.preview source=source/>
                    <PivotSection table=r.pivot normalized_count=r.normalized_count/>
                    <DownloadSection
                        file=file
                        file_name=r.download.file_name
                        set_logs=set_logs
                    />
                    <ChartSection
                        hospitals=r.hospitals
                        chart_svg=r.chart_svg
                        chart_error=r.chart_error
                    />
                }
            })}

            <Show
                when=move || !logs.get().is_empty()
                fallback=|| view! { }
            >
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>
        </div>

        <Footer/>
    }
}
