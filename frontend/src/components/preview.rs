//! Tables: raw preview (step 1) and pivoted summary (step 2).

use leptos::*;

use crate::types::{cell_text, PivotTable, Preview};

/// Plain HTML table.
#[component]
pub fn DataTable(headers: Vec<String>, rows: Vec<Vec<String>>) -> impl IntoView {
    view! {
        <div class="table-wrapper">
            <table class="data-table">
                <thead>
                    <tr>
                        {headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <tr>
                                {row.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

/// Pivot table rows as display strings.
pub fn pivot_rows(table: &PivotTable) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.facility.clone())
                .chain(row.counts.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect()
}

/// Raw rows as uploaded, before normalization.
#[component]
pub fn PreviewSection(preview: Preview, source: String) -> impl IntoView {
    let rows: Vec<Vec<String>> = preview
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    let shown = rows.len();

    view! {
        <div class="preview-section">
            <h3>"Vista previa del archivo original"</h3>
            <p class="hint">
                {format!("{} · mostrando {} de {} filas", source, shown, preview.total_rows)}
            </p>
            <DataTable headers=preview.headers rows=rows/>
        </div>
    }
}

/// Step 2: the pivoted table, all facilities.
#[component]
pub fn PivotSection(table: PivotTable, normalized_count: usize) -> impl IntoView {
    let headers = table.headers();
    let rows = pivot_rows(&table);
    let count = rows.len();

    view! {
        <section class="step">
            <h2>"Paso 2: Procesamiento de datos"</h2>
            <p class="hint">
                {format!(
                    "{} establecimientos · {} nombres abreviados (HOSPITAL NACIONAL → HN)",
                    count, normalized_count
                )}
            </p>
            <DataTable headers=headers rows=rows/>
        </section>
    }
}
