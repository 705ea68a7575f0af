//! Step 4: hospitals-only table and the stacked bar chart.

use leptos::*;

use super::preview::{pivot_rows, DataTable};
use crate::types::PivotTable;

#[component]
pub fn ChartSection(
    hospitals: PivotTable,
    chart_svg: Option<String>,
    chart_error: Option<String>,
) -> impl IntoView {
    let headers = hospitals.headers();
    let rows = pivot_rows(&hospitals);

    view! {
        <section class="step">
            <h2>"Paso 4: Generar gráfico de opiniones"</h2>
            <h3>"Datos filtrados (solo hospitales)"</h3>
            <DataTable headers=headers rows=rows/>
            <h3>"Gráfico de Opiniones por Categoría de Satisfacción"</h3>
            {match chart_svg {
                // Trusted markup rendered by our own backend
                Some(svg) => view! { <div class="chart" inner_html=svg></div> }.into_view(),
                None => view! {
                    <div class="warning-message">
                        {chart_error.unwrap_or_else(|| "No hay gráfico disponible".to_string())}
                    </div>
                }
                .into_view(),
            }}
        </section>
    }
}
