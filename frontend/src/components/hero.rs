//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Análisis de Satisfacción Hospitalaria"</h1>
            <p class="subtitle">
                "Cargue el reporte de opiniones exportado en Excel. "
                "Se resumen las valoraciones por establecimiento, se descarga la tabla limpia "
                "y se grafica la satisfacción de los hospitales."
            </p>
        </div>
    }
}
