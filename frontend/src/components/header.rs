//! Top bar with the name of the loaded file.

use leptos::*;

#[component]
pub fn Header(file_name: Signal<Option<String>>) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"HOSPIVOT"</a>
            </div>
            <div class="header-right">
                <span class="badge" class:loaded=move || file_name.get().is_some()>
                    {move || file_name.get().unwrap_or_else(|| "Sin archivo".to_string())}
                </span>
            </div>
        </header>
    }
}
