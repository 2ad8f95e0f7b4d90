//! 処理待ち表示

use leptos::prelude::*;

#[component]
pub fn LoadingPanel() -> impl IntoView {
    view! {
        <div class="loading-panel">
            <p>"Please be patient, GreenCloud is hard at work!"</p>
        </div>
    }
}
