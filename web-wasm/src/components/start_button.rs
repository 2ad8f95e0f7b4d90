//! 処理開始ボタン

use contact_extract_common::ViewState;
use leptos::prelude::*;

/// 処理中はラベルが変わり、押せなくなる
#[component]
pub fn StartButton<F>(state: RwSignal<ViewState>, on_start: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <button
            class="btn btn-primary"
            disabled=move || state.with(ViewState::is_busy)
            on:click={
                let on_start = on_start.clone();
                move |_| on_start(())
            }
        >
            {move || state.with(ViewState::button_label)}
        </button>
    }
}
