//! 検索ボックス

use contact_extract_common::ViewState;
use leptos::prelude::*;

use crate::app::transition;

#[component]
pub fn SearchBox(state: RwSignal<ViewState>) -> impl IntoView {
    view! {
        <div class="search-box">
            <input
                type="text"
                placeholder="Search the table"
                prop:value=move || state.with(|s| s.search_term.clone())
                on:input=move |ev| {
                    let term = event_target_value(&ev);
                    transition(state, |s| s.set_search_term(term));
                }
            />
        </div>
    }
}
