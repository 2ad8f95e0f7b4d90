//! 連絡先テーブル
//!
//! 検索語で絞り込んだ行だけを描画する。欠損値は `N/A`、住所は改行を保つ。

use contact_extract_common::types::CONTACT_COLUMNS;
use contact_extract_common::{ContactRecord, ViewState};
use leptos::prelude::*;

#[component]
pub fn ContactTable(state: RwSignal<ViewState>) -> impl IntoView {
    let rows = move || {
        state.with(|s| s.visible_rows().into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <table class="contact-table">
            <thead>
                <tr>
                    {CONTACT_COLUMNS.iter().map(|column| view! { <th>{*column}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>
                {move || rows().into_iter().map(|record| view! { <ContactRow record=record /> }).collect_view()}
            </tbody>
        </table>
        <p class="text-muted">
            {move || state.with(|s| {
                let total = s.result.as_ref().map_or(0, |r| r.contacts().len());
                let shown = s.visible_rows().len();
                if s.search_term.is_empty() {
                    format!("{} contacts", total)
                } else {
                    format!("{} of {} contacts", shown, total)
                }
            })}
        </p>
    }
}

#[component]
fn ContactRow(record: ContactRecord) -> impl IntoView {
    let [name, address, phone, email] = record.cells().map(String::from);

    view! {
        <tr>
            <td>{name}</td>
            <td class="address">{address}</td>
            <td>{phone}</td>
            <td>{email}</td>
        </tr>
    }
}
