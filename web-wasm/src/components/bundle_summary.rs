//! 重複・空レコード・抽出失敗の要約

use contact_extract_common::{FailedExtraction, ViewState};
use leptos::prelude::*;

#[component]
pub fn BundleSummary(state: RwSignal<ViewState>) -> impl IntoView {
    let summary = move || {
        state.with(|s| {
            s.result
                .as_ref()
                .map(|r| &r.bundle)
                .filter(|b| b.has_side_buckets())
                .map(|b| {
                    (
                        b.duplicates.len(),
                        b.empty_records.len(),
                        b.failed_extractions.clone(),
                    )
                })
        })
    };

    move || {
        summary().map(|(duplicates, empty, failed)| {
            view! {
                <div class="bundle-summary">
                    <p>
                        {format!(
                            "Duplicates: {} / Empty records: {} / Failed extractions: {}",
                            duplicates,
                            empty,
                            failed.len()
                        )}
                    </p>
                    <ul>
                        {failed
                            .into_iter()
                            .map(|FailedExtraction { file_name, error }| {
                                view! { <li>{format!("{}: {}", file_name, error)}</li> }
                            })
                            .collect_view()}
                    </ul>
                </div>
            }
        })
    }
}
