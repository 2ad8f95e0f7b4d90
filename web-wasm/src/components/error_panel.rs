//! エラー表示（最後の失敗をそのまま出す）
//!
//! サーバー本文の改行や空白を保つため `<pre>` に入れる。

use contact_extract_common::ViewState;
use leptos::prelude::*;

#[component]
pub fn ErrorPanel(state: RwSignal<ViewState>) -> impl IntoView {
    move || {
        state.with(|s| s.error.clone()).map(|error| {
            view! {
                <div class="error-panel">
                    <strong>"Error"</strong>
                    <pre>{error}</pre>
                </div>
            }
        })
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use contact_extract_common::Error;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_multiline_server_body_is_kept_verbatim() {
        let document = web_sys::window().unwrap().document().unwrap();
        let parent: web_sys::HtmlElement = document.create_element("div").unwrap().unchecked_into();
        document.body().unwrap().append_child(&parent).unwrap();

        let (state, generation) = ViewState::new().begin_submit();
        let state = state.submit_failed(
            generation,
            &Error::Server {
                status: 500,
                body: "line one\n    line two".into(),
            },
        );
        let state = RwSignal::new(state);

        let _handle = leptos::mount::mount_to(parent.clone(), move || view! { <ErrorPanel state=state /> });

        let pre = parent.query_selector("pre").unwrap().expect("<pre> が無い");
        assert_eq!(
            pre.text_content().as_deref(),
            Some("Error (500): line one\n    line two")
        );
    }
}
