//! メインアプリケーションコンポーネント
//!
//! 画面状態は `ViewState` 1つを `RwSignal` に載せ、遷移関数でのみ更新する。
//! ポーリングは `spawn_local` のループで、ジョブごとの `CancellationToken` を持つ。
//! ジョブのトークンは画面破棄で止まるルートの子で、タイマー待ちと通信待ちは
//! どちらもトークンと競わせる。

use std::future::Future;
use std::pin::pin;

use chrono::Utc;
use contact_extract_common::poll::{limit_reached, transport_failure};
use contact_extract_common::{classify_response, ClientConfig, Error, PollOutcome, PollTicket, ViewState};
use futures::future::{self as fut, Either};
use gloo::console;
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tokio_util::sync::CancellationToken;

use crate::api::greencloud::{describe, fetch_result, submit_job};
use crate::components::{
    bundle_summary::BundleSummary,
    contact_table::ContactTable,
    error_panel::ErrorPanel,
    header::Header,
    loading_panel::LoadingPanel,
    search_box::SearchBox,
    start_button::StartButton,
};

/// `future` をキャンセルと競わせる。キャンセルが先なら `future` を破棄して None
///
/// 破棄された `TimeoutFuture` はタイマーを解除する。
async fn until_cancelled<F: Future>(token: &CancellationToken, future: F) -> Option<F::Output> {
    let cancelled = pin!(token.cancelled());
    let future = pin!(future);
    match fut::select(cancelled, future).await {
        Either::Left(_) => None,
        Either::Right((output, _)) => Some(output),
    }
}

/// 状態を遷移させる。シグナル破棄後なら false
pub fn transition(state: RwSignal<ViewState>, f: impl FnOnce(ViewState) -> ViewState) -> bool {
    state
        .try_update(|s| *s = f(std::mem::take(s)))
        .is_some()
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(ViewState::new());
    let config = StoredValue::new(ClientConfig::default());
    let current = StoredValue::new(None::<CancellationToken>);

    // 画面破棄で全ジョブを止める
    let unmounted = CancellationToken::new();
    on_cleanup({
        let unmounted = unmounted.clone();
        move || unmounted.cancel()
    });

    let on_start = move |_| {
        if state.with_untracked(ViewState::is_busy) {
            return;
        }

        // 前のジョブのループは投入前に止める
        current.with_value(|token| {
            if let Some(token) = token {
                token.cancel();
            }
        });
        let token = unmounted.child_token();
        current.set_value(Some(token.clone()));

        let mut generation = 0;
        state.update(|s| {
            let (next, g) = std::mem::take(s).begin_submit();
            *s = next;
            generation = g;
        });

        spawn_local(run_job(state, config.get_value(), generation, token));
    };

    let has_data = move || state.with(|s| s.result.is_some());

    view! {
        <div class="container">
            <Header />

            <StartButton state=state on_start=on_start />

            <Show when=move || state.with(ViewState::is_busy) && !has_data()>
                <LoadingPanel />
            </Show>

            <Show when=has_data>
                <SearchBox state=state />
                <ContactTable state=state />
                <BundleSummary state=state />
            </Show>

            <ErrorPanel state=state />
        </div>
    }
}

/// 投入 → ポーリング → 結果/エラー確定
async fn run_job(state: RwSignal<ViewState>, config: ClientConfig, generation: u64, token: CancellationToken) {
    let Some(submitted) = until_cancelled(&token, submit_job(&config)).await else {
        return;
    };

    let job_id = match submitted {
        Ok(job_id) => job_id,
        Err(e) => {
            console::error!(format!("submission failed: {}", e));
            transition(state, |s| s.submit_failed(generation, &e));
            return;
        }
    };
    console::log!(format!("job submitted: {}", job_id));

    if !transition(state, |s| s.submit_succeeded(generation, job_id, Utc::now())) {
        return;
    }
    let Some(ticket) = state.try_with_untracked(ViewState::ticket).flatten() else {
        return;
    };

    poll_until_done(state, &config, &ticket, &token).await;
}

/// 一定間隔で結果を取りに行く。最初のリクエストは1間隔後
async fn poll_until_done(
    state: RwSignal<ViewState>,
    config: &ClientConfig,
    ticket: &PollTicket,
    token: &CancellationToken,
) {
    let interval_ms = u32::try_from(config.poll_interval_ms).unwrap_or(u32::MAX);
    let policy = config.dedup_policy();
    let mut polls: u32 = 0;

    loop {
        if until_cancelled(token, TimeoutFuture::new(interval_ms)).await.is_none() {
            transition(state, |s| s.abort(ticket));
            return;
        }

        // 応答待ちの間に中止されたら応答は捨てる
        let Some(fetched) = until_cancelled(token, fetch_result(config, &ticket.job_id)).await else {
            transition(state, |s| s.abort(ticket));
            return;
        };
        let outcome = match fetched {
            Ok(raw) => classify_response(raw.status, raw.content_type.as_deref(), raw.body, policy),
            Err(e) => transport_failure(describe(&e)),
        };

        polls += 1;
        match outcome {
            PollOutcome::Pending => {
                console::debug!(format!("job {} not ready yet (poll {})", ticket.job_id, polls));
                if limit_reached(polls, config.max_polls) {
                    transition(state, |s| s.poll_failed(ticket, &Error::PollLimit(polls)));
                    return;
                }
                if !transition(state, |s| s.poll_tick(ticket)) {
                    return;
                }
            }
            PollOutcome::Succeeded(result) => {
                console::log!(format!(
                    "job {} succeeded: {} contacts",
                    ticket.job_id,
                    result.contacts().len()
                ));
                transition(state, |s| s.poll_succeeded(ticket, result));
                return;
            }
            PollOutcome::Failed(e) => {
                console::error!(format!(
                    "job {} failed: {} {}",
                    ticket.job_id,
                    e,
                    e.detail().unwrap_or_default()
                ));
                transition(state, |s| s.poll_failed(ticket, &e));
                return;
            }
        }
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// 待機中のタイマーはキャンセル時点で打ち切られる
    #[wasm_bindgen_test]
    async fn test_cancel_interrupts_timer() {
        let token = CancellationToken::new();
        let cancel = token.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(10).await;
            cancel.cancel();
        });

        let started = js_sys::Date::now();
        let waited = until_cancelled(&token, TimeoutFuture::new(60_000)).await;

        assert!(waited.is_none());
        assert!(js_sys::Date::now() - started < 5_000.0);
    }
}
