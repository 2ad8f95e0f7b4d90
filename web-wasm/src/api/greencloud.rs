//! GreenCloud API連携（fetch）
//!
//! 投入: `POST {base}/gc/{resource_id}`、結果: `GET {base}/gc/{job_id}/result`。
//! 本文はテキストで受け取り、解釈は共通ライブラリに任せる。

use contact_extract_common::{parse_submit_response, ClientConfig, Error, Result, SubmitRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// 結果エンドポイントの生応答
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// JsValueの例外を表示用の文字列にする
pub fn describe(error: &JsValue) -> String {
    if let Some(e) = error.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

async fn send(request: &Request) -> std::result::Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(request)).await?;
    resp_value.dyn_into()
}

async fn read_text(resp: &Response) -> std::result::Result<String, JsValue> {
    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

/// ジョブを投入してIDを返す
pub async fn submit_job(config: &ClientConfig) -> Result<String> {
    let body = serde_json::to_string(&SubmitRequest::default())?;
    let submission = |e: JsValue| Error::Submission(describe(&e));

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&config.submit_url(), &opts).map_err(submission)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(submission)?;

    let resp = send(&request).await.map_err(submission)?;
    let text = read_text(&resp).await.map_err(submission)?;
    parse_submit_response(resp.status(), &text)
}

/// 結果エンドポイントを1回叩く。通信例外はそのまま返す
pub async fn fetch_result(config: &ClientConfig, job_id: &str) -> std::result::Result<RawResponse, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(&config.result_url(job_id), &opts)?;
    let resp = send(&request).await?;
    let content_type = resp.headers().get("content-type").ok().flatten();
    let body = read_text(&resp).await?;

    Ok(RawResponse {
        status: resp.status(),
        content_type,
        body,
    })
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_describe_js_error_uses_message() {
        let error: JsValue = js_sys::Error::new("Failed to fetch").into();
        assert_eq!(describe(&error), "Failed to fetch");
    }

    #[wasm_bindgen_test]
    fn test_describe_string_value() {
        assert_eq!(describe(&JsValue::from_str("network down")), "network down");
    }
}
