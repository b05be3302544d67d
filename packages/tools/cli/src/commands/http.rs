use anyhow::Context as _;
use fdk_core::auth::SESSION_COOKIE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::context::EffectiveContext;

pub fn client() -> Client {
    Client::new()
}

/// 세션 쿠키 헤더 값
pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE, token)
}

/// 세션 쿠키 부착
///
/// Console은 `authjs.session-token` 쿠키로 세션을 식별합니다.
pub fn with_session(ctx: &EffectiveContext, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
    let token = ctx.require_token()?;
    Ok(req
        .header(reqwest::header::COOKIE, session_cookie(token))
        .header(reqwest::header::ACCEPT, "application/json"))
}

/// 요청 전송 (리다이렉트 응답은 세션 문제로 취급)
pub async fn send(req: RequestBuilder) -> anyhow::Result<Response> {
    let resp = req.send().await.context("request failed")?;
    let status = resp.status();
    if status.is_redirection() {
        return Err(anyhow::anyhow!(
            "redirected by console ({}); session cookie missing",
            status
        ));
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("request failed ({}): {}", status, error_message(&text)));
    }
    Ok(resp)
}

pub async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> anyhow::Result<T> {
    let resp = send(req).await?;
    let body = resp.json::<T>().await.context("invalid json response")?;
    Ok(body)
}

/// 상태 코드만 확인 (에러 본문은 메시지로 변환)
pub async fn send_status(req: RequestBuilder) -> anyhow::Result<(StatusCode, Option<String>)> {
    let resp = req.send().await.context("request failed")?;
    let status = resp.status();
    if status.is_success() {
        return Ok((status, None));
    }
    let text = resp.text().await.unwrap_or_default();
    Ok((status, Some(error_message(&text))))
}

/// `{"error":{"code","message"}}` 본문에서 메시지 추출
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let code = v["error"]["code"].as_str()?.to_string();
            let message = v["error"]["message"].as_str()?.to_string();
            Some(format!("{}: {}", code, message))
        })
        .unwrap_or_else(|| body.to_string())
}
