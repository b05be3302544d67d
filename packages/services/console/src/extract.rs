//! 요청 추출기
//!
//! axum 기본 `Json` 거부 응답은 평문입니다. 여기서는 거부를 `ConsoleError::BadRequest`로
//! 바꿔 모든 에러가 같은 JSON 형태로 나가게 합니다.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::ConsoleError;

/// JSON 요청 본문
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ConsoleError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
                Err(ConsoleError::BadRequest {
                    message: rejection.body_text(),
                })
            }
        }
    }
}
