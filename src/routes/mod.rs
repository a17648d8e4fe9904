//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 핸들러는 입력을 꺼내 서비스/DB 계층에 넘기고, 결과를 JSON으로 돌려주는 얇은 층입니다.
//!
//! 각 하위 모듈:
//! - `rooms`: 룸 CRUD, 체크인, 세션 조회, 견적, 체크아웃
//! - `orders`: 주문 라인 추가/수량 변경/증감/삭제
//! - `invoices`: 인보이스 이력과 매출 요약
//! - `menu`: 카탈로그 메뉴 항목 CRUD
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod health;
pub mod invoices;
pub mod menu;
pub mod orders;
pub mod rooms;

pub use health::*;
pub use invoices::*;
pub use menu::*;
pub use orders::*;
pub use rooms::*;

use crate::{error::AppError, services::SessionController};
use axum::{
    extract::FromRequest,
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`과 `SessionController` 모두 내부가 Arc라서 clone이 저렴합니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: SessionController,
}

/// 요청 본문 JSON 추출기
///
/// `axum::Json`과 같지만, 본문을 읽거나 파싱하지 못하면 axum 기본 응답(평문 400/415/422) 대신
/// `AppError`로 바꿔서 다른 검증 에러와 같은 `{ "error": {...} }` 모양으로 응답합니다.
/// 응답 쪽은 그대로 `axum::Json`을 씁니다.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `/api/v1` 아래의 모든 API 라우트
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // 룸 레지스트리
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room).patch(update_room).delete(delete_room))
        // 세션 라이프사이클
        .route("/rooms/{id}/checkin", post(check_in))
        .route("/rooms/{id}/session", get(current_session))
        .route("/rooms/{id}/orders", get(list_room_orders).post(add_order))
        .route("/rooms/{id}/quote", get(quote))
        .route("/rooms/{id}/checkout", post(checkout))
        // 세션 원장
        .route("/orders/{id}", patch(update_order).delete(delete_order))
        .route("/orders/{id}/adjust", post(adjust_order))
        // 인보이스 아카이브
        .route("/invoices", get(list_invoices))
        .route("/invoices/summary", get(invoice_summary))
        .route("/invoices/{id}", get(get_invoice))
        // 카탈로그
        .route("/menu-items", get(list_menu_items).post(create_menu_item))
        .route(
            "/menu-items/{id}",
            get(get_menu_item).patch(update_menu_item).delete(delete_menu_item),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

/// 미들웨어까지 붙인 완성된 앱 라우터
///
/// 타임아웃이 나면 408을 돌려줍니다. 클라이언트는 결과를 모르는 상태이므로
/// 룸 상태(또는 `GET /invoices?session_id=`)를 다시 조회해야 합니다.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::services::RoomLocks;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn test_app() -> (Router, SqlitePool) {
        let pool = crate::db::test_pool().await;
        let sessions = SessionController::new(pool.clone(), RoomLocks::new(), "cash");
        let state = AppState {
            pool: pool.clone(),
            sessions,
        };
        (app(state, Duration::from_secs(10)), pool)
    }

    /// 요청 하나를 보내고 (상태 코드, JSON 본문)을 돌려줍니다. 본문이 없으면 `Value::Null`.
    pub async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        match body {
            Some(json) => {
                send_raw(app, method, uri, Some("application/json"), &json.to_string()).await
            }
            None => send_raw(app, method, uri, None, "").await,
        }
    }

    /// 본문을 문자열 그대로 보냅니다. 깨진 JSON이나 잘못된 Content-Type 테스트용.
    pub async fn send_raw(
        app: &Router,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
