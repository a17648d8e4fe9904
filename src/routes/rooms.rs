//! # 룸(Room) 라우트 핸들러
//!
//! 룸 레지스트리 CRUD와 세션 라이프사이클 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/rooms`               → 룸 목록 (이름순)
//! - `POST   /api/v1/rooms`               → 룸 생성
//! - `GET    /api/v1/rooms/{id}`          → 룸 조회
//! - `PATCH  /api/v1/rooms/{id}`          → 이름/요금 수정
//! - `DELETE /api/v1/rooms/{id}`          → 룸 삭제 (점유 중이면 409)
//! - `POST   /api/v1/rooms/{id}/checkin`  → 체크인
//! - `GET    /api/v1/rooms/{id}/session`  → 현재 세션 + 주문 라인
//! - `GET    /api/v1/rooms/{id}/quote`    → 실시간 견적
//! - `POST   /api/v1/rooms/{id}/checkout` → 체크아웃, 인보이스 반환
//!
//! 시각이 필요한 연산은 여기서 `Utc::now()`를 한 번 읽어 서비스에 넘깁니다.

use crate::{
    db,
    error::AppError,
    models::*,
    routes::{AppJson, AppState},
    services::Quote,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

/// `GET /rooms`: 모든 룸을 이름순으로 조회합니다.
///
/// 응답: `{ "rooms": [...] }`
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let rooms = db::list_rooms(&state.pool).await?;
    Ok(Json(json!({ "rooms": rooms })))
}

/// `POST /rooms`: 새 룸을 만듭니다. 처음 상태는 `available`.
pub async fn create_room(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    req.validate()?;
    let room = db::create_room(&state.pool, req.name.trim(), req.hourly_rate, Utc::now()).await?;
    tracing::info!(room_id = %room.id, room_name = %room.name, hourly_rate = room.hourly_rate, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Room>, AppError> {
    let room = db::get_room(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("room"))?;
    Ok(Json(room))
}

/// `PATCH /rooms/{id}`: 이름/시간당 요금만 부분 수정합니다.
///
/// 진행 중 세션의 요금도 체크아웃 시점의 요금으로 계산됩니다.
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateRoomRequest>,
) -> Result<Json<Room>, AppError> {
    req.validate()?;
    let room = db::update_room(
        &state.pool,
        &id,
        req.name.as_deref().map(str::trim),
        req.hourly_rate,
    )
    .await?
    .ok_or(AppError::NotFound("room"))?;
    Ok(Json(room))
}

/// `DELETE /rooms/{id}`: 성공 시 204.
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sessions.delete_room(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /rooms/{id}/checkin`: `{ customerName, customerPhone? }` → `{ sessionId, startTime }`
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), AppError> {
    let session = state.sessions.check_in(&id, &req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /rooms/{id}/session`: `{ "session": {...}, "orders": [...] }`
pub async fn current_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (session, orders) = state.sessions.current_session(&id).await?;
    Ok(Json(json!({ "session": session, "orders": orders })))
}

/// `GET /rooms/{id}/quote`: 상태를 바꾸지 않는 실시간 견적
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quote>, AppError> {
    let quote = state.sessions.quote(&id, Utc::now()).await?;
    Ok(Json(quote))
}

/// `POST /rooms/{id}/checkout`: `{ paymentMethod?, sessionId? }` → 인보이스
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let invoice = state
        .sessions
        .checkout(
            &id,
            req.payment_method.as_deref(),
            req.session_id.as_deref(),
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}
