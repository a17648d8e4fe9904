//! # 주문(Order) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/rooms/{id}/orders`  → 현재 세션의 주문 라인
//! - `POST   /api/v1/rooms/{id}/orders`  → 주문 추가 `{ menuItemId, quantity }`
//! - `PATCH  /api/v1/orders/{id}`        → 수량 변경 `{ quantity }` (1 이상)
//! - `POST   /api/v1/orders/{id}/adjust` → 수량 증감 `{ delta }`, 0 이하가 되면 삭제
//! - `DELETE /api/v1/orders/{id}`        → 삭제
//!
//! 열린 세션에 속한 주문만 바꿀 수 있습니다. 이미 정산된 세션의 주문은 409입니다.

use crate::{error::AppError, models::*, routes::{AppJson, AppState}};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /rooms/{id}/orders` 응답: `{ "orders": [...] }`
pub async fn list_room_orders(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (_, orders) = state.sessions.current_session(&room_id).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// `POST /rooms/{id}/orders`: 같은 메뉴를 다시 추가하면 새 행이 생깁니다.
pub async fn add_order(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    AppJson(req): AppJson<AddOrderRequest>,
) -> Result<(StatusCode, Json<OrderLine>), AppError> {
    let order = state.sessions.add_order(&room_id, &req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateOrderRequest>,
) -> Result<Json<OrderLine>, AppError> {
    let order = state.sessions.update_order(&id, req.quantity).await?;
    Ok(Json(order))
}

/// `POST /orders/{id}/adjust`: `{ "order": {...} | null, "deleted": bool }`
pub async fn adjust_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<AdjustOrderRequest>,
) -> Result<Json<AdjustOrderResponse>, AppError> {
    let result = state.sessions.adjust_order(&id, req.delta).await?;
    Ok(Json(result))
}

/// `DELETE /orders/{id}`: 성공 시 204
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sessions.delete_order(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::{json, Value};

    /// 룸 하나를 체크인하고 메뉴 하나를 만든 뒤 (room_id, menu_item_id)를 돌려줍니다.
    async fn open_session(app: &Router) -> (String, String) {
        let (_, room) = send(
            app,
            "POST",
            "/api/v1/rooms",
            Some(json!({ "name": "R1", "hourlyRate": 100_000 })),
        )
        .await;
        let room_id = room["id"].as_str().unwrap().to_string();
        send(
            app,
            "POST",
            &format!("/api/v1/rooms/{room_id}/checkin"),
            Some(json!({ "customerName": "Alice" })),
        )
        .await;

        let (_, item) = send(
            app,
            "POST",
            "/api/v1/menu-items",
            Some(json!({ "name": "Snack", "price": 20_000, "category": "snack" })),
        )
        .await;
        (room_id, item["id"].as_str().unwrap().to_string())
    }

    async fn food_charge(app: &Router, room_id: &str) -> i64 {
        let (_, quote) = send(app, "GET", &format!("/api/v1/rooms/{room_id}/quote"), None).await;
        quote["foodCharge"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn order_mutations_move_food_charge() {
        let (app, _pool) = test_app().await;
        let (room_id, item_id) = open_session(&app).await;
        let orders_uri = format!("/api/v1/rooms/{room_id}/orders");

        let (_, first) = send(
            &app,
            "POST",
            &orders_uri,
            Some(json!({ "menuItemId": item_id, "quantity": 1 })),
        )
        .await;
        let (_, second) = send(
            &app,
            "POST",
            &orders_uri,
            Some(json!({ "menuItemId": item_id, "quantity": 2 })),
        )
        .await;
        assert_ne!(first["id"], second["id"]);
        assert_eq!(food_charge(&app, &room_id).await, 60_000);

        let first_id = first["id"].as_str().unwrap();
        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/orders/{first_id}"),
            Some(json!({ "quantity": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["total"], 60_000);
        assert_eq!(food_charge(&app, &room_id).await, 100_000);

        let second_id = second["id"].as_str().unwrap();
        let (status, _) = send(&app, "DELETE", &format!("/api/v1/orders/{second_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(food_charge(&app, &room_id).await, 60_000);

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/orders/{second_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, "GET", &orders_uri, None).await;
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn adjust_below_one_removes_line() {
        let (app, _pool) = test_app().await;
        let (room_id, item_id) = open_session(&app).await;

        let (_, order) = send(
            &app,
            "POST",
            &format!("/api/v1/rooms/{room_id}/orders"),
            Some(json!({ "menuItemId": item_id, "quantity": 1 })),
        )
        .await;
        let adjust_uri = format!("/api/v1/orders/{}/adjust", order["id"].as_str().unwrap());

        let (status, body) = send(&app, "POST", &adjust_uri, Some(json!({ "delta": -1 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);
        assert_eq!(body["order"], Value::Null);
        assert_eq!(food_charge(&app, &room_id).await, 0);
    }

    #[tokio::test]
    async fn bad_order_input_is_rejected() {
        let (app, _pool) = test_app().await;
        let (room_id, item_id) = open_session(&app).await;
        let orders_uri = format!("/api/v1/rooms/{room_id}/orders");

        let (status, body) = send(
            &app,
            "POST",
            &orders_uri,
            Some(json!({ "menuItemId": item_id, "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "quantity");

        let (status, body) = send(
            &app,
            "POST",
            &orders_uri,
            Some(json!({ "menuItemId": item_id, "quantity": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["reason"], "invalid_type");

        let (status, body) = send(
            &app,
            "POST",
            &orders_uri,
            Some(json!({ "menuItemId": "missing", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "menu item not found");

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/v1/orders/missing",
            Some(json!({ "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
