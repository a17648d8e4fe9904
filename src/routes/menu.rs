//! # 메뉴(Menu) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/menu-items?category=&availableOnly=` → 목록
//! - `POST   /api/v1/menu-items`                         → 생성
//! - `GET    /api/v1/menu-items/{id}`                    → 조회
//! - `PATCH  /api/v1/menu-items/{id}`                    → 부분 수정
//! - `DELETE /api/v1/menu-items/{id}`                    → 삭제
//!
//! 가격을 바꾸거나 삭제해도 이미 들어간 주문 라인은 그대로입니다.

use crate::{db, error::AppError, models::*, routes::{AppJson, AppState}};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

/// `GET /menu-items` 응답: `{ "menuItems": [...] }`
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuItemQuery>,
) -> Result<Json<Value>, AppError> {
    let items = db::list_menu_items(&state.pool, &query).await?;
    Ok(Json(json!({ "menuItems": items })))
}

pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>, AppError> {
    let item = db::get_menu_item(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("menu item"))?;
    Ok(Json(item))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    req.validate()?;
    let item = db::create_menu_item(&state.pool, &req, Utc::now()).await?;
    tracing::debug!(menu_item_id = %item.id, price = item.price, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, AppError> {
    req.validate()?;
    let item = db::update_menu_item(&state.pool, &id, &req, Utc::now())
        .await?
        .ok_or(AppError::NotFound("menu item"))?;
    Ok(Json(item))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_menu_item(&state.pool, &id).await? {
        return Err(AppError::NotFound("menu item"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn catalog_crud_and_filters() {
        let (app, _pool) = test_app().await;

        let (status, beer) = send(
            &app,
            "POST",
            "/api/v1/menu-items",
            Some(json!({ "name": " Beer ", "price": 25_000, "category": "do-uong" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(beer["name"], "Beer");
        assert_eq!(beer["isAvailable"], true);
        let beer_id = beer["id"].as_str().unwrap();

        send(
            &app,
            "POST",
            "/api/v1/menu-items",
            Some(json!({ "name": "Fries", "price": 30_000, "category": "do-an", "isAvailable": false })),
        )
        .await;

        let (_, body) = send(&app, "GET", "/api/v1/menu-items?availableOnly=true", None).await;
        assert_eq!(body["menuItems"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/api/v1/menu-items?category=do-an", None).await;
        assert_eq!(body["menuItems"][0]["name"], "Fries");

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/menu-items/{beer_id}"),
            Some(json!({ "price": 27_000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["price"], 27_000);
        assert_eq!(updated["category"], "do-uong");

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/menu-items/{beer_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/v1/menu-items/{beer_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_menu_items_are_rejected() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/menu-items",
            Some(json!({ "name": "Water", "price": -1, "category": "do-uong" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "price");
        assert_eq!(body["error"]["reason"], "non_positive");

        let (status, body) = send(
            &app,
            "PATCH",
            "/api/v1/menu-items/missing",
            Some(json!({ "category": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["reason"], "blank");
    }
}
