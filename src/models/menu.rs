//! # 메뉴(카탈로그) 모델 정의
//!
//! 세션 엔진은 메뉴의 id / name / price / is_available 만 읽습니다.
//! 나머지 필드(설명, 카테고리, 이미지)는 카탈로그 관리용입니다.

use super::not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    /// 카테고리 태그 (예: "do-an", "do-uong", "snack")
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 메뉴 생성 요청: `POST /api/v1/menu-items`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, code = "non_positive"))]
    pub price: i64,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    pub image_url: Option<String>,
    /// 생략하면 판매 가능(true)
    pub is_available: Option<bool>,
}

/// 메뉴 수정 요청: `PATCH /api/v1/menu-items/{id}` (부분 업데이트)
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, code = "non_positive"))]
    pub price: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// `GET /api/v1/menu-items` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}
