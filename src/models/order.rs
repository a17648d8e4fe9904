//! # 주문 라인 모델 정의
//!
//! 주문 라인은 정확히 하나의 세션과 하나의 룸에 속합니다.
//! 메뉴 이름과 단가는 주문 시점의 스냅샷이라, 나중에 메뉴 가격을 바꿔도
//! 이미 들어간 주문과 인보이스 금액은 변하지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 주문 라인: DB의 `orders` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub room_id: String,
    pub session_id: String,
    pub menu_item_id: String,
    /// 주문 시점의 메뉴 이름 스냅샷
    pub menu_item_name: String,
    /// 항상 1 이상. 0 이하가 되면 행을 지웁니다.
    pub quantity: i64,
    /// 주문 시점의 단가 스냅샷
    pub unit_price: i64,
    /// quantity × unit_price
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

/// 원장에 새 라인을 쓸 때 필요한 값 묶음
#[derive(Debug, Clone)]
pub struct NewOrderLine<'a> {
    pub room_id: &'a str,
    pub session_id: &'a str,
    pub menu_item_id: &'a str,
    pub menu_item_name: &'a str,
    pub quantity: i64,
    pub unit_price: i64,
}

/// 주문 추가 요청: `POST /api/v1/rooms/{id}/orders`
///
/// 이름과 단가는 서버가 카탈로그에서 읽어 스냅샷으로 저장합니다.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderRequest {
    pub menu_item_id: String,
    #[validate(range(min = 1, code = "non_positive"))]
    pub quantity: i64,
}

/// 수량 변경 요청: `PATCH /api/v1/orders/{id}`
///
/// 0 이하로 줄이려면 삭제(`DELETE`)나 증감(`POST .../adjust`)을 써야 합니다.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[validate(range(min = 1, code = "non_positive"))]
    pub quantity: i64,
}

/// 수량 증감 요청: `POST /api/v1/orders/{id}/adjust` + `{ "delta": -1 }`
#[derive(Debug, Deserialize)]
pub struct AdjustOrderRequest {
    pub delta: i64,
}

/// 증감 결과: 수량이 0 이하가 되면 행이 삭제되고 `order`는 None
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustOrderResponse {
    pub order: Option<OrderLine>,
    pub deleted: bool,
}
