//! # 세션 원장 데이터베이스 쿼리 모듈
//!
//! 열린 세션에 붙는 주문 라인을 관리합니다.
//!
//! - 같은 메뉴를 여러 번 추가하면 행이 여러 개 생깁니다 (병합하지 않음).
//! - 수량은 항상 1 이상입니다. 0 이하로 줄이는 것은 삭제로 처리합니다.
//! - `purge_session`은 체크아웃 트랜잭션에서만 호출됩니다.

use crate::error::AppError;
use crate::models::{NewOrderLine, OrderLine};
use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

/// 주문 라인을 추가합니다.
///
/// `INSERT ... SELECT ... FROM rooms WHERE id = ? AND session_id = ?`:
/// 룸의 현재 세션이 `line.session_id`와 같을 때만 행이 들어갑니다.
/// 세션이 이미 닫혔거나 바뀌었으면 `Ok(None)` → 호출자가 409로 처리합니다.
pub async fn insert_order(
    pool: &SqlitePool,
    line: &NewOrderLine<'_>,
    now: DateTime<Utc>,
) -> Result<Option<OrderLine>, AppError> {
    let total = line
        .quantity
        .checked_mul(line.unit_price)
        .ok_or_else(|| AppError::validation("quantity", "too_large"))?;
    let id = uuid::Uuid::now_v7().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO orders
            (id, room_id, session_id, menu_item_id, menu_item_name,
             quantity, unit_price, total, created_at)
        SELECT ?, id, session_id, ?, ?, ?, ?, ?, ?
        FROM rooms
        WHERE id = ? AND status = 'occupied' AND session_id = ?
        "#,
    )
    .bind(&id)
    .bind(line.menu_item_id)
    .bind(line.menu_item_name)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(total)
    .bind(now)
    .bind(line.room_id)
    .bind(line.session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_order(pool, &id)
        .await?
        .map(Some)
        .ok_or(AppError::Internal("Failed to retrieve created order".to_string()))
}

/// ID로 주문 라인 하나를 조회합니다.
pub async fn get_order(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<OrderLine>, AppError> {
    let order = sqlx::query_as::<_, OrderLine>(
        r#"
        SELECT id, room_id, session_id, menu_item_id, menu_item_name,
               quantity, unit_price, total, created_at
        FROM orders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(order)
}

/// 세션의 모든 주문 라인을 생성 시각 오름차순으로 조회합니다.
///
/// 같은 시각에 들어간 행은 rowid(삽입 순서)로 정렬합니다.
pub async fn orders_for_session(
    executor: impl SqliteExecutor<'_>,
    session_id: &str,
) -> Result<Vec<OrderLine>, AppError> {
    let orders = sqlx::query_as::<_, OrderLine>(
        r#"
        SELECT id, room_id, session_id, menu_item_id, menu_item_name,
               quantity, unit_price, total, created_at
        FROM orders
        WHERE session_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await?;

    Ok(orders)
}

/// 수량을 바꾸고 합계를 저장된 단가로 다시 계산합니다.
///
/// `new_quantity`는 1 이상이어야 합니다. 현재 카탈로그 가격은 다시 읽지 않습니다.
///
/// - `Ok(Some(OrderLine))`: 수정 성공
/// - `Ok(None)`: 주문이 없음
pub async fn update_order_quantity(
    pool: &SqlitePool,
    id: &str,
    new_quantity: i64,
) -> Result<Option<OrderLine>, AppError> {
    if new_quantity <= 0 {
        return Err(AppError::validation("quantity", "non_positive"));
    }

    let Some(order) = get_order(pool, id).await? else {
        return Ok(None);
    };
    let total = new_quantity
        .checked_mul(order.unit_price)
        .ok_or_else(|| AppError::validation("quantity", "too_large"))?;

    sqlx::query("UPDATE orders SET quantity = ?, total = ? WHERE id = ?")
        .bind(new_quantity)
        .bind(total)
        .bind(id)
        .execute(pool)
        .await?;

    get_order(pool, id).await
}

/// 주문 라인 하나를 삭제합니다. 없던 행이면 `false`.
pub async fn delete_order(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 세션의 주문 라인을 모두 지웁니다. 지운 행 수를 반환합니다.
pub async fn purge_session(
    executor: impl SqliteExecutor<'_>,
    session_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM orders WHERE session_id = ?")
        .bind(session_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
