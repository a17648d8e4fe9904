//! # 룸 세션 라이프사이클 컨트롤러
//!
//! 체크인, 주문 변경, 견적, 체크아웃을 조율하는 핵심 계층입니다.
//!
//! ## 상태 머신 (룸 단위)
//! ```text
//! Available ──check_in──▶ Occupied ──checkout(트랜잭션)──▶ Available
//! ```
//!
//! ## 체크아웃 트랜잭션 (전부 아니면 전무)
//! 1. 현재 세션과 원장 라인 읽기
//! 2. 요금 계산 (종료 시각 = now)
//! 3. 인보이스 기록
//! 4. 원장 라인 삭제
//! 5. 룸을 available로 초기화
//!
//! 3~5 중 하나라도 실패하면 트랜잭션이 drop되면서 롤백되고, 상태는 그대로 남습니다.
//!
//! 같은 룸에 대한 변경 연산은 모두 `RoomLocks`로 직렬화됩니다.
//! 클라이언트가 들고 있는 세션 정보는 믿지 않고, 매 연산마다 DB에서 다시 읽습니다.

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::{compute_bill, Bill, RoomLocks};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

/// 진행 중 세션의 실시간 견적: 상태를 바꾸지 않습니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub hourly_rate: i64,
    #[serde(flatten)]
    pub bill: Bill,
}

#[derive(Clone)]
pub struct SessionController {
    pool: SqlitePool,
    locks: RoomLocks,
    default_payment_method: String,
}

impl SessionController {
    pub fn new(pool: SqlitePool, locks: RoomLocks, default_payment_method: impl Into<String>) -> Self {
        Self {
            pool,
            locks,
            default_payment_method: default_payment_method.into(),
        }
    }

    /// 비어 있는 룸에 새 세션을 엽니다.
    ///
    /// 이미 점유 중이면 409. 두 요청이 동시에 들어와도 세션은 하나만 생깁니다.
    pub async fn check_in(
        &self,
        room_id: &str,
        req: &CheckInRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckInResponse, AppError> {
        req.validate()?;
        let customer_name = req.customer_name.trim();
        let customer_phone = req
            .customer_phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let _guard = self.locks.acquire(room_id).await;

        let room = db::get_room(&self.pool, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        if room.status == RoomStatus::Occupied {
            return Err(AppError::Conflict("room is not available".to_string()));
        }

        let session_id = uuid::Uuid::now_v7().to_string();
        let checked_in = db::check_in_room(
            &self.pool,
            room_id,
            &session_id,
            customer_name,
            customer_phone,
            now,
        )
        .await?;
        if !checked_in {
            return Err(AppError::Conflict("room is not available".to_string()));
        }

        tracing::info!(room_id, session_id = %session_id, customer = customer_name, "Room checked in");
        Ok(CheckInResponse {
            session_id,
            start_time: now,
        })
    }

    /// 점유 중인 룸의 세션과 원장 라인을 돌려줍니다. 비어 있으면 409.
    pub async fn current_session(
        &self,
        room_id: &str,
    ) -> Result<(ActiveSession, Vec<OrderLine>), AppError> {
        let session = self.require_session(room_id).await?;
        let orders = db::orders_for_session(&self.pool, &session.session_id).await?;
        Ok((session, orders))
    }

    /// 현재 세션에 주문 라인을 추가합니다.
    ///
    /// 이름과 단가는 카탈로그에서 읽어 스냅샷으로 저장합니다.
    pub async fn add_order(
        &self,
        room_id: &str,
        req: &AddOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderLine, AppError> {
        req.validate()?;
        let _guard = self.locks.acquire(room_id).await;

        let session = self.require_session(room_id).await?;
        let item = db::get_menu_item(&self.pool, &req.menu_item_id)
            .await?
            .ok_or(AppError::NotFound("menu item"))?;
        if !item.is_available {
            return Err(AppError::validation("menu_item_id", "unavailable"));
        }

        let line = NewOrderLine {
            room_id,
            session_id: &session.session_id,
            menu_item_id: &item.id,
            menu_item_name: &item.name,
            quantity: req.quantity,
            unit_price: item.price,
        };
        let order = db::insert_order(&self.pool, &line, now)
            .await?
            .ok_or_else(|| AppError::Conflict("session is no longer active".to_string()))?;

        tracing::info!(
            room_id,
            session_id = %order.session_id,
            order_id = %order.id,
            item = %order.menu_item_name,
            quantity = order.quantity,
            "Order added"
        );
        Ok(order)
    }

    /// 주문 수량을 바꿉니다 (1 이상).
    pub async fn update_order(&self, order_id: &str, quantity: i64) -> Result<OrderLine, AppError> {
        UpdateOrderRequest { quantity }.validate()?;
        let (order, _guard) = self.lock_open_order(order_id).await?;

        let updated = db::update_order_quantity(&self.pool, &order.id, quantity)
            .await?
            .ok_or(AppError::NotFound("order"))?;

        tracing::debug!(order_id, quantity, "Order quantity updated");
        Ok(updated)
    }

    /// 주문 수량을 `delta`만큼 늘리거나 줄입니다. 0 이하가 되면 행을 삭제합니다.
    pub async fn adjust_order(
        &self,
        order_id: &str,
        delta: i64,
    ) -> Result<AdjustOrderResponse, AppError> {
        let (order, _guard) = self.lock_open_order(order_id).await?;

        let new_quantity = order
            .quantity
            .checked_add(delta)
            .ok_or_else(|| AppError::validation("delta", "too_large"))?;

        if new_quantity <= 0 {
            db::delete_order(&self.pool, &order.id).await?;
            tracing::debug!(order_id, "Order removed by quantity adjustment");
            return Ok(AdjustOrderResponse {
                order: None,
                deleted: true,
            });
        }

        let updated = db::update_order_quantity(&self.pool, &order.id, new_quantity)
            .await?
            .ok_or(AppError::NotFound("order"))?;
        Ok(AdjustOrderResponse {
            order: Some(updated),
            deleted: false,
        })
    }

    /// 주문 라인을 삭제합니다.
    pub async fn delete_order(&self, order_id: &str) -> Result<(), AppError> {
        let (order, _guard) = self.lock_open_order(order_id).await?;

        if !db::delete_order(&self.pool, &order.id).await? {
            return Err(AppError::NotFound("order"));
        }
        tracing::debug!(order_id, session_id = %order.session_id, "Order deleted");
        Ok(())
    }

    /// 실시간 견적. 아무것도 쓰지 않습니다.
    pub async fn quote(&self, room_id: &str, now: DateTime<Utc>) -> Result<Quote, AppError> {
        let room = db::get_room(&self.pool, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        let session = room
            .active_session()
            .ok_or_else(|| AppError::Conflict("room is not occupied".to_string()))?;

        let orders = db::orders_for_session(&self.pool, &session.session_id).await?;
        let line_totals: Vec<i64> = orders.iter().map(|o| o.total).collect();
        let bill = compute_bill(session.start_time, now, room.hourly_rate, &line_totals)?;

        Ok(Quote {
            session_id: session.session_id,
            start_time: session.start_time,
            hourly_rate: room.hourly_rate,
            bill,
        })
    }

    /// 세션을 닫고 인보이스를 발행합니다.
    ///
    /// - `payment_method`: None이면 기본값, 공백이면 400
    /// - `expected_session`: 지정하면 그 세션이 현재 세션일 때만 정산합니다.
    ///   이미 정산된 세션이면 409이고 인보이스는 새로 생기지 않습니다.
    pub async fn checkout(
        &self,
        room_id: &str,
        payment_method: Option<&str>,
        expected_session: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Invoice, AppError> {
        let payment_method = payment_method
            .unwrap_or(self.default_payment_method.as_str())
            .trim()
            .to_string();
        if payment_method.is_empty() {
            return Err(AppError::validation("payment_method", "blank"));
        }

        let _guard = self.locks.acquire(room_id).await;
        // BEGIN IMMEDIATE: 첫 읽기 전에 쓰기 잠금을 잡습니다.
        // 기본(DEFERRED) 트랜잭션은 읽은 뒤 쓰기로 올라갈 때 다른 룸의 커밋과 부딪히면
        // busy_timeout을 기다리지 않고 바로 SQLITE_BUSY로 실패합니다.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        // 1. 현재 세션
        let room = db::get_room(&mut *tx, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        let Some(session) = room.active_session() else {
            if let Some(expected) = expected_session {
                if db::find_invoice_by_session(&mut *tx, expected).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "session {expected} is already checked out"
                    )));
                }
            }
            return Err(AppError::Conflict("room is not occupied".to_string()));
        };
        if let Some(expected) = expected_session {
            if expected != session.session_id {
                return Err(AppError::Conflict(format!(
                    "session {expected} is not the room's current session"
                )));
            }
        }

        // 2. 요금 계산
        let orders = db::orders_for_session(&mut *tx, &session.session_id).await?;
        let line_totals: Vec<i64> = orders.iter().map(|o| o.total).collect();
        let bill = compute_bill(session.start_time, now, room.hourly_rate, &line_totals)?;

        // 3. 인보이스
        let invoice = Invoice {
            id: uuid::Uuid::now_v7().to_string(),
            session_id: session.session_id.clone(),
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            customer_name: session.customer_name.clone(),
            customer_phone: session.customer_phone.clone(),
            start_time: session.start_time,
            end_time: now,
            duration_hours: bill.elapsed_hours,
            billed_hours: bill.billed_hours,
            room_charge: bill.room_charge,
            food_charge: bill.food_charge,
            total_amount: bill.total,
            payment_method,
            paid_at: now,
            created_at: now,
        };
        db::insert_invoice(&mut *tx, &invoice).await?;

        // 4. 원장 정리
        let purged = db::purge_session(&mut *tx, &session.session_id).await?;

        // 5. 룸 초기화: 세션이 그새 바뀌었으면 전체 롤백
        if !db::check_out_room(&mut *tx, room_id, &session.session_id).await? {
            return Err(AppError::Conflict(
                "room session changed during checkout".to_string(),
            ));
        }

        tx.commit().await?;

        tracing::info!(
            room_id,
            session_id = %invoice.session_id,
            invoice_id = %invoice.id,
            billed_hours = invoice.billed_hours,
            room_charge = invoice.room_charge,
            food_charge = invoice.food_charge,
            total = invoice.total_amount,
            purged_orders = purged,
            "Room checked out"
        );
        Ok(invoice)
    }

    /// 룸을 삭제합니다. 점유 중이면 409 "cannot delete occupied room".
    pub async fn delete_room(&self, room_id: &str) -> Result<(), AppError> {
        let guard = self.locks.acquire(room_id).await;

        let room = db::get_room(&self.pool, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        if room.status == RoomStatus::Occupied
            || !db::delete_available_room(&self.pool, room_id).await?
        {
            return Err(AppError::Conflict("cannot delete occupied room".to_string()));
        }

        drop(guard);
        self.locks.forget(room_id);
        tracing::info!(room_id, "Room deleted");
        Ok(())
    }

    async fn require_session(&self, room_id: &str) -> Result<ActiveSession, AppError> {
        db::get_current_session(&self.pool, room_id)
            .await?
            .ok_or_else(|| AppError::Conflict("room is not occupied".to_string()))
    }

    /// 주문을 찾아 그 룸의 잠금을 잡고, 잠금 아래에서 주문과 세션을 다시 확인합니다.
    async fn lock_open_order(
        &self,
        order_id: &str,
    ) -> Result<(OrderLine, tokio::sync::OwnedMutexGuard<()>), AppError> {
        let order = db::get_order(&self.pool, order_id)
            .await?
            .ok_or(AppError::NotFound("order"))?;
        let guard = self.locks.acquire(&order.room_id).await;

        let order = db::get_order(&self.pool, order_id)
            .await?
            .ok_or(AppError::NotFound("order"))?;
        let session = self.require_session(&order.room_id).await?;
        if session.session_id != order.session_id {
            return Err(AppError::Conflict(
                "order does not belong to the room's current session".to_string(),
            ));
        }

        Ok((order, guard))
    }
}
