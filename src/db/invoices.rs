//! # 인보이스 아카이브 데이터베이스 쿼리 모듈
//!
//! 추가 전용(append-only) 테이블입니다. UPDATE/DELETE 함수는 의도적으로 없습니다.
//! `invoices.session_id`의 UNIQUE 인덱스가 "세션당 인보이스 하나"를 저장소 수준에서 보장합니다.

use crate::error::AppError;
use crate::models::{Invoice, InvoiceQuery, InvoiceSummary};
use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

/// 인보이스 한 행을 씁니다. 체크아웃 트랜잭션 안에서만 호출됩니다.
pub async fn insert_invoice(
    executor: impl SqliteExecutor<'_>,
    invoice: &Invoice,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO invoices
            (id, session_id, room_id, room_name, customer_name, customer_phone,
             start_time, end_time, duration_hours, billed_hours, room_charge,
             food_charge, total_amount, payment_method, paid_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.session_id)
    .bind(&invoice.room_id)
    .bind(&invoice.room_name)
    .bind(&invoice.customer_name)
    .bind(&invoice.customer_phone)
    .bind(invoice.start_time)
    .bind(invoice.end_time)
    .bind(invoice.duration_hours)
    .bind(invoice.billed_hours)
    .bind(invoice.room_charge)
    .bind(invoice.food_charge)
    .bind(invoice.total_amount)
    .bind(&invoice.payment_method)
    .bind(invoice.paid_at)
    .bind(invoice.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// ID로 인보이스 하나를 조회합니다.
pub async fn get_invoice(pool: &SqlitePool, id: &str) -> Result<Option<Invoice>, AppError> {
    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, session_id, room_id, room_name, customer_name, customer_phone,
               start_time, end_time, duration_hours, billed_hours, room_charge,
               food_charge, total_amount, payment_method, paid_at, created_at
        FROM invoices
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(invoice)
}

/// 세션 ID로 인보이스를 찾습니다 (체크아웃 재시도 판별용).
pub async fn find_invoice_by_session(
    executor: impl SqliteExecutor<'_>,
    session_id: &str,
) -> Result<Option<Invoice>, AppError> {
    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, session_id, room_id, room_name, customer_name, customer_phone,
               start_time, end_time, duration_hours, billed_hours, room_charge,
               food_charge, total_amount, payment_method, paid_at, created_at
        FROM invoices
        WHERE session_id = ?
        "#,
    )
    .bind(session_id)
    .fetch_optional(executor)
    .await?;

    Ok(invoice)
}

/// 인보이스 목록을 최근 결제순으로 조회합니다.
///
/// 기간(`period`)과 세션 ID는 SQL에서 거르고, 검색어(`q`)는 Rust에서 거릅니다.
/// SQLite의 `lower()`는 ASCII만 소문자로 바꾸기 때문에 베트남어 이름 검색이 틀어집니다.
pub async fn list_invoices(
    pool: &SqlitePool,
    query: &InvoiceQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Invoice>, AppError> {
    let since = query.period.since(now);

    let invoices = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, session_id, room_id, room_name, customer_name, customer_phone,
               start_time, end_time, duration_hours, billed_hours, room_charge,
               food_charge, total_amount, payment_method, paid_at, created_at
        FROM invoices
        WHERE (?1 IS NULL OR paid_at >= ?1)
          AND (?2 IS NULL OR session_id = ?2)
        ORDER BY paid_at DESC, rowid DESC
        "#,
    )
    .bind(since)
    .bind(query.session_id.as_deref())
    .fetch_all(pool)
    .await?;

    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    Ok(match needle {
        Some(needle) => invoices
            .into_iter()
            .filter(|inv| matches_search(inv, &needle))
            .collect(),
        None => invoices,
    })
}

/// 필터에 걸린 인보이스들의 매출 합계를 계산합니다.
pub async fn summarize_invoices(
    pool: &SqlitePool,
    query: &InvoiceQuery,
    now: DateTime<Utc>,
) -> Result<InvoiceSummary, AppError> {
    let invoices = list_invoices(pool, query, now).await?;

    Ok(invoices
        .iter()
        .fold(InvoiceSummary::default(), |mut acc, inv| {
            acc.total_invoices += 1;
            acc.room_revenue += inv.room_charge;
            acc.food_revenue += inv.food_charge;
            acc.total_revenue += inv.total_amount;
            acc
        }))
}

fn matches_search(invoice: &Invoice, needle: &str) -> bool {
    invoice.customer_name.to_lowercase().contains(needle)
        || invoice.room_name.to_lowercase().contains(needle)
        || invoice
            .customer_phone
            .as_deref()
            .is_some_and(|phone| phone.contains(needle))
}
