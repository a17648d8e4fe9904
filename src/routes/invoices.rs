//! # 인보이스(Invoice) 라우트 핸들러
//!
//! 읽기 전용입니다. 인보이스는 체크아웃만 만들고, 수정/삭제 엔드포인트는 없습니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/invoices?q=&period=&session_id=` → 최근 결제순 목록
//! - `GET /api/v1/invoices/summary` (같은 필터)     → 매출 합계
//! - `GET /api/v1/invoices/{id}`                   → 단일 인보이스

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /invoices` 응답: `{ "invoices": [...] }`
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Value>, AppError> {
    let invoices = db::list_invoices(&state.pool, &query, Utc::now()).await?;
    Ok(Json(json!({ "invoices": invoices })))
}

pub async fn invoice_summary(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<InvoiceSummary>, AppError> {
    let summary = db::summarize_invoices(&state.pool, &query, Utc::now()).await?;
    Ok(Json(summary))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = db::get_invoice(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;
    Ok(Json(invoice))
}
