//! # 인보이스 모델 정의
//!
//! 인보이스는 끝난 세션의 변경 불가능한 기록입니다.
//! 체크아웃 트랜잭션만 쓰고, 수정/삭제 연산은 존재하지 않습니다.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// 인보이스 엔티티: DB의 `invoices` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub session_id: String,
    pub room_id: String,
    /// 체크아웃 시점의 룸 이름 스냅샷
    pub room_name: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 실제 이용 시간 (소수)
    pub duration_hours: f64,
    /// 청구된 시간 (올림)
    pub billed_hours: i64,
    pub room_charge: i64,
    pub food_charge: i64,
    pub total_amount: i64,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 체크아웃 요청: `POST /api/v1/rooms/{id}/checkout`
///
/// - `payment_method`: 없으면 설정의 기본값(보통 "cash")
/// - `session_id`: 재시도 보호용. 지정하면 룸의 현재 세션과 같을 때만 정산합니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: Option<String>,
    pub session_id: Option<String>,
}

/// 이력 조회 기간 필터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoicePeriod {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl InvoicePeriod {
    /// 기간의 시작 시각 (UTC). `All`이면 None.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            InvoicePeriod::All => None,
            InvoicePeriod::Today => Utc
                .with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
                .single(),
            InvoicePeriod::Week => Some(now - Duration::days(7)),
            InvoicePeriod::Month => Utc
                .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
                .single(),
        }
    }
}

/// `GET /api/v1/invoices` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    /// 고객 이름/룸 이름(대소문자 무시) 또는 전화번호 부분 일치
    pub q: Option<String>,
    #[serde(default)]
    pub period: InvoicePeriod,
    /// 정확히 일치하는 세션 ID: 타임아웃 난 체크아웃의 결과 확인용
    pub session_id: Option<String>,
}

/// 매출 요약: `GET /api/v1/invoices/summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub total_invoices: i64,
    pub room_revenue: i64,
    pub food_revenue: i64,
    pub total_revenue: i64,
}
