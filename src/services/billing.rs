//! # 요금 계산 엔진 (순수 함수, I/O 없음)
//!
//! 시작 시각, 기준 시각(종료 시각 또는 "지금"), 시간당 요금, 주문 라인 합계 목록을 받아
//! 룸 요금 / 음식 요금 / 총액을 계산합니다.
//!
//! ## 규칙
//! ```text
//! 경과 시간(시간 단위, 소수) = (end - start) / 1시간          (음수면 에러)
//! 청구 시간                   = ceil(경과 시간)                (정수 연산으로 올림)
//! 룸 요금                     = 청구 시간 × 시간당 요금
//! 음식 요금                   = Σ 라인 합계
//! 총액                        = 룸 요금 + 음식 요금
//! ```
//!
//! 1분이라도 넘으면 한 시간을 더 청구합니다. 30분 최소 요금 같은 별도 규칙은 없습니다.
//! 정확히 2시간 00분 00초는 2시간으로, 부동소수점 오차 때문에 3시간이 되지 않도록
//! 마이크로초 정수로 올림합니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// 한 시간 = 3,600,000,000 마이크로초
const MICROS_PER_HOUR: i64 = 3_600_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// 종료 시각이 시작 시각보다 앞섬 (시계 어긋남)
    #[error("session end {end} is before its start {start}")]
    NegativeElapsed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// 금액이 i64 범위를 넘어감
    #[error("charge computation overflowed")]
    Overflow,
}

impl BillingError {
    /// 에러 응답 본문에 실리는 사유 코드
    pub fn code(&self) -> &'static str {
        match self {
            BillingError::NegativeElapsed { .. } => "clock_skew",
            BillingError::Overflow => "overflow",
        }
    }
}

/// 계산 결과: 진행 중 견적(quote)과 최종 인보이스가 같은 구조를 씁니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// 실제 경과 시간 (소수 시간, 표시/기록용)
    pub elapsed_hours: f64,
    /// 올림된 청구 시간
    pub billed_hours: i64,
    pub room_charge: i64,
    pub food_charge: i64,
    pub total: i64,
}

/// 세션 요금을 계산합니다.
///
/// - `start`: 체크인 시각
/// - `end`: 체크아웃 시각 (견적이면 현재 시각)
/// - `hourly_rate`: 시간당 룸 요금
/// - `line_totals`: 원장에 있는 각 주문 라인의 `quantity × unit_price`
pub fn compute_bill(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: i64,
    line_totals: &[i64],
) -> Result<Bill, BillingError> {
    if end < start {
        return Err(BillingError::NegativeElapsed { start, end });
    }

    // num_microseconds()는 약 29만 년을 넘으면 None
    let elapsed_us = (end - start)
        .num_microseconds()
        .ok_or(BillingError::Overflow)?;

    let billed_hours = ceil_hours(elapsed_us);
    let room_charge = billed_hours
        .checked_mul(hourly_rate)
        .ok_or(BillingError::Overflow)?;

    let food_charge = line_totals
        .iter()
        .try_fold(0i64, |acc, line| acc.checked_add(*line))
        .ok_or(BillingError::Overflow)?;

    let total = room_charge
        .checked_add(food_charge)
        .ok_or(BillingError::Overflow)?;

    Ok(Bill {
        elapsed_hours: elapsed_us as f64 / MICROS_PER_HOUR as f64,
        billed_hours,
        room_charge,
        food_charge,
        total,
    })
}

/// 0 이상의 마이크로초를 시간 단위로 올림합니다.
fn ceil_hours(elapsed_us: i64) -> i64 {
    elapsed_us / MICROS_PER_HOUR + i64::from(elapsed_us % MICROS_PER_HOUR != 0)
}
