//! # 룸 모델 정의
//!
//! 룸은 정적 속성(이름, 시간당 요금)과 현재 점유 상태를 함께 가집니다.
//! 세션은 별도 테이블이 아니라 룸 행의 `session_id / start_time / customer_*` 묶음과
//! 그 session_id를 가진 주문 라인들의 합입니다.
//!
//! ## 불변식
//! `status == Available` ⇔ `session_id`가 없음 ⇔ 고객 정보가 없음

use super::not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 룸 상태: 상태는 두 가지뿐입니다 (예약/청소 중 상태 없음).
///
/// `sqlx::Type`: DB의 TEXT 컬럼('available' / 'occupied')과 자동 변환
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
}

/// 룸 엔티티: DB의 `rooms` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// 룸 고유 식별자 (UUIDv7)
    pub id: String,
    pub name: String,
    /// 시간당 요금 (정수 통화 단위)
    pub hourly_rate: i64,
    pub status: RoomStatus,
    /// 아래 네 필드는 점유 중일 때만 값이 있습니다.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// 점유 중이면 현재 세션 디스크립터를 돌려줍니다.
    pub fn active_session(&self) -> Option<ActiveSession> {
        match (&self.session_id, self.start_time, &self.customer_name) {
            (Some(session_id), Some(start_time), Some(customer_name))
                if self.status == RoomStatus::Occupied =>
            {
                Some(ActiveSession {
                    session_id: session_id.clone(),
                    room_id: self.id.clone(),
                    start_time,
                    customer_name: customer_name.clone(),
                    customer_phone: self.customer_phone.clone(),
                })
            }
            _ => None,
        }
    }
}

/// 점유 중인 룸의 현재 세션
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub session_id: String,
    pub room_id: String,
    pub start_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
}

/// 룸 생성 요청: `POST /api/v1/rooms`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(min = 1, code = "non_positive"))]
    pub hourly_rate: i64,
}

/// 룸 수정 요청: `PATCH /api/v1/rooms/{id}`
///
/// 정적 속성만 바꿀 수 있습니다. 상태/세션 필드는 요청에 존재하지 않습니다.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 1, code = "non_positive"))]
    pub hourly_rate: Option<i64>,
}

/// 체크인 요청: `POST /api/v1/rooms/{id}/checkin`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[validate(custom(function = "not_blank"))]
    pub customer_name: String,
    pub customer_phone: Option<String>,
}

/// 체크인 응답: 새로 발급된 세션 ID와 시작 시각
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
}
