//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `room`: 룸과 현재 점유 세션, 체크인 요청
//! - `order`: 세션 원장의 주문 라인
//! - `invoice`: 체크아웃 인보이스와 이력 조회 필터
//! - `menu`: 카탈로그 메뉴 항목
//!
//! JSON 필드는 camelCase로 주고받습니다 (예: `customerName`).

pub mod invoice;
pub mod menu;
pub mod order;
pub mod room;

pub use invoice::*;
pub use menu::*;
pub use order::*;
pub use room::*;

use validator::ValidationError;

/// 공백만 있는 문자열을 거절하는 validator 커스텀 규칙
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
