//! # 비즈니스 로직 서비스 모듈
//!
//! - `billing`: 요금 계산 엔진 (순수 함수)
//! - `room_locks`: 룸별 비동기 잠금
//! - `sessions`: 룸 세션 라이프사이클 컨트롤러 (체크인 → 주문 → 체크아웃)

pub mod billing;
pub mod room_locks;
pub mod sessions;

pub use billing::{compute_bill, Bill, BillingError};
pub use room_locks::RoomLocks;
pub use sessions::{Quote, SessionController};
