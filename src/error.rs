//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 에러는 네 갈래로 나뉩니다:
//! - 검증 에러(Validation): 잘못된 입력. 상태를 바꾸기 전에 거절 → 400
//! - 상태 충돌(Conflict, Billing): 이미 점유된 룸 체크인, 빈 룸 체크아웃 등 → 409
//! - 없음(NotFound): 룸/주문/인보이스/메뉴 ID 미존재 → 404
//! - 저장소 실패(Database): 트랜잭션 실패. 로그에 남기고 "다시 시도" 응답 → 500

use crate::services::BillingError;
use axum::{
    extract::rejection::JsonRejection,  // 요청 본문 JSON을 읽지 못했을 때 axum이 주는 거절 값
    http::StatusCode,                   // HTTP 상태 코드 (400, 404, 409 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트
use validator::ValidationErrors;

// #[derive(Debug, Error)]
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 구현과 함께
//   #[error("...")]로 Display 메시지(사람이 읽을 에러 메시지)도 만들어 줍니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// `&'static str`에는 "room", "order" 같은 리소스 이름이 들어갑니다.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 입력 검증 실패 (HTTP 400)
    /// `field`: 문제가 된 필드, `reason`: 구체적인 사유 코드 (예: "blank", "non_positive")
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// 상태 충돌 (HTTP 409): 호출자는 룸 상태를 다시 조회한 뒤 재시도해야 합니다.
    #[error("{0}")]
    Conflict(String),

    /// 저장된 세션 값으로 요금을 계산할 수 없음 (HTTP 409)
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 필드 이름과 사유 코드로 검증 에러를 만듭니다.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// validator의 ValidationErrors → AppError::Validation
// 여러 필드가 실패해도 첫 번째(필드 이름순) 실패만 보고합니다.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let reason = errs
                    .first()
                    .map(|e| e.code.to_string())
                    .unwrap_or_else(|| "invalid".to_string());
                AppError::validation(field.to_string(), reason)
            }
            None => AppError::validation("body", "invalid"),
        }
    }
}

// axum의 JSON 본문 거절 → AppError::Validation
// 어느 필드가 문제인지는 axum이 문자열로만 알려주므로 field는 "body"로 두고,
// 원문은 debug 로그에 남깁니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());

        // JsonRejection은 #[non_exhaustive]라서 `_` 갈래가 꼭 필요합니다.
        let reason = match rejection {
            JsonRejection::JsonDataError(_) => "invalid_type",
            JsonRejection::JsonSyntaxError(_) => "malformed_json",
            JsonRejection::MissingJsonContentType(_) => "missing_content_type",
            _ => "unreadable_body",
        };
        AppError::validation("body", reason)
    }
}

// 핸들러가 Err(AppError)를 반환하면 Axum이 이 메서드를 불러 HTTP 응답을 만듭니다.
impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 "다시 시도" 수준의 일반 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // match는 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive).
        // (status, body) 튜플을 반환합니다.
        let (status, body) = match self {
            // NotFound("room") → 404, "room not found"
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "code": "not_found", "message": self.to_string() }),
            ),
            // ref: self를 옮기지 않고 안쪽 값만 빌려옵니다.
            // self.to_string()을 같은 갈래에서 다시 쓰기 때문에 필요합니다.
            AppError::Validation { ref field, ref reason } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "code": "validation_error",
                    "message": self.to_string(),
                    "field": field,
                    "reason": reason,
                }),
            ),
            // 충돌은 클라이언트 쪽 문제이므로 warn으로만 남깁니다.
            AppError::Conflict(ref msg) => {
                tracing::warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    json!({ "code": "conflict", "message": msg }),
                )
            }
            // 코드는 BillingError마다 다릅니다 (예: "invalid_interval").
            AppError::Billing(ref e) => {
                tracing::warn!("Billing rejected: {}", e);
                (
                    StatusCode::CONFLICT,
                    json!({ "code": e.code(), "message": e.to_string() }),
                )
            }
            AppError::Internal(ref msg) => {
                // 실제 내용은 서버 로그에만 남기고 클라이언트에는 일반 메시지만 보냅니다.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "code": "internal_error",
                        "message": "An internal error occurred, please try again",
                    }),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "code": "database_error",
                        "message": "A database error occurred, please try again",
                    }),
                )
            }
        };

        // 결과: { "error": { "code": "...", "message": "...", ... } }
        (status, Json(json!({ "error": body }))).into_response()
    }
}
