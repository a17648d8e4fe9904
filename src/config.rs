//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 크기
//! - `REQUEST_TIMEOUT_SECS`: 요청 타임아웃 (초)
//! - `DEFAULT_PAYMENT_METHOD`: 체크아웃 요청에 결제 수단이 없을 때 쓸 값

use std::env; // 환경변수를 읽는 표준 라이브러리 모듈
use std::str::FromStr; // 문자열 → 숫자 변환 트레이트 (parse_or의 제네릭 경계)
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/karaoke.db")
    pub database_url: String,
    /// 기본값: "0.0.0.0"
    pub host: String,
    /// 기본값: 3000
    pub port: u16,
    /// 기본값: 5
    pub database_max_connections: u32,
    /// 기본값: 10초. 타임아웃은 "결과 불명"이므로 클라이언트는 상태를 다시 조회해야 합니다.
    pub request_timeout: Duration,
    /// 기본값: "cash"
    pub default_payment_method: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`이 없으면 에러입니다. 나머지는 기본값이 있습니다.
    /// 숫자 항목을 파싱할 수 없으면 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            // `?`: 필수 값이 없으면 VarError를 그대로 main까지 돌려보냅니다.
            database_url: env::var("DATABASE_URL")?,
            // unwrap_or_else: 환경변수가 없을 때만 기본값 문자열을 만듭니다.
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3000),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 10)),
            // 공백뿐인 값은 설정하지 않은 것으로 봅니다.
            default_payment_method: env::var("DEFAULT_PAYMENT_METHOD")
                .ok()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "cash".to_string()),
        })
    }
}

/// 환경변수를 `T`로 파싱합니다. 없거나 파싱에 실패하면 `default`.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
