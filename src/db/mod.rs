//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! SQLite와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)과 라우트 핸들러(routes/)가 이 함수들을 호출합니다.
//!
//! 각 하위 모듈:
//! - `rooms`: 룸 레지스트리 (룸 CRUD + 체크인/체크아웃 상태 전이)
//! - `orders`: 세션 원장 (주문 라인 추가/수정/삭제/일괄 삭제)
//! - `invoices`: 인보이스 아카이브 (추가 전용)
//! - `menu`: 카탈로그 메뉴 항목
//!
//! 체크아웃 트랜잭션 안에서도 호출되는 함수는 `&SqlitePool` 대신
//! `impl SqliteExecutor<'_>`를 받습니다. 풀(`&pool`)과 트랜잭션(`&mut *tx`)
//! 어느 쪽이든 넘길 수 있습니다.

pub mod invoices;
pub mod menu;
pub mod orders;
pub mod rooms;

pub use invoices::*;
pub use menu::*;
pub use orders::*;
pub use rooms::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// 연결 풀을 만들고 마이그레이션을 적용합니다.
///
/// WAL 모드 + 외래키 + busy_timeout 5초: 쓰기 충돌 시 즉시 실패하지 않고 기다립니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// 테스트용 인메모리 DB. `sqlite::memory:`는 연결마다 별도 DB이므로 연결을 1개로 고정합니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// 테스트용 파일 DB. 실제 `connect()`를 거치므로 WAL, busy_timeout, 다중 연결이 운영과 같습니다.
///
/// 연결 사이의 경쟁(쓰기 잠금, 조건부 UPDATE)은 이 풀에서만 드러납니다.
/// 돌려받은 `TempDir`이 drop되면 DB 파일도 지워지므로 테스트 끝까지 들고 있어야 합니다.
#[cfg(test)]
pub async fn file_test_pool(max_connections: u32) -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("karaoke.db").display());
    let pool = connect(&url, max_connections).await.unwrap();
    (pool, dir)
}
