//! # 노래방 룸 세션/정산 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. SQLite 연결 풀 생성 + 마이그레이션
//! 5. 세션 컨트롤러와 API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use config::Config; // 환경변수 설정 모듈
use routes::AppState; // 모든 핸들러가 공유하는 상태 (풀 + 세션 컨트롤러)
use services::{RoomLocks, SessionController}; // 룸별 잠금과 세션 라이프사이클
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: tokio 런타임을 만들고 async main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok()로 Result를 버리므로 .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 이 크레이트와 tower_http, axum을 debug 레벨로 봅니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "karaoke_billing=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // `?`: DATABASE_URL이 없으면 여기서 바로 종료합니다.
    let config = Config::from_env()?;
    tracing::info!(
        "Starting karaoke billing server on {}:{}",
        config.host,
        config.port
    );

    // ── 4단계: SQLite 연결 풀 생성 + 마이그레이션 ──
    // WAL, busy_timeout, 외래 키 설정과 ./migrations 실행은 db::connect 안에서 합니다.
    let pool = db::connect(&config.database_url, config.database_max_connections).await?;

    // ── 5단계: 애플리케이션 상태(State) 생성 ──
    // 룸 잠금은 프로세스 전체에서 하나만 있어야 합니다.
    // SqlitePool과 SessionController는 내부가 Arc라서 clone해도 같은 풀을 가리킵니다.
    let sessions = SessionController::new(
        pool.clone(),
        RoomLocks::new(),
        config.default_payment_method.clone(),
    );
    let state = AppState { pool, sessions };

    // /api/v1 라우트 + CORS, TraceLayer, 요청 타임아웃(408)
    let app = routes::app(state, config.request_timeout);

    // ── 6단계: HTTP 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // 서버가 종료될 때까지 여기서 기다립니다.
    axum::serve(listener, app).await?;

    Ok(())
}
