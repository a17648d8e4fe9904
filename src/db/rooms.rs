//! # 룸 레지스트리 데이터베이스 쿼리 모듈
//!
//! 룸의 정적 속성 CRUD와 점유 상태 전이(체크인/체크아웃)를 담당합니다.
//!
//! ## 상태 전이
//! ```text
//! available ──check_in_room()──▶ occupied ──check_out_room()──▶ available
//! ```
//!
//! 상태 전이는 모두 조건부 UPDATE입니다 (`WHERE status = 'available'`,
//! `WHERE session_id = ?`). 영향받은 행 수가 0이면 전이가 일어나지 않은 것이므로,
//! 동시에 두 요청이 같은 룸을 체크인해도 하나만 성공합니다.

use crate::error::AppError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

/// 모든 룸을 상태와 무관하게 이름순으로 조회합니다.
pub async fn list_rooms(pool: &SqlitePool) -> Result<Vec<Room>, AppError> {
    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, hourly_rate, status, customer_name, customer_phone,
               start_time, session_id, created_at
        FROM rooms
        ORDER BY name, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// ID로 룸 하나를 조회합니다.
///
/// 체크아웃 트랜잭션 안에서도 쓰이므로 executor를 받습니다.
pub async fn get_room(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Room>, AppError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, hourly_rate, status, customer_name, customer_phone,
               start_time, session_id, created_at
        FROM rooms
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(room)
}

/// 새 룸을 만듭니다. 처음 상태는 항상 `available`입니다.
///
/// 이름 공백/요금 ≤ 0 검증은 호출 전에 끝나 있어야 합니다 (`CreateRoomRequest::validate`).
pub async fn create_room(
    pool: &SqlitePool,
    name: &str,
    hourly_rate: i64,
    now: DateTime<Utc>,
) -> Result<Room, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO rooms (id, name, hourly_rate, status, created_at)
        VALUES (?, ?, ?, 'available', ?)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(hourly_rate)
    .bind(now)
    .execute(pool)
    .await?;

    get_room(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created room".to_string()))
}

/// 룸의 정적 속성(이름, 시간당 요금)만 부분 업데이트합니다.
///
/// `COALESCE(?, name)`: 바인딩 값이 NULL(None)이면 기존 값을 유지합니다.
/// 상태/세션/고객 컬럼은 이 쿼리에 등장하지 않으므로 절대 바뀌지 않습니다.
///
/// - `Ok(Some(Room))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 룸이 없음
pub async fn update_room(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
    hourly_rate: Option<i64>,
) -> Result<Option<Room>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE rooms
        SET name = COALESCE(?, name),
            hourly_rate = COALESCE(?, hourly_rate)
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(hourly_rate)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_room(pool, id).await
}

/// 비어 있는 룸만 삭제합니다.
///
/// 점유 중인 룸 거절(409)은 세션 컨트롤러가 먼저 판단합니다. 이 쿼리의
/// `status = 'available'` 조건은 그 판단과 삭제 사이에 체크인이 끼어드는 경우를 막습니다.
pub async fn delete_available_room(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ? AND status = 'available'")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 비어 있는 룸을 점유 상태로 바꿉니다.
///
/// ## 반환값
/// - `true`: 체크인 성공
/// - `false`: 룸이 없거나 이미 점유 중 (호출자가 구분)
pub async fn check_in_room(
    pool: &SqlitePool,
    id: &str,
    session_id: &str,
    customer_name: &str,
    customer_phone: Option<&str>,
    start_time: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE rooms
        SET status = 'occupied',
            customer_name = ?,
            customer_phone = ?,
            start_time = ?,
            session_id = ?
        WHERE id = ? AND status = 'available'
        "#,
    )
    .bind(customer_name)
    .bind(customer_phone)
    .bind(start_time)
    .bind(session_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// 점유 중인 룸의 현재 세션을 조회합니다. 비어 있으면 None.
pub async fn get_current_session(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ActiveSession>, AppError> {
    let room = get_room(pool, id).await?.ok_or(AppError::NotFound("room"))?;
    Ok(room.active_session())
}

/// 점유 중인 룸을 비웁니다 (세션/고객/시작 시각 초기화).
///
/// `session_id` 조건 덕분에 이미 다른 세션으로 바뀐 룸이나 빈 룸은 건드리지 않습니다.
/// `true`면 정확히 그 세션이 닫힌 것입니다.
pub async fn check_out_room(
    executor: impl SqliteExecutor<'_>,
    id: &str,
    session_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE rooms
        SET status = 'available',
            customer_name = NULL,
            customer_phone = NULL,
            start_time = NULL,
            session_id = NULL
        WHERE id = ? AND status = 'occupied' AND session_id = ?
        "#,
    )
    .bind(id)
    .bind(session_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn new_room_starts_available_without_session() {
        let pool = test_pool().await;
        let room = create_room(&pool, "R1", 100_000, Utc::now()).await.unwrap();

        assert_eq!(room.status, RoomStatus::Available);
        assert!(room.session_id.is_none());
        assert!(room.customer_name.is_none());
        assert!(room.active_session().is_none());
    }

    #[tokio::test]
    async fn check_in_only_succeeds_once() {
        let pool = test_pool().await;
        let room = create_room(&pool, "R1", 100_000, Utc::now()).await.unwrap();

        let first = check_in_room(&pool, &room.id, "s-1", "Alice", Some("0900000000"), Utc::now())
            .await
            .unwrap();
        let second = check_in_room(&pool, &room.id, "s-2", "Bob", None, Utc::now())
            .await
            .unwrap();
        assert!(first);
        assert!(!second);

        let session = get_current_session(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(session.session_id, "s-1");
        assert_eq!(session.customer_name, "Alice");
    }

    #[tokio::test]
    async fn check_out_requires_matching_session() {
        let pool = test_pool().await;
        let room = create_room(&pool, "R1", 100_000, Utc::now()).await.unwrap();
        check_in_room(&pool, &room.id, "s-1", "Alice", None, Utc::now())
            .await
            .unwrap();

        assert!(!check_out_room(&pool, &room.id, "s-other").await.unwrap());
        assert!(check_out_room(&pool, &room.id, "s-1").await.unwrap());
        assert!(!check_out_room(&pool, &room.id, "s-1").await.unwrap());

        let room = get_room(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Available);
        assert!(room.session_id.is_none());
        assert!(room.start_time.is_none());
        assert!(room.customer_phone.is_none());
    }

    #[tokio::test]
    async fn update_touches_static_attributes_only() {
        let pool = test_pool().await;
        let room = create_room(&pool, "R1", 100_000, Utc::now()).await.unwrap();
        check_in_room(&pool, &room.id, "s-1", "Alice", None, Utc::now())
            .await
            .unwrap();

        let updated = update_room(&pool, &room.id, None, Some(120_000))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "R1");
        assert_eq!(updated.hourly_rate, 120_000);
        assert_eq!(updated.status, RoomStatus::Occupied);
        assert_eq!(updated.session_id.as_deref(), Some("s-1"));

        assert!(update_room(&pool, "missing", Some("X"), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn occupied_room_is_not_deleted() {
        let pool = test_pool().await;
        let room = create_room(&pool, "R1", 100_000, Utc::now()).await.unwrap();
        check_in_room(&pool, &room.id, "s-1", "Alice", None, Utc::now())
            .await
            .unwrap();

        assert!(!delete_available_room(&pool, &room.id).await.unwrap());
        check_out_room(&pool, &room.id, "s-1").await.unwrap();
        assert!(delete_available_room(&pool, &room.id).await.unwrap());
        assert!(get_room(&pool, &room.id).await.unwrap().is_none());
    }
}
