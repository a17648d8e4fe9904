//! # 메뉴(카탈로그) 데이터베이스 쿼리 모듈
//!
//! 세션 엔진은 `get_menu_item`으로 이름/가격/판매 여부만 읽습니다.
//! 메뉴를 수정하거나 삭제해도 이미 들어간 주문 라인과 인보이스는 스냅샷이라 영향이 없습니다.

use crate::error::AppError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// 메뉴 목록을 카테고리, 이름순으로 조회합니다.
///
/// - `category`: 지정하면 해당 카테고리만
/// - `available_only`: true면 판매 가능한 항목만
pub async fn list_menu_items(
    pool: &SqlitePool,
    query: &MenuItemQuery,
) -> Result<Vec<MenuItem>, AppError> {
    let items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, name, description, price, category, image_url, is_available,
               created_at, updated_at
        FROM menu_items
        WHERE (?1 IS NULL OR category = ?1)
          AND (?2 = 0 OR is_available = 1)
        ORDER BY category, name
        "#,
    )
    .bind(query.category.as_deref())
    .bind(query.available_only)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn get_menu_item(pool: &SqlitePool, id: &str) -> Result<Option<MenuItem>, AppError> {
    let item = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, name, description, price, category, image_url, is_available,
               created_at, updated_at
        FROM menu_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn create_menu_item(
    pool: &SqlitePool,
    req: &CreateMenuItemRequest,
    now: DateTime<Utc>,
) -> Result<MenuItem, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO menu_items
            (id, name, description, price, category, image_url, is_available,
             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(req.price)
    .bind(req.category.trim())
    .bind(&req.image_url)
    .bind(req.is_available.unwrap_or(true))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_menu_item(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created menu item".to_string()))
}

/// 메뉴 항목을 부분 업데이트합니다. `None`인 필드는 그대로 둡니다.
pub async fn update_menu_item(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateMenuItemRequest,
    now: DateTime<Utc>,
) -> Result<Option<MenuItem>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE menu_items
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            price = COALESCE(?, price),
            category = COALESCE(?, category),
            image_url = COALESCE(?, image_url),
            is_available = COALESCE(?, is_available),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(req.name.as_deref().map(str::trim))
    .bind(&req.description)
    .bind(req.price)
    .bind(req.category.as_deref().map(str::trim))
    .bind(&req.image_url)
    .bind(req.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_menu_item(pool, id).await
}

pub async fn delete_menu_item(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn item(name: &str, category: &str, price: i64) -> CreateMenuItemRequest {
        CreateMenuItemRequest {
            name: name.to_string(),
            description: None,
            price,
            category: category.to_string(),
            image_url: None,
            is_available: None,
        }
    }

    #[tokio::test]
    async fn listing_filters_by_category_and_availability() {
        let pool = test_pool().await;
        let coke = create_menu_item(&pool, &item("Coca Cola", "do-uong", 15_000), Utc::now())
            .await
            .unwrap();
        create_menu_item(&pool, &item("Gà rán", "do-an", 45_000), Utc::now())
            .await
            .unwrap();
        assert!(coke.is_available);

        let drinks = MenuItemQuery {
            category: Some("do-uong".to_string()),
            available_only: false,
        };
        assert_eq!(list_menu_items(&pool, &drinks).await.unwrap().len(), 1);

        let off = UpdateMenuItemRequest {
            is_available: Some(false),
            ..Default::default()
        };
        update_menu_item(&pool, &coke.id, &off, Utc::now()).await.unwrap();

        let available = MenuItemQuery {
            category: None,
            available_only: true,
        };
        let names: Vec<_> = list_menu_items(&pool, &available)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Gà rán".to_string()]);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let pool = test_pool().await;
        let coke = create_menu_item(&pool, &item("Coca Cola", "do-uong", 15_000), Utc::now())
            .await
            .unwrap();

        let req = UpdateMenuItemRequest {
            price: Some(18_000),
            ..Default::default()
        };
        let updated = update_menu_item(&pool, &coke.id, &req, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, 18_000);
        assert_eq!(updated.name, "Coca Cola");
        assert_eq!(updated.category, "do-uong");

        assert!(delete_menu_item(&pool, &coke.id).await.unwrap());
        assert!(get_menu_item(&pool, &coke.id).await.unwrap().is_none());
    }
}
