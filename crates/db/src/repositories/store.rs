use crate::models::DbStore;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_store_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbStore>> {
    let store = sqlx::query_as::<_, DbStore>(
        r#"
        SELECT id, name, description, opening_hours, max_capacity, time_slot_duration,
               created_at, updated_at
        FROM stores
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(store)
}
