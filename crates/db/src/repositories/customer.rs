use crate::models::DbCustomer;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Always a fresh row; customers are not deduplicated by student id.
pub async fn create_customer(
    pool: &Pool<Postgres>,
    name: &str,
    student_id: &str,
) -> Result<DbCustomer> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        INSERT INTO customers (id, name, student_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, name, student_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(student_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Customer created: id={}", customer.id);
    Ok(customer)
}
