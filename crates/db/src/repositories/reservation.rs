use crate::models::{DbConflict, DbReservation, DbReservationWithCustomer};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const RESERVATION_WITH_CUSTOMER: &str = r#"
    SELECT r.id, r.store_id, r.customer_id, r.reservation_date, r.start_time, r.end_time,
           r.number_of_people, r.special_requests, r.status, r.created_at,
           c.name AS customer_name, c.student_id AS customer_student_id
    FROM reservations r
    LEFT JOIN customers c ON c.id = r.customer_id
"#;

pub struct InsertReservation<'a> {
    pub store_id: Uuid,
    pub customer_id: Uuid,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub number_of_people: i32,
    pub special_requests: Option<&'a str>,
    pub status: &'a str,
}

pub async fn create_reservation(
    pool: &Pool<Postgres>,
    reservation: InsertReservation<'_>,
) -> Result<DbReservation> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let created = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations (
            id, store_id, customer_id, reservation_date, start_time, end_time,
            number_of_people, special_requests, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING id, store_id, customer_id, reservation_date, start_time, end_time,
                  number_of_people, special_requests, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(reservation.store_id)
    .bind(reservation.customer_id)
    .bind(reservation.reservation_date)
    .bind(reservation.start_time)
    .bind(reservation.end_time)
    .bind(reservation.number_of_people)
    .bind(reservation.special_requests)
    .bind(reservation.status)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        "Reservation created: id={}, date={}, {}-{}",
        created.id, created.reservation_date, created.start_time, created.end_time
    );
    Ok(created)
}

/// Live reservations on `date` overlapping `[start, end)`.
pub async fn get_overlapping_reservations(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Vec<DbConflict>> {
    let conflicts = sqlx::query_as::<_, DbConflict>(
        r#"
        SELECT r.id, r.start_time, r.end_time, c.name AS customer_name
        FROM reservations r
        LEFT JOIN customers c ON c.id = r.customer_id
        WHERE r.reservation_date = $1
          AND r.status <> 'cancelled'
          AND r.start_time < $3
          AND r.end_time > $2
        ORDER BY r.start_time ASC
        "#,
    )
    .bind(date)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(conflicts)
}

pub async fn get_all_reservations(pool: &Pool<Postgres>) -> Result<Vec<DbReservationWithCustomer>> {
    let query = format!(
        "{RESERVATION_WITH_CUSTOMER} ORDER BY r.reservation_date DESC, r.created_at DESC"
    );
    let reservations = sqlx::query_as::<_, DbReservationWithCustomer>(&query)
        .fetch_all(pool)
        .await?;

    Ok(reservations)
}

pub async fn get_reservation_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbReservationWithCustomer>> {
    let query = format!("{RESERVATION_WITH_CUSTOMER} WHERE r.id = $1");
    let reservation = sqlx::query_as::<_, DbReservationWithCustomer>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(reservation)
}

/// Returns `false` when no reservation has the given id.
pub async fn update_reservation_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE reservations
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
