use eyre::Result;
use roombook_core::models::room::DEFAULT_STORE_ID;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the equality part of the overlap exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create stores table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            opening_hours JSONB NOT NULL,
            max_capacity INTEGER NOT NULL,
            time_slot_duration INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create customers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            student_id VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            store_id UUID NOT NULL REFERENCES stores(id),
            customer_id UUID NOT NULL REFERENCES customers(id),
            reservation_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            number_of_people INTEGER NOT NULL DEFAULT 1,
            special_requests TEXT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'confirmed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // No two live reservations of one store may overlap on the same date
    sqlx::query(
        r#"
        DO $$
        BEGIN
            IF NOT EXISTS (
                SELECT 1 FROM pg_constraint WHERE conname = 'reservations_no_overlap'
            ) THEN
                ALTER TABLE reservations
                    ADD CONSTRAINT reservations_no_overlap
                    EXCLUDE USING gist (
                        store_id WITH =,
                        tsrange(reservation_date + start_time, reservation_date + end_time, '[)') WITH &&
                    )
                    WHERE (status <> 'cancelled');
            END IF;
        END
        $$;
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(reservation_date);",
        "CREATE INDEX IF NOT EXISTS idx_reservations_customer_id ON reservations(customer_id);",
        "CREATE INDEX IF NOT EXISTS idx_customers_student_id ON customers(student_id);",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    // Seed the practice room
    sqlx::query(
        r#"
        INSERT INTO stores (id, name, description, opening_hours, max_capacity, time_slot_duration)
        VALUES ($1, 'Practice Room', 'Soundproof practice room', '{"start": "09:00", "end": "21:00"}', 5, 30)
        ON CONFLICT (id) DO NOTHING;
        "#,
    )
    .bind(DEFAULT_STORE_ID)
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
