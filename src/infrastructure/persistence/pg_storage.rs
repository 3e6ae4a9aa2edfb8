//! PostgreSQL implementation of the object store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Amenity, City, EntityKind, Place, Record, State, User};
use crate::domain::repositories::Storage;
use crate::error::AppError;

const PLACE_COLUMNS: &str = r#"
    p.id, p.city_id, p.user_id, p.name, p.description,
    p.number_rooms, p.number_bathrooms, p.max_guest, p.price_by_night,
    p.latitude, p.longitude, p.created_at, p.updated_at,
    ARRAY(
        SELECT pa.amenity_id::text FROM place_amenity pa
        WHERE pa.place_id = p.id ORDER BY pa.amenity_id
    ) AS amenity_ids
"#;

#[derive(sqlx::FromRow)]
struct StateRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CityRow {
    id: String,
    state_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AmenityRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: String,
    city_id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    number_rooms: i32,
    number_bathrooms: i32,
    max_guest: i32,
    price_by_night: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    amenity_ids: Vec<String>,
}

impl From<StateRow> for State {
    fn from(r: StateRow) -> Self {
        State {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<CityRow> for City {
    fn from(r: CityRow) -> Self {
        City {
            id: r.id,
            state_id: r.state_id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<AmenityRow> for Amenity {
    fn from(r: AmenityRow) -> Self {
        Amenity {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<PlaceRow> for Place {
    fn from(r: PlaceRow) -> Self {
        Place {
            id: r.id,
            city_id: r.city_id,
            user_id: r.user_id,
            name: r.name,
            description: r.description,
            number_rooms: r.number_rooms,
            number_bathrooms: r.number_bathrooms,
            max_guest: r.max_guest,
            price_by_night: r.price_by_night,
            latitude: r.latitude,
            longitude: r.longitude,
            amenity_ids: r.amenity_ids,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::State => "states",
        EntityKind::City => "cities",
        EntityKind::User => "users",
        EntityKind::Amenity => "amenities",
        EntityKind::Place => "places",
    }
}

/// PostgreSQL object store.
///
/// Every `put` and `delete` runs in its own transaction and is durable when
/// it returns, so a failure is reported to the caller that staged the write.
/// `save` has nothing left to flush. Deleting a parent row cascades to its
/// children through foreign keys (see `migrations/`).
pub struct PgStorage {
    pool: Arc<PgPool>,
}

impl PgStorage {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn apply_put(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        record: &Record,
    ) -> Result<(), AppError> {
        match record {
            Record::State(s) => {
                sqlx::query(
                    r#"
                    INSERT INTO states (id, name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO UPDATE
                    SET name = EXCLUDED.name, updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&s.id)
                .bind(&s.name)
                .bind(s.created_at)
                .bind(s.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            Record::City(c) => {
                sqlx::query(
                    r#"
                    INSERT INTO cities (id, state_id, name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (id) DO UPDATE
                    SET state_id = EXCLUDED.state_id, name = EXCLUDED.name,
                        updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&c.id)
                .bind(&c.state_id)
                .bind(&c.name)
                .bind(c.created_at)
                .bind(c.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            Record::User(u) => {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, email, password, first_name, last_name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (id) DO UPDATE
                    SET email = EXCLUDED.email, password = EXCLUDED.password,
                        first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name,
                        updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&u.id)
                .bind(&u.email)
                .bind(&u.password)
                .bind(&u.first_name)
                .bind(&u.last_name)
                .bind(u.created_at)
                .bind(u.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            Record::Amenity(a) => {
                sqlx::query(
                    r#"
                    INSERT INTO amenities (id, name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO UPDATE
                    SET name = EXCLUDED.name, updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&a.id)
                .bind(&a.name)
                .bind(a.created_at)
                .bind(a.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            Record::Place(p) => {
                sqlx::query(
                    r#"
                    INSERT INTO places (
                        id, city_id, user_id, name, description,
                        number_rooms, number_bathrooms, max_guest, price_by_night,
                        latitude, longitude, created_at, updated_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                    ON CONFLICT (id) DO UPDATE
                    SET city_id = EXCLUDED.city_id, user_id = EXCLUDED.user_id,
                        name = EXCLUDED.name, description = EXCLUDED.description,
                        number_rooms = EXCLUDED.number_rooms,
                        number_bathrooms = EXCLUDED.number_bathrooms,
                        max_guest = EXCLUDED.max_guest,
                        price_by_night = EXCLUDED.price_by_night,
                        latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude,
                        updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&p.id)
                .bind(&p.city_id)
                .bind(&p.user_id)
                .bind(&p.name)
                .bind(&p.description)
                .bind(p.number_rooms)
                .bind(p.number_bathrooms)
                .bind(p.max_guest)
                .bind(p.price_by_night)
                .bind(p.latitude)
                .bind(p.longitude)
                .bind(p.created_at)
                .bind(p.updated_at)
                .execute(&mut **tx)
                .await?;

                sqlx::query("DELETE FROM place_amenity WHERE place_id = $1")
                    .bind(&p.id)
                    .execute(&mut **tx)
                    .await?;

                if !p.amenity_ids.is_empty() {
                    sqlx::query(
                        r#"
                        INSERT INTO place_amenity (place_id, amenity_id)
                        SELECT $1, a FROM UNNEST($2::text[]) AS a
                        ON CONFLICT DO NOTHING
                        "#,
                    )
                    .bind(&p.id)
                    .bind(&p.amenity_ids)
                    .execute(&mut **tx)
                    .await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_state(&self, id: &str) -> Result<Option<State>, AppError> {
        let row = sqlx::query_as::<_, StateRow>(
            "SELECT id, name, created_at, updated_at FROM states WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_city(&self, id: &str) -> Result<Option<City>, AppError> {
        let row = sqlx::query_as::<_, CityRow>(
            "SELECT id, state_id, name, created_at, updated_at FROM cities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password, first_name, last_name, created_at, updated_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_amenity(&self, id: &str) -> Result<Option<Amenity>, AppError> {
        let row = sqlx::query_as::<_, AmenityRow>(
            "SELECT id, name, created_at, updated_at FROM amenities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_place(&self, id: &str) -> Result<Option<Place>, AppError> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places p WHERE p.id = $1");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn all_places(&self) -> Result<Vec<Place>, AppError> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places p ORDER BY p.created_at, p.id");
        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn cities_of_state(&self, state_id: &str) -> Result<Vec<City>, AppError> {
        let rows = sqlx::query_as::<_, CityRow>(
            r#"
            SELECT id, state_id, name, created_at, updated_at
            FROM cities WHERE state_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(state_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn places_of_city(&self, city_id: &str) -> Result<Vec<Place>, AppError> {
        let sql = format!(
            "SELECT {PLACE_COLUMNS} FROM places p WHERE p.city_id = $1 ORDER BY p.created_at, p.id"
        );
        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(city_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, kind: EntityKind) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table_name(kind));
        let n = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(n)
    }

    async fn put(&self, record: Record) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        Self::apply_put(&mut tx, &record).await?;
        tx.commit().await?;

        tracing::debug!(kind = record.kind().class_name(), id = record.id(), "Record stored");
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table_name(kind));
        sqlx::query(&sql).bind(id).execute(self.pool.as_ref()).await?;

        tracing::debug!(kind = kind.class_name(), id, "Record deleted");
        Ok(())
    }

    async fn save(&self) -> Result<(), AppError> {
        Ok(())
    }
}
