use async_trait::async_trait;
use chrono::Utc;
use dealer_core::DomainError;
use dealer_core::pagination::PageRequest;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::vehicle::{Vehicle, VehicleChanges, VehicleFilter};

pub const PLATE_TAKEN: &str = "plate already registered";

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fails with `Conflict` if the plate is already stored.
    async fn create(&self, vehicle: Vehicle) -> Result<Vehicle, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError>;
    async fn plate_taken(&self, plate: &str, excluding: Option<Uuid>) -> Result<bool, DomainError>;
    /// Newest first, ties broken by id.
    async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Vec<Vehicle>, DomainError>;
    async fn count(&self, filter: &VehicleFilter) -> Result<u64, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresVehicleRepository {
    pool: PgPool,
}

impl PostgresVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` metacharacters so user input is matched literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn write_error(op: &str, e: sqlx::Error) -> DomainError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        return DomainError::conflict(PLATE_TAKEN);
    }
    error!("failed to {} vehicle: {}", op, e);
    DomainError::Internal(format!("database error: {}", e))
}

fn read_error(op: &str, e: sqlx::Error) -> DomainError {
    error!("db error {}: {}", op, e);
    DomainError::Internal(format!("database error: {}", e))
}

const FILTER: &str = r#"
    WHERE ($1::vehicle_status IS NULL OR status = $1)
      AND ($2::text IS NULL OR brand ILIKE '%' || $2 || '%' ESCAPE '\')
      AND ($3::float8 IS NULL OR price >= $3)
      AND ($4::float8 IS NULL OR price <= $4)
"#;

#[async_trait]
impl VehicleRepository for PostgresVehicleRepository {
    async fn create(&self, vehicle: Vehicle) -> Result<Vehicle, DomainError> {
        let stored = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles
                (id, brand, model, year, color, plate, price, status, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, brand, model, year, color, plate, price, status, created_by, created_at, updated_at
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .bind(&vehicle.plate)
        .bind(vehicle.price)
        .bind(vehicle.status)
        .bind(vehicle.created_by)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create", e))?;

        info!(vehicle_id = %stored.id, plate = %stored.plate, "vehicle created");
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, brand, model, year, color, plate, price, status, created_by, created_at, updated_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error("find_by_id", e))
    }

    async fn plate_taken(&self, plate: &str, excluding: Option<Uuid>) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(plate)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error("plate_taken", e))
    }

    async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Vec<Vehicle>, DomainError> {
        let sql = format!(
            r#"
            SELECT id, brand, model, year, color, plate, price, status, created_by, created_at, updated_at
            FROM vehicles
            {FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#
        );
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(filter.status)
            .bind(filter.brand.as_deref().map(escape_like))
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error("list", e))
    }

    async fn count(&self, filter: &VehicleFilter) -> Result<u64, DomainError> {
        let sql = format!("SELECT COUNT(*) FROM vehicles {FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filter.status)
            .bind(filter.brand.as_deref().map(escape_like))
            .bind(filter.min_price)
            .bind(filter.max_price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("count", e))?;
        Ok(total.max(0) as u64)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, DomainError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET
                brand = COALESCE($1, brand),
                model = COALESCE($2, model),
                year = COALESCE($3, year),
                color = COALESCE($4, color),
                plate = COALESCE($5, plate),
                price = COALESCE($6, price),
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $9
            RETURNING id, brand, model, year, color, plate, price, status, created_by, created_at, updated_at
            "#,
        )
        .bind(changes.brand)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.color)
        .bind(changes.plate)
        .bind(changes.price)
        .bind(changes.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update", e))?;

        if vehicle.is_some() {
            info!(vehicle_id = %id, "vehicle updated");
        }

        Ok(vehicle)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| read_error("delete", e))?;

        if deleted.rows_affected() > 0 {
            info!(vehicle_id = %id, "vehicle deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryVehicleRepository;

#[cfg(any(test, feature = "test-support"))]
mod memory {
    use std::sync::{Mutex, MutexGuard};

    use dealer_core::pagination::page_slice;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryVehicleRepository {
        rows: Mutex<Vec<Vehicle>>,
    }

    impl InMemoryVehicleRepository {
        pub fn new() -> Self {
            Self::default()
        }

        fn rows(&self) -> Result<MutexGuard<'_, Vec<Vehicle>>, DomainError> {
            self.rows
                .lock()
                .map_err(|_| DomainError::Internal("vehicle store poisoned".into()))
        }

        fn matching(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, DomainError> {
            let mut rows: Vec<Vehicle> = self
                .rows()?
                .iter()
                .filter(|v| filter.matches(v))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(rows)
        }
    }

    #[async_trait]
    impl VehicleRepository for InMemoryVehicleRepository {
        async fn create(&self, vehicle: Vehicle) -> Result<Vehicle, DomainError> {
            let mut rows = self.rows()?;
            if rows.iter().any(|v| v.plate == vehicle.plate) {
                return Err(DomainError::conflict(PLATE_TAKEN));
            }
            rows.push(vehicle.clone());
            Ok(vehicle)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
            Ok(self.rows()?.iter().find(|v| v.id == id).cloned())
        }

        async fn plate_taken(
            &self,
            plate: &str,
            excluding: Option<Uuid>,
        ) -> Result<bool, DomainError> {
            Ok(self
                .rows()?
                .iter()
                .any(|v| v.plate == plate && Some(v.id) != excluding))
        }

        async fn list(
            &self,
            filter: &VehicleFilter,
            page: PageRequest,
        ) -> Result<Vec<Vehicle>, DomainError> {
            Ok(page_slice(&self.matching(filter)?, page))
        }

        async fn count(&self, filter: &VehicleFilter) -> Result<u64, DomainError> {
            Ok(self.matching(filter)?.len() as u64)
        }

        async fn update(
            &self,
            id: Uuid,
            changes: VehicleChanges,
        ) -> Result<Option<Vehicle>, DomainError> {
            let mut rows = self.rows()?;
            if let Some(plate) = &changes.plate {
                if rows.iter().any(|v| &v.plate == plate && v.id != id) {
                    return Err(DomainError::conflict(PLATE_TAKEN));
                }
            }
            let Some(vehicle) = rows.iter_mut().find(|v| v.id == id) else {
                return Ok(None);
            };
            if let Some(brand) = changes.brand {
                vehicle.brand = brand;
            }
            if let Some(model) = changes.model {
                vehicle.model = model;
            }
            if let Some(year) = changes.year {
                vehicle.year = year;
            }
            if let Some(color) = changes.color {
                vehicle.color = color;
            }
            if let Some(plate) = changes.plate {
                vehicle.plate = plate;
            }
            if let Some(price) = changes.price {
                vehicle.price = price;
            }
            if let Some(status) = changes.status {
                vehicle.status = status;
            }
            vehicle.updated_at = Utc::now();
            Ok(Some(vehicle.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|v| v.id != id);
            Ok(rows.len() < before)
        }
    }
}
