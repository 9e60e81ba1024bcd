use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Available,
    Sold,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plate: String,
    pub price: f64,
    pub status: VehicleStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated create payload.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plate: String,
    pub price: f64,
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Timestamps are cut to microseconds, the precision PostgreSQL keeps.
    pub fn new(input: NewVehicle, created_by: Uuid) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            brand: input.brand,
            model: input.model,
            year: input.year,
            color: input.color,
            plate: input.plate,
            price: input.price,
            status: input.status,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields an update may touch; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleChanges {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub plate: Option<String>,
    pub price: Option<f64>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    pub status: Option<VehicleStatus>,
    /// Case-insensitive substring, matched literally.
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.status.is_none_or(|s| vehicle.status == s)
            && self.brand.as_ref().is_none_or(|b| {
                vehicle.brand.to_lowercase().contains(&b.to_lowercase())
            })
            && self.min_price.is_none_or(|min| vehicle.price >= min)
            && self.max_price.is_none_or(|max| vehicle.price <= max)
    }
}
