use dealer_core::DomainError;
use dealer_core::pagination::Pagination;
use dealer_core::validation::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::value::StrDeserializer;
use serde::de::{Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::vehicle::{Vehicle, VehicleChanges, VehicleFilter, VehicleStatus};

/// Three letters, a digit, a letter or digit, two digits. Covers both the
/// legacy `ABC1234` and the Mercosur `ABC1D23` formats.
pub static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").expect("valid regex"));

/// Create and update payload. Every field is optional at the type level so
/// that full and partial validation can share it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VehicleInput {
    #[validate(length(min = 2, max = 50, message = "brand must be between 2 and 50 characters"))]
    pub brand: Option<String>,
    #[validate(length(min = 2, max = 100, message = "model must be between 2 and 100 characters"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2030, message = "year must be between 1900 and 2030"))]
    pub year: Option<i32>,
    #[validate(length(min = 3, max = 30, message = "color must be between 3 and 30 characters"))]
    pub color: Option<String>,
    #[validate(regex(path = *PLATE_RE, message = "plate must match the format ABC1234 or ABC1D23"))]
    pub plate: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "price must be a positive number"))]
    pub price: Option<f64>,
    pub status: Option<VehicleStatus>,
}

impl Schema for VehicleInput {
    const FIELDS: &'static [&'static str] =
        &["brand", "model", "year", "color", "plate", "price", "status"];
    const REQUIRED: &'static [&'static str] =
        &["brand", "model", "year", "color", "plate", "price"];

    fn is_present(&self, field: &str) -> bool {
        match field {
            "brand" => self.brand.is_some(),
            "model" => self.model.is_some(),
            "year" => self.year.is_some(),
            "color" => self.color.is_some(),
            "plate" => self.plate.is_some(),
            "price" => self.price.is_some(),
            "status" => self.status.is_some(),
            _ => false,
        }
    }
}

impl From<VehicleInput> for VehicleChanges {
    fn from(input: VehicleInput) -> Self {
        Self {
            brand: input.brand,
            model: input.model,
            year: input.year,
            color: input.color,
            plate: input.plate,
            price: input.price,
            status: input.status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVehiclesQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<VehicleStatus>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `?status=` means no status filter, not an unknown status.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<VehicleStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(status) => {
            let de: StrDeserializer<'_, serde::de::value::Error> = status.into_deserializer();
            VehicleStatus::deserialize(de)
                .map(Some)
                .map_err(D::Error::custom)
        }
    }
}

impl ListVehiclesQuery {
    pub fn filter(&self) -> Result<VehicleFilter, DomainError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::validation(
                    "minPrice must not be greater than maxPrice",
                ));
            }
        }
        Ok(VehicleFilter {
            status: self.status,
            brand: self
                .brand
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            min_price: self.min_price,
            max_price: self.max_price,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleCreatedResponse {
    pub message: &'static str,
    pub vehicle: Vehicle,
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub vehicle: Vehicle,
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<Vehicle>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
