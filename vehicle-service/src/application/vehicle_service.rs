use std::sync::Arc;

use dealer_core::pagination::{DEFAULT_MAX_LIMIT, PageRequest, Pagination};
use dealer_core::validation::{UpdateMode, validate_full, validate_update};
use dealer_core::{DomainError, Identity};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::vehicle_repository::{PLATE_TAKEN, VehicleRepository};
use crate::domain::policy::MutationPolicy;
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleFilter};
use crate::presentation::dto::VehicleInput;

pub const PLATE_TAKEN_BY_OTHER: &str = "plate already registered to another vehicle";

#[derive(Clone)]
pub struct VehicleService {
    repo: Arc<dyn VehicleRepository>,
    update_mode: UpdateMode,
    policy: MutationPolicy,
    max_page_limit: u32,
}

impl VehicleService {
    pub fn new(repo: Arc<dyn VehicleRepository>) -> Self {
        Self {
            repo,
            update_mode: UpdateMode::Full,
            policy: MutationPolicy::OwnerOrAdmin,
            max_page_limit: DEFAULT_MAX_LIMIT,
        }
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: MutationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_page_limit(mut self, limit: u32) -> Self {
        self.max_page_limit = limit;
        self
    }

    pub fn max_page_limit(&self) -> u32 {
        self.max_page_limit
    }

    #[instrument(skip(self, input), fields(user_id = %identity.id))]
    pub async fn create(
        &self,
        identity: &Identity,
        input: VehicleInput,
    ) -> Result<Vehicle, DomainError> {
        validate_full(&input)?;
        let new = complete(input)?;

        if self.repo.plate_taken(&new.plate, None).await? {
            return Err(DomainError::conflict(PLATE_TAKEN));
        }

        self.repo.create(Vehicle::new(new, identity.id)).await
    }

    pub async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Vehicle>, Pagination), DomainError> {
        let vehicles = self.repo.list(filter, page).await?;
        let total = self.repo.count(filter).await?;
        Ok((vehicles, Pagination::new(page, total)))
    }

    pub async fn get(&self, id: Uuid) -> Result<Vehicle, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("vehicle"))
    }

    /// In full mode the payload replaces the record, so an omitted `status`
    /// falls back to its default.
    #[instrument(skip(self, input), fields(user_id = %identity.id))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        input: VehicleInput,
    ) -> Result<Vehicle, DomainError> {
        validate_update(&input, self.update_mode)?;
        let existing = self.get(id).await?;
        self.policy.authorize(identity, existing.created_by)?;

        if let Some(plate) = &input.plate {
            if self.repo.plate_taken(plate, Some(id)).await? {
                return Err(DomainError::conflict(PLATE_TAKEN_BY_OTHER));
            }
        }

        let mut changes = VehicleChanges::from(input);
        if self.update_mode == UpdateMode::Full {
            changes.status.get_or_insert_with(Default::default);
        }

        self.repo
            .update(id, changes)
            .await?
            .ok_or(DomainError::NotFound("vehicle"))
    }

    #[instrument(skip(self), fields(user_id = %identity.id))]
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        self.policy.authorize(identity, existing.created_by)?;

        if !self.repo.delete(id).await? {
            return Err(DomainError::NotFound("vehicle"));
        }
        info!(vehicle_id = %id, "vehicle removed");
        Ok(())
    }
}

fn complete(input: VehicleInput) -> Result<NewVehicle, DomainError> {
    match input {
        VehicleInput {
            brand: Some(brand),
            model: Some(model),
            year: Some(year),
            color: Some(color),
            plate: Some(plate),
            price: Some(price),
            status,
        } => Ok(NewVehicle {
            brand,
            model,
            year,
            color,
            plate,
            price,
            status: status.unwrap_or_default(),
        }),
        _ => Err(DomainError::validation("vehicle payload is incomplete")),
    }
}
