//! Vineyard site entity
//!
//! A vineyard is a named site with coordinates and a base temperature used
//! when accumulating growing degree days for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    gdd::DEFAULT_BASE_TEMP,
    value_objects::{GeoLocation, VineyardId},
};

/// Maximum length of a vineyard display name, in characters
pub const MAX_NAME_LENGTH: usize = 200;

/// Where a vineyard is: coordinates plus an optional postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    coordinates: GeoLocation,
    address: Option<String>,
}

impl SiteLocation {
    /// Create a validated site location
    ///
    /// Blank addresses are normalized to `None`.
    pub fn new(
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Result<Self, DomainError> {
        let coordinates = GeoLocation::new(latitude, longitude)?;
        Ok(Self::from_coordinates(coordinates, address))
    }

    /// Create a site location from already validated coordinates
    #[must_use]
    pub fn from_coordinates(coordinates: GeoLocation, address: Option<String>) -> Self {
        let address = address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Self {
            coordinates,
            address,
        }
    }

    #[must_use]
    pub const fn coordinates(&self) -> GeoLocation {
        self.coordinates
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// The part of a vineyard echoed back alongside a season result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VineyardSummary {
    pub name: String,
    pub location: SiteLocation,
}

/// A tracked vineyard site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vineyard {
    id: VineyardId,
    name: String,
    location: SiteLocation,
    /// Base temperature, in the unit of the configured weather source
    gdd_base_temp: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Vineyard {
    /// Create a new vineyard with a fresh ID
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the name is blank or too long, or
    /// when the base temperature is not a finite number.
    pub fn new(
        name: impl AsRef<str>,
        location: SiteLocation,
        gdd_base_temp: Option<f64>,
    ) -> Result<Self, DomainError> {
        let name = validate_name(name.as_ref())?;
        let gdd_base_temp = validate_base_temp(gdd_base_temp.unwrap_or(DEFAULT_BASE_TEMP))?;
        let now = Utc::now();
        Ok(Self {
            id: VineyardId::new(),
            name,
            location,
            gdd_base_temp,
            created_at: now,
            updated_at: now,
        })
    }

    /// Restore a vineyard from storage
    #[must_use]
    pub const fn restore(
        id: VineyardId,
        name: String,
        location: SiteLocation,
        gdd_base_temp: f64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            location,
            gdd_base_temp,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> VineyardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn location(&self) -> &SiteLocation {
        &self.location
    }

    #[must_use]
    pub const fn gdd_base_temp(&self) -> f64 {
        self.gdd_base_temp
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Name and location, as reported with a season result
    #[must_use]
    pub fn summary(&self) -> VineyardSummary {
        VineyardSummary {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }

    /// Change the display name
    pub fn rename(&mut self, name: impl AsRef<str>) -> Result<(), DomainError> {
        self.name = validate_name(name.as_ref())?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move the site to a new location
    pub fn relocate(&mut self, location: SiteLocation) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    /// Change the base temperature used for GDD accumulation
    pub fn set_gdd_base_temp(&mut self, base_temp: f64) -> Result<(), DomainError> {
        self.gdd_base_temp = validate_base_temp(base_temp)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_base_temp(base_temp: f64) -> Result<f64, DomainError> {
    if base_temp.is_finite() {
        Ok(base_temp)
    } else {
        Err(DomainError::validation("gddBaseTemp must be a finite number"))
    }
}
