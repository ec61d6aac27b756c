//! HTTP request handlers

pub mod debug;
pub mod health;
pub mod weather;

use domain::CityName;

use crate::error::ApiError;

/// Validate the `city` query parameter
pub(crate) fn require_city(city: Option<&str>) -> Result<CityName, ApiError> {
    city.and_then(|c| CityName::new(c).ok())
        .ok_or_else(|| ApiError::BadRequest("city is required".to_string()))
}
