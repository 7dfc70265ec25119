//! Trait describing the fuel-price directory and its error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::{FuelType, FuelTypeId, Municipality, MunicipalityId, Province, ProvinceId, Station};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the directory backend.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The directory answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
    /// Response body did not match the expected JSON shape.
    #[error("Could not decode {context}: {source}")]
    Decode {
        /// Which listing was being decoded.
        context: &'static str,
        /// Underlying JSON error.
        #[source]
        source: JsonError,
    },
    /// The configured base URL cannot be used to build request URLs.
    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),
}

#[async_trait]
/// Read-only access to the fuel-price directory catalogs and listings.
pub trait DirectoryPort: Send + Sync {
    /// All provinces.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the directory request fails.
    async fn provinces(&self) -> Result<Vec<Province>, PortError>;

    /// Municipalities of one province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the directory request fails.
    async fn municipalities(&self, province: &ProvinceId)
    -> Result<Vec<Municipality>, PortError>;

    /// Fuel products as published, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the directory request fails.
    async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError>;

    /// Stations of a municipality priced for one fuel type.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the directory request fails.
    async fn stations(
        &self,
        municipality: &MunicipalityId,
        fuel_type: &FuelTypeId,
    ) -> Result<Vec<Station>, PortError>;
}
