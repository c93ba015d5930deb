//! Carbon Footprint Model
//!
//! Aggregates the production, packaging and transportation footprint of a
//! product delivered to a consumer location.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{Consumer, PackagingType, Product};
use crate::services::geo;

#[derive(Debug, Error)]
pub enum CarbonError {
    #[error("unknown packaging type: {0}")]
    UnknownPackagingType(PackagingType),
}

pub type Result<T> = std::result::Result<T, CarbonError>;

/// Closed mapping from packaging type to its fixed footprint in kg CO2e.
/// A type absent from the table is an error, never a default.
#[derive(Debug, Clone)]
pub struct PackagingFootprintTable {
    entries: HashMap<PackagingType, f64>,
}

impl Default for PackagingFootprintTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PackagingType::Plastic, 2.0);
        entries.insert(PackagingType::Cardboard, 1.0);
        entries.insert(PackagingType::Glass, 3.0);
        Self { entries }
    }
}

impl PackagingFootprintTable {
    pub fn new(entries: HashMap<PackagingType, f64>) -> Self {
        Self { entries }
    }

    pub fn footprint(&self, packaging: PackagingType) -> Result<f64> {
        self.entries
            .get(&packaging)
            .copied()
            .ok_or(CarbonError::UnknownPackagingType(packaging))
    }
}

/// Footprint aggregation for one run's consumer location.
///
/// Pure and cache-free: the transport term depends on the consumer, so
/// totals must be recomputed whenever the consumer location changes.
#[derive(Debug, Clone)]
pub struct CarbonModel {
    packaging: PackagingFootprintTable,
    /// Transport emissions in kg CO2e per km.
    emission_factor: f64,
}

impl CarbonModel {
    pub fn new(packaging: PackagingFootprintTable, emission_factor: f64) -> Self {
        Self {
            packaging,
            emission_factor,
        }
    }

    /// Total footprint of a product instance delivered to `consumer`:
    /// base + packaging + emission_factor * distance(origin, consumer).
    pub fn total_footprint(&self, product: &Product, consumer: &Consumer) -> Result<f64> {
        let packaging_cf = self.packaging.footprint(product.packaging)?;
        let distance_km = geo::haversine_km(product.origin, consumer.location);
        let transport_cf = self.emission_factor * distance_km;
        let total = product.base_footprint + packaging_cf + transport_cf;

        debug!(
            product_id = %product.id,
            base = product.base_footprint,
            packaging = packaging_cf,
            transport = transport_cf,
            total = total,
            "Footprint aggregated"
        );

        Ok(total)
    }

    /// Footprints for a whole catalog, keyed by product id.
    pub fn score_catalog(
        &self,
        catalog: &[Product],
        consumer: &Consumer,
    ) -> Result<HashMap<String, f64>> {
        catalog
            .iter()
            .map(|product| Ok((product.id.clone(), self.total_footprint(product, consumer)?)))
            .collect()
    }
}
