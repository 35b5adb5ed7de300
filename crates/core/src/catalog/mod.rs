//! Draftable drivers and constructors, fetched from OpenF1.

/// OpenF1 HTTP client and payload shaping.
pub mod openf1;
/// Static prices and team logos.
pub mod pricing;
/// Catalog ordering strategies.
pub mod sort;
/// Background catalog fetching.
pub mod sync;

pub use openf1::{format_lap_time, OpenF1Client};
pub use sort::{ConstructorSort, DriverSort};
pub use sync::{CatalogEvent, CatalogSync};

use crate::models::{Constructor, Driver};

/// The full list of draftable entries, as last fetched.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    drivers: Vec<Driver>,
    constructors: Vec<Constructor>,
}

impl Catalog {
    /// Catalog over freshly fetched lists.
    pub fn new(drivers: Vec<Driver>, constructors: Vec<Constructor>) -> Self {
        Self {
            drivers,
            constructors,
        }
    }

    /// Whether nothing has been fetched.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.constructors.is_empty()
    }

    /// Drivers in fetch order.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Constructors in fetch order.
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Drivers ordered by `sort`.
    pub fn sorted_drivers(&self, sort: DriverSort) -> Vec<Driver> {
        let mut drivers = self.drivers.clone();
        sort.sort(&mut drivers);
        drivers
    }

    /// Constructors ordered by `sort`.
    pub fn sorted_constructors(&self, sort: ConstructorSort) -> Vec<Constructor> {
        let mut constructors = self.constructors.clone();
        sort.sort(&mut constructors);
        constructors
    }

    /// Driver with `id`, if listed.
    pub fn driver(&self, id: u32) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.id == id)
    }

    /// Constructor with `id`, if listed.
    pub fn constructor(&self, id: u32) -> Option<&Constructor> {
        self.constructors.iter().find(|team| team.id == id)
    }
}
