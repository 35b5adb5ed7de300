#![allow(missing_docs)]

//! Catalog ordering strategies.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Constructor, Driver};

/// How the driver list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverSort {
    /// Most expensive first.
    #[default]
    Price,
    /// Most points first; drivers without a ranking last.
    Points,
    Name,
    Team,
}

impl DriverSort {
    pub const ALL: [DriverSort; 4] = [
        DriverSort::Price,
        DriverSort::Points,
        DriverSort::Name,
        DriverSort::Team,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DriverSort::Price => "Price",
            DriverSort::Points => "Points",
            DriverSort::Name => "Name",
            DriverSort::Team => "Team",
        }
    }

    /// The following strategy, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn compare(self, a: &Driver, b: &Driver) -> Ordering {
        match self {
            DriverSort::Price => b.price.cmp(&a.price),
            DriverSort::Points => {
                let a_points = a.points.unwrap_or(-1.0);
                let b_points = b.points.unwrap_or(-1.0);
                b_points.total_cmp(&a_points)
            }
            DriverSort::Name => a.name.cmp(&b.name),
            DriverSort::Team => a.team_name.cmp(&b.team_name),
        }
    }

    /// Stable sort in place.
    pub fn sort(self, drivers: &mut [Driver]) {
        drivers.sort_by(|a, b| self.compare(a, b));
    }
}

/// How the constructor list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructorSort {
    #[default]
    Price,
    Name,
}

impl ConstructorSort {
    pub fn label(self) -> &'static str {
        match self {
            ConstructorSort::Price => "Price",
            ConstructorSort::Name => "Name",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ConstructorSort::Price => ConstructorSort::Name,
            ConstructorSort::Name => ConstructorSort::Price,
        }
    }

    pub fn compare(self, a: &Constructor, b: &Constructor) -> Ordering {
        match self {
            ConstructorSort::Price => b.price.cmp(&a.price),
            ConstructorSort::Name => a.name.cmp(&b.name),
        }
    }

    pub fn sort(self, constructors: &mut [Constructor]) {
        constructors.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Price;

    fn drivers() -> Vec<Driver> {
        let mut max = Driver::new(1, "Max Verstappen", "Red Bull Racing", Price::from_tenths(305));
        max.points = Some(25.0);
        let mut lando = Driver::new(4, "Lando Norris", "McLaren", Price::from_tenths(240));
        lando.points = Some(40.0);
        let rookie = Driver::new(30, "Alex Rookie", "Alpine", Price::from_tenths(50));
        vec![rookie, max, lando]
    }

    fn ids(drivers: &[Driver]) -> Vec<u32> {
        drivers.iter().map(|d| d.id).collect()
    }

    #[test]
    fn driver_strategies() {
        let mut list = drivers();
        DriverSort::Price.sort(&mut list);
        assert_eq!(ids(&list), vec![1, 4, 30]);

        DriverSort::Points.sort(&mut list);
        assert_eq!(ids(&list), vec![4, 1, 30]);

        DriverSort::Name.sort(&mut list);
        assert_eq!(ids(&list), vec![30, 4, 1]);

        DriverSort::Team.sort(&mut list);
        assert_eq!(ids(&list), vec![30, 4, 1]);
    }

    #[test]
    fn strategies_cycle() {
        assert_eq!(DriverSort::Team.next(), DriverSort::Price);
        assert_eq!(DriverSort::Price.next(), DriverSort::Points);
        assert_eq!(ConstructorSort::Name.next(), ConstructorSort::Price);
    }

    #[test]
    fn constructor_strategies() {
        let mut teams = vec![
            Constructor::new(1, "Williams", Price::from_tenths(80)),
            Constructor::new(2, "Ferrari", Price::from_tenths(270)),
        ];
        ConstructorSort::Price.sort(&mut teams);
        assert_eq!(teams[0].name, "Ferrari");
        ConstructorSort::Name.sort(&mut teams);
        assert_eq!(teams[0].name, "Ferrari");
        assert_eq!(teams[1].name, "Williams");
    }
}
