//! Static draft prices and team artwork. OpenF1 carries neither.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::money::Price;

/// Price for anyone missing from the tables.
pub const DEFAULT_PRICE: Price = Price::from_tenths(50);

const LOGO_BASE: &str = "https://media.formula1.com/image/upload/f_auto,c_limit,w_1320,q_auto/f_auto/q_auto/content/dam/fom-website/2018-redesign-assets/team%20logos";

static DRIVER_PRICES: Lazy<HashMap<&'static str, Price>> = Lazy::new(|| {
    [
        ("Max Verstappen", 305),
        ("Lando Norris", 240),
        ("Charles Leclerc", 235),
        ("Oscar Piastri", 200),
        ("Carlos Sainz", 210),
        ("Sergio Pérez", 195),
        ("George Russell", 190),
        ("Lewis Hamilton", 185),
        ("Fernando Alonso", 150),
        ("Yuki Tsunoda", 100),
        ("Lance Stroll", 125),
        ("Daniel Ricciardo", 95),
        ("Nico Hülkenberg", 85),
        ("Kevin Magnussen", 80),
        ("Alexander Albon", 75),
        ("Pierre Gasly", 110),
        ("Esteban Ocon", 115),
        ("Zhou Guanyu", 65),
        ("Valtteri Bottas", 70),
        ("Logan Sargeant", 60),
    ]
    .into_iter()
    .map(|(name, tenths)| (name, Price::from_tenths(tenths)))
    .collect()
});

static CONSTRUCTOR_PRICES: Lazy<HashMap<&'static str, Price>> = Lazy::new(|| {
    [
        ("Red Bull Racing", 310),
        ("Ferrari", 270),
        ("McLaren", 250),
        ("Mercedes", 240),
        ("Aston Martin Aramco", 160),
        ("Alpine", 130),
        ("Visa Cash App RB", 110),
        ("Kick Sauber", 70),
        ("Williams", 80),
        ("Haas F1 Team", 85),
    ]
    .into_iter()
    .map(|(name, tenths)| (name, Price::from_tenths(tenths)))
    .collect()
});

static CONSTRUCTOR_LOGOS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Red Bull Racing", "red%20bull.png"),
        ("Ferrari", "ferrari.png"),
        ("McLaren", "mclaren.png"),
        ("Mercedes", "mercedes.png"),
        ("Aston Martin Aramco", "aston%20martin.png"),
        ("Alpine", "alpine.png"),
        ("Visa Cash App RB", "RB.png"),
        ("Kick Sauber", "sauber.png"),
        ("Williams", "williams.png"),
        ("Haas F1 Team", "haas.png"),
    ])
});

/// Draft price for a driver by full name.
pub fn driver_price(name: &str) -> Price {
    DRIVER_PRICES.get(name).copied().unwrap_or(DEFAULT_PRICE)
}

/// Draft price for a team by name.
pub fn constructor_price(name: &str) -> Price {
    CONSTRUCTOR_PRICES
        .get(name)
        .copied()
        .unwrap_or(DEFAULT_PRICE)
}

/// Logo URL for a team by name.
pub fn constructor_logo(name: &str) -> Option<String> {
    CONSTRUCTOR_LOGOS
        .get(name)
        .map(|file| format!("{LOGO_BASE}/{file}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_prices() {
        assert_eq!(driver_price("Max Verstappen"), Price::from_tenths(305));
        assert_eq!(driver_price("Rookie"), DEFAULT_PRICE);
        assert_eq!(constructor_price("Ferrari"), Price::from_tenths(270));
        assert_eq!(constructor_price("Andretti"), DEFAULT_PRICE);
    }

    #[test]
    fn logos_only_for_known_teams() {
        let logo = constructor_logo("McLaren").expect("logo");
        assert!(logo.ends_with("/mclaren.png"));
        assert_eq!(constructor_logo("Andretti"), None);
    }
}
