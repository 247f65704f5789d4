//! Built-in product catalogue.
//!
//! The catalogue is vendor-authored static data; it ships with the
//! application rather than living in the order store. Prices are list
//! prices in rupees; the price actually paid is captured per order line at
//! checkout. Products without a listed price are quote-only.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId, ProductName};

/// Catalogue section a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// RTK GPS receivers and base stations
    RtkGps,
    /// GPS/GNSS modules
    Gnss,
    /// Flight controllers and autopilots
    Autopilots,
    /// Airspeed and other sensors
    Sensors,
}

impl ProductCategory {
    /// Display label as shown in the catalogue.
    pub const fn label(self) -> &'static str {
        match self {
            Self::RtkGps => "RTK GPS",
            Self::Gnss => "GPS/GNSS",
            Self::Autopilots => "Autopilots",
            Self::Sensors => "Sensors",
        }
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, referenced by cart and order lines
    pub id: ProductId,
    /// Display name
    pub name: ProductName,
    /// Catalogue section
    pub category: ProductCategory,
    /// One-line pitch
    pub tagline: String,
    /// Headline features, in display order
    pub features: Vec<String>,
    /// Spec table rows, in display order
    pub specs: Vec<(String, String)>,
    /// List price; `None` means quote-only
    pub price: Option<Money>,
}

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    category: ProductCategory,
    tagline: &'static str,
    features: &'static [&'static str],
    specs: &'static [(&'static str, &'static str)],
    price_paise: Option<u64>,
}

const SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "precisionpoint-pro",
        name: "PrecisionPoint-Pro",
        category: ProductCategory::RtkGps,
        tagline: "High-precision RTK GPS with DroneCAN",
        features: &[
            "High-performance Cortex-M4 core with FPU",
            "Ublox ZED-F9/F20/X20 with RF front-end design",
            "Built-in ICM42688 IMU, DPS368 Baro, IST8310 Magnetometer",
            "UAVCAN/DroneCAN communication protocol",
            "Seamless integration with Ardupilot and PX4",
        ],
        specs: &[
            ("RTK Accuracy", "±1cm XY, ±2cm Z"),
            ("Heading Accuracy", "0.1° via CAN"),
            ("Power", "5V, 250mA max"),
            ("Weight", "15g"),
            ("Dimensions", "33x45mm"),
        ],
        price_paise: Some(2_499_900),
    },
    ProductSeed {
        id: "precisionpoint-base",
        name: "PrecisionPoint-BASE",
        category: ProductCategory::RtkGps,
        tagline: "RTK Base Station for precision navigation",
        features: &[
            "Ublox ZED-F9/F20/X20 with RF front-end design",
            "UART+I2C communication protocol",
            "Auto-config for BASE and ROVER usage",
        ],
        specs: &[
            ("RTK Accuracy", "±1cm XY, ±2cm Z"),
            ("Power", "5V, 250mA max"),
            ("Weight", "15g"),
        ],
        price_paise: Some(2_249_900),
    },
    ProductSeed {
        id: "truenav-pro",
        name: "Sierra TrueNav Pro",
        category: ProductCategory::Gnss,
        tagline: "Ultra-low power GNSS with DroneCAN",
        features: &[
            "Multi-constellation GNSS reception",
            "DroneCAN communication protocol",
            "Ultra-low power consumption",
        ],
        specs: &[
            ("Power", "5V, 100mA max"),
            ("Weight", "12g"),
        ],
        price_paise: Some(1_999_900),
    },
    ProductSeed {
        id: "truenav-mini",
        name: "Sierra TrueNav-Mini",
        category: ProductCategory::Gnss,
        tagline: "Compact GNSS module",
        features: &[
            "Compact form factor for space-constrained frames",
            "Multi-constellation GNSS reception",
        ],
        specs: &[
            ("Weight", "8g"),
            ("Dimensions", "25x25mm"),
        ],
        price_paise: Some(1_499_900),
    },
    ProductSeed {
        id: "truespeed-v2",
        name: "Sierra TrueSpeed V2",
        category: ProductCategory::Sensors,
        tagline: "Next-gen airspeed sensor",
        features: &[
            "Digital differential pressure sensing",
            "I2C and DroneCAN interfaces",
        ],
        specs: &[
            ("Interface", "I2C / DroneCAN"),
            ("Weight", "6g"),
        ],
        price_paise: Some(1_249_900),
    },
    ProductSeed {
        id: "sierra-f1-mini",
        name: "Sierra F1 Mini",
        category: ProductCategory::Autopilots,
        tagline: "Compact flight controller",
        features: &[
            "Dual IMU redundancy",
            "Ardupilot and PX4 support",
        ],
        specs: &[
            ("Processor", "STM32H743"),
            ("Weight", "20g"),
        ],
        price_paise: Some(2_199_900),
    },
    ProductSeed {
        id: "truepilot",
        name: "Sierra TruePilot",
        category: ProductCategory::Autopilots,
        tagline: "All-in-one autopilot with integrated GNSS",
        features: &[
            "Integrated GNSS, IMU, and barometer",
            "Single-cable installation",
        ],
        specs: &[
            ("Processor", "STM32H743"),
            ("Weight", "35g"),
        ],
        // Quote-only
        price_paise: None,
    },
    ProductSeed {
        id: "micronav-fpv",
        name: "Sierra MicroNav FPV",
        category: ProductCategory::Gnss,
        tagline: "Ultra-compact GPS for FPV",
        features: &[
            "Smallest-in-class footprint",
            "Fast cold-start acquisition",
        ],
        specs: &[
            ("Weight", "3g"),
            ("Dimensions", "15x15mm"),
        ],
        price_paise: Some(499_900),
    },
];

impl ProductSeed {
    fn build(&self) -> Product {
        Product {
            id: ProductId::try_new(self.id.to_string())
                .expect("catalogue seed ids are valid"),
            name: ProductName::try_new(self.name.to_string())
                .expect("catalogue seed names are valid"),
            category: self.category,
            tagline: self.tagline.to_owned(),
            features: self.features.iter().map(|f| (*f).to_owned()).collect(),
            specs: self
                .specs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            price: self.price_paise.map(|paise| {
                Money::from_paise(paise).expect("catalogue seed prices are valid")
            }),
        }
    }
}

/// The full built-in catalogue, in display order.
pub fn catalog() -> Vec<Product> {
    SEEDS.iter().map(ProductSeed::build).collect()
}

/// Look up one product by id.
pub fn find_product(id: &ProductId) -> Option<Product> {
    SEEDS
        .iter()
        .find(|seed| seed.id == id.as_ref())
        .map(ProductSeed::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids_are_unique() {
        let products = catalog();
        for (i, a) in products.iter().enumerate() {
            for b in &products[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_product_by_id() {
        let id = ProductId::try_new("truenav-pro".to_string()).unwrap();
        let product = find_product(&id).unwrap();
        assert_eq!(product.name.as_ref(), "Sierra TrueNav Pro");
        assert_eq!(product.category, ProductCategory::Gnss);
        assert_eq!(product.price.unwrap().to_string(), "₹19999.00");
    }

    #[test]
    fn test_unknown_product_is_none() {
        let id = ProductId::try_new("flux-capacitor".to_string()).unwrap();
        assert!(find_product(&id).is_none());
    }

    #[test]
    fn test_quote_only_products_have_no_price() {
        let id = ProductId::try_new("truepilot".to_string()).unwrap();
        assert!(find_product(&id).unwrap().price.is_none());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ProductCategory::RtkGps.label(), "RTK GPS");
        assert_eq!(ProductCategory::Gnss.label(), "GPS/GNSS");
    }
}
