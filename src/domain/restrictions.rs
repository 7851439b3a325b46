// src/domain/restrictions.rs

use crate::domain::geo::Region;
use crate::domain::property::{PropertyType, Segment};
use std::collections::HashMap;

/// Per-segment ceiling on living area and price, used to discard
/// implausible listings before training. Static configuration, not
/// derived from data; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restriction {
    pub max_living_area: f64,
    pub max_price: f64,
}

/// The full ceiling table, built once and passed into the pipeline.
/// Segments without an entry are trained unrestricted.
#[derive(Debug, Clone)]
pub struct Restrictions {
    by_segment: HashMap<Segment, Restriction>,
}

impl Restrictions {
    pub fn builtin() -> Self {
        use PropertyType::{Apartment, House};
        use Region::*;

        let entries: [(PropertyType, Region, f64, f64); 17] = [
            (Apartment, EastFlanders, 300.0, 600_000.0),
            (Apartment, Hainaut, 175.0, 350_000.0),
            (Apartment, WestFlanders, 150.0, 600_000.0),
            (Apartment, FlemishBrabant, 300.0, 800_000.0),
            (Apartment, Liege, 300.0, 600_000.0),
            (Apartment, Limburg, 170.0, 640_000.0),
            (Apartment, Luxembourg, 150.0, 450_000.0),
            (Apartment, Namur, 140.0, 600_000.0),
            (House, Antwerp, 800.0, 3_000_000.0),
            (House, EastFlanders, 800.0, 1_500_000.0),
            (House, FlemishBrabant, 800.0, 4_000_000.0),
            (House, Hainaut, 600.0, 1_000_000.0),
            (House, Liege, 800.0, 1_500_000.0),
            (House, Luxembourg, 350.0, 800_000.0),
            (House, Namur, 800.0, 700_000.0),
            (House, WalloonBrabant, 800.0, 2_500_000.0),
            (House, WestFlanders, 500.0, 1_000_000.0),
        ];

        let by_segment = entries
            .into_iter()
            .map(|(property_type, region, max_living_area, max_price)| {
                (
                    Segment::new(property_type, region),
                    Restriction {
                        max_living_area,
                        max_price,
                    },
                )
            })
            .collect();

        Self { by_segment }
    }

    pub fn get(&self, segment: &Segment) -> Option<&Restriction> {
        self.by_segment.get(segment)
    }

    pub fn len(&self) -> usize {
        self.by_segment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_segment.is_empty()
    }
}
