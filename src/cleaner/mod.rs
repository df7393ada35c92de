// Turns scraped raw listings into the canonical dataset.
pub mod engine;

use crate::model::{CanonicalListing, RawListing};
use engine::{classify, Classification};
use tracing::info;

/// Applies the ordered cleaning stages: completeness filter, category
/// filter, engine split + classification, numeric coercion, final
/// validity filter. Records failing any stage are dropped, never
/// null-filled, and the surviving records keep their input order.
pub struct Cleaner {
    reference_year: u32,
}

impl Cleaner {
    pub fn new(reference_year: u32) -> Self {
        Self { reference_year }
    }

    pub fn clean(&self, raws: &[RawListing]) -> Vec<CanonicalListing> {
        let complete: Vec<&RawListing> = raws
            .iter()
            .filter(|raw| raw.consumption.is_some())
            .collect();
        info!(
            "completeness filter: kept {}, dropped {}",
            complete.len(),
            raws.len() - complete.len()
        );

        let in_category: Vec<&RawListing> = complete
            .iter()
            .copied()
            .filter(|raw| category_ok(raw))
            .collect();
        info!(
            "category filter: kept {}, dropped {}",
            in_category.len(),
            complete.len() - in_category.len()
        );

        let canonical: Vec<CanonicalListing> = in_category
            .iter()
            .filter_map(|raw| self.canonicalize(raw))
            .collect();
        info!(
            "validity filter: kept {}, dropped {}",
            canonical.len(),
            in_category.len() - canonical.len()
        );

        canonical
    }

    /// Engine split, classification, numeric coercion and the final
    /// validity checks for a single record. None means dropped.
    fn canonicalize(&self, raw: &RawListing) -> Option<CanonicalListing> {
        let (descriptor, power_text) = split_engine(raw.engine.as_deref()?)?;

        let engine_class = match classify(descriptor) {
            Classification::Class(class) => class,
            // Both sentinels are removed before the dataset is usable.
            Classification::Unclassifiable | Classification::Unknown => return None,
        };

        let consumption = parse_consumption(raw.consumption.as_deref()?)?;
        let power = parse_power(power_text)?;

        let year: i64 = raw.year.as_deref()?.trim().parse().ok()?;
        let age = i64::from(self.reference_year) - year;
        if age < 0 {
            return None;
        }
        if consumption <= 0.0 || power <= 0.0 {
            return None;
        }

        Some(CanonicalListing {
            consumption,
            vehicle_age: age as u32,
            body_type: raw.body_type.clone()?,
            fuel_type: raw.fuel_type.clone()?,
            engine_class,
            power,
        })
    }
}

/// Fuel must name benzín or diesel and not be a hybrid or LPG variant.
/// Raw engine text flagged "zaod" by the site is dropped here too.
fn category_ok(raw: &RawListing) -> bool {
    let Some(fuel) = raw.fuel_type.as_deref() else {
        return false;
    };
    let fuel = fuel.to_lowercase();
    if !fuel.contains("benzín") && !fuel.contains("diesel") {
        return false;
    }
    if fuel.contains("hybrid") || fuel.contains("lpg") {
        return false;
    }
    if let Some(engine) = raw.engine.as_deref() {
        if engine.to_lowercase().contains("zaod") {
            return false;
        }
    }
    true
}

/// The raw engine field is expected as "<descriptor>, <power-with-unit>".
/// Split on the first comma; anything else fails the split.
fn split_engine(engine: &str) -> Option<(&str, &str)> {
    let (descriptor, power) = engine.split_once(',')?;
    Some((descriptor, power.trim_start()))
}

/// Strips the exact " l/100km" suffix. Any other unit format fails.
fn parse_consumption(text: &str) -> Option<f64> {
    let stripped = text.strip_suffix(" l/100km")?;
    stripped.trim().parse().ok()
}

/// Strips the exact "kW" suffix. Any other unit format fails.
fn parse_power(text: &str) -> Option<f64> {
    let stripped = text.strip_suffix("kW")?;
    stripped.trim().parse().ok()
}
