//! Unit resolution for dimensioned OCX values
//!
//! Every length in an OCX document is a `numericvalue` attribute paired
//! with a `unit` attribute naming a unit declared in the document's
//! `UnitsML/UnitSet` subtree. The table seeds SI defaults so translation
//! keeps working when that subtree is absent or a unit is undeclared;
//! lookups never fail, they fall back to a multiplier of 1.0 with a
//! diagnostic.

use crate::dom::Element;
use log::warn;
use std::collections::HashMap;

/// Maps unit identifiers to their multiplier-to-meter
#[derive(Debug, Clone)]
pub struct UnitTable {
    factors: HashMap<String, f64>,
}

impl UnitTable {
    /// Create a table seeded with the SI defaults {m, dm, cm, mm}
    pub fn new() -> Self {
        let mut factors = HashMap::new();
        factors.insert("m".to_string(), 1.0);
        factors.insert("dm".to_string(), 0.1);
        factors.insert("cm".to_string(), 0.01);
        factors.insert("mm".to_string(), 0.001);
        Self { factors }
    }

    /// Read unit declarations from the document's `UnitsML/UnitSet` subtree
    ///
    /// Each declared `Unit` maps its `id` to the multiplier of the base
    /// symbol named by its nested `UnitSymbol`. Declarations override the
    /// seeded defaults. A document without the subtree keeps the defaults.
    pub fn prepare(&mut self, root: &Element) {
        let Some(units_ml) = root.first_child("UnitsML") else {
            warn!("No UnitsML subtree found, keeping default unit factors");
            return;
        };
        let Some(unit_set) = units_ml.first_child("UnitSet") else {
            warn!("UnitsML carries no UnitSet, keeping default unit factors");
            return;
        };

        for unit in unit_set.child_elements() {
            if unit.local_name() != "Unit" {
                continue;
            }
            let Some(id) = unit.attr("id") else {
                warn!("Unit declaration without an id attribute, skipped");
                continue;
            };
            let Some(symbol_el) = unit.first_child("UnitSymbol") else {
                warn!("Unit '{}' has no UnitSymbol, skipped", id);
                continue;
            };
            let symbol = symbol_el.text();
            let symbol = symbol.trim();
            let factor = match symbol {
                "m" => 1.0,
                "dm" => 0.1,
                "cm" => 0.01,
                "mm" => 0.001,
                other => {
                    warn!(
                        "Unit '{}' declares unknown base symbol '{}', using factor 1.0",
                        id, other
                    );
                    1.0
                }
            };
            self.factors.insert(id.to_string(), factor);
        }
    }

    /// Return the multiplier-to-meter for a unit identifier
    ///
    /// Never fails: an unknown identifier resolves to 1.0 with a
    /// diagnostic.
    pub fn factor(&self, unit_id: &str) -> f64 {
        match self.factors.get(unit_id) {
            Some(factor) => *factor,
            None => {
                warn!("Unknown unit '{}', falling back to factor 1.0", unit_id);
                1.0
            }
        }
    }

    /// Resolve a dimensioned element to meters
    ///
    /// Reads the `numericvalue` attribute through the numeric fallback
    /// chain and scales it by the factor of the referenced `unit`.
    pub fn read_dimension(&self, element: &Element) -> f64 {
        let mut value = 0.0;
        match element.attr("numericvalue") {
            Some(text) => {
                if let Some(parsed) = parse_numeric(text, element.local_name()) {
                    value = parsed;
                }
            }
            None => {
                warn!(
                    "Element '{}' has no numericvalue attribute, using 0.0",
                    element.local_name()
                );
            }
        }

        let factor = match element.attr("unit") {
            Some(unit_id) => self.factor(unit_id),
            None => {
                warn!(
                    "Element '{}' has no unit attribute, assuming meters",
                    element.local_name()
                );
                1.0
            }
        };

        value * factor
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a numeric attribute through the historical fallback chain
///
/// Tries a floating-point parse first, then an integer parse. When both
/// fail the caller keeps its zero-initialized value; that branch used to
/// be silent and is now diagnosed.
pub(crate) fn parse_numeric(text: &str, field: &str) -> Option<f64> {
    if let Ok(value) = text.trim().parse::<f64>() {
        return Some(value);
    }
    if let Ok(value) = text.trim().parse::<i64>() {
        return Some(value as f64);
    }
    warn!(
        "Value '{}' of '{}' is neither real nor integer, left untouched",
        text, field
    );
    None
}
