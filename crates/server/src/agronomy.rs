//! Crop profiles, the improvement engine and the default predictor.

use shared::{domain::Feature, protocol::CropFeatures};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalRange {
    pub low: f64,
    pub high: f64,
}

impl OptimalRange {
    fn width(self) -> f64 {
        self.high - self.low
    }

    fn midpoint(self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// How far `value` lies outside the range, in range widths.
    fn excess(self, value: f64) -> f64 {
        if value < self.low {
            (self.low - value) / self.width()
        } else if value > self.high {
            (value - self.high) / self.width()
        } else {
            0.0
        }
    }
}

/// Growing conditions a crop does best in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    ranges: [OptimalRange; Feature::COUNT],
}

impl CropProfile {
    pub fn range(&self, feature: Feature) -> OptimalRange {
        self.ranges[feature.index()]
    }
}

const fn profile(name: &'static str, ranges: [(f64, f64); Feature::COUNT]) -> CropProfile {
    let mut converted = [OptimalRange { low: 0.0, high: 0.0 }; Feature::COUNT];
    let mut i = 0;
    while i < Feature::COUNT {
        converted[i] = OptimalRange {
            low: ranges[i].0,
            high: ranges[i].1,
        };
        i += 1;
    }
    CropProfile {
        name,
        ranges: converted,
    }
}

/// Ranges per crop, columns in [`Feature::ALL`] order.
#[rustfmt::skip]
pub static CROP_PROFILES: [CropProfile; 22] = [
    profile("Rice", [(70.0, 90.0), (40.0, 60.0), (40.0, 60.0), (20.0, 27.0), (80.0, 85.0), (6.0, 7.0), (150.0, 300.0)]),
    profile("Maize", [(60.0, 80.0), (35.0, 60.0), (30.0, 40.0), (18.0, 27.0), (60.0, 80.0), (5.5, 7.5), (50.0, 100.0)]),
    profile("Chickpea", [(20.0, 40.0), (15.0, 25.0), (20.0, 25.0), (21.0, 26.0), (50.0, 60.0), (6.0, 7.0), (50.0, 90.0)]),
    profile("Kidney Beans", [(30.0, 50.0), (30.0, 45.0), (35.0, 45.0), (18.0, 24.0), (60.0, 70.0), (6.0, 7.0), (50.0, 100.0)]),
    profile("PigeonPeas", [(20.0, 40.0), (15.0, 30.0), (20.0, 30.0), (18.0, 26.0), (50.0, 60.0), (5.5, 7.5), (60.0, 100.0)]),
    profile("MothBeans", [(10.0, 30.0), (15.0, 20.0), (15.0, 25.0), (25.0, 35.0), (50.0, 60.0), (7.0, 8.0), (25.0, 60.0)]),
    profile("Mung Bean", [(20.0, 40.0), (20.0, 30.0), (20.0, 30.0), (24.0, 27.0), (50.0, 60.0), (6.0, 7.5), (60.0, 100.0)]),
    profile("Blackgram", [(20.0, 40.0), (20.0, 30.0), (20.0, 30.0), (25.0, 30.0), (50.0, 60.0), (6.0, 7.0), (60.0, 100.0)]),
    profile("Lentil", [(20.0, 40.0), (15.0, 25.0), (15.0, 25.0), (18.0, 25.0), (50.0, 60.0), (6.0, 7.0), (50.0, 100.0)]),
    profile("Pomegranate", [(40.0, 60.0), (30.0, 40.0), (40.0, 50.0), (25.0, 35.0), (40.0, 60.0), (5.5, 7.2), (500.0, 750.0)]),
    profile("Banana", [(100.0, 200.0), (30.0, 40.0), (250.0, 400.0), (26.0, 30.0), (75.0, 85.0), (6.0, 7.0), (1500.0, 2000.0)]),
    profile("Mango", [(30.0, 60.0), (25.0, 50.0), (30.0, 50.0), (24.0, 27.0), (60.0, 70.0), (5.5, 7.5), (750.0, 2500.0)]),
    profile("Grapes", [(40.0, 60.0), (30.0, 50.0), (50.0, 100.0), (20.0, 30.0), (60.0, 70.0), (6.0, 7.5), (500.0, 700.0)]),
    profile("Watermelon", [(20.0, 40.0), (20.0, 30.0), (30.0, 50.0), (22.0, 30.0), (60.0, 70.0), (6.0, 7.0), (400.0, 600.0)]),
    profile("Muskmelon", [(20.0, 40.0), (20.0, 30.0), (30.0, 50.0), (25.0, 30.0), (60.0, 70.0), (6.0, 7.0), (400.0, 600.0)]),
    profile("Apple", [(50.0, 80.0), (30.0, 40.0), (30.0, 50.0), (18.0, 24.0), (50.0, 60.0), (6.0, 7.0), (1000.0, 1250.0)]),
    profile("Orange", [(50.0, 70.0), (30.0, 50.0), (60.0, 80.0), (15.0, 30.0), (50.0, 70.0), (5.5, 7.5), (1000.0, 1500.0)]),
    profile("Papaya", [(100.0, 200.0), (30.0, 40.0), (250.0, 400.0), (22.0, 26.0), (70.0, 85.0), (6.0, 7.0), (1200.0, 1500.0)]),
    profile("Coconut", [(50.0, 100.0), (40.0, 60.0), (120.0, 250.0), (27.0, 32.0), (70.0, 80.0), (5.2, 8.0), (1500.0, 2500.0)]),
    profile("Cotton", [(30.0, 70.0), (20.0, 30.0), (40.0, 50.0), (21.0, 27.0), (60.0, 70.0), (5.0, 6.5), (700.0, 1000.0)]),
    profile("Jute", [(40.0, 80.0), (20.0, 50.0), (20.0, 40.0), (24.0, 37.0), (70.0, 90.0), (6.5, 7.5), (1500.0, 2500.0)]),
    profile("Coffee", [(80.0, 120.0), (20.0, 30.0), (40.0, 80.0), (15.0, 24.0), (70.0, 80.0), (4.5, 6.5), (1200.0, 2500.0)]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increase,
    Decrease,
}

impl Adjustment {
    fn verb(self) -> &'static str {
        match self {
            Adjustment::Increase => "Increase",
            Adjustment::Decrease => "Decrease",
        }
    }
}

pub fn improvement_action(feature: Feature, adjustment: Adjustment) -> &'static str {
    use Adjustment::{Decrease, Increase};

    match (feature, adjustment) {
        (Feature::Nitrogen, Increase) => "Apply Urea, Ammonium Nitrate, or Manure",
        (Feature::Nitrogen, Decrease) => "Avoid excess nitrogen fertilizers",
        (Feature::Phosphorus, Increase) => "Add Rock Phosphate, Bone Meal, or Superphosphate",
        (Feature::Phosphorus, Decrease) => "Reduce phosphorus fertilizer application",
        (Feature::Potassium, Increase) => "Use Potash, Potassium Sulfate, or Compost",
        (Feature::Potassium, Decrease) => "Reduce potassium-based fertilizers",
        (Feature::Temperature, Increase) => "Consider greenhouses or mulching for warmth",
        (Feature::Temperature, Decrease) => {
            "Use shade nets or increase irrigation to cool the soil"
        }
        (Feature::Humidity, Increase) => "Increase irrigation or use misting systems",
        (Feature::Humidity, Decrease) => "Improve drainage or reduce irrigation",
        (Feature::PhValue, Increase) => "Add Lime or Dolomite to raise pH",
        (Feature::PhValue, Decrease) => {
            "Use Sulfur, Aluminum Sulfate, or organic materials like compost to lower pH"
        }
        (Feature::Rainfall, Increase) => "Introduce irrigation systems",
        (Feature::Rainfall, Decrease) => "Improve drainage or use rainwater harvesting methods",
    }
}

/// One line per reading outside the crop's optimal range, in feature order.
pub fn suggest_improvements(features: &CropFeatures, crop: &CropProfile) -> Vec<String> {
    features
        .iter()
        .filter_map(|(feature, value)| {
            let range = crop.range(feature);
            let adjustment = if value < range.low {
                Adjustment::Increase
            } else if value > range.high {
                Adjustment::Decrease
            } else {
                return None;
            };
            Some(format!(
                "{} {}: {}",
                adjustment.verb(),
                feature.wire_key(),
                improvement_action(feature, adjustment)
            ))
        })
        .collect()
}

pub trait CropPredictor: Send + Sync {
    fn predict(&self, features: &CropFeatures) -> &'static CropProfile;
}

/// Picks the crop whose optimal ranges the reading misses by the least.
///
/// Distance outside the ranges decides first; distance from the range
/// midpoints breaks ties, then table order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeProximityPredictor;

impl RangeProximityPredictor {
    fn score(features: &CropFeatures, crop: &CropProfile) -> (f64, f64) {
        features
            .iter()
            .fold((0.0, 0.0), |(outside, centre), (feature, value)| {
                let range = crop.range(feature);
                (
                    outside + range.excess(value),
                    centre + (value - range.midpoint()).abs() / range.width(),
                )
            })
    }
}

impl CropPredictor for RangeProximityPredictor {
    fn predict(&self, features: &CropFeatures) -> &'static CropProfile {
        let mut best = &CROP_PROFILES[0];
        let mut best_score = Self::score(features, best);
        for crop in &CROP_PROFILES[1..] {
            let score = Self::score(features, crop);
            if score < best_score {
                best = crop;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "tests/agronomy_tests.rs"]
mod tests;
