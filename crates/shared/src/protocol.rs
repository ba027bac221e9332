use serde::{Deserialize, Serialize};

use crate::domain::Feature;

pub const PREDICT_CROP_ROUTE: &str = "/predict_crop";
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// Request body for a crop prediction.
///
/// Non-finite values serialize as JSON `null`; the service decides what to
/// do with them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFeatures {
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: f64,
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "pH_Value")]
    pub ph_value: f64,
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
}

impl CropFeatures {
    pub fn from_fn(mut value_of: impl FnMut(Feature) -> f64) -> Self {
        Self {
            nitrogen: value_of(Feature::Nitrogen),
            phosphorus: value_of(Feature::Phosphorus),
            potassium: value_of(Feature::Potassium),
            temperature: value_of(Feature::Temperature),
            humidity: value_of(Feature::Humidity),
            ph_value: value_of(Feature::PhValue),
            rainfall: value_of(Feature::Rainfall),
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Nitrogen => self.nitrogen,
            Feature::Phosphorus => self.phosphorus,
            Feature::Potassium => self.potassium,
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::PhValue => self.ph_value,
            Feature::Rainfall => self.rainfall,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL
            .into_iter()
            .map(move |feature| (feature, self.get(feature)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
}

impl PredictionResponse {
    pub fn new(predicted_crop: impl Into<String>, improvements: Vec<String>) -> Self {
        Self {
            predicted_crop: Some(predicted_crop.into()),
            improvements: Some(improvements),
        }
    }
}
