use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the seven soil/climate readings a prediction is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    PhValue,
    Rainfall,
}

impl Feature {
    /// Every feature, in the order the service and the form expect them.
    pub const ALL: [Feature; 7] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::PhValue,
        Feature::Rainfall,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used by form inputs.
    pub fn form_key(self) -> &'static str {
        match self {
            Feature::Nitrogen => "nitrogen",
            Feature::Phosphorus => "phosphorus",
            Feature::Potassium => "potassium",
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::PhValue => "ph_value",
            Feature::Rainfall => "rainfall",
        }
    }

    /// Key used in prediction request bodies and suggestion text.
    pub fn wire_key(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen",
            Feature::Phosphorus => "Phosphorus",
            Feature::Potassium => "Potassium",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::PhValue => "pH_Value",
            Feature::Rainfall => "Rainfall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::PhValue => "pH Value",
            other => other.wire_key(),
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Enter Nitrogen value",
            Feature::Phosphorus => "Enter Phosphorus value",
            Feature::Potassium => "Enter Potassium value",
            Feature::Temperature => "Enter Temperature (°C)",
            Feature::Humidity => "Enter Humidity (%)",
            Feature::PhValue => "Enter pH Value",
            Feature::Rainfall => "Enter Rainfall (mm)",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature '{0}'; expected one of nitrogen, phosphorus, potassium, temperature, humidity, ph_value, rainfall")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    /// Accepts the form key or the wire key, ignoring ASCII case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        Feature::ALL
            .into_iter()
            .find(|feature| {
                name.eq_ignore_ascii_case(feature.form_key())
                    || name.eq_ignore_ascii_case(feature.wire_key())
            })
            .ok_or_else(|| UnknownFeature(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_and_wire_keys() {
        assert_eq!("ph_value".parse::<Feature>(), Ok(Feature::PhValue));
        assert_eq!("pH_Value".parse::<Feature>(), Ok(Feature::PhValue));
        assert_eq!(" RAINFALL ".parse::<Feature>(), Ok(Feature::Rainfall));
        assert_eq!(
            "salinity".parse::<Feature>(),
            Err(UnknownFeature("salinity".to_string()))
        );
    }

    #[test]
    fn index_matches_declaration_order() {
        for (position, feature) in Feature::ALL.into_iter().enumerate() {
            assert_eq!(feature.index(), position);
        }
    }
}
