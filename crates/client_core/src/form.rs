//! Raw form values and their coercion into request numbers.

use std::str::FromStr;

use shared::{
    domain::{Feature, UnknownFeature},
    protocol::CropFeatures,
};

/// The seven raw input strings of one form, one slot per [`Feature`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; Feature::COUNT],
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: Feature) -> &str {
        &self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: impl Into<String>) {
        self.values[feature.index()] = value.into();
    }

    pub fn set_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Feature, UnknownFeature> {
        let feature = Feature::from_str(name)?;
        self.set(feature, value);
        Ok(feature)
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(String::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, &str)> {
        Feature::ALL
            .into_iter()
            .map(move |feature| (feature, self.get(feature)))
    }

    /// Coerces every slot with [`coerce_number`]; nothing is rejected.
    pub fn to_features(&self) -> CropFeatures {
        CropFeatures::from_fn(|feature| coerce_number(self.get(feature)))
    }
}

/// Lenient number parsing: leading whitespace is skipped and the longest
/// numeric prefix is used, so `"12kg"` is 12. Input without a numeric
/// prefix, including the empty string, yields NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim_start();
    let end = numeric_prefix_len(text);
    if end == 0 {
        return f64::NAN;
    }
    text[..end].parse().unwrap_or(f64::NAN)
}

fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    if text[pos..].starts_with("Infinity") {
        return pos + "Infinity".len();
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;
    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&bytes[pos + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }
    pos
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
