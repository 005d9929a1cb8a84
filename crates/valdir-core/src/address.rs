use serde::{Deserialize, Serialize};

/// A postal address resolved from a postal code. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code as returned by the lookup service, e.g. `"88310-002"`.
    pub postal_code: String,
    pub street: String,
    pub neighborhood: String,
    /// City name, e.g. `"Itajaí"`.
    pub locality: String,
    /// Two-letter state code, e.g. `"SC"`.
    pub region: String,
}

impl Address {
    /// Free-text query handed to the geocoder:
    /// `"street, neighborhood, locality, region, country"`.
    #[must_use]
    pub fn geocoding_query(&self, country: &str) -> String {
        format!(
            "{}, {}, {}, {}, {country}",
            self.street, self.neighborhood, self.locality, self.region
        )
    }

    /// First five digits of the address's postal code, if it has them.
    #[must_use]
    pub fn postal_prefix(&self) -> Option<u32> {
        let digits: String = self
            .postal_code
            .chars()
            .filter(char::is_ascii_digit)
            .take(5)
            .collect();
        if digits.len() == 5 {
            digits.parse().ok()
        } else {
            None
        }
    }
}
