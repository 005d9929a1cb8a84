use valdir_core::{fold_key, LocatorData};

/// Allow-list of served localities, matched ignoring case and diacritics.
#[derive(Debug, Clone)]
pub struct ServiceArea {
    folded: Vec<String>,
}

impl ServiceArea {
    pub fn new<I, S>(localities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folded = localities
            .into_iter()
            .map(|l| fold_key(l.as_ref()))
            .filter(|l| !l.is_empty())
            .collect();
        Self { folded }
    }

    #[must_use]
    pub fn from_locator(data: &LocatorData) -> Self {
        Self::new(data.service_area())
    }

    /// A locality is served when its folded form contains, or is contained
    /// in, any allow-list entry. A blank locality is never served.
    #[must_use]
    pub fn is_served(&self, locality: &str) -> bool {
        let key = fold_key(locality);
        if key.is_empty() {
            return false;
        }
        self.folded
            .iter()
            .any(|entry| key.contains(entry.as_str()) || entry.contains(key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> ServiceArea {
        ServiceArea::new([
            "Itajaí",
            "Balneário Camboriú",
            "Camboriú",
            "São Francisco do Sul",
            "Piçarras",
        ])
    }

    #[test]
    fn matches_ignoring_case_and_accents() {
        let area = area();
        assert!(area.is_served("Itajaí"));
        assert!(area.is_served("ITAJAI"));
        assert!(area.is_served("São Francisco do Sul"));
        assert!(area.is_served("sao francisco do sul"));
        assert!(area.is_served("SAO FRANCISCO DO SUL"));
    }

    #[test]
    fn matches_substrings_both_ways() {
        let area = area();
        // Input contains an entry.
        assert!(area.is_served("Balneário Piçarras"));
        // Entry contains the input.
        assert!(area.is_served("Camboriu"));
        assert!(area.is_served("Francisco"));
    }

    #[test]
    fn rejects_unserved_and_blank() {
        let area = area();
        assert!(!area.is_served("São Paulo"));
        assert!(!area.is_served("Florianópolis"));
        assert!(!area.is_served(""));
        assert!(!area.is_served("   "));
    }
}
