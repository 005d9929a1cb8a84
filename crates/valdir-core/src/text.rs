//! Accent- and case-insensitive text folding.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds `s` into its comparison key: lower-cased, NFD-decomposed with
/// combining marks removed, and trimmed.
///
/// ```
/// use valdir_core::fold_key;
///
/// assert_eq!(fold_key("  São Francisco do Sul "), "sao francisco do sul");
/// assert_eq!(fold_key("ITAJAÍ"), "itajai");
/// ```
#[must_use]
pub fn fold_key(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns `true` when the folded `haystack` contains the folded `needle`.
#[must_use]
pub fn folded_contains(haystack: &str, needle: &str) -> bool {
    fold_key(haystack).contains(&fold_key(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_portuguese_diacritics() {
        assert_eq!(fold_key("Balneário Camboriú"), "balneario camboriu");
        assert_eq!(fold_key("Piçarras"), "picarras");
        assert_eq!(fold_key("Itapoá"), "itapoa");
        assert_eq!(fold_key("Cômoda"), "comoda");
    }

    #[test]
    fn case_variants_fold_to_same_key() {
        let expected = "sao francisco do sul";
        assert_eq!(fold_key("São Francisco do Sul"), expected);
        assert_eq!(fold_key("sao francisco do sul"), expected);
        assert_eq!(fold_key("SAO FRANCISCO DO SUL"), expected);
        assert_eq!(fold_key("SÃO FRANCISCO DO SUL"), expected);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(fold_key("\t Joinville \n"), "joinville");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(fold_key(""), "");
        assert_eq!(fold_key("   "), "");
    }

    #[test]
    fn folded_contains_ignores_accents() {
        assert!(folded_contains("Sofá Retrátil", "sofa retratil"));
        assert!(!folded_contains("Mesa", "cadeira"));
    }
}
