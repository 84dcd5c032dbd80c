//! Identifier formats shared by request validation and services.

use regex::Regex;
use std::sync::LazyLock;

/// Tax number (INN): 10 digits for organisations, 12 for individuals.
pub static TAX_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{10}|[0-9]{12})$").expect("valid regex"));

/// State registration number (OGRN / OGRNIP): 13 or 15 digits.
pub static OGRN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{13}|[0-9]{15})$").expect("valid regex"));

pub fn is_tax_number(value: &str) -> bool {
    TAX_NUMBER_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_number() {
        assert!(is_tax_number("7701234567"));
        assert!(is_tax_number("500100732259"));
        assert!(!is_tax_number("77012345"));
        assert!(!is_tax_number("77012345678"));
        assert!(!is_tax_number("770123456a"));
    }

    #[test]
    fn test_ogrn() {
        assert!(OGRN_RE.is_match("1027700132195"));
        assert!(OGRN_RE.is_match("304500116000157"));
        assert!(!OGRN_RE.is_match("10277001321"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(!is_tax_number("٧٧٠١٢٣٤٥٦٧"));
        assert!(!is_tax_number("７７０１２３４５６７"));
        assert!(!OGRN_RE.is_match("١٠٢٧٧٠٠١٣٢١٩٥"));
    }
}
