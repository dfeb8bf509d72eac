use crate::element::Element;

/// Bare element symbol for a nucleus string: `"13C"` → `"C"`, `"1H"` →
/// `"H"`, `"29Si"` → `"Si"`.
///
/// Only the *leading* digit run is stripped; the first element token after
/// it wins and anything beyond is ignored as annotation. Notations that put
/// the mass number after the symbol (`"C13"`) still resolve correctly, but
/// through the token scan stopping at the symbol, not through any digit
/// removal. Never fails: unparseable input falls back to carbon, the
/// database's dominant nucleus.
pub fn nucleus_element(nucleus: &str) -> String {
    let rest = nucleus
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit());

    let chars: Vec<char> = rest.chars().collect();
    if chars.len() >= 2 && chars[0].is_ascii_uppercase() && chars[1].is_ascii_lowercase() {
        let two: String = chars[..2].iter().collect();
        if Element::from_symbol(&two).is_some() {
            return two;
        }
    }
    if !chars.is_empty() && chars[0].is_ascii_uppercase() {
        let one: String = chars[..1].iter().collect();
        if Element::from_symbol(&one).is_some() {
            return one;
        }
    }
    "C".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_nuclei() {
        assert_eq!(nucleus_element("13C"), "C");
        assert_eq!(nucleus_element("1H"), "H");
        assert_eq!(nucleus_element("15N"), "N");
        assert_eq!(nucleus_element("19F"), "F");
        assert_eq!(nucleus_element("31P"), "P");
        assert_eq!(nucleus_element("29Si"), "Si");
    }

    #[test]
    fn bare_symbol_passes_through() {
        assert_eq!(nucleus_element("C"), "C");
        assert_eq!(nucleus_element("Si"), "Si");
    }

    #[test]
    fn trailing_annotation_ignored() {
        assert_eq!(nucleus_element("13C-4"), "C");
    }

    #[test]
    fn digits_after_symbol_are_not_stripped() {
        // Trailing mass numbers survive the digit strip and are dropped only
        // because the element scan stops at the symbol itself.
        assert_eq!(nucleus_element("C13"), "C");
        assert_eq!(nucleus_element("Si29"), "Si");
    }

    #[test]
    fn garbage_falls_back_to_carbon() {
        assert_eq!(nucleus_element(""), "C");
        assert_eq!(nucleus_element("123"), "C");
        assert_eq!(nucleus_element("xq"), "C");
    }
}
