//! Brazilian-Portuguese collation helpers.
//!
//! City names carry accented characters that must sort by their base
//! letter position ("Belém" among the B entries) rather than by code
//! point, matching `localeCompare(..., 'pt-BR')` for the character set
//! used in the route dataset.

use std::cmp::Ordering;

/// Build a case-folded, accent-folded sort key for `input`.
pub fn sort_key(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}

/// Compare two strings using the pt-BR sort key, falling back to the
/// raw strings so equal keys still order deterministically.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}

fn fold_char(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_to_base_letters() {
        assert_eq!(sort_key("São Paulo, SP"), "sao paulo, sp");
        assert_eq!(sort_key("Belém, PA"), "belem, pa");
        assert_eq!(sort_key("Florianópolis, SC"), "florianopolis, sc");
    }

    #[test]
    fn accented_names_sort_by_base_letter() {
        let mut cities = vec!["Brasília, DF", "Belém, PA", "Belo Horizonte, MG"];
        cities.sort_by(|a, b| compare(a, b));
        assert_eq!(
            cities,
            vec!["Belém, PA", "Belo Horizonte, MG", "Brasília, DF"]
        );
    }

    #[test]
    fn sort_key_is_case_insensitive() {
        assert_eq!(sort_key("são paulo, sp"), sort_key("SÃO PAULO, SP"));
    }

    #[test]
    fn equal_keys_still_order_deterministically() {
        assert_ne!(compare("Sao Paulo", "São Paulo"), Ordering::Equal);
    }
}
