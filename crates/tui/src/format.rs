//! pt-BR number and currency formatting.
//!
//! Mirrors the fixed-locale formatting of the calculator UI:
//! thousands separated with `.`, decimals with `,`, currency prefixed
//! with `R$`.

/// Format `value` with `decimals` fraction digits, pt-BR style.
pub fn format_number(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rendered = format!("{:.*}", decimals, value.abs());
    // sign is decided after rounding so -0.001 at 2 decimals is "0,00"
    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    let (integer, fraction) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + 4);
    if negative {
        out.push('-');
    }
    let digits = integer.len();
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (digits - index) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Format `value` as BRL currency, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_number(value, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_number(1234.5, 2), "1.234,50");
        assert_eq!(format_number(1_000_000.0, 0), "1.000.000");
        assert_eq!(format_number(430.0, 0), "430");
    }

    #[test]
    fn uses_comma_for_decimals() {
        assert_eq!(format_number(8.9, 2), "8,90");
        assert_eq!(format_number(0.12, 2), "0,12");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(format_number(-3.0, 2), "-3,00");
        assert_eq!(format_number(-1234.56, 2), "-1.234,56");
    }

    #[test]
    fn negative_zero_renders_unsigned() {
        assert_eq!(format_number(-0.0, 2), "0,00");
        assert_eq!(format_number(-0.001, 2), "0,00");
    }

    #[test]
    fn currency_is_prefixed() {
        assert_eq!(format_currency(150.0), "R$ 150,00");
        assert_eq!(format_currency(1234.56), "R$ 1.234,56");
    }

    #[test]
    fn non_finite_values_render_as_zero() {
        assert_eq!(format_number(f64::NAN, 2), "0,00");
        assert_eq!(format_number(f64::INFINITY, 0), "0");
    }
}
