//! Input masks for Brazilian phone numbers, postal codes (CEP) and tax IDs
//! (CPF/CNPJ).
//!
//! Every formatter strips non-digits first and inserts a separator only once
//! a digit follows it, so partial input is partially formatted. Output is
//! truncated to the pattern's maximum length. Applying a formatter to its own
//! output returns the same string.

/// Keep only ASCII digits.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Lay `digits` out in groups, writing `separators[i]` before group `i + 1`.
/// The last group takes whatever digits remain.
fn mask(digits: &str, groups: &[usize], separators: &[char]) -> String {
    let mut out = String::with_capacity(digits.len() + separators.len());
    let mut rest = digits;

    for (i, &size) in groups.iter().enumerate() {
        if rest.is_empty() {
            break;
        }
        if i > 0 {
            out.push(separators[i - 1]);
        }
        let last = i + 1 == groups.len();
        let take = if last { rest.len() } else { size.min(rest.len()) };
        out.push_str(&rest[..take]);
        rest = &rest[take..];
    }

    out
}

fn truncate(mut s: String, max: usize) -> String {
    s.truncate(max);
    s
}

/// `(DD) DDDD-DDDD` for up to 10 digits, `(DD) DDDDD-DDDD` beyond that.
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() <= 2 {
        return digits;
    }

    let (local, max) = if digits.len() <= 10 { (4, 14) } else { (5, 15) };
    let (area, number) = digits.split_at(2);
    let formatted = format!("({}) {}", area, mask(number, &[local, usize::MAX], &['-']));
    truncate(formatted, max)
}

/// `DDDDD-DDD`
pub fn format_postal_code(raw: &str) -> String {
    truncate(mask(&digits(raw), &[5, usize::MAX], &['-']), 9)
}

/// CPF `DDD.DDD.DDD-DD` for up to 11 digits, CNPJ `DD.DDD.DDD/DDDD-DD` beyond.
pub fn format_tax_id(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() <= 11 {
        truncate(mask(&digits, &[3, 3, 3, usize::MAX], &['.', '.', '-']), 14)
    } else {
        truncate(
            mask(&digits, &[2, 3, 3, 4, usize::MAX], &['.', '.', '/', '-']),
            18,
        )
    }
}

/// Role codes are upper case (`admin` -> `ADMIN`).
pub fn format_role(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phone_with_eleven_digits_is_mobile_pattern() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn phone_with_ten_digits_is_landline_pattern() {
        assert_eq!(format_phone("4133334444"), "(41) 3333-4444");
    }

    #[test]
    fn phone_partial_input() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("4"), "4");
        assert_eq!(format_phone("41"), "41");
        assert_eq!(format_phone("413"), "(41) 3");
        assert_eq!(format_phone("413333"), "(41) 3333");
        assert_eq!(format_phone("4133334"), "(41) 3333-4");
    }

    #[test]
    fn phone_strips_punctuation_and_truncates() {
        assert_eq!(format_phone("+55 (41) 3333-4444"), "(55) 41333-3444");
        assert_eq!(format_phone("119876543210000"), "(11) 98765-4321");
    }

    #[test]
    fn postal_code() {
        assert_eq!(format_postal_code("12345678"), "12345-678");
        assert_eq!(format_postal_code("12345"), "12345");
        assert_eq!(format_postal_code("123456"), "12345-6");
        assert_eq!(format_postal_code("80.020-310 extra 99"), "80020-310");
    }

    #[test]
    fn tax_id_cpf() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
        assert_eq!(format_tax_id("1234"), "123.4");
        assert_eq!(format_tax_id("1234567"), "123.456.7");
        assert_eq!(format_tax_id("1234567890"), "123.456.789-0");
    }

    #[test]
    fn tax_id_cnpj() {
        assert_eq!(format_tax_id("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_tax_id("123456780001"), "12.345.678/0001");
        assert_eq!(format_tax_id("1234567800019"), "12.345.678/0001-9");
        assert_eq!(format_tax_id("123456780001901"), "12.345.678/0001-90");
    }

    fn digit_string(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
        prop::collection::vec(prop::char::range('0', '9'), len)
            .prop_map(|chars| chars.into_iter().collect())
    }

    fn is_pattern(s: &str, pattern: &str) -> bool {
        s.len() == pattern.len()
            && s.chars().zip(pattern.chars()).all(|(c, p)| match p {
                'D' => c.is_ascii_digit(),
                _ => c == p,
            })
    }

    proptest! {
        #[test]
        fn eleven_digit_tax_ids_are_cpf(raw in digit_string(11..=11)) {
            prop_assert!(is_pattern(&format_tax_id(&raw), "DDD.DDD.DDD-DD"));
        }

        #[test]
        fn fourteen_digit_tax_ids_are_cnpj(raw in digit_string(14..=14)) {
            prop_assert!(is_pattern(&format_tax_id(&raw), "DD.DDD.DDD/DDDD-DD"));
        }

        #[test]
        fn eleven_digit_phones_are_mobile(raw in digit_string(11..=11)) {
            prop_assert!(is_pattern(&format_phone(&raw), "(DD) DDDDD-DDDD"));
        }

        #[test]
        fn ten_digit_phones_are_landline(raw in digit_string(10..=10)) {
            prop_assert!(is_pattern(&format_phone(&raw), "(DD) DDDD-DDDD"));
        }

        #[test]
        fn formatters_are_idempotent(raw in "[0-9 .()/-]{0,24}") {
            let phone = format_phone(&raw);
            prop_assert_eq!(format_phone(&phone), phone.clone());

            let cep = format_postal_code(&raw);
            prop_assert_eq!(format_postal_code(&cep), cep.clone());

            let tax_id = format_tax_id(&raw);
            prop_assert_eq!(format_tax_id(&tax_id), tax_id.clone());
        }

        #[test]
        fn formatting_keeps_a_prefix_of_the_digits(raw in "[0-9a-z ]{0,24}") {
            let input = digits(&raw);
            prop_assert!(input.starts_with(&digits(&format_tax_id(&raw))));
            prop_assert!(input.starts_with(&digits(&format_phone(&raw))));
            prop_assert!(input.starts_with(&digits(&format_postal_code(&raw))));
        }
    }
}
