fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a phone number while it is being typed: `(555) 123-4567`.
/// Short input is formatted as far as it goes, so `123` becomes `(123) `.
pub fn format_phone_input(value: &str) -> String {
    let digits = digits(value);
    let len = digits.len();
    if len >= 6 {
        let end = len.min(10);
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..end])
    } else if len >= 3 {
        format!("({}) {}", &digits[..3], &digits[3..])
    } else {
        digits
    }
}

/// As-typed formatting that leaves deletions alone, so backspacing over the
/// `) ` separator is not immediately undone.
pub fn format_phone_edit(previous: &str, typed: &str) -> String {
    if typed.len() < previous.len() {
        typed.to_string()
    } else {
        format_phone_input(typed)
    }
}

/// Review-popup phone format. Anything that is not exactly ten digits is shown as entered.
pub fn format_phone_review(value: &str) -> String {
    let digits = digits(value);
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        value.to_string()
    }
}

/// E.164 form used by the SMS/voice side channel.
pub fn to_e164(value: &str) -> String {
    let digits = digits(value);
    match digits.len() {
        10 => format!("+1{}", digits),
        11 if digits.starts_with('1') => format!("+{}", digits),
        _ => value.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `service-needed` -> `Service Needed`.
pub fn title_case_words(value: &str) -> String {
    value.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `service needed` -> `service-needed`.
pub fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Display value for one field in the review list, or `None` when the field
/// should be left out.
pub fn review_value(name: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    let shown = match name {
        "phone" | "phoneNumber" => format_phone_review(value),
        "email" => value.to_lowercase(),
        "service-needed" => title_case_words(value),
        _ if value == "on" => "Yes".to_string(),
        _ => value.to_string(),
    };
    Some(shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_phone_formats_progressively() {
        assert_eq!(format_phone_input("1234567890"), "(123) 456-7890");
        assert_eq!(format_phone_input("123"), "(123) ");
        assert_eq!(format_phone_input("12"), "12");
        assert_eq!(format_phone_input("12345"), "(123) 45");
        assert_eq!(format_phone_input("123456"), "(123) 456-");
        assert_eq!(format_phone_input(""), "");
    }

    #[test]
    fn typed_phone_drops_extra_digits_and_punctuation() {
        assert_eq!(format_phone_input("(123) 456-78901"), "(123) 456-7890");
        assert_eq!(format_phone_input("(123) 4"), "(123) 4");
    }

    #[test]
    fn deleting_from_a_formatted_phone_is_not_reformatted() {
        assert_eq!(format_phone_edit("(123) ", "(123)"), "(123)");
        assert_eq!(format_phone_edit("(123)", "(123)4"), "(123) 4");
        assert_eq!(format_phone_edit("", "4045550134"), "(404) 555-0134");
    }

    #[test]
    fn review_phone_only_reformats_ten_digits() {
        assert_eq!(format_phone_review("1234567890"), "(123) 456-7890");
        assert_eq!(format_phone_review("123-456-7890"), "(123) 456-7890");
        assert_eq!(format_phone_review("123"), "123");
        assert_eq!(format_phone_review("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn e164_normalisation() {
        assert_eq!(to_e164("(404) 555-0134"), "+14045550134");
        assert_eq!(to_e164("1 404 555 0134"), "+14045550134");
        assert_eq!(to_e164("555"), "555");
    }

    #[test]
    fn review_values() {
        assert_eq!(review_value("email", "Jo@Example.COM").as_deref(), Some("jo@example.com"));
        assert_eq!(review_value("service-needed", "brake-service").as_deref(), Some("Brake Service"));
        assert_eq!(review_value("notes", "   "), None);
        assert_eq!(review_value("car-make", "Toyota").as_deref(), Some("Toyota"));
        assert_eq!(review_value("mobile-service-interest", "on").as_deref(), Some("Yes"));
    }

    #[test]
    fn slugs_and_titles() {
        assert_eq!(slug("Service needed"), "service-needed");
        assert_eq!(slug("car make/model"), "car-make/model");
        assert_eq!(title_case_words("preferred-time"), "Preferred Time");
    }
}
