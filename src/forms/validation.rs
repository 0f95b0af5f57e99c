use std::collections::HashMap;

use regex::Regex;

const NAME_PATTERN: &str = r"^[a-zA-Z\s]+$";
const PHONE_PATTERN: &str = r"^\+?[1-9]\d{0,15}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const ZIP_PATTERN: &str = r"^\d{5}(-\d{4})?$";

#[derive(Clone, Debug)]
pub struct Rule {
    pub label: &'static str,
    pub required: bool,
    pub min_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub message: &'static str,
    /// Match the pattern against digits and `+` only, so `(404) 555-0134` passes a phone pattern.
    pub digits_only: bool,
}

impl Rule {
    fn new(label: &'static str, message: &'static str) -> Self {
        Self {
            label,
            required: false,
            min_length: None,
            pattern: None,
            message,
            digits_only: false,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(Regex::new(pattern).expect("static validation pattern"));
        self
    }

    fn digits_only(mut self) -> Self {
        self.digits_only = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Invalid(String),
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }
}

/// Per-form validation table, declared once and looked up by field name.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: HashMap<&'static str, Rule>,
}

impl RuleSet {
    fn from_rules(rules: impl IntoIterator<Item = (&'static str, Rule)>) -> Self {
        Self { rules: rules.into_iter().collect() }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.rules.get(name).map_or(false, |r| r.required)
    }

    /// Checks required, then minimum length, then pattern. The first failure
    /// is reported and the remaining checks are skipped. `required` lets a
    /// form turn on fields that are only required in some states.
    pub fn validate(&self, name: &str, value: &str, required: bool) -> FieldStatus {
        let Some(rule) = self.rules.get(name) else {
            return FieldStatus::Valid;
        };
        let value = value.trim();

        if value.is_empty() {
            return if required || rule.required {
                FieldStatus::Invalid(format!("{} is required", rule.label))
            } else {
                FieldStatus::Valid
            };
        }

        if let Some(min) = rule.min_length {
            if value.chars().count() < min {
                return FieldStatus::Invalid(format!(
                    "{} must be at least {} characters",
                    rule.label, min
                ));
            }
        }

        if let Some(pattern) = &rule.pattern {
            let candidate = if rule.digits_only {
                value.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
            } else {
                value.to_string()
            };
            if !pattern.is_match(&candidate) {
                return FieldStatus::Invalid(rule.message.to_string());
            }
        }

        FieldStatus::Valid
    }
}

pub fn booking_rules() -> RuleSet {
    RuleSet::from_rules([
        ("name", Rule::new("Name", "Please enter a valid name (letters only)")
            .required().min_length(2).pattern(NAME_PATTERN)),
        ("phone", Rule::new("Phone", "Please enter a valid phone number")
            .required().pattern(PHONE_PATTERN).digits_only()),
        ("email", Rule::new("Email", "Please enter a valid email address")
            .pattern(EMAIL_PATTERN)),
        ("car-make", Rule::new("Car Make", "Please select your car make").required()),
        ("car-model", Rule::new("Car Model", "Please select your car model").required()),
        ("car-year", Rule::new("Car Year", "Please select your car year").required()),
        ("car-make-model", Rule::new("Car Make/Model", "Please enter your car make and model")
            .required().min_length(3)),
        ("service-needed", Rule::new("Service", "Please select a service").required()),
        ("service-address", Rule::new("Service Address", "Please enter a street address")
            .min_length(5)),
        ("service-city", Rule::new("City", "Please enter a valid city name")
            .min_length(2).pattern(NAME_PATTERN)),
        ("service-zip", Rule::new("ZIP Code", "Please enter a valid ZIP code")
            .pattern(ZIP_PATTERN)),
    ])
}

pub fn contact_rules() -> RuleSet {
    RuleSet::from_rules([
        ("name", Rule::new("Name", "Please enter a valid name (letters only)")
            .required().min_length(2).pattern(NAME_PATTERN)),
        ("email", Rule::new("Email", "Please enter a valid email address")
            .required().pattern(EMAIL_PATTERN)),
        ("phone", Rule::new("Phone", "Please enter a valid phone number")
            .pattern(PHONE_PATTERN).digits_only()),
        ("message", Rule::new("Message", "Please tell us a little more").required().min_length(10)),
    ])
}

pub fn consent_rules() -> RuleSet {
    RuleSet::from_rules([
        ("consentChoice", Rule::new("Consent choice", "Please select your consent choice.").required()),
        ("email", Rule::new("Email", "Please enter a valid email address.").pattern(EMAIL_PATTERN)),
        ("phoneNumber", Rule::new("Phone number", "Please enter a valid phone number")
            .pattern(PHONE_PATTERN).digits_only()),
    ])
}

/// Current validation state of every touched field; one message per field at most.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldStatuses(HashMap<String, FieldStatus>);

impl FieldStatuses {
    pub fn set(&mut self, name: &str, status: FieldStatus) {
        self.0.insert(name.to_string(), status);
    }

    pub fn clear(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&FieldStatus> {
        self.0.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldStatus::Invalid(message)) => Some(message),
            _ => None,
        }
    }

    /// `valid` / `invalid` styling class, or nothing for untouched fields.
    pub fn class(&self, name: &str) -> Option<&'static str> {
        self.0.get(name).map(|s| if s.is_valid() { "valid" } else { "invalid" })
    }

    pub fn first_invalid(&self, order: &[String]) -> Option<String> {
        order
            .iter()
            .find(|name| matches!(self.0.get(name.as_str()), Some(FieldStatus::Invalid(_))))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(msg: &str) -> FieldStatus {
        FieldStatus::Invalid(msg.to_string())
    }

    #[test]
    fn empty_required_field_reports_only_required() {
        let rules = booking_rules();
        // name also has a min length and a pattern; neither is reported
        assert_eq!(rules.validate("name", "", false), invalid("Name is required"));
        assert_eq!(rules.validate("name", "   ", false), invalid("Name is required"));
        assert_eq!(rules.validate("service-needed", "", false), invalid("Service is required"));
    }

    #[test]
    fn min_length_is_checked_before_pattern() {
        let rules = booking_rules();
        assert_eq!(rules.validate("name", "J", false), invalid("Name must be at least 2 characters"));
        assert_eq!(
            rules.validate("name", "J0hn", false),
            invalid("Please enter a valid name (letters only)")
        );
        assert_eq!(rules.validate("name", "Jo Smith", false), FieldStatus::Valid);
    }

    #[test]
    fn phone_pattern_ignores_typed_punctuation() {
        let rules = booking_rules();
        assert_eq!(rules.validate("phone", "(404) 555-0134", false), FieldStatus::Valid);
        assert_eq!(rules.validate("phone", "+14045550134", false), FieldStatus::Valid);
        assert_eq!(
            rules.validate("phone", "0123", false),
            invalid("Please enter a valid phone number")
        );
    }

    #[test]
    fn unknown_fields_always_pass() {
        let rules = booking_rules();
        assert_eq!(rules.validate("favourite-colour", "", true), FieldStatus::Valid);
    }

    #[test]
    fn optional_fields_pass_when_empty_and_are_checked_when_filled() {
        let rules = booking_rules();
        assert_eq!(rules.validate("service-zip", "", false), FieldStatus::Valid);
        assert_eq!(rules.validate("service-zip", "30309", false), FieldStatus::Valid);
        assert_eq!(rules.validate("service-zip", "30309-1234", false), FieldStatus::Valid);
        assert_eq!(rules.validate("service-zip", "3030", false), invalid("Please enter a valid ZIP code"));
        assert_eq!(rules.validate("email", "not-an-email", false), invalid("Please enter a valid email address"));
    }

    #[test]
    fn conditional_requirement_is_honoured() {
        let rules = booking_rules();
        assert_eq!(rules.validate("service-city", "", false), FieldStatus::Valid);
        assert_eq!(rules.validate("service-city", "", true), invalid("City is required"));
    }

    #[test]
    fn statuses_hold_one_message_per_field() {
        let mut statuses = FieldStatuses::default();
        statuses.set("name", invalid("Name is required"));
        statuses.set("name", invalid("Name must be at least 2 characters"));
        assert_eq!(statuses.error("name"), Some("Name must be at least 2 characters"));
        assert_eq!(statuses.class("name"), Some("invalid"));

        statuses.set("name", FieldStatus::Valid);
        assert_eq!(statuses.error("name"), None);
        assert_eq!(statuses.class("name"), Some("valid"));
        assert_eq!(statuses.class("phone"), None);
    }

    #[test]
    fn first_invalid_follows_form_order() {
        let mut statuses = FieldStatuses::default();
        statuses.set("phone", invalid("Phone is required"));
        statuses.set("name", FieldStatus::Valid);
        statuses.set("service-needed", invalid("Service is required"));
        let order = vec!["name".to_string(), "phone".to_string(), "service-needed".to_string()];
        assert_eq!(statuses.first_invalid(&order).as_deref(), Some("phone"));
    }
}
