use super::format::format_phone_edit;
use super::schema::{FieldKind, FormSchema};
use super::submission::FormValues;
use super::validation::{FieldStatus, FieldStatuses, RuleSet};

/// Values and validation state of one form. Every user action produces a
/// new state; components only store it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub statuses: FieldStatuses,
}

impl FormState {
    pub fn with_values(values: FormValues) -> Self {
        Self { values, statuses: FieldStatuses::default() }
    }

    /// One input event. Phone fields are formatted as typed, dependent and
    /// hidden fields are cleared, and the edited field is validated.
    pub fn edit(&self, schema: &FormSchema, rules: &RuleSet, name: &str, typed: &str) -> FormState {
        let value = match schema.field(name).map(|f| &f.kind) {
            Some(FieldKind::Tel) => format_phone_edit(self.values.get(name), typed),
            _ => typed.to_string(),
        };
        let values = schema.apply_change(&self.values, name, &value);

        let mut statuses = self.statuses.clone();
        for field in schema.fields() {
            if field.name != name && self.values.get(&field.name) != values.get(&field.name) {
                statuses.clear(&field.name);
            }
        }
        statuses.set(name, rules.validate(name, values.get(name), schema.is_required(name, &values)));

        FormState { values, statuses }
    }

    /// Field lost focus: always validate it.
    pub fn touch(&self, schema: &FormSchema, rules: &RuleSet, name: &str) -> FormState {
        let mut statuses = self.statuses.clone();
        let required = schema.is_required(name, &self.values);
        statuses.set(name, rules.validate(name, self.values.get(name), required));
        FormState { values: self.values.clone(), statuses }
    }

    /// Submit-time check of every visible field. Returns the checked state and
    /// the first invalid field in form order, if any.
    pub fn check(&self, schema: &FormSchema, rules: &RuleSet) -> (FormState, Option<String>) {
        let statuses = schema.validate_all(rules, &self.values);
        let first_invalid = statuses.first_invalid(&schema.names());
        (FormState { values: self.values.clone(), statuses }, first_invalid)
    }

    /// Back from review: every reviewed value returns to its field. Fields
    /// that were blank at submit are not in the snapshot and stay blank.
    pub fn restore(&self, snapshot: &FormValues) -> FormState {
        FormState { values: snapshot.clone(), statuses: self.statuses.clone() }
    }

    pub fn error(&self, name: &str) -> Option<String> {
        self.statuses.error(name).map(str::to_string)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        matches!(self.statuses.get(name), Some(FieldStatus::Valid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::{consent_schema, contact_schema};
    use crate::config::{FormBindings, FormKind};
    use crate::forms::validation::{consent_rules, contact_rules};
    use crate::network::submitter::SubmitError;
    use crate::review::machine::{ReviewAction, ReviewMachine, ReviewState};

    #[test]
    fn typing_validates_the_field() {
        let schema = contact_schema();
        let rules = contact_rules();
        let state = FormState::default().edit(&schema, &rules, "name", "J");
        assert_eq!(state.error("name").as_deref(), Some("Name must be at least 2 characters"));
        assert_eq!(state.statuses.class("name"), Some("invalid"));
        assert_eq!(state.error("email"), None, "other fields wait for their own input or blur");

        let state = state.edit(&schema, &rules, "name", "Jo");
        assert_eq!(state.error("name"), None);
        assert!(state.is_valid("name"));
    }

    #[test]
    fn tel_fields_are_formatted_while_typing() {
        let schema = consent_schema();
        let rules = consent_rules();
        let state = FormState::default().edit(&schema, &rules, "phoneNumber", "4045550134");
        assert_eq!(state.values.get("phoneNumber"), "(404) 555-0134");

        let state = state.touch(&schema, &rules, "phoneNumber");
        assert!(state.is_valid("phoneNumber"));
    }

    #[test]
    fn submit_check_reports_first_invalid_in_form_order() {
        let schema = contact_schema();
        let rules = contact_rules();
        let state = FormState::default().edit(&schema, &rules, "name", "Jo Smith");
        let (checked, first) = state.check(&schema, &rules);
        assert_eq!(first.as_deref(), Some("email"));
        assert_eq!(checked.error("email").as_deref(), Some("Email is required"));
        assert_eq!(checked.error("message").as_deref(), Some("Message is required"));
        assert!(checked.is_valid("phone"));
    }

    #[test]
    fn consent_choice_is_required() {
        let schema = consent_schema();
        let rules = consent_rules();
        let (checked, first) = FormState::default().check(&schema, &rules);
        assert_eq!(first.as_deref(), Some("consentChoice"));
        assert_eq!(checked.error("consentChoice").as_deref(), Some("Consent choice is required"));

        let state = FormState::default().edit(&schema, &rules, "consentChoice", "no-consent");
        let (_, first) = state.check(&schema, &rules);
        assert_eq!(first, None);
    }

    #[test]
    fn go_back_after_failure_restores_every_field() {
        let schema = contact_schema();
        let rules = contact_rules();
        let filled = [
            ("name", "Jo Smith"),
            ("email", "jo@example.com"),
            ("phone", "4045550134"),
            ("message", "Brakes squeal when cold"),
        ]
        .into_iter()
        .fold(FormState::default(), |state, (name, value)| state.edit(&schema, &rules, name, value));
        let (checked, first_invalid) = filled.check(&schema, &rules);
        assert_eq!(first_invalid, None);

        let mut machine = ReviewMachine::default();
        machine.apply(ReviewAction::Open(ReviewState {
            kind: FormKind::Contact,
            binding: FormBindings::default().get(FormKind::Contact).clone(),
            snapshot: checked.values.non_empty(),
        }));
        machine.apply(ReviewAction::Confirm);
        let attempt = machine.submitting_attempt().unwrap();
        machine.apply(ReviewAction::Resolve { attempt, outcome: Err(SubmitError::Timeout) });

        let snapshot = machine.review().map(|r| r.snapshot.clone()).unwrap();
        assert!(machine.apply(ReviewAction::GoBack));

        let restored = FormState::default().restore(&snapshot);
        for field in schema.fields() {
            assert_eq!(restored.values.get(&field.name), checked.values.get(&field.name), "{}", field.name);
        }
        assert_eq!(restored.values.get("phone"), "(404) 555-0134");
    }
}
