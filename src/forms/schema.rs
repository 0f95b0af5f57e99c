use std::rc::Rc;

use chrono::NaiveDate;

use super::format::slug;
use super::submission::{FormValues, MOBILE_SERVICE_FLAG};
use super::validation::{FieldStatuses, RuleSet};
use crate::content::models::CarCatalog;

pub const SERVICE_OPTIONS: &[(&str, &str)] = &[
    ("oil-change", "Oil Change"),
    ("brake-service", "Brake Service"),
    ("engine-diagnostics", "Engine Diagnostics"),
    ("ac-repair", "A/C Repair"),
    ("transmission", "Transmission Service"),
    ("mobile-service", "Mobile Service"),
    ("inspection", "Vehicle Inspection"),
    ("other", "Other"),
];

pub const TIME_OPTIONS: &[(&str, &str)] = &[
    ("morning", "Morning (8AM - 12PM)"),
    ("afternoon", "Afternoon (12PM - 5PM)"),
    ("evening", "Evening (5PM - 7PM)"),
    ("flexible", "I'm flexible"),
];

pub const LOCATION_TYPES: &[(&str, &str)] = &[
    ("home", "Home/Residential"),
    ("office", "Office/Workplace"),
    ("parking-lot", "Parking Lot"),
    ("other", "Other"),
];

pub const CONSENT_OPTIONS: &[(&str, &str)] = &[
    ("consent", "Yes, I consent to receive SMS and phone communications"),
    ("no-consent", "No, please only contact me by email"),
];

/// Fields of the mobile-service location block, in display order.
pub const LOCATION_FIELDS: &[&str] = &[
    "service-address",
    "service-city",
    "service-zip",
    "location-type",
    "location-notes",
];

/// The subset of the location block that is required while mobile service is on.
const LOCATION_REQUIRED: &[&str] = &["service-address", "service-city", "service-zip"];

const REQUIRED_LOGICAL_FIELDS: &[&str] = &["name", "phone", "service needed"];

pub const SMS_OPT_IN_FIELD: &str = "sms-opt-in";

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

fn options(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs.iter().map(|(v, l)| SelectOption::new(*v, *l)).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Tel,
    Email,
    Date { min: String },
    Select { placeholder: String, options: Vec<SelectOption> },
    /// Select whose options come from the value of another field.
    DependentSelect { depends_on: &'static str, placeholder: String, waiting: String },
    Textarea { rows: u32 },
    Checkbox { description: String },
    Radio { options: Vec<SelectOption> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldGroup {
    Main,
    Schedule,
    Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub kind: FieldKind,
    pub required: bool,
    pub group: FieldGroup,
    pub full_width: bool,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            placeholder: String::new(),
            kind,
            required: false,
            group: FieldGroup::Main,
            full_width: false,
        }
    }

    fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    fn group(mut self, group: FieldGroup) -> Self {
        self.group = group;
        self
    }

    fn full_width(mut self) -> Self {
        self.full_width = true;
        self
    }
}

/// Concrete field list of one form. Rendering is a pure function of
/// (schema, values), so re-rendering always replaces the previous markup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormSchema {
    fields: Vec<FormField>,
    catalog: Option<Rc<CarCatalog>>,
}

impl FormSchema {
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn has_location_block(&self) -> bool {
        self.fields.iter().any(|f| f.group == FieldGroup::Location)
    }

    pub fn is_visible(&self, field: &FormField, values: &FormValues) -> bool {
        field.group != FieldGroup::Location || values.is_checked(MOBILE_SERVICE_FLAG)
    }

    /// Static requiredness plus the location fields while mobile service is checked.
    pub fn is_required(&self, name: &str, values: &FormValues) -> bool {
        match self.field(name) {
            Some(field) if field.required => true,
            Some(field) if field.group == FieldGroup::Location => {
                values.is_checked(MOBILE_SERVICE_FLAG) && LOCATION_REQUIRED.contains(&name)
            }
            _ => false,
        }
    }

    pub fn visible_fields<'a>(&'a self, values: &'a FormValues) -> impl Iterator<Item = &'a FormField> {
        self.fields.iter().filter(move |f| self.is_visible(f, values))
    }

    pub fn select_options(&self, field: &FormField, values: &FormValues) -> Vec<SelectOption> {
        match &field.kind {
            FieldKind::Select { options, .. } | FieldKind::Radio { options } => options.clone(),
            FieldKind::DependentSelect { depends_on, .. } => self
                .catalog
                .as_deref()
                .and_then(|catalog| model_options(catalog, values.get(depends_on)))
                .map(|models| models.iter().map(|m| SelectOption::new(m.as_str(), m.as_str())).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// A dependent select stays disabled until its parent holds a known value.
    pub fn is_disabled(&self, field: &FormField, values: &FormValues) -> bool {
        match &field.kind {
            FieldKind::DependentSelect { depends_on, .. } => self
                .catalog
                .as_deref()
                .and_then(|catalog| model_options(catalog, values.get(depends_on)))
                .is_none(),
            _ => false,
        }
    }

    /// Validates every visible field. Hidden location fields are never checked.
    pub fn validate_all(&self, rules: &RuleSet, values: &FormValues) -> FieldStatuses {
        let mut statuses = FieldStatuses::default();
        for field in self.visible_fields(values) {
            let required = self.is_required(&field.name, values);
            statuses.set(&field.name, rules.validate(&field.name, values.get(&field.name), required));
        }
        statuses
    }

    /// Applies one user edit, including its knock-on effects on other fields.
    pub fn apply_change(&self, values: &FormValues, name: &str, value: &str) -> FormValues {
        if name == MOBILE_SERVICE_FLAG {
            return set_mobile_service(values, !value.is_empty());
        }

        let mut next = values.clone();
        let dependents: Vec<&str> = self
            .fields
            .iter()
            .filter_map(|f| match &f.kind {
                FieldKind::DependentSelect { depends_on, .. } if *depends_on == name => Some(f.name.as_str()),
                _ => None,
            })
            .collect();
        if values.get(name) != value {
            for dependent in dependents {
                next.remove(dependent);
            }
        }
        next.set(name, value);
        next
    }
}

pub fn model_options<'a>(catalog: &'a CarCatalog, make: &str) -> Option<&'a [String]> {
    if make.is_empty() {
        return None;
    }
    catalog.models.get(make).map(Vec::as_slice)
}

/// Turning mobile service off clears every location value, so on then off
/// leaves the values exactly as they were before.
pub fn set_mobile_service(values: &FormValues, on: bool) -> FormValues {
    let mut next = values.clone();
    if on {
        next.set(MOBILE_SERVICE_FLAG, "on");
    } else {
        next.remove(MOBILE_SERVICE_FLAG);
        for name in LOCATION_FIELDS {
            next.remove(name);
        }
    }
    next
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn car_fields(catalog: Option<&CarCatalog>) -> Vec<FormField> {
    let Some(catalog) = catalog else {
        return vec![FormField::new("car-make-model", "Car Make/Model", FieldKind::Text)
            .placeholder("Enter your car make and model")
            .required(true)];
    };

    vec![
        FormField::new(
            "car-make",
            "Car Make",
            FieldKind::Select {
                placeholder: "Select Car Make".to_string(),
                options: catalog.makes.iter().map(|m| SelectOption::new(m.as_str(), m.as_str())).collect(),
            },
        )
        .required(true),
        FormField::new(
            "car-model",
            "Car Model",
            FieldKind::DependentSelect {
                depends_on: "car-make",
                placeholder: "Select Model".to_string(),
                waiting: "Select Make First".to_string(),
            },
        )
        .required(true),
        FormField::new(
            "car-year",
            "Car Year",
            FieldKind::Select {
                placeholder: "Select Year".to_string(),
                options: catalog.years.iter().map(|y| SelectOption::new(y.as_str(), y.as_str())).collect(),
            },
        )
        .required(true),
    ]
}

/// Expands the logical field names of the booking section into concrete fields.
pub fn booking_schema(
    logical_fields: &[String],
    catalog: Option<Rc<CarCatalog>>,
    today: NaiveDate,
) -> FormSchema {
    let mut fields = Vec::new();

    for logical in logical_fields {
        let logical = logical.trim().to_lowercase();
        let name = slug(&logical);
        let required = REQUIRED_LOGICAL_FIELDS.contains(&logical.as_str());

        match logical.as_str() {
            "service needed" => fields.push(
                FormField::new(
                    &name,
                    "Service Needed",
                    FieldKind::Select {
                        placeholder: "Select Service Needed".to_string(),
                        options: options(SERVICE_OPTIONS),
                    },
                )
                .required(required)
                .full_width(),
            ),
            "car make/model" => fields.extend(car_fields(catalog.as_deref())),
            _ => {
                let kind = if name == "phone" { FieldKind::Tel } else { FieldKind::Text };
                fields.push(
                    FormField::new(&name, &capitalize_first(&logical), kind)
                        .placeholder(&format!("Enter your {}", logical))
                        .required(required),
                );
            }
        }
    }

    fields.push(
        FormField::new("preferred-date", "Preferred Date", FieldKind::Date { min: today.format("%Y-%m-%d").to_string() })
            .group(FieldGroup::Schedule)
            .full_width(),
    );
    fields.push(
        FormField::new(
            "preferred-time",
            "Preferred Time",
            FieldKind::Select { placeholder: "Select preferred time".to_string(), options: options(TIME_OPTIONS) },
        )
        .group(FieldGroup::Schedule)
        .full_width(),
    );
    fields.push(
        FormField::new("additional-notes", "Additional Notes", FieldKind::Textarea { rows: 4 })
            .placeholder("Tell us more about your vehicle's issue or any special requests...")
            .group(FieldGroup::Schedule)
            .full_width(),
    );
    fields.push(
        FormField::new(
            SMS_OPT_IN_FIELD,
            "SMS Updates",
            FieldKind::Checkbox {
                description: "Receive appointment confirmations and updates via text message".to_string(),
            },
        )
        .group(FieldGroup::Schedule)
        .full_width(),
    );
    fields.push(
        FormField::new(
            MOBILE_SERVICE_FLAG,
            "Mobile Service Available",
            FieldKind::Checkbox { description: "We come to your location for convenient service".to_string() },
        )
        .group(FieldGroup::Schedule)
        .full_width(),
    );

    fields.push(
        FormField::new("service-address", "Service Address", FieldKind::Text)
            .placeholder("Enter street address")
            .group(FieldGroup::Location),
    );
    fields.push(
        FormField::new("service-city", "City", FieldKind::Text)
            .placeholder("Enter city")
            .group(FieldGroup::Location),
    );
    fields.push(
        FormField::new("service-zip", "ZIP Code", FieldKind::Text)
            .placeholder("Enter ZIP code")
            .group(FieldGroup::Location),
    );
    fields.push(
        FormField::new(
            "location-type",
            "Location Type",
            FieldKind::Select { placeholder: "Select location type".to_string(), options: options(LOCATION_TYPES) },
        )
        .group(FieldGroup::Location)
        .full_width(),
    );
    fields.push(
        FormField::new("location-notes", "Location Instructions", FieldKind::Textarea { rows: 3 })
            .placeholder("Any special instructions for finding you? (e.g., building number, parking details, access codes)")
            .group(FieldGroup::Location)
            .full_width(),
    );

    FormSchema { fields, catalog }
}

pub fn contact_schema() -> FormSchema {
    let fields = vec![
        FormField::new("name", "Name", FieldKind::Text).placeholder("Your Name").required(true),
        FormField::new("email", "Email", FieldKind::Email).placeholder("Email Address").required(true),
        FormField::new("phone", "Phone", FieldKind::Tel).placeholder("Phone Number"),
        FormField::new("subject", "Subject", FieldKind::Text).placeholder("Subject"),
        FormField::new("message", "Message", FieldKind::Textarea { rows: 5 })
            .placeholder("How can we help?")
            .required(true)
            .full_width(),
    ];
    FormSchema { fields, catalog: None }
}

pub fn consent_schema() -> FormSchema {
    let fields = vec![
        FormField::new("consentChoice", "Your Choice", FieldKind::Radio { options: options(CONSENT_OPTIONS) })
            .required(true)
            .full_width(),
        FormField::new("fullName", "Full Name", FieldKind::Text).placeholder("John Doe"),
        FormField::new("phoneNumber", "Phone Number", FieldKind::Tel).placeholder("(555) 123-4567"),
        FormField::new("email", "Email Address", FieldKind::Email).placeholder("john@example.com"),
    ];
    FormSchema { fields, catalog: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn catalog() -> Rc<CarCatalog> {
        let models: HashMap<String, Vec<String>> = [
            ("Toyota", vec!["Camry", "Corolla", "RAV4"]),
            ("Honda", vec!["Civic", "Accord"]),
        ]
        .into_iter()
        .map(|(make, models)| (make.to_string(), models.into_iter().map(String::from).collect()))
        .collect();
        Rc::new(CarCatalog {
            makes: vec!["Toyota".to_string(), "Honda".to_string()],
            models,
            years: vec!["2024".to_string(), "2023".to_string()],
        })
    }

    fn logical() -> Vec<String> {
        ["name", "phone", "car make/model", "service needed", "email"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
    }

    fn schema() -> FormSchema {
        booking_schema(&logical(), Some(catalog()), today())
    }

    fn model_labels(schema: &FormSchema, values: &FormValues) -> Vec<String> {
        let field = schema.field("car-model").unwrap();
        schema.select_options(field, values).into_iter().map(|o| o.value).collect()
    }

    #[test]
    fn special_names_expand_to_richer_controls() {
        let schema = schema();
        assert_eq!(schema.field("phone").unwrap().kind, FieldKind::Tel);
        assert_eq!(schema.field("email").unwrap().kind, FieldKind::Text);
        assert!(!schema.field("email").unwrap().required);
        assert!(schema.field("name").unwrap().required);

        match &schema.field("service-needed").unwrap().kind {
            FieldKind::Select { options, .. } => assert_eq!(options.len(), SERVICE_OPTIONS.len()),
            other => panic!("unexpected kind {:?}", other),
        }
        for name in ["car-make", "car-model", "car-year"] {
            assert!(schema.field(name).unwrap().required, "{} should be required", name);
        }
    }

    #[test]
    fn secondary_fields_are_appended() {
        let schema = schema();
        assert_eq!(
            schema.field("preferred-date").unwrap().kind,
            FieldKind::Date { min: "2025-07-15".to_string() }
        );
        assert!(schema.field("preferred-time").is_some());
        assert!(schema.field("additional-notes").is_some());
        assert!(schema.has_location_block());
    }

    #[test]
    fn missing_catalog_falls_back_to_text_input() {
        let schema = booking_schema(&logical(), None, today());
        assert!(schema.field("car-make").is_none());
        assert!(schema.field("car-make-model").unwrap().required);
    }

    #[test]
    fn choosing_a_make_enables_and_repopulates_models() {
        let schema = schema();
        let model = schema.field("car-model").unwrap();
        let blank = FormValues::new();
        assert!(schema.is_disabled(model, &blank));
        assert!(model_labels(&schema, &blank).is_empty());

        let toyota = schema.apply_change(&blank, "car-make", "Toyota");
        assert!(!schema.is_disabled(model, &toyota));
        assert_eq!(model_labels(&schema, &toyota), vec!["Camry", "Corolla", "RAV4"]);
    }

    #[test]
    fn switching_make_replaces_the_model_list_entirely() {
        let schema = schema();
        let values = schema.apply_change(&FormValues::new(), "car-make", "Toyota");
        let values = schema.apply_change(&values, "car-model", "Camry");
        let values = schema.apply_change(&values, "car-make", "Honda");

        assert_eq!(model_labels(&schema, &values), vec!["Civic", "Accord"]);
        assert!(!values.contains("car-model"), "stale model must be cleared");
    }

    #[test]
    fn reselecting_the_same_make_keeps_the_model() {
        let schema = schema();
        let values = schema.apply_change(&FormValues::new(), "car-make", "Toyota");
        let values = schema.apply_change(&values, "car-model", "Camry");
        let values = schema.apply_change(&values, "car-make", "Toyota");
        assert_eq!(values.get("car-model"), "Camry");
    }

    #[test]
    fn mobile_service_toggles_location_requirements() {
        let schema = schema();
        let original: FormValues = [("name", "Jo")].into_iter().collect();
        assert!(!schema.is_required("service-address", &original));
        let address = schema.field("service-address").unwrap();
        assert!(!schema.is_visible(address, &original));

        let on = schema.apply_change(&original, MOBILE_SERVICE_FLAG, "on");
        for name in ["service-address", "service-city", "service-zip"] {
            assert!(schema.is_required(name, &on));
        }
        assert!(!schema.is_required("location-notes", &on));
        assert!(schema.is_visible(address, &on));

        let mut filled = on.clone();
        filled.set("service-address", "123 Main St");
        filled.set("service-city", "Atlanta");
        filled.set("location-type", "home");

        let off = schema.apply_change(&filled, MOBILE_SERVICE_FLAG, "");
        assert_eq!(off, original);
        assert!(!schema.is_required("service-address", &off));
    }

    #[test]
    fn submit_validation_follows_mobile_service() {
        use crate::forms::validation::booking_rules;

        let schema = schema();
        let rules = booking_rules();
        let values: FormValues = [
            ("name", "Jo Smith"),
            ("phone", "(404) 555-0134"),
            ("car-make", "Toyota"),
            ("car-model", "Camry"),
            ("car-year", "2019"),
            ("service-needed", "oil-change"),
        ]
        .into_iter()
        .collect();
        let names = schema.names();
        assert_eq!(schema.validate_all(&rules, &values).first_invalid(&names), None);

        let mobile = schema.apply_change(&values, MOBILE_SERVICE_FLAG, "on");
        let statuses = schema.validate_all(&rules, &mobile);
        assert_eq!(statuses.first_invalid(&names).as_deref(), Some("service-address"));
        assert_eq!(statuses.error("service-city"), Some("City is required"));

        let blank = schema.validate_all(&rules, &FormValues::new());
        assert_eq!(blank.first_invalid(&names).as_deref(), Some("name"));
        assert_eq!(blank.error("phone"), Some("Phone is required"));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        assert_eq!(schema(), schema());
        assert_eq!(schema().fields().len(), schema().names().len());
    }
}
