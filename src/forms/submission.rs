use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{FormBinding, FormKind};

pub const MOBILE_SERVICE_FLAG: &str = "mobile-service-interest";

/// Current values of a form, keyed by field name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when no field holds anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    pub fn non_empty(&self) -> FormValues {
        FormValues(
            self.0
                .iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn is_checked(&self, name: &str) -> bool {
        matches!(self.get(name), "on" | "true" | "1")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormValues(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The body posted to a form endpoint: user values plus derived metadata.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct FormSubmission {
    fields: BTreeMap<String, String>,
}

impl FormSubmission {
    pub fn build(binding: &FormBinding, values: &FormValues, now: DateTime<Utc>) -> Self {
        let mut fields: BTreeMap<String, String> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        fields.insert("form_type".to_string(), binding.kind.tag().to_string());
        fields.insert("timestamp".to_string(), now.to_rfc3339());
        fields.insert("source".to_string(), binding.source.clone());

        if binding.kind == FormKind::Booking {
            let vehicle = [values.get("car-year"), values.get("car-make"), values.get("car-model")]
                .iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !vehicle.is_empty() {
                fields.insert("vehicle".to_string(), vehicle);
            }
            if values.is_checked(MOBILE_SERVICE_FLAG) {
                fields.insert("is-mobile-service".to_string(), "true".to_string());
            }
        }

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
