use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::store::{read_json, write_json, KeyValueStore, StorageError};
use crate::config::{BOOKING_STATS_KEY, CONSENT_STORAGE_KEY, SMS_OPT_IN_KEY};
use crate::forms::submission::FormValues;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentChoice {
    Consent,
    NoConsent,
}

impl ConsentChoice {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consent" => Some(ConsentChoice::Consent),
            "no-consent" => Some(ConsentChoice::NoConsent),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentPreference {
    pub consent_choice: ConsentChoice,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsentPreference {
    /// Builds the record from the consent form, or `None` without a valid choice.
    pub fn from_form(values: &FormValues, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            consent_choice: ConsentChoice::parse(values.get("consentChoice"))?,
            full_name: values.get("fullName").trim().to_string(),
            phone_number: values.get("phoneNumber").trim().to_string(),
            email: values.get("email").trim().to_string(),
            timestamp: now,
        })
    }

    pub fn summary(&self) -> String {
        let choice = match self.consent_choice {
            ConsentChoice::Consent => "consented to",
            ConsentChoice::NoConsent => "opted out of",
        };
        format!(
            "You previously {} SMS communications on {}.",
            choice,
            self.timestamp.format("%-m/%-d/%Y")
        )
    }
}

/// One consent record per browser; each save overwrites the last.
#[derive(Clone)]
pub struct ConsentStore {
    store: Rc<dyn KeyValueStore>,
}

impl ConsentStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, preference: &ConsentPreference) -> Result<(), StorageError> {
        write_json(self.store.as_ref(), CONSENT_STORAGE_KEY, preference)
    }

    pub fn load(&self) -> Option<ConsentPreference> {
        read_json(self.store.as_ref(), CONSENT_STORAGE_KEY).unwrap_or_else(|e| {
            warn!("Failed to retrieve saved consent: {}", e);
            None
        })
    }

    pub fn sms_opt_in(&self) -> bool {
        matches!(self.store.get(SMS_OPT_IN_KEY), Ok(Some(v)) if v == "true")
    }

    pub fn set_sms_opt_in(&self, opted_in: bool) -> Result<(), StorageError> {
        self.store.set(SMS_OPT_IN_KEY, if opted_in { "true" } else { "false" })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: u32,
    pub last_submission: Option<DateTime<Utc>>,
}

pub fn record_booking(store: &dyn KeyValueStore, now: DateTime<Utc>) -> BookingStats {
    let mut stats: BookingStats = read_json(store, BOOKING_STATS_KEY)
        .ok()
        .flatten()
        .unwrap_or_default();
    stats.total += 1;
    stats.last_submission = Some(now);
    if let Err(e) = write_json(store, BOOKING_STATS_KEY, &stats) {
        warn!("Failed to update booking stats: {}", e);
    }
    stats
}
