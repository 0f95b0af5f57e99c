use serde::Deserialize;

#[cfg(debug_assertions)]
pub fn get_content_base() -> &'static str {
    "http://localhost:8080/json"  // trunk serve during development
}

#[cfg(not(debug_assertions))]
pub fn get_content_base() -> &'static str {
    "/json"
}

pub const DRAFT_STORAGE_KEY: &str = "fttg-booking-draft";
pub const CONSENT_STORAGE_KEY: &str = "fttg_communication_consent";
pub const BOOKING_STATS_KEY: &str = "fttg-booking-stats";
pub const SMS_OPT_IN_KEY: &str = "sms_opt_in";

pub const DRAFT_RESTORE_DELAY_MS: u32 = 1_000;
pub const SUBMIT_TIMEOUT_MS: u32 = 10_000;
pub const SUCCESS_BANNER_MS: u32 = 5_000;
pub const ERROR_BANNER_MS: u32 = 8_000;

pub const BUSINESS_NAME: &str = "FTTG AutoTech";
pub const FALLBACK_PHONE: &str = "(855) 578-4334";

const DEFAULT_FORMSPREE_ENDPOINT: &str = "https://formspree.io/f/xjkobqnw";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Booking,
    Contact,
    Consent,
}

impl FormKind {
    /// Value of the `form_type` field sent with every submission.
    pub fn tag(&self) -> &'static str {
        match self {
            FormKind::Booking => "booking",
            FormKind::Contact => "contact",
            FormKind::Consent => "consent",
        }
    }
}

/// Where a form posts to. Built once at startup, never read off the DOM.
#[derive(Clone, Debug, PartialEq)]
pub struct FormBinding {
    pub kind: FormKind,
    pub endpoint: String,
    pub source: String,
}

/// Optional `forms` object in `app.json`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FormEndpointOverrides {
    pub booking: Option<String>,
    pub contact: Option<String>,
    pub consent: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormBindings {
    booking: FormBinding,
    contact: FormBinding,
    consent: FormBinding,
}

impl Default for FormBindings {
    fn default() -> Self {
        let binding = |kind| FormBinding {
            kind,
            endpoint: DEFAULT_FORMSPREE_ENDPOINT.to_string(),
            source: "website".to_string(),
        };
        Self {
            booking: binding(FormKind::Booking),
            contact: binding(FormKind::Contact),
            consent: binding(FormKind::Consent),
        }
    }
}

impl FormBindings {
    pub fn with_overrides(mut self, overrides: &FormEndpointOverrides) -> Self {
        if let Some(endpoint) = &overrides.booking {
            self.booking.endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &overrides.contact {
            self.contact.endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &overrides.consent {
            self.consent.endpoint = endpoint.clone();
        }
        self
    }

    pub fn get(&self, kind: FormKind) -> &FormBinding {
        match kind {
            FormKind::Booking => &self.booking,
            FormKind::Contact => &self.contact,
            FormKind::Consent => &self.consent,
        }
    }
}
