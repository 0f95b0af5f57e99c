use log::{info, warn};
use serde::Deserialize;

use crate::config::{FormKind, BUSINESS_NAME, FALLBACK_PHONE};
use crate::forms::format::to_e164;
use crate::storage::consent::ConsentStore;

fn default_static_hosting() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TwilioConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Static hosting has no server to relay SMS/voice, so the channel stays off.
    #[serde(default = "default_static_hosting")]
    pub static_hosting: bool,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self { enabled: false, static_hosting: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Emergency,
    Appointment,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SideChannelOutcome {
    Delivered,
    Unavailable { feature: &'static str, notice: String },
}

impl SideChannelOutcome {
    pub fn notice(&self) -> Option<(&'static str, &str)> {
        match self {
            SideChannelOutcome::Delivered => None,
            SideChannelOutcome::Unavailable { feature, notice } => Some((feature, notice.as_str())),
        }
    }
}

/// Optional SMS/voice notifications. Every call returns an outcome; nothing
/// here can fail the form that triggered it.
#[derive(Clone, Debug, PartialEq)]
pub struct CommunicationService {
    enabled: bool,
    business_phone: String,
}

impl CommunicationService {
    pub fn disabled() -> Self {
        Self { enabled: false, business_phone: FALLBACK_PHONE.to_string() }
    }

    pub fn from_config(config: &TwilioConfig, business_phone: &str) -> Self {
        let enabled = config.enabled && !config.static_hosting;
        if enabled {
            info!("Communication service initialized");
        } else {
            info!("Communication service initialized in email-only mode; SMS/voice disabled");
        }
        Self { enabled, business_phone: business_phone.to_string() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn unavailable(&self, feature: &'static str, detail: &str) -> SideChannelOutcome {
        SideChannelOutcome::Unavailable {
            feature,
            notice: format!(
                "{} Please use email, or call us at {}.",
                detail, self.business_phone
            ),
        }
    }

    pub fn send_sms(&self, to: &str, message: &str) -> SideChannelOutcome {
        if !self.enabled {
            warn!("SMS disabled; using email notifications instead");
            return self.unavailable("SMS", "Your message will be sent via email instead of SMS.");
        }
        info!("SMS queued for {}: {} chars", to_e164(to), message.len());
        SideChannelOutcome::Delivered
    }

    pub fn initiate_call(&self, kind: CallKind) -> SideChannelOutcome {
        if !self.enabled {
            let detail = match kind {
                CallKind::Emergency => "We can't connect an emergency call from the website.",
                CallKind::Appointment => "We can't place calls from the website.",
            };
            return self.unavailable("Voice", detail);
        }
        info!("{:?} call requested", kind);
        SideChannelOutcome::Delivered
    }

    pub fn notify_submission(&self, kind: FormKind) -> SideChannelOutcome {
        if !self.enabled {
            return self.unavailable(
                "Communication",
                "Form submitted successfully. You will receive email confirmations instead of SMS/phone notifications.",
            );
        }
        info!("Submission notification sent for {}", kind.tag());
        SideChannelOutcome::Delivered
    }

    /// Stores the SMS preference; the outcome only describes whether texts can actually be sent.
    pub fn record_sms_opt_in(&self, consents: &ConsentStore, opted_in: bool) -> SideChannelOutcome {
        if let Err(e) = consents.set_sms_opt_in(opted_in) {
            warn!("Failed to save SMS preference: {}", e);
        }
        if !self.enabled && opted_in {
            return self.unavailable("SMS Preference", "Your preference was saved, but SMS updates are not available yet.");
        }
        SideChannelOutcome::Delivered
    }
}

pub fn consent_confirmation_message(full_name: &str) -> String {
    let name = if full_name.trim().is_empty() { "Customer" } else { full_name.trim() };
    format!(
        "Hi {}! Thank you for consenting to SMS communications with {}. We'll use this to send appointment confirmations and service updates. Reply STOP to opt out anytime. Questions? Call {}",
        name, BUSINESS_NAME, FALLBACK_PHONE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::MemoryStore;
    use std::rc::Rc;

    #[test]
    fn static_hosting_disables_the_channel() {
        let config = TwilioConfig { enabled: true, static_hosting: true };
        let service = CommunicationService::from_config(&config, "(404) 555-0100");
        assert!(!service.is_enabled());

        let outcome = service.send_sms("4045550134", "hello");
        let (feature, notice) = outcome.notice().unwrap();
        assert_eq!(feature, "SMS");
        assert!(notice.contains("(404) 555-0100"));
    }

    #[test]
    fn enabled_channel_delivers() {
        let config = TwilioConfig { enabled: true, static_hosting: false };
        let service = CommunicationService::from_config(&config, FALLBACK_PHONE);
        assert_eq!(service.send_sms("4045550134", "hi"), SideChannelOutcome::Delivered);
        assert_eq!(service.initiate_call(CallKind::Emergency), SideChannelOutcome::Delivered);
    }

    #[test]
    fn disabled_call_degrades_to_notice() {
        let outcome = CommunicationService::disabled().initiate_call(CallKind::Emergency);
        assert!(matches!(outcome, SideChannelOutcome::Unavailable { feature: "Voice", .. }));
    }

    #[test]
    fn opt_in_is_stored_even_when_disabled() {
        let consents = ConsentStore::new(Rc::new(MemoryStore::default()));
        let outcome = CommunicationService::disabled().record_sms_opt_in(&consents, true);
        assert!(consents.sms_opt_in());
        assert!(outcome.notice().is_some());

        let outcome = CommunicationService::disabled().record_sms_opt_in(&consents, false);
        assert!(!consents.sms_opt_in());
        assert_eq!(outcome, SideChannelOutcome::Delivered);
    }

    #[test]
    fn missing_flags_default_to_disabled() {
        let config: TwilioConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert!(config.static_hosting);
    }

    #[test]
    fn confirmation_message_falls_back_to_customer() {
        assert!(consent_confirmation_message("").starts_with("Hi Customer!"));
        assert!(consent_confirmation_message("Jo").starts_with("Hi Jo!"));
    }
}
