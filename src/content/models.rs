use std::collections::HashMap;

use serde::Deserialize;

use crate::config::{FormEndpointOverrides, FormKind, BUSINESS_NAME, FALLBACK_PHONE};

// app.json ───────────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppContent {
    pub business: Business,
    pub contact: Contact,
    pub navigation: Vec<NavItem>,
    pub homepage: Homepage,
    pub footer: Footer,
    pub form_popup: FormPopupCopy,
    pub forms: FormEndpointOverrides,
}

impl Default for AppContent {
    fn default() -> Self {
        Self {
            business: Business::default(),
            contact: Contact::default(),
            navigation: vec![
                NavItem::new("Home", "#home"),
                NavItem::new("Services", "#services"),
                NavItem::new("Why Choose Us", "#why-choose-us"),
                NavItem::new("Book Service", "#booking"),
                NavItem::new("Contact", "#contact"),
            ],
            homepage: Homepage::default(),
            footer: Footer::default(),
            form_popup: FormPopupCopy::default(),
            forms: FormEndpointOverrides::default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Business {
    pub name: String,
    pub tagline: String,
}

impl Default for Business {
    fn default() -> Self {
        Self {
            name: BUSINESS_NAME.to_string(),
            tagline: "Reliable auto repair, at the shop or at your door.".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub emails: ContactEmails,
    pub service_area: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            phone: FALLBACK_PHONE.to_string(),
            emails: ContactEmails::default(),
            service_area: "Metro Atlanta and surrounding areas".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ContactEmails {
    pub general: String,
    pub support: String,
}

impl Default for ContactEmails {
    fn default() -> Self {
        Self {
            general: "info@fttgautotech.com".to_string(),
            support: "support@fttgautotech.com".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct NavItem {
    pub section: String,
    pub url: String,
    #[serde(default)]
    pub optional: bool,
}

impl NavItem {
    fn new(section: &str, url: &str) -> Self {
        Self { section: section.to_string(), url: url.to_string(), optional: false }
    }

    /// `Why Choose Us` -> `why-choose-us`
    pub fn section_id(&self) -> String {
        crate::forms::format::slug(&self.section)
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Homepage {
    pub hero: Hero,
    pub services: ServicesSection,
    pub why_choose_us: WhyChooseUs,
    pub booking: BookingSection,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta: Vec<String>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title: "Expert Auto Repair You Can Trust".to_string(),
            subtitle: "Certified technicians, honest pricing, and mobile service that comes to you.".to_string(),
            cta: vec!["Book Service".to_string(), "Call Now".to_string()],
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServicesSection {
    pub title: String,
    pub items: Vec<ServiceItem>,
}

impl Default for ServicesSection {
    fn default() -> Self {
        let item = |name: &str, icon: &str| ServiceItem {
            name: name.to_string(),
            icon: icon.to_string(),
            description: None,
        };
        Self {
            title: "Our Services".to_string(),
            items: vec![
                item("Oil Change", "oil"),
                item("Brake Service", "brakes"),
                item("Engine Diagnostics", "diagnostics"),
                item("A/C Repair", "ac"),
            ],
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceItem {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServiceItem {
    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!("Professional {} services with certified technicians.", self.name.to_lowercase())
        })
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WhyChooseUs {
    pub title: String,
    pub features: Vec<String>,
}

impl Default for WhyChooseUs {
    fn default() -> Self {
        Self {
            title: "Why Choose Us".to_string(),
            features: vec![
                "ASE Certified Techs".to_string(),
                "Mobile Service Available".to_string(),
                "Transparent Pricing".to_string(),
                "Warranty on All Work".to_string(),
            ],
        }
    }
}

pub fn feature_icon_class(feature: &str) -> &'static str {
    match feature {
        "Mobile Service Available" => "mobile",
        "Transparent Pricing" => "pricing",
        "Warranty on All Work" => "warranty",
        _ => "certified",
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingSection {
    pub title: String,
    pub form_fields: Vec<String>,
}

impl Default for BookingSection {
    fn default() -> Self {
        Self {
            title: "Book Your Service".to_string(),
            form_fields: vec![
                "name".to_string(),
                "phone".to_string(),
                "car make/model".to_string(),
                "service needed".to_string(),
            ],
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
    pub copyright: Copyright,
    pub created_by: Option<CreatedBy>,
}

impl Default for Footer {
    fn default() -> Self {
        Self { copyright: Copyright::default(), created_by: None }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Copyright {
    /// A fixed year, or `dynamic` for the current one.
    pub year: Option<String>,
    pub text: String,
}

impl Default for Copyright {
    fn default() -> Self {
        Self { year: None, text: "All rights reserved.".to_string() }
    }
}

impl Copyright {
    pub fn display_year(&self, current_year: i32) -> String {
        match self.year.as_deref() {
            None | Some("dynamic") | Some("") => current_year.to_string(),
            Some(year) => year.to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedBy {
    pub text: String,
    pub url: String,
}

// Review popup copy ──────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FormPopupCopy {
    pub titles: PopupTitles,
    pub messages: PopupMessages,
    pub buttons: PopupButtons,
    pub next_steps: NextSteps,
    pub field_labels: HashMap<String, String>,
}

impl Default for FormPopupCopy {
    fn default() -> Self {
        let field_labels = [
            ("name", "Full Name"),
            ("phone", "Phone Number"),
            ("email", "Email Address"),
            ("car-make-model", "Car Make & Model"),
            ("car-make", "Car Make"),
            ("car-model", "Car Model"),
            ("car-year", "Car Year"),
            ("service-needed", "Service Needed"),
            ("preferred-date", "Preferred Date"),
            ("preferred-time", "Preferred Time"),
            ("message", "Message"),
            ("subject", "Subject"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            titles: PopupTitles::default(),
            messages: PopupMessages::default(),
            buttons: PopupButtons::default(),
            next_steps: NextSteps::default(),
            field_labels,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PopupTitles {
    pub review: String,
    pub success: String,
    pub error: String,
}

impl Default for PopupTitles {
    fn default() -> Self {
        Self {
            review: "Review Your Submission".to_string(),
            success: "Submission Successful!".to_string(),
            error: "Submission Failed".to_string(),
        }
    }
}

/// One string per kind of form.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PerForm {
    pub service_booking: String,
    pub contact_form: String,
    pub general: String,
}

impl PerForm {
    fn new(service_booking: &str, contact_form: &str, general: &str) -> Self {
        Self {
            service_booking: service_booking.to_string(),
            contact_form: contact_form.to_string(),
            general: general.to_string(),
        }
    }

    pub fn for_kind(&self, kind: FormKind) -> &str {
        match kind {
            FormKind::Booking => &self.service_booking,
            FormKind::Contact => &self.contact_form,
            FormKind::Consent => &self.general,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PopupMessages {
    pub review: PerForm,
    pub success: SuccessCopy,
    pub error: ErrorCopy,
    pub loading: PerForm,
}

impl Default for PopupMessages {
    fn default() -> Self {
        Self {
            review: PerForm::new(
                "Service Booking Details",
                "Contact Form Details",
                "Form Submission Details",
            ),
            success: SuccessCopy::default(),
            error: ErrorCopy::default(),
            loading: PerForm::new(
                "Submitting your service booking...",
                "Submitting your message...",
                "Submitting your form...",
            ),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SuccessCopy {
    pub title: String,
    #[serde(flatten)]
    pub per_form: PerForm,
}

impl Default for SuccessCopy {
    fn default() -> Self {
        Self {
            title: "Thank You!".to_string(),
            per_form: PerForm::new(
                "Your service booking has been submitted successfully. We'll get back to you as soon as possible.",
                "Your message has been submitted successfully. We'll get back to you as soon as possible.",
                "Your form has been submitted successfully. We'll get back to you as soon as possible.",
            ),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorCopy {
    pub title: String,
    pub message: String,
    pub contact_info: String,
}

impl Default for ErrorCopy {
    fn default() -> Self {
        Self {
            title: "Submission Failed".to_string(),
            message: "We're sorry, but there was an error submitting your form. Please try again or contact us directly.".to_string(),
            contact_info: "Please try again or call us at".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PopupButtons {
    pub update: String,
    pub confirm: String,
    pub close: String,
    pub go_back: String,
    pub try_again: String,
}

impl Default for PopupButtons {
    fn default() -> Self {
        Self {
            update: "Update".to_string(),
            confirm: "Confirm & Submit".to_string(),
            close: "Close".to_string(),
            go_back: "Go Back".to_string(),
            try_again: "Try Again".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NextSteps {
    pub title: String,
    pub steps: Vec<String>,
}

impl Default for NextSteps {
    fn default() -> Self {
        Self {
            title: "What's Next?".to_string(),
            steps: vec![
                "We'll review your submission within 24 hours".to_string(),
                "You'll receive a confirmation email shortly".to_string(),
                "Our team will contact you to discuss next steps".to_string(),
            ],
        }
    }
}

// car.json ───────────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CarDocument {
    #[serde(rename = "carData")]
    pub car_data: CarCatalog,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CarCatalog {
    pub makes: Vec<String>,
    pub models: HashMap<String, Vec<String>>,
    #[serde(deserialize_with = "years_as_strings")]
    pub years: Vec<String>,
}

fn years_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(u32),
        Text(String),
    }

    let years = Vec::<Year>::deserialize(deserializer)?;
    Ok(years
        .into_iter()
        .map(|y| match y {
            Year::Number(n) => n.to_string(),
            Year::Text(s) => s,
        })
        .collect())
}

// communication.json ─────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CommunicationDocument {
    pub communication: CommunicationSection,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CommunicationSection {
    pub twilio: crate::network::side_channel::TwilioConfig,
}

// consent.json ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConsentDocument {
    pub consent: ConsentPage,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsentPage {
    pub page_title: String,
    pub hero: ConsentHero,
    pub sections: Vec<ConsentSection>,
    pub contact: ConsentContact,
    pub legal_info: LegalInfo,
}

impl Default for ConsentPage {
    fn default() -> Self {
        Self {
            page_title: "Communication Consent".to_string(),
            hero: ConsentHero::default(),
            sections: Vec::new(),
            contact: ConsentContact::default(),
            legal_info: LegalInfo::default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConsentHero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl Default for ConsentHero {
    fn default() -> Self {
        Self {
            title: "Communication Consent".to_string(),
            subtitle: "Transparent. Secure. Respectful.".to_string(),
            description: format!(
                "At {}, we believe in clear communication and respecting your privacy preferences.",
                BUSINESS_NAME
            ),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ConsentSection {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    pub content: Vec<ContentItem>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { value: String },
    List { items: Vec<String> },
    Important { value: String },
    Note { value: String },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConsentContact {
    pub title: String,
    pub description: String,
    pub methods: Vec<ContactMethod>,
}

impl Default for ConsentContact {
    fn default() -> Self {
        Self {
            title: "Questions About Communication Consent?".to_string(),
            description: "We're here to help clarify any questions about how we communicate with you.".to_string(),
            methods: vec![ContactMethod {
                kind: "phone".to_string(),
                label: "Call Us".to_string(),
                value: FALLBACK_PHONE.to_string(),
                icon: "bi-telephone".to_string(),
            }],
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ContactMethod {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub icon: String,
}

impl ContactMethod {
    pub fn href(&self) -> Option<String> {
        match self.kind.as_str() {
            "phone" => Some(format!("tel:{}", self.value)),
            "email" => Some(format!("mailto:{}", self.value)),
            "address" => None,
            _ => Some(self.value.clone()),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalInfo {
    pub content: Vec<LegalText>,
    pub last_updated: String,
    pub version: String,
}

impl Default for LegalInfo {
    fn default() -> Self {
        Self {
            content: vec![LegalText {
                value: format!(
                    "By providing your phone number and consenting to SMS communications, you agree to receive text messages from {}.",
                    BUSINESS_NAME
                ),
            }],
            last_updated: "July 15, 2025".to_string(),
            version: "1.0".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LegalText {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_app_document_keeps_defaults_for_missing_sections() {
        let doc: AppContent = serde_json::from_str(
            r#"{ "business": { "name": "Shop" }, "homepage": { "booking": { "formFields": ["name"] } } }"#,
        )
        .unwrap();
        assert_eq!(doc.business.name, "Shop");
        assert_eq!(doc.homepage.booking.form_fields, vec!["name".to_string()]);
        assert_eq!(doc.homepage.booking.title, "Book Your Service");
        assert_eq!(doc.contact.phone, FALLBACK_PHONE);
        assert_eq!(doc.form_popup.buttons.confirm, "Confirm & Submit");
    }

    #[test]
    fn car_years_accept_numbers_and_strings() {
        let doc: CarDocument = serde_json::from_str(
            r#"{ "carData": { "makes": ["Toyota"], "models": { "Toyota": ["Camry"] }, "years": [2024, "2023"] } }"#,
        )
        .unwrap();
        assert_eq!(doc.car_data.years, vec!["2024".to_string(), "2023".to_string()]);
    }

    #[test]
    fn consent_items_are_tagged_by_type() {
        let item: ContentItem = serde_json::from_str(r#"{ "type": "list", "items": ["a", "b"] }"#).unwrap();
        assert_eq!(item, ContentItem::List { items: vec!["a".to_string(), "b".to_string()] });
    }

    #[test]
    fn service_description_has_a_generic_default() {
        let item: ServiceItem = serde_json::from_str(r#"{ "name": "Oil Change" }"#).unwrap();
        assert_eq!(item.description(), "Professional oil change services with certified technicians.");
    }

    #[test]
    fn dynamic_copyright_year_uses_current_year() {
        let mut copyright = Copyright::default();
        assert_eq!(copyright.display_year(2026), "2026");
        copyright.year = Some("dynamic".to_string());
        assert_eq!(copyright.display_year(2026), "2026");
        copyright.year = Some("2024".to_string());
        assert_eq!(copyright.display_year(2026), "2024");
    }

    #[test]
    fn popup_copy_per_form_kind() {
        let copy = FormPopupCopy::default();
        assert_eq!(copy.messages.review.for_kind(FormKind::Contact), "Contact Form Details");
        assert_eq!(copy.messages.loading.for_kind(FormKind::Booking), "Submitting your service booking...");
    }
}
