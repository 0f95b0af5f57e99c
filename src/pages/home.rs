use std::rc::Rc;

use log::info;
use yew::prelude::*;

use crate::components::booking_form::BookingForm;
use crate::components::contact_form::ContactForm;
use crate::components::footer::SiteFooter;
use crate::content::models::{feature_icon_class, AppContent};

/// Where a hero call-to-action points and how it is styled. Calls go to the
/// phone, everything else scrolls to the booking form.
fn hero_cta(text: &str, index: usize, phone: &str) -> (String, &'static str) {
    let lower = text.to_lowercase();
    if lower.contains("call") || lower.contains("speak to a technician") {
        (format!("tel:{}", phone), "hero-btn-tertiary")
    } else if index == 0 {
        ("#booking".to_string(), "hero-btn-primary")
    } else {
        ("#booking".to_string(), "hero-btn-secondary")
    }
}

#[function_component]
pub fn Home() -> Html {
    let content = use_context::<Rc<AppContent>>().unwrap_or_default();
    let AppContent { business, contact, homepage, form_popup, .. } = content.as_ref();

    use_effect_with_deps(
        |_| {
            info!("Rendering Home page");
            || ()
        },
        (),
    );

    html! {
        <main class="home">
            <section id="home" class="hero">
                <div class="hero-content">
                    <h1 class="hero-title">{ &homepage.hero.title }</h1>
                    <p class="hero-subtitle">{ &homepage.hero.subtitle }</p>
                    <div class="hero-cta">
                        { for homepage.hero.cta.iter().enumerate().map(|(index, text)| {
                            let (href, class) = hero_cta(text, index, &contact.phone);
                            html! { <a {href} class={classes!("hero-btn", class)}>{ text }</a> }
                        }) }
                    </div>
                </div>
            </section>

            <section id="services" class="services">
                <div class="container">
                    <h2 class="section-title">{ &homepage.services.title }</h2>
                    <div class="services-grid">
                        { for homepage.services.items.iter().map(|service| html! {
                            <div class="service-item">
                                <div class={classes!("service-icon", service.icon.clone())}></div>
                                <h3 class="service-title">{ &service.name }</h3>
                                <p class="service-description">{ service.description() }</p>
                            </div>
                        }) }
                    </div>
                </div>
            </section>

            <section id="why-choose-us" class="why-choose-us">
                <div class="container">
                    <h2 class="section-title">{ &homepage.why_choose_us.title }</h2>
                    <div class="features-grid">
                        { for homepage.why_choose_us.features.iter().map(|feature| html! {
                            <div class="feature-item">
                                <div class={classes!("feature-icon", feature_icon_class(feature))}></div>
                                <h3>{ feature }</h3>
                            </div>
                        }) }
                    </div>
                </div>
            </section>

            <BookingForm
                section={homepage.booking.clone()}
                popup={form_popup.clone()}
                phone={contact.phone.clone()}
            />

            <section id="contact" class="contact">
                <div class="container contact-grid">
                    <div class="contact-info">
                        <h2 class="section-title">{ "Contact Us" }</h2>
                        <p>{ &business.tagline }</p>
                        <p><a href={format!("tel:{}", contact.phone)}>{ &contact.phone }</a></p>
                        <p><a href={format!("mailto:{}", contact.emails.general)}>{ &contact.emails.general }</a></p>
                        <p>{ &contact.service_area }</p>
                    </div>
                    <ContactForm popup={form_popup.clone()} phone={contact.phone.clone()} />
                </div>
            </section>

            <SiteFooter />
        </main>
    }
}
