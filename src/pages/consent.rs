use std::rc::Rc;

use log::info;
use yew::prelude::*;

use crate::components::consent_form::ConsentForm;
use crate::components::footer::SiteFooter;
use crate::content::loader::use_content;
use crate::content::models::{AppContent, ConsentDocument, ConsentSection, ContentItem};

fn render_item(item: &ContentItem) -> Html {
    match item {
        ContentItem::Text { value } => html! { <p>{ value }</p> },
        ContentItem::List { items } => html! {
            <ul class="consent-list">
                { for items.iter().map(|i| html! { <li>{ i }</li> }) }
            </ul>
        },
        ContentItem::Important { value } => html! { <p class="consent-important">{ value }</p> },
        ContentItem::Note { value } => html! { <p class="consent-note">{ value }</p> },
    }
}

fn render_section(section: &ConsentSection) -> Html {
    html! {
        <div class="consent-section">
            <h2>
                if !section.icon.is_empty() {
                    <i class={classes!("bi", section.icon.clone())}></i>
                }
                { &section.title }
            </h2>
            { for section.content.iter().map(render_item) }
        </div>
    }
}

#[function_component]
pub fn ConsentPage() -> Html {
    let app = use_context::<Rc<AppContent>>().unwrap_or_default();
    let document = use_content::<ConsentDocument>("consent.json");
    let page = document.map(|d| d.resolve().consent).unwrap_or_default();

    use_effect_with_deps(
        |title: &String| {
            info!("Rendering Consent page");
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.set_title(title);
            }
            || ()
        },
        page.page_title.clone(),
    );

    html! {
        <main class="consent-page">
            <section class="consent-hero">
                <h1>{ &page.hero.title }</h1>
                <p class="consent-subtitle">{ &page.hero.subtitle }</p>
                <p>{ &page.hero.description }</p>
            </section>

            <section class="consent-content container">
                if page.sections.is_empty() {
                    <div class="consent-section">
                        <p>{ format!(
                            "{} may contact you by text message or phone about appointments and service updates. You can choose to be contacted by email only, and you can change your choice at any time.",
                            app.business.name
                        ) }</p>
                    </div>
                } else {
                    { for page.sections.iter().map(render_section) }
                }
            </section>

            <section class="consent-form-section container">
                <ConsentForm phone={app.contact.phone.clone()} />
            </section>

            <section class="consent-contact container">
                <h2>{ &page.contact.title }</h2>
                <p>{ &page.contact.description }</p>
                <div class="contact-methods">
                    { for page.contact.methods.iter().map(|method| html! {
                        <div class="contact-method">
                            <i class={classes!("bi", method.icon.clone())}></i>
                            <span class="contact-label">{ &method.label }</span>
                            if let Some(href) = method.href() {
                                <a {href}>{ &method.value }</a>
                            } else {
                                <span>{ &method.value }</span>
                            }
                        </div>
                    }) }
                </div>
            </section>

            <section class="legal-info container">
                { for page.legal_info.content.iter().map(|text| html! { <p>{ &text.value }</p> }) }
                <p class="legal-meta">
                    { format!("Last updated: {} · Version {}", page.legal_info.last_updated, page.legal_info.version) }
                </p>
            </section>

            <SiteFooter />
        </main>
    }
}
