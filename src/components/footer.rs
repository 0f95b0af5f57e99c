use std::rc::Rc;

use chrono::{Datelike, Local};
use yew::prelude::*;

use crate::content::models::AppContent;

#[function_component]
pub fn SiteFooter() -> Html {
    let content = use_context::<Rc<AppContent>>().unwrap_or_default();
    let AppContent { business, contact, navigation, footer, .. } = content.as_ref();
    let year = footer.copyright.display_year(Local::now().year());

    html! {
        <footer id="main-footer" class="site-footer">
            <div class="container footer-grid">
                <div class="footer-brand">
                    <h3>{ &business.name }</h3>
                    <p>{ &business.tagline }</p>
                </div>
                <nav class="footer-links">
                    { for navigation.iter().filter(|item| !item.optional).map(|item| html! {
                        <a href={item.url.clone()}>{ &item.section }</a>
                    }) }
                </nav>
                <div class="footer-contact">
                    <a href={format!("tel:{}", contact.phone)}>{ &contact.phone }</a>
                    <a href={format!("mailto:{}", contact.emails.support)}>{ &contact.emails.support }</a>
                    <span>{ &contact.service_area }</span>
                </div>
            </div>
            <div class="footer-bottom">
                <p>{ format!("© {} {}. {}", year, business.name, footer.copyright.text) }</p>
                if let Some(created_by) = &footer.created_by {
                    <p class="created-by">
                        <a href={created_by.url.clone()} target="_blank" rel="noopener noreferrer">{ &created_by.text }</a>
                    </p>
                }
            </div>
        </footer>
    }
}
