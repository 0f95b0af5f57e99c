use std::rc::Rc;

use log::{info, Level};
use web_sys::{window, MouseEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;
use yew_router::prelude::*;

mod config;
mod services;
mod storage {
    pub mod store;
    pub mod draft;
    pub mod consent;
}
mod forms {
    pub mod format;
    pub mod validation;
    pub mod submission;
    pub mod schema;
    pub mod editor;
}
mod content {
    pub mod models;
    pub mod loader;
}
mod network {
    pub mod submitter;
    pub mod side_channel;
}
mod review {
    pub mod machine;
    pub mod flow;
    pub mod popup;
}
mod components {
    pub mod field;
    pub mod notice;
    pub mod footer;
    pub mod booking_form;
    pub mod contact_form;
    pub mod consent_form;
}
mod pages {
    pub mod home;
    pub mod consent;
}

use config::{FormBindings, FormEndpointOverrides};
use content::loader::{use_content, Content};
use content::models::{AppContent, CommunicationDocument};
use network::side_channel::{CommunicationService, TwilioConfig};
use pages::{consent::ConsentPage, home::Home};
use services::{open_store, Services};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/consent")]
    Consent,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Consent => html! { <ConsentPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Home} /> },
    }
}

/// In-page anchors (`#services`) are resolved against the home page so the
/// menu also works from `/consent`.
fn nav_href(url: &str) -> String {
    if url.starts_with('#') {
        format!("/{}", url)
    } else {
        url.to_string()
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let content = use_context::<Rc<AppContent>>().unwrap_or_default();
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_event_with_window("scroll", move |_: web_sys::Event| {
            let scroll_top = window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
            is_scrolled.set(scroll_top > 50.0);
        });
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    { &content.business.name }
                </Link<Route>>

                <button class="burger-menu" aria-label="Menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    { for content.navigation.iter().filter(|item| !item.optional).map(|item| html! {
                        <a
                            href={nav_href(&item.url)}
                            class="nav-link"
                            id={format!("nav-{}", item.section_id())}
                            onclick={close_menu.clone()}
                        >
                            { &item.section }
                        </a>
                    }) }
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Consent} classes="nav-link">
                            { "Communication Consent" }
                        </Link<Route>>
                    </div>
                    <a href={format!("tel:{}", content.contact.phone)} class="nav-call-button">
                        { &content.contact.phone }
                    </a>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let app = use_content::<AppContent>("app.json");
    let communication = use_content::<CommunicationDocument>("communication.json");
    let store = use_memo(|_| open_store(), ());

    // Built-in copy is shown until app.json arrives, and kept if it never does.
    let content = use_memo(|app: &Option<Content<AppContent>>| app.clone().map(Content::resolve).unwrap_or_default(), app);
    let twilio: TwilioConfig = communication
        .map(|doc| doc.resolve().communication.twilio)
        .unwrap_or_default();

    let services = use_memo(
        |(forms, twilio, phone): &(FormEndpointOverrides, TwilioConfig, String)| {
            Services::new(
                (*store).clone(),
                CommunicationService::from_config(twilio, phone),
                FormBindings::default().with_overrides(forms),
            )
        },
        (content.forms.clone(), twilio, content.contact.phone.clone()),
    );

    html! {
        <ContextProvider<Rc<AppContent>> context={content.clone()}>
            <ContextProvider<Services> context={(*services).clone()}>
                <BrowserRouter>
                    <Nav />
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </ContextProvider<Services>>
        </ContextProvider<Rc<AppContent>>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_resolve_against_home() {
        assert_eq!(nav_href("#services"), "/#services");
        assert_eq!(nav_href("/consent"), "/consent");
        assert_eq!(nav_href("https://example.com"), "https://example.com");
    }
}
