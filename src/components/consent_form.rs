use chrono::Utc;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, UrlSearchParams};
use yew::prelude::*;
use yew_router::prelude::*;

use super::field::{focus_field, FieldView};
use super::notice::{Notice, NoticeKind, NoticeMessage};
use crate::config::{FormKind, ERROR_BANNER_MS, SUBMIT_TIMEOUT_MS};
use crate::forms::editor::FormState;
use crate::forms::schema::consent_schema;
use crate::forms::submission::FormSubmission;
use crate::forms::validation::consent_rules;
use crate::network::side_channel::consent_confirmation_message;
use crate::network::submitter::with_timeout;
use crate::services::use_services;
use crate::storage::consent::{ConsentChoice, ConsentPreference};
use crate::Route;

fn field_id(name: &str) -> String {
    format!("consent-{}", name)
}

fn error_notice(text: String) -> Option<NoticeMessage> {
    Some(NoticeMessage::new(NoticeKind::Error, text).dismiss_after(ERROR_BANNER_MS))
}

/// Reads and strips the `?success=true` / `?error=true` markers a hosted form
/// redirect may have appended.
fn take_redirect_status() -> Option<bool> {
    let window = window()?;
    let search = window.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    let status = if params.get("success").as_deref() == Some("true") {
        true
    } else if params.get("error").as_deref() == Some("true") {
        false
    } else {
        return None;
    };
    if let Ok(history) = window.history() {
        let path = window.location().pathname().unwrap_or_else(|_| "/consent".to_string());
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }
    Some(status)
}

#[derive(Properties, PartialEq)]
pub struct ConsentFormProps {
    pub phone: String,
}

#[function_component]
pub fn ConsentForm(props: &ConsentFormProps) -> Html {
    let ConsentFormProps { phone } = props;
    let services = use_services();
    let schema = use_memo(|_| consent_schema(), ());
    let rules = use_memo(|_| consent_rules(), ());
    let form = use_state(FormState::default);
    let notice = use_state(|| None::<NoticeMessage>);
    let saved = use_state(|| false);
    let submitting = use_state(|| false);
    let in_flight = use_mut_ref(|| false);
    let previous = {
        let consents = services.consents();
        use_state(move || consents.load())
    };

    {
        let saved = saved.clone();
        let notice = notice.clone();
        use_effect_with_deps(
            move |_| {
                match take_redirect_status() {
                    Some(true) => saved.set(true),
                    Some(false) => notice.set(error_notice(
                        "There was an error processing your submission. Please try again.".to_string(),
                    )),
                    None => {}
                }
                || ()
            },
            (),
        );
    }

    let on_change = {
        let form = form.clone();
        let schema = schema.clone();
        let rules = rules.clone();
        Callback::from(move |(name, value): (String, String)| form.set(form.edit(&schema, &rules, &name, &value)))
    };

    let on_blur = {
        let form = form.clone();
        let schema = schema.clone();
        let rules = rules.clone();
        Callback::from(move |name: String| form.set(form.touch(&schema, &rules, &name)))
    };

    let onsubmit = {
        let form = form.clone();
        let schema = schema.clone();
        let rules = rules.clone();
        let notice = notice.clone();
        let saved = saved.clone();
        let submitting = submitting.clone();
        let previous = previous.clone();
        let in_flight = in_flight.clone();
        let services = services.clone();
        let phone = phone.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *in_flight.borrow() {
                warn!("Consent form already submitting");
                return;
            }

            let (checked, first_invalid) = form.check(&schema, &rules);
            let values = checked.values.clone();
            form.set(checked);
            if let Some(name) = first_invalid {
                focus_field(&field_id(&name));
                return;
            }
            let now = Utc::now();
            let Some(preference) = ConsentPreference::from_form(&values, now) else {
                return;
            };

            if let Err(e) = services.consents().save(&preference) {
                warn!("Failed to save consent locally: {}", e);
            }

            let binding = services.bindings.get(FormKind::Consent);
            let submission = FormSubmission::build(binding, &values.non_empty(), now);
            let request = services.submitter.post(&binding.endpoint, &submission);
            *in_flight.borrow_mut() = true;
            submitting.set(true);
            notice.set(None);

            let in_flight = in_flight.clone();
            let submitting = submitting.clone();
            let notice = notice.clone();
            let saved = saved.clone();
            let previous = previous.clone();
            let communication = services.communication.clone();
            let phone = phone.clone();
            spawn_local(async move {
                let outcome = with_timeout(request, TimeoutFuture::new(SUBMIT_TIMEOUT_MS)).await;
                *in_flight.borrow_mut() = false;
                submitting.set(false);

                match outcome {
                    Ok(()) => {
                        info!("Consent choice submitted");
                        if preference.consent_choice == ConsentChoice::Consent && !preference.phone_number.is_empty() {
                            let message = consent_confirmation_message(&preference.full_name);
                            let outcome = communication.send_sms(&preference.phone_number, &message);
                            if let Some((_, text)) = outcome.notice() {
                                notice.set(Some(
                                    NoticeMessage::new(NoticeKind::Info, text).dismiss_after(ERROR_BANNER_MS),
                                ));
                            }
                        }
                        previous.set(Some(preference));
                        saved.set(true);
                    }
                    Err(e) => {
                        gloo_console::error!("Consent submission failed:", e.to_string());
                        notice.set(error_notice(format!(
                            "There was an error submitting your form. {} You can also call us at {}.",
                            e, phone
                        )));
                    }
                }
            });
        })
    };

    let submit_another = {
        let form = form.clone();
        let saved = saved.clone();
        Callback::from(move |_: MouseEvent| {
            form.set(FormState::default());
            saved.set(false);
        })
    };

    let dismiss_notice = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    html! {
        <div class="consent-form-container">
            if let Some(message) = (*notice).clone() {
                <Notice {message} on_dismiss={dismiss_notice} />
            }
            if *saved {
                <div class="consent-success" role="dialog">
                    <h3>{ "Choice Saved Successfully!" }</h3>
                    <p>{ "Your communication consent choice has been saved. You will receive a confirmation email shortly." }</p>
                    <Link<Route> to={Route::Home} classes="btn btn-primary">{ "Return to Home" }</Link<Route>>
                    <button type="button" class="btn btn-link" onclick={submit_another}>{ "Submit Another Response" }</button>
                </div>
            } else {
                if let Some(preference) = (*previous).as_ref() {
                    <div class="previous-consent">
                        <p class="previous-consent-title">{ "Previous Consent Found" }</p>
                        <p>{ preference.summary() }</p>
                    </div>
                }
                <form class="consent-form" novalidate=true {onsubmit}>
                    { for schema.fields().iter().map(|field| html! {
                        <FieldView
                            key={field.name.clone()}
                            field={field.clone()}
                            id={field_id(&field.name)}
                            value={form.values.get(&field.name).to_string()}
                            required={field.required}
                            status={form.statuses.class(&field.name)}
                            error={form.error(&field.name)}
                            on_change={on_change.clone()}
                            on_blur={on_blur.clone()}
                        />
                    }) }
                    <button type="submit" class="btn btn-primary" disabled={*submitting}>
                        if *submitting {
                            <span class="spinner" aria-hidden="true"></span>{ " Saving..." }
                        } else {
                            { "Save My Choice" }
                        }
                    </button>
                </form>
            }
        </div>
    }
}
