use yew::prelude::*;

use super::field::{focus_field, FieldView};
use super::notice::{Notice, NoticeKind, NoticeMessage};
use crate::config::{FormKind, ERROR_BANNER_MS};
use crate::content::models::FormPopupCopy;
use crate::forms::editor::FormState;
use crate::forms::schema::contact_schema;
use crate::forms::submission::FormValues;
use crate::forms::validation::contact_rules;
use crate::review::flow::use_review_flow;
use crate::review::machine::{ReviewAction, ReviewState};
use crate::review::popup::ReviewPopup;
use crate::services::use_services;

fn field_id(name: &str) -> String {
    format!("contact-{}", name)
}

#[derive(Properties, PartialEq)]
pub struct ContactFormProps {
    pub popup: FormPopupCopy,
    pub phone: String,
}

#[function_component]
pub fn ContactForm(props: &ContactFormProps) -> Html {
    let ContactFormProps { popup, phone } = props;
    let services = use_services();
    let schema = use_memo(|_| contact_schema(), ());
    let rules = use_memo(|_| contact_rules(), ());
    let form = use_state(FormState::default);
    let notice = use_state(|| None::<NoticeMessage>);
    let machine = use_review_flow(services.submitter.clone());

    {
        let form = form.clone();
        use_effect_with_deps(
            move |closed| {
                if closed.is_some() {
                    form.set(FormState::default());
                }
                || ()
            },
            machine.closed_success(),
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
        let machine = machine.clone();
        let binding = services.bindings.get(FormKind::Contact).clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if machine.is_open() {
                return;
            }
            let (checked, first_invalid) = form.check(&schema, &rules);
            let snapshot = checked.values.non_empty();
            form.set(checked);
            match first_invalid {
                Some(name) => {
                    notice.set(Some(
                        NoticeMessage::new(NoticeKind::Error, "Please correct the errors above")
                            .dismiss_after(ERROR_BANNER_MS),
                    ));
                    focus_field(&field_id(&name));
                }
                None => {
                    notice.set(None);
                    machine.dispatch(ReviewAction::Open(ReviewState {
                        kind: FormKind::Contact,
                        binding: binding.clone(),
                        snapshot,
                    }));
                }
            }
        })
    };

    let on_edit = {
        let form = form.clone();
        Callback::from(move |snapshot: FormValues| {
            form.set(form.restore(&snapshot));
            focus_field(&field_id("name"));
        })
    };

    let dismiss_notice = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    html! {
        <div class="contact-form">
            if let Some(message) = (*notice).clone() {
                <Notice {message} on_dismiss={dismiss_notice} />
            }
            <form novalidate=true {onsubmit}>
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
                <button type="submit" class="btn btn-primary" disabled={machine.is_open()}>{ "Send Message" }</button>
            </form>
            <ReviewPopup
                machine={machine.clone()}
                copy={popup.clone()}
                phone={phone.clone()}
                order={schema.names()}
                {on_edit}
            />
        </div>
    }
}
