use std::rc::Rc;

use chrono::{DateTime, Local, Utc};
use gloo_timers::callback::Timeout;
use log::info;
use yew::prelude::*;

use super::field::{focus_field, FieldView};
use super::notice::{Notice, NoticeKind, NoticeMessage};
use crate::config::{FormKind, DRAFT_RESTORE_DELAY_MS, ERROR_BANNER_MS, SUCCESS_BANNER_MS};
use crate::content::loader::{use_content, Content};
use crate::content::models::{BookingSection, CarDocument, FormPopupCopy};
use crate::forms::editor::FormState;
use crate::forms::schema::{booking_schema, FieldGroup, FormField, FormSchema, SMS_OPT_IN_FIELD};
use crate::forms::submission::FormValues;
use crate::forms::validation::booking_rules;
use crate::network::side_channel::{CallKind, SideChannelOutcome};
use crate::review::flow::use_review_flow;
use crate::review::machine::{ReviewAction, ReviewState};
use crate::review::popup::ReviewPopup;
use crate::services::{use_services, Services};
use crate::storage::consent::record_booking;
use crate::storage::draft::restorable;

fn field_id(name: &str) -> String {
    format!("booking-{}", name)
}

fn side_channel_notice(outcome: SideChannelOutcome) -> Option<NoticeMessage> {
    outcome.notice().map(|(feature, text)| {
        NoticeMessage::new(NoticeKind::Info, format!("{}: {}", feature, text)).dismiss_after(ERROR_BANNER_MS)
    })
}

/// What a saved draft pre-fills. Waits for the car catalog to settle so the
/// make, model and year of a draft are not dropped by the catalog-less form.
fn draft_prefill(draft: &FormValues, schema: &FormSchema, catalog_settled: bool) -> Option<FormValues> {
    if !catalog_settled {
        return None;
    }
    let prefill = restorable(draft, schema.fields().iter().map(|f| f.name.as_str()));
    (!prefill.is_blank()).then_some(prefill)
}

/// Bookkeeping for a booking the endpoint accepted: the draft is dropped, the
/// booking is counted and the side channel is told. Returns the notice to show.
pub fn complete_booking(services: &Services, now: DateTime<Utc>) -> Option<NoticeMessage> {
    services.drafts().clear();
    let stats = record_booking(services.store.as_ref(), now);
    info!("Booking submitted; {} bookings from this browser", stats.total);
    side_channel_notice(services.communication.notify_submission(FormKind::Booking))
}

#[derive(Properties, PartialEq)]
pub struct BookingFormProps {
    pub section: BookingSection,
    pub popup: FormPopupCopy,
    pub phone: String,
}

#[function_component]
pub fn BookingForm(props: &BookingFormProps) -> Html {
    let BookingFormProps { section, popup, phone } = props;
    let services = use_services();
    let cars = use_content::<CarDocument>("car.json");
    let catalog_settled = cars.is_some();

    let schema = use_memo(
        |(fields, cars): &(Vec<String>, Option<Content<CarDocument>>)| {
            let catalog = match cars {
                Some(Content::Available(doc)) => Some(Rc::new(doc.car_data.clone())),
                _ => None,
            };
            booking_schema(fields, catalog, Local::now().date_naive())
        },
        (section.form_fields.clone(), cars),
    );
    let rules = use_memo(|_| booking_rules(), ());

    let form = use_state(FormState::default);
    let notice = use_state(|| None::<NoticeMessage>);
    let sms_opt_in = {
        let consents = services.consents();
        use_state(move || consents.sms_opt_in())
    };
    let pending_draft = use_state(|| None::<FormValues>);
    let machine = use_review_flow(services.submitter.clone());

    // Give the form a moment to settle before pre-filling it from a saved draft.
    {
        let pending_draft = pending_draft.clone();
        let drafts = services.drafts();
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(DRAFT_RESTORE_DELAY_MS, move || {
                    if let Some(draft) = drafts.load() {
                        pending_draft.set(Some(draft));
                    }
                });
                move || drop(timeout)
            },
            (),
        );
    }

    {
        let form = form.clone();
        let notice = notice.clone();
        let pending = pending_draft.clone();
        let schema = schema.clone();
        use_effect_with_deps(
            move |(draft, catalog_settled): &(Option<FormValues>, bool)| {
                if let Some(draft) = draft {
                    if *catalog_settled {
                        if let Some(prefill) = draft_prefill(draft, &schema, *catalog_settled) {
                            let mut values = form.values.clone();
                            for (name, value) in prefill.iter() {
                                values.set(name, value);
                            }
                            form.set(FormState::with_values(values));
                            info!("Restored booking draft ({} fields)", prefill.iter().count());
                            notice.set(Some(
                                NoticeMessage::new(NoticeKind::Info, "We restored the details you entered last time.")
                                    .dismiss_after(SUCCESS_BANNER_MS),
                            ));
                        }
                        pending.set(None);
                    }
                }
                || ()
            },
            ((*pending_draft).clone(), catalog_settled),
        );
    }

    {
        let notice = notice.clone();
        let services = services.clone();
        use_effect_with_deps(
            move |success| {
                if success.is_some() {
                    notice.set(complete_booking(&services, Utc::now()));
                }
                || ()
            },
            machine.last_success(),
        );
    }

    // The form empties once the thank-you view is closed.
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
        let sms_opt_in = sms_opt_in.clone();
        let notice = notice.clone();
        let services = services.clone();
        Callback::from(move |(name, value): (String, String)| {
            if name == SMS_OPT_IN_FIELD {
                let opted_in = !value.is_empty();
                sms_opt_in.set(opted_in);
                let outcome = services.communication.record_sms_opt_in(&services.consents(), opted_in);
                notice.set(side_channel_notice(outcome));
                return;
            }
            let next = form.edit(&schema, &rules, &name, &value);
            services.drafts().autosave(&next.values);
            form.set(next);
        })
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
        let binding = services.bindings.get(FormKind::Booking).clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if machine.is_open() {
                return;
            }
            let (checked, first_invalid) = form.check(&schema, &rules);
            let snapshot = checked.values.non_empty();
            form.set(checked);
            if let Some(name) = first_invalid {
                notice.set(Some(
                    NoticeMessage::new(NoticeKind::Error, "Please correct the errors above").dismiss_after(ERROR_BANNER_MS),
                ));
                focus_field(&field_id(&name));
                return;
            }
            notice.set(None);
            machine.dispatch(ReviewAction::Open(ReviewState {
                kind: FormKind::Booking,
                binding: binding.clone(),
                snapshot,
            }));
        })
    };

    let on_edit = {
        let form = form.clone();
        let schema = schema.clone();
        Callback::from(move |snapshot: FormValues| {
            form.set(form.restore(&snapshot));
            if let Some(first) = schema.fields().first() {
                focus_field(&field_id(&first.name));
            }
        })
    };

    let emergency_call = {
        let notice = notice.clone();
        let communication = services.communication.clone();
        Callback::from(move |_: MouseEvent| {
            notice.set(side_channel_notice(communication.initiate_call(CallKind::Emergency)));
        })
    };

    let dismiss_notice = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    let render_field = |field: &FormField| -> Html {
        let value = if field.name == SMS_OPT_IN_FIELD {
            let checked = if *sms_opt_in { "on" } else { "" };
            checked.to_string()
        } else {
            form.values.get(&field.name).to_string()
        };
        html! {
            <FieldView
                key={field.name.clone()}
                field={field.clone()}
                id={field_id(&field.name)}
                {value}
                options={schema.select_options(field, &form.values)}
                disabled={schema.is_disabled(field, &form.values)}
                required={schema.is_required(&field.name, &form.values)}
                status={form.statuses.class(&field.name)}
                error={form.error(&field.name)}
                on_change={on_change.clone()}
                on_blur={on_blur.clone()}
            />
        }
    };
    let group = |group: FieldGroup| -> Html {
        schema
            .visible_fields(&form.values)
            .filter(|f| f.group == group)
            .map(|f| render_field(f))
            .collect::<Html>()
    };
    let mobile_details = schema.visible_fields(&form.values).any(|f| f.group == FieldGroup::Location);

    html! {
        <section id="booking" class="booking-section">
            <div class="container">
                <h2 class="section-title">{ &section.title }</h2>
                if let Some(message) = (*notice).clone() {
                    <Notice {message} on_dismiss={dismiss_notice} />
                }
                <form class="booking-form" novalidate=true {onsubmit}>
                    <div class="form-grid">{ group(FieldGroup::Main) }</div>
                    <div class="form-grid schedule">{ group(FieldGroup::Schedule) }</div>
                    if mobile_details {
                        <div class="mobile-service-details">
                            <h4>{ "Service Location" }</h4>
                            <div class="form-grid">{ group(FieldGroup::Location) }</div>
                        </div>
                    }
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary" disabled={machine.is_open()}>
                            { "Book Service" }
                        </button>
                        <button type="button" class="btn btn-emergency" onclick={emergency_call}>
                            { "Emergency? Call Now" }
                        </button>
                        <a class="call-link" href={format!("tel:{}", phone)}>{ phone }</a>
                    </div>
                </form>
            </div>
            <ReviewPopup
                machine={machine.clone()}
                copy={popup.clone()}
                phone={phone.clone()}
                order={schema.names()}
                {on_edit}
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormBindings, BOOKING_STATS_KEY, DRAFT_STORAGE_KEY};
    use crate::content::models::CarCatalog;
    use crate::network::side_channel::CommunicationService;
    use crate::storage::consent::BookingStats;
    use crate::storage::store::{read_json, KeyValueStore, MemoryStore};
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashMap;

    fn logical() -> Vec<String> {
        ["name", "phone", "car make/model", "service needed"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn catalog() -> Rc<CarCatalog> {
        let models: HashMap<String, Vec<String>> =
            [("Toyota".to_string(), vec!["Camry".to_string(), "RAV4".to_string()])].into_iter().collect();
        Rc::new(CarCatalog {
            makes: vec!["Toyota".to_string()],
            models,
            years: vec!["2019".to_string()],
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
    }

    #[test]
    fn draft_waits_for_the_car_catalog() {
        let draft: FormValues = [("name", "Jo"), ("car-make", "Toyota"), ("car-model", "RAV4"), ("car-year", "2019")]
            .into_iter()
            .collect();

        let loading = booking_schema(&logical(), None, today());
        assert_eq!(draft_prefill(&draft, &loading, false), None);

        let loaded = booking_schema(&logical(), Some(catalog()), today());
        let prefill = draft_prefill(&draft, &loaded, true).unwrap();
        assert_eq!(prefill.get("name"), "Jo");
        assert_eq!(prefill.get("car-make"), "Toyota");
        assert_eq!(prefill.get("car-model"), "RAV4");
        assert_eq!(prefill.get("car-year"), "2019");
    }

    #[test]
    fn fields_the_form_lacks_are_not_prefilled() {
        let schema = booking_schema(&logical(), Some(catalog()), today());
        let draft: FormValues = [("email", "jo@example.com")].into_iter().collect();
        assert_eq!(draft_prefill(&draft, &schema, true), None);
    }

    #[test]
    fn completed_booking_clears_draft_and_counts() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::default());
        let services = Services::new(store.clone(), CommunicationService::disabled(), FormBindings::default());
        services.drafts().autosave(&[("name", "Jo Smith"), ("phone", "(404) 555-0134")].into_iter().collect());
        assert!(store.get(DRAFT_STORAGE_KEY).unwrap().is_some());

        let now = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        let notice = complete_booking(&services, now).unwrap();

        assert!(store.get(DRAFT_STORAGE_KEY).unwrap().is_none());
        let stats: BookingStats = read_json(store.as_ref(), BOOKING_STATS_KEY).unwrap().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.last_submission, Some(now));
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.text.contains("email confirmations"));

        complete_booking(&services, now);
        let stats: BookingStats = read_json(store.as_ref(), BOOKING_STATS_KEY).unwrap().unwrap();
        assert_eq!(stats.total, 2);
    }
}
