use web_sys::MouseEvent;
use yew::prelude::*;

use super::machine::{review_items, ReviewAction, ReviewMachine, ReviewPhase};
use crate::content::models::FormPopupCopy;
use crate::forms::submission::FormValues;

#[derive(Properties, PartialEq)]
pub struct ReviewPopupProps {
    pub machine: UseReducerHandle<ReviewMachine>,
    pub copy: FormPopupCopy,
    pub phone: String,
    /// Field names in form order, used to order the review list.
    pub order: Vec<String>,
    /// Called with the reviewed values when the user goes back to edit them.
    pub on_edit: Callback<FormValues>,
}

#[function_component]
pub fn ReviewPopup(props: &ReviewPopupProps) -> Html {
    let ReviewPopupProps { machine, copy, phone, order, on_edit } = props;

    let Some(review) = machine.review() else {
        return html! {};
    };
    let kind = review.kind;

    let dispatch = |action: fn() -> ReviewAction| {
        let machine = machine.clone();
        Callback::from(move |_: MouseEvent| machine.dispatch(action()))
    };

    let go_back = {
        let machine = machine.clone();
        let on_edit = on_edit.clone();
        let snapshot = review.snapshot.clone();
        Callback::from(move |_: MouseEvent| {
            machine.dispatch(ReviewAction::GoBack);
            on_edit.emit(snapshot.clone());
        })
    };

    let close = match machine.phase() {
        ReviewPhase::Succeeded => Some(dispatch(|| ReviewAction::CloseSuccess)),
        ReviewPhase::Reviewing | ReviewPhase::Failed { .. } => Some(dispatch(|| ReviewAction::Dismiss)),
        _ => None,
    };

    let stop_propagation = Callback::from(|e: MouseEvent| e.stop_propagation());

    let (title, body) = match machine.phase() {
        ReviewPhase::Closed => return html! {},
        ReviewPhase::Reviewing => {
            let items = review_items(&review.snapshot, order, &copy.field_labels);
            (
                copy.titles.review.clone(),
                html! {
                    <>
                        <h4 class="review-subtitle">{ copy.messages.review.for_kind(kind) }</h4>
                        <dl class="review-list">
                            { for items.into_iter().map(|(label, value)| html! {
                                <div class="review-item">
                                    <dt>{ label }</dt>
                                    <dd>{ value }</dd>
                                </div>
                            }) }
                        </dl>
                        <div class="popup-actions">
                            <button type="button" class="btn btn-secondary" onclick={go_back.clone()}>
                                { &copy.buttons.update }
                            </button>
                            <button type="button" class="btn btn-primary" onclick={dispatch(|| ReviewAction::Confirm)}>
                                { &copy.buttons.confirm }
                            </button>
                        </div>
                    </>
                },
            )
        }
        ReviewPhase::Submitting { .. } => (
            copy.titles.review.clone(),
            html! {
                <div class="popup-loading">
                    <div class="spinner" aria-hidden="true"></div>
                    <p>{ copy.messages.loading.for_kind(kind) }</p>
                    <div class="popup-actions">
                        <button type="button" class="btn btn-primary" disabled=true>
                            { &copy.buttons.confirm }
                        </button>
                    </div>
                </div>
            },
        ),
        ReviewPhase::Succeeded => (
            copy.titles.success.clone(),
            html! {
                <div class="popup-success">
                    <h4>{ &copy.messages.success.title }</h4>
                    <p>{ copy.messages.success.per_form.for_kind(kind) }</p>
                    <div class="next-steps">
                        <h5>{ &copy.next_steps.title }</h5>
                        <ul>
                            { for copy.next_steps.steps.iter().map(|step| html! { <li>{ step }</li> }) }
                        </ul>
                    </div>
                    <div class="popup-actions">
                        <button type="button" class="btn btn-primary" onclick={dispatch(|| ReviewAction::CloseSuccess)}>
                            { &copy.buttons.close }
                        </button>
                    </div>
                </div>
            },
        ),
        ReviewPhase::Failed { error } => (
            copy.titles.error.clone(),
            html! {
                <div class="popup-error">
                    <h4>{ &copy.messages.error.title }</h4>
                    <p>{ &copy.messages.error.message }</p>
                    <p class="error-detail">{ error.to_string() }</p>
                    <p>
                        { &copy.messages.error.contact_info }{ " " }
                        <a href={format!("tel:{}", phone)}>{ phone }</a>
                    </p>
                    <div class="popup-actions">
                        <button type="button" class="btn btn-secondary" onclick={go_back}>
                            { &copy.buttons.go_back }
                        </button>
                        <button type="button" class="btn btn-primary" onclick={dispatch(|| ReviewAction::Confirm)}>
                            { &copy.buttons.try_again }
                        </button>
                    </div>
                </div>
            },
        ),
    };

    html! {
        <div class="form-popup-overlay" onclick={close.clone()}>
            <div class="form-popup" role="dialog" aria-modal="true" onclick={stop_propagation}>
                <div class="form-popup-header">
                    <h3>{ title }</h3>
                    if let Some(close) = close {
                        <button type="button" class="popup-close" aria-label="Close" onclick={close}>{ "×" }</button>
                    }
                </div>
                <div class="form-popup-body">{ body }</div>
            </div>
        </div>
    }
}
