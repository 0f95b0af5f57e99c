use std::rc::Rc;

use chrono::Utc;
use gloo_timers::future::TimeoutFuture;
use log::{error, info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, KeyboardEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;

use super::machine::{ReviewAction, ReviewMachine, ReviewPhase};
use crate::config::SUBMIT_TIMEOUT_MS;
use crate::forms::submission::FormSubmission;
use crate::network::submitter::{with_timeout, FormEndpoint};

fn submit_attempt(machine: UseReducerHandle<ReviewMachine>, submitter: Rc<dyn FormEndpoint>, attempt: u32) {
    let Some(review) = machine.review() else {
        return;
    };
    let submission = FormSubmission::build(&review.binding, &review.snapshot, Utc::now());
    let request = submitter.post(&review.binding.endpoint, &submission);
    let tag = review.kind.tag();
    info!("Submitting {} form (attempt {})", tag, attempt);

    spawn_local(async move {
        let outcome = with_timeout(request, TimeoutFuture::new(SUBMIT_TIMEOUT_MS)).await;
        match &outcome {
            Ok(()) => info!("{} form submitted", tag),
            Err(e) => error!("{} form submission failed: {}", tag, e),
        }
        machine.dispatch(ReviewAction::Resolve { attempt, outcome });
    });
}

fn lock_body_scroll(locked: bool) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let style = body.style();
    let result = if locked {
        style.set_property("overflow", "hidden")
    } else {
        style.remove_property("overflow").map(|_| ())
    };
    if result.is_err() {
        warn!("Could not update page scroll lock");
    }
}

/// Drives one form's review popup: posts exactly once per confirmed attempt,
/// locks page scroll while the popup is open and closes it on Escape.
#[hook]
pub fn use_review_flow(submitter: Rc<dyn FormEndpoint>) -> UseReducerHandle<ReviewMachine> {
    let machine = use_reducer(ReviewMachine::default);

    {
        let attempt = machine.submitting_attempt();
        let machine = machine.clone();
        use_effect_with_deps(
            move |attempt| {
                if let Some(attempt) = *attempt {
                    submit_attempt(machine, submitter, attempt);
                }
                || ()
            },
            attempt,
        );
    }

    use_effect_with_deps(
        |open| {
            let open = *open;
            if open {
                lock_body_scroll(true);
            }
            move || {
                if open {
                    lock_body_scroll(false);
                }
            }
        },
        machine.is_open(),
    );

    {
        let machine = machine.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() != "Escape" {
                return;
            }
            match machine.phase() {
                ReviewPhase::Succeeded => machine.dispatch(ReviewAction::CloseSuccess),
                ReviewPhase::Reviewing | ReviewPhase::Failed { .. } => machine.dispatch(ReviewAction::Dismiss),
                _ => {}
            }
        });
    }

    machine
}
