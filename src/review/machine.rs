use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use yew::prelude::*;

use crate::config::{FormBinding, FormKind};
use crate::forms::format::{review_value, title_case_words};
use crate::forms::submission::FormValues;
use crate::network::submitter::SubmitError;

/// Submission metadata that is posted but never shown for review.
const HIDDEN_KEYS: &[&str] = &["form_type", "timestamp", "source"];

/// What is under review: the originating form, where it posts, and the
/// values captured when it was submitted.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewState {
    pub kind: FormKind,
    pub binding: FormBinding,
    pub snapshot: FormValues,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReviewPhase {
    Closed,
    Reviewing,
    Submitting { attempt: u32 },
    Succeeded,
    Failed { error: SubmitError },
}

pub enum ReviewAction {
    Open(ReviewState),
    Confirm,
    Resolve { attempt: u32, outcome: Result<(), SubmitError> },
    GoBack,
    Dismiss,
    CloseSuccess,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewMachine {
    phase: ReviewPhase,
    review: Option<ReviewState>,
    next_attempt: u32,
    last_success: Option<u32>,
    closed_success: Option<u32>,
}

impl Default for ReviewMachine {
    fn default() -> Self {
        Self { phase: ReviewPhase::Closed, review: None, next_attempt: 0, last_success: None, closed_success: None }
    }
}

impl ReviewMachine {
    pub fn phase(&self) -> &ReviewPhase {
        &self.phase
    }

    pub fn review(&self) -> Option<&ReviewState> {
        self.review.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.phase != ReviewPhase::Closed
    }

    pub fn submitting_attempt(&self) -> Option<u32> {
        match self.phase {
            ReviewPhase::Submitting { attempt } => Some(attempt),
            _ => None,
        }
    }

    /// Attempt id of the most recent successful submission.
    pub fn last_success(&self) -> Option<u32> {
        self.last_success
    }

    /// Attempt id of the most recent success whose thank-you view was closed.
    pub fn closed_success(&self) -> Option<u32> {
        self.closed_success
    }

    /// Applies an action in place. Returns false when the action is not
    /// valid in the current phase and nothing changed.
    pub fn apply(&mut self, action: ReviewAction) -> bool {
        match (action, &self.phase) {
            (ReviewAction::Open(review), ReviewPhase::Closed) => {
                self.review = Some(review);
                self.phase = ReviewPhase::Reviewing;
            }
            (ReviewAction::Confirm, ReviewPhase::Reviewing | ReviewPhase::Failed { .. }) => {
                self.phase = ReviewPhase::Submitting { attempt: self.next_attempt };
                self.next_attempt += 1;
            }
            (ReviewAction::Resolve { attempt, outcome }, ReviewPhase::Submitting { attempt: current })
                if attempt == *current =>
            {
                self.phase = match outcome {
                    Ok(()) => {
                        self.last_success = Some(attempt);
                        ReviewPhase::Succeeded
                    }
                    Err(error) => ReviewPhase::Failed { error },
                };
            }
            (ReviewAction::GoBack | ReviewAction::Dismiss, ReviewPhase::Reviewing | ReviewPhase::Failed { .. }) => {
                self.review = None;
                self.phase = ReviewPhase::Closed;
            }
            (ReviewAction::CloseSuccess, ReviewPhase::Succeeded) => {
                self.closed_success = self.last_success;
                self.review = None;
                self.phase = ReviewPhase::Closed;
            }
            _ => return false,
        }
        true
    }
}

impl Reducible for ReviewMachine {
    type Action = ReviewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.apply(action) {
            Rc::new(next)
        } else {
            self
        }
    }
}

/// Label/value rows for the review list, in form order, skipping empty
/// values and submission metadata.
pub fn review_items(
    snapshot: &FormValues,
    order: &[String],
    labels: &HashMap<String, String>,
) -> Vec<(String, String)> {
    let listed: HashSet<&str> = order.iter().map(String::as_str).collect();
    let extras = snapshot.iter().map(|(name, _)| name).filter(|name| !listed.contains(name));

    order
        .iter()
        .map(String::as_str)
        .chain(extras)
        .filter(|name| !HIDDEN_KEYS.contains(name))
        .filter_map(|name| {
            let value = review_value(name, snapshot.get(name))?;
            let label = labels.get(name).cloned().unwrap_or_else(|| title_case_words(name));
            Some((label, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormBindings;

    fn booking_values() -> FormValues {
        [
            ("name", "Jo Smith"),
            ("phone", "4045550134"),
            ("service-needed", "brake-service"),
            ("email", "Jo@Example.com"),
            ("additional-notes", ""),
        ]
        .into_iter()
        .collect()
    }

    fn review_state(snapshot: FormValues) -> ReviewState {
        ReviewState {
            kind: FormKind::Booking,
            binding: FormBindings::default().get(FormKind::Booking).clone(),
            snapshot,
        }
    }

    fn opened() -> ReviewMachine {
        let mut machine = ReviewMachine::default();
        assert!(machine.apply(ReviewAction::Open(review_state(booking_values()))));
        machine
    }

    #[test]
    fn success_is_reported_once_then_closed() {
        let mut machine = opened();
        assert_eq!(machine.phase(), &ReviewPhase::Reviewing);
        assert!(machine.apply(ReviewAction::Confirm));
        let attempt = machine.submitting_attempt().unwrap();
        assert!(machine.apply(ReviewAction::Resolve { attempt, outcome: Ok(()) }));
        assert_eq!(machine.phase(), &ReviewPhase::Succeeded);
        assert_eq!(machine.last_success(), Some(attempt));
        assert_eq!(machine.closed_success(), None, "form stays filled behind the thank-you view");

        assert!(machine.apply(ReviewAction::CloseSuccess));
        assert_eq!(machine.phase(), &ReviewPhase::Closed);
        assert_eq!(machine.closed_success(), Some(attempt));
        assert!(machine.review().is_none());
        assert!(!machine.apply(ReviewAction::CloseSuccess));
    }

    #[test]
    fn failure_reports_no_success_and_keeps_snapshot_until_go_back() {
        let mut machine = opened();
        machine.apply(ReviewAction::Confirm);
        let attempt = machine.submitting_attempt().unwrap();
        machine.apply(ReviewAction::Resolve { attempt, outcome: Err(SubmitError::Status(500)) });
        assert_eq!(machine.phase(), &ReviewPhase::Failed { error: SubmitError::Status(500) });
        assert_eq!(machine.last_success(), None);
        assert_eq!(machine.review().map(|r| &r.snapshot), Some(&booking_values()));

        assert!(machine.apply(ReviewAction::GoBack));
        assert_eq!(machine.phase(), &ReviewPhase::Closed);
        assert_eq!(machine.closed_success(), None);
    }

    #[test]
    fn second_confirm_while_submitting_is_rejected() {
        let mut machine = opened();
        assert!(machine.apply(ReviewAction::Confirm));
        assert!(!machine.apply(ReviewAction::Confirm));
        assert_eq!(machine.submitting_attempt(), Some(0));
    }

    #[test]
    fn retry_uses_a_fresh_attempt_and_ignores_late_results() {
        let mut machine = opened();
        machine.apply(ReviewAction::Confirm);
        machine.apply(ReviewAction::Resolve { attempt: 0, outcome: Err(SubmitError::Timeout) });
        assert_eq!(machine.phase(), &ReviewPhase::Failed { error: SubmitError::Timeout });

        assert!(machine.apply(ReviewAction::Confirm));
        assert_eq!(machine.submitting_attempt(), Some(1));

        // the first request answers after its deadline
        assert!(!machine.apply(ReviewAction::Resolve { attempt: 0, outcome: Ok(()) }));
        assert_eq!(machine.submitting_attempt(), Some(1));
        assert!(machine.apply(ReviewAction::Resolve { attempt: 1, outcome: Ok(()) }));
        assert_eq!(machine.phase(), &ReviewPhase::Succeeded);
    }

    #[test]
    fn dismiss_discards_the_snapshot_without_submitting() {
        let mut machine = opened();
        assert!(machine.apply(ReviewAction::Dismiss));
        assert_eq!(machine.phase(), &ReviewPhase::Closed);
        assert!(machine.review().is_none());
        assert!(machine.submitting_attempt().is_none());
    }

    #[test]
    fn dismiss_is_ignored_while_submitting() {
        let mut machine = opened();
        machine.apply(ReviewAction::Confirm);
        assert!(!machine.apply(ReviewAction::Dismiss));
        assert!(!machine.apply(ReviewAction::GoBack));
        assert!(machine.is_open());
    }

    #[test]
    fn open_is_ignored_while_already_open() {
        let mut machine = opened();
        assert!(!machine.apply(ReviewAction::Open(review_state(FormValues::new()))));
        assert_eq!(machine.review().unwrap().snapshot, booking_values());
    }

    #[test]
    fn reducer_returns_same_rc_for_ignored_actions() {
        let machine = Rc::new(ReviewMachine::default());
        let next = machine.clone().reduce(ReviewAction::Confirm);
        assert!(Rc::ptr_eq(&machine, &next));
    }

    #[test]
    fn review_items_format_and_skip() {
        let labels: HashMap<String, String> =
            [("name".to_string(), "Full Name".to_string())].into_iter().collect();
        let mut snapshot = booking_values();
        snapshot.set("form_type", "booking");
        snapshot.set("car-year", "2019");
        let order: Vec<String> = ["name", "phone", "email", "service-needed", "additional-notes"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let items = review_items(&snapshot, &order, &labels);
        assert_eq!(
            items,
            vec![
                ("Full Name".to_string(), "Jo Smith".to_string()),
                ("Phone".to_string(), "(404) 555-0134".to_string()),
                ("Email".to_string(), "jo@example.com".to_string()),
                ("Service Needed".to_string(), "Brake Service".to_string()),
                ("Car Year".to_string(), "2019".to_string()),
            ]
        );
    }
}
