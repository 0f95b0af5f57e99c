use std::future::Future;

use futures::future::{select, Either, LocalBoxFuture};
use futures::pin_mut;
use gloo_net::http::Request;
use thiserror::Error;

use crate::forms::submission::FormSubmission;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Submission failed (HTTP {0})")]
    Status(u16),
    #[error("The submission is taking longer than expected. Please check your internet connection and try again.")]
    Timeout,
    #[error("Could not prepare the form: {0}")]
    Encode(String),
}

/// A hosted form-processing endpoint. Any 2xx response is a success.
pub trait FormEndpoint {
    fn post(&self, endpoint: &str, submission: &FormSubmission) -> LocalBoxFuture<'static, Result<(), SubmitError>>;
}

pub struct FormspreeClient;

impl FormEndpoint for FormspreeClient {
    fn post(&self, endpoint: &str, submission: &FormSubmission) -> LocalBoxFuture<'static, Result<(), SubmitError>> {
        let request = Request::post(endpoint)
            .header("Accept", "application/json")
            .json(submission)
            .map_err(|e| SubmitError::Encode(e.to_string()));

        Box::pin(async move {
            let response = request?
                .send()
                .await
                .map_err(|e| SubmitError::Network(e.to_string()))?;
            if response.ok() {
                Ok(())
            } else {
                Err(SubmitError::Status(response.status()))
            }
        })
    }
}

/// Races a request against a timer. If the timer wins the request is dropped
/// and whatever it would have returned is never observed.
pub async fn with_timeout<R, T>(request: R, timer: T) -> Result<(), SubmitError>
where
    R: Future<Output = Result<(), SubmitError>>,
    T: Future<Output = ()>,
{
    pin_mut!(request);
    pin_mut!(timer);
    match select(request, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(SubmitError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{pending, ready};

    #[test]
    fn unanswered_request_times_out() {
        let outcome = block_on(with_timeout(pending(), ready(())));
        assert_eq!(outcome, Err(SubmitError::Timeout));
    }

    #[test]
    fn answer_before_deadline_wins() {
        let outcome = block_on(with_timeout(ready(Ok(())), pending()));
        assert_eq!(outcome, Ok(()));

        let outcome = block_on(with_timeout(ready(Err(SubmitError::Status(422))), pending()));
        assert_eq!(outcome, Err(SubmitError::Status(422)));
    }

    #[test]
    fn timeout_has_its_own_message() {
        let message = SubmitError::Timeout.to_string();
        assert!(message.contains("longer than expected"));
        assert_ne!(message, SubmitError::Network("offline".to_string()).to_string());
    }
}
