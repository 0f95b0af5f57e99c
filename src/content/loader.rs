use gloo_net::http::Request;
use log::{info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request for {0} failed: {1}")]
    Network(&'static str, String),
    #[error("{0} returned HTTP {1}")]
    Status(&'static str, u16),
    #[error("{0} is not a valid document: {1}")]
    Decode(&'static str, String),
}

/// Outcome of loading a content document. Renderers never see a missing
/// document: `Unavailable` resolves to the built-in copy.
#[derive(Clone, Debug, PartialEq)]
pub enum Content<T> {
    Available(T),
    Unavailable,
}

impl<T: Default> Content<T> {
    pub fn resolve(self) -> T {
        match self {
            Content::Available(doc) => doc,
            Content::Unavailable => T::default(),
        }
    }
}

impl<T> Content<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Content::Available(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Content<U> {
        match self {
            Content::Available(doc) => Content::Available(f(doc)),
            Content::Unavailable => Content::Unavailable,
        }
    }
}

pub async fn fetch_document<T: DeserializeOwned>(name: &'static str) -> Result<T, ContentError> {
    let response = Request::get(&format!("{}/{}", config::get_content_base(), name))
        .send()
        .await
        .map_err(|e| ContentError::Network(name, e.to_string()))?;

    if !response.ok() {
        return Err(ContentError::Status(name, response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ContentError::Decode(name, e.to_string()))
}

/// Fetches a content document once on mount. `None` while the request is in flight.
#[hook]
pub fn use_content<T>(name: &'static str) -> Option<Content<T>>
where
    T: DeserializeOwned + Clone + 'static,
{
    let content = use_state(|| None::<Content<T>>);

    {
        let content = content.clone();
        use_effect_with_deps(move |name| {
            let name = *name;
            spawn_local(async move {
                let loaded = match fetch_document::<T>(name).await {
                    Ok(doc) => {
                        info!("Loaded {}", name);
                        Content::Available(doc)
                    }
                    Err(e) => {
                        warn!("{}; using default content", e);
                        Content::Unavailable
                    }
                };
                content.set(Some(loaded));
            });
            || ()
        }, name);
    }

    (*content).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Blurb(&'static str);

    impl Default for Blurb {
        fn default() -> Self {
            Blurb("built-in")
        }
    }

    #[test]
    fn unavailable_content_resolves_to_built_in_copy() {
        assert_eq!(Content::<Blurb>::Unavailable.resolve(), Blurb("built-in"));
        assert_eq!(Content::Available(Blurb("remote")).resolve(), Blurb("remote"));
    }

    #[test]
    fn map_keeps_the_branch() {
        let mapped = Content::Available(2).map(|n| n * 2);
        assert_eq!(mapped, Content::Available(4));
        assert!(!Content::<u8>::Unavailable.map(|n| n + 1).is_available());
    }
}
