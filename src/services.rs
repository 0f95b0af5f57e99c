use std::rc::Rc;

use log::warn;
use yew::prelude::*;

use crate::config::FormBindings;
use crate::network::side_channel::CommunicationService;
use crate::network::submitter::{FormEndpoint, FormspreeClient};
use crate::storage::consent::ConsentStore;
use crate::storage::draft::DraftStore;
use crate::storage::store::{BrowserStorage, KeyValueStore, MemoryStore};

/// Collaborators shared by every form, provided once by `App`.
#[derive(Clone)]
pub struct Services {
    pub store: Rc<dyn KeyValueStore>,
    pub submitter: Rc<dyn FormEndpoint>,
    pub communication: Rc<CommunicationService>,
    pub bindings: Rc<FormBindings>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
            && Rc::ptr_eq(&self.submitter, &other.submitter)
            && Rc::ptr_eq(&self.communication, &other.communication)
            && Rc::ptr_eq(&self.bindings, &other.bindings)
    }
}

impl Services {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        communication: CommunicationService,
        bindings: FormBindings,
    ) -> Self {
        Self {
            store,
            submitter: Rc::new(FormspreeClient),
            communication: Rc::new(communication),
            bindings: Rc::new(bindings),
        }
    }

    pub fn drafts(&self) -> DraftStore {
        DraftStore::new(self.store.clone())
    }

    pub fn consents(&self) -> ConsentStore {
        ConsentStore::new(self.store.clone())
    }
}

/// localStorage when the browser allows it, otherwise an in-memory store so
/// forms keep working without persistence.
pub fn open_store() -> Rc<dyn KeyValueStore> {
    match BrowserStorage::new() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            warn!("{}; drafts and preferences will not be kept", e);
            Rc::new(MemoryStore::default())
        }
    }
}

/// The `Services` provided by `App`. Outside a provider the forms still work,
/// unbound to any remote configuration.
#[hook]
pub fn use_services() -> Services {
    use_context::<Services>().unwrap_or_else(|| {
        warn!("No services provider; using defaults");
        Services::new(open_store(), CommunicationService::disabled(), FormBindings::default())
    })
}
