use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::models::{Applicant, Application, JobPosting};
use crate::store::{DocumentStore, StoreError};

/// Fetches and decodes one record type from one collection.
///
/// A missing document is `Ok(None)`; only an unreachable store or a
/// document that cannot be decoded is an error.
pub struct RecordLoader<T> {
    store: Arc<dyn DocumentStore>,
    collection: String,
    _record: PhantomData<fn() -> T>,
}

pub type ApplicationLoader = RecordLoader<Application>;
pub type JobLoader = RecordLoader<JobPosting>;
pub type ApplicantLoader = RecordLoader<Applicant>;

impl<T> Clone for RecordLoader<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection: self.collection.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> RecordLoader<T> {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            _record: PhantomData,
        }
    }

    pub async fn fetch(&self, id: &str) -> Result<Option<T>, StoreError> {
        let doc = self.store.get_document(&self.collection, id).await?;
        doc.map(|d| d.decode::<T>()).transpose()
    }
}
