//! List/form controllers behind the entity administration pages
//!
//! A page keeps the rows it last loaded. Backend failures become an error
//! notice and the operation is dropped; invalid forms are handed back to the
//! form with per-field messages and never reach the backend.

use crate::api::{Entity, EntityService, Record};
use crate::notifications::Notifications;
use crate::session::SessionStore;
use campusdesk_core::FieldErrors;
use tracing::{debug, warn};

/// Result of submitting a create/edit form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    Saved(Record<E>),
    /// The form was not sent; show these next to the fields
    Invalid(FieldErrors),
    /// The backend refused or could not be reached; a notice was queued
    Failed,
}

pub struct EntityPage<E: Entity> {
    service: EntityService<E>,
    items: Vec<Record<E>>,
}

impl<E: Entity> EntityPage<E> {
    pub fn new(service: EntityService<E>) -> Self {
        Self {
            service,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Record<E>] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&Record<E>> {
        self.items.iter().find(|record| record.id == id)
    }

    /// Reload the list. On failure the previous rows are kept.
    pub async fn refresh(&mut self, session: &SessionStore, notices: &mut Notifications) -> bool {
        match self.service.list(session.access_token()).await {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(e) => {
                warn!(resource = E::RESOURCE, error = %e, "Failed to load records");
                notices.error(format!("Could not load {}: {}", E::RESOURCE, e));
                false
            }
        }
    }

    /// Create (`id` is `None`) or update a record
    pub async fn submit(
        &mut self,
        session: &SessionStore,
        notices: &mut Notifications,
        id: Option<&str>,
        form: &E,
    ) -> SubmitOutcome<E> {
        let errors = form.validate();
        if !errors.is_empty() {
            debug!(resource = E::RESOURCE, fields = errors.len(), "Form rejected before submit");
            return SubmitOutcome::Invalid(errors);
        }

        let token = session.access_token();
        let result = match id {
            Some(id) => self.service.update(token, id, form).await,
            None => self.service.create(token, form).await,
        };

        match result {
            Ok(record) => {
                let verb = if id.is_some() { "updated" } else { "created" };
                notices.success(format!(
                    "{} {} {}",
                    E::LABEL,
                    record.fields.display_name(),
                    verb
                ));
                self.upsert(record.clone());
                SubmitOutcome::Saved(record)
            }
            Err(e) => {
                warn!(resource = E::RESOURCE, error = %e, "Failed to save record");
                notices.error(format!("Could not save {}: {}", E::LABEL, e));
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn remove(
        &mut self,
        session: &SessionStore,
        notices: &mut Notifications,
        id: &str,
    ) -> bool {
        match self.service.delete(session.access_token(), id).await {
            Ok(()) => {
                let name = self
                    .find(id)
                    .map(|record| record.fields.display_name())
                    .unwrap_or_else(|| id.to_string());
                self.items.retain(|record| record.id != id);
                notices.success(format!("{} {} deleted", E::LABEL, name));
                true
            }
            Err(e) => {
                warn!(resource = E::RESOURCE, id, error = %e, "Failed to delete record");
                notices.error(format!("Could not delete {}: {}", E::LABEL, e));
                false
            }
        }
    }

    fn upsert(&mut self, record: Record<E>) {
        match self.items.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => self.items.push(record),
        }
    }
}
