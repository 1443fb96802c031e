//! Generic CRUD service over one backend resource

use super::{ApiClient, Entity, Record};
use campusdesk_core::{not_found_error, CampusError, CampusResult};
use reqwest::Method;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// List/get/create/update/delete for the resource behind `E`
pub struct EntityService<E> {
    client: Arc<ApiClient>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", E::RESOURCE, urlencoding::encode(id))
    }

    pub async fn list(&self, token: Option<&str>) -> CampusResult<Vec<Record<E>>> {
        let request = self.client.request(Method::GET, E::RESOURCE, token);
        let records: Vec<Record<E>> = self
            .client
            .execute(request, &format!("list {}", E::RESOURCE))
            .await?
            .unwrap_or_default();

        debug!(resource = E::RESOURCE, count = records.len(), "Listed records");
        Ok(records)
    }

    pub async fn get(&self, token: Option<&str>, id: &str) -> CampusResult<Record<E>> {
        let request = self
            .client
            .request(Method::GET, &Self::item_path(id), token);
        self.client
            .execute(request, &format!("get {}", E::RESOURCE))
            .await?
            .ok_or_else(|| not_found_error!(format!("{}/{}", E::RESOURCE, id), "entity_service"))
    }

    /// Validates `fields` first; an invalid form never reaches the backend
    pub async fn create(&self, token: Option<&str>, fields: &E) -> CampusResult<Record<E>> {
        fields.ensure_valid("entity_service")?;

        let request = self
            .client
            .request(Method::POST, E::RESOURCE, token)
            .json(fields);
        let record: Option<Record<E>> = self
            .client
            .execute(request, &format!("create {}", E::RESOURCE))
            .await?;

        let record = record.ok_or_else(|| {
            CampusError::api(
                format!("{} was created but the backend returned no record", E::LABEL),
                None,
                "entity_service",
            )
        })?;
        info!(resource = E::RESOURCE, id = %record.id, "Created record");
        Ok(record)
    }

    /// Validates `fields` first; an invalid form never reaches the backend
    pub async fn update(
        &self,
        token: Option<&str>,
        id: &str,
        fields: &E,
    ) -> CampusResult<Record<E>> {
        fields.ensure_valid("entity_service")?;

        let request = self
            .client
            .request(Method::PUT, &Self::item_path(id), token)
            .json(fields);
        let record: Option<Record<E>> = self
            .client
            .execute(request, &format!("update {}", E::RESOURCE))
            .await?;

        info!(resource = E::RESOURCE, id, "Updated record");
        Ok(record.unwrap_or_else(|| Record {
            id: id.to_string(),
            fields: fields.clone(),
        }))
    }

    pub async fn delete(&self, token: Option<&str>, id: &str) -> CampusResult<()> {
        let request = self
            .client
            .request(Method::DELETE, &Self::item_path(id), token);
        self.client
            .execute::<serde_json::Value>(request, &format!("delete {}", E::RESOURCE))
            .await?;

        info!(resource = E::RESOURCE, id, "Deleted record");
        Ok(())
    }
}
