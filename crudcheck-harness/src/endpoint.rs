//! Generic typed CRUD endpoint
//!
//! One [`CrudEndpoint`] serves every entity type: the entity-specific parts
//! (schema paths, naming, delete confirmation) come from an
//! [`EntityDescriptor`], and the decode shape is chosen explicitly per call.

use crate::entity::{item_template, Entity, EntityDescriptor};
use crate::error::{HarnessError, HarnessResult};
use crate::shape::{ErrorShape, ItemShape, PageShape, ResponseShape, VoidShape};
use crate::tracker::{CleanupReport, EntityTracker, TrackedEntity};
use crudcheck_api_types::{EntityId, Envelope, Page, PageQuery, Void};
use crudcheck_http::{RawResponse, RequestBuilder, Transport};
use crudcheck_schema::SchemaValidator;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CRUD operations for entity `T` created and updated from request body `R`
pub struct CrudEndpoint<T, R> {
    transport: Arc<dyn Transport>,
    validator: Arc<SchemaValidator>,
    descriptor: EntityDescriptor,
    _types: PhantomData<fn(R) -> T>,
}

impl<T, R> Clone for CrudEndpoint<T, R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            validator: self.validator.clone(),
            descriptor: self.descriptor.clone(),
            _types: PhantomData,
        }
    }
}

impl<T, R> fmt::Debug for CrudEndpoint<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudEndpoint")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<T, R> CrudEndpoint<T, R>
where
    T: Entity,
    R: Serialize + Clone + Send + Sync + 'static,
{
    pub fn new(
        transport: Arc<dyn Transport>,
        validator: Arc<SchemaValidator>,
        descriptor: EntityDescriptor,
    ) -> Self {
        Self {
            transport,
            validator,
            descriptor,
            _types: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// POST `request` to `endpoint` and return the created entity
    pub async fn create_and_validate(
        &self,
        request: &R,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<T> {
        let builder = RequestBuilder::post(endpoint).body(request.clone());
        let response = self.send(&builder, expected_status).await?;
        let entity = self.validated_item(&response)?;
        info!("Created {} with id {:?}", self.descriptor.name, entity.id());
        Ok(entity)
    }

    /// Create an entity and register it for cleanup
    ///
    /// An entity returned without an id is not tracked.
    pub async fn create_and_track(
        &self,
        request: &R,
        endpoint: &str,
        expected_status: u16,
        tracker: &mut EntityTracker,
    ) -> HarnessResult<T> {
        let entity = self.create_and_validate(request, endpoint, expected_status).await?;
        match entity.id() {
            Some(id) => {
                tracker.track(id, item_template(endpoint));
            }
            None => warn!(
                "Created {} has no id and will not be cleaned up",
                self.descriptor.name
            ),
        }
        Ok(entity)
    }

    /// GET `{endpoint}/{id}`
    pub async fn get_by_id_and_validate(
        &self,
        id: &EntityId,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<T> {
        let builder = RequestBuilder::get(item_template(endpoint)).path_param("id", id);
        let response = self.send(&builder, expected_status).await?;
        self.validated_item(&response)
    }

    /// GET the collection with the server's default paging
    pub async fn get_all_and_validate(
        &self,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Page<T>> {
        self.get_page_and_validate(endpoint, &PageQuery::default(), expected_status)
            .await
    }

    /// GET one page of the collection
    pub async fn get_page_and_validate(
        &self,
        endpoint: &str,
        query: &PageQuery,
        expected_status: u16,
    ) -> HarnessResult<Page<T>> {
        let builder = RequestBuilder::get(endpoint).query_params(query.to_query_pairs());
        let response = self.send(&builder, expected_status).await?;
        let json = Self::parse_body(&response, "Envelope<Page<T>>")?;

        self.validator.validate_response_and_data(
            &json,
            &self.descriptor.wrapper_schema,
            Some(&self.descriptor.page_schema),
            self.descriptor.content_schema.as_deref(),
        )?;

        let page = self
            .decode(&PageShape::<T>::new(), json, &response)?
            .into_data()
            .ok_or_else(|| self.missing_data(&response))?;

        page.check_invariants()
            .map_err(|source| HarnessError::InvalidPage {
                source,
                body: response.body_text.clone(),
            })?;

        info!(
            "Fetched {} {} (page {} of {}, {} total)",
            page.len(),
            self.descriptor.name,
            page.number,
            page.total_pages,
            page.total_elements
        );
        Ok(page)
    }

    /// PUT `request` to `{endpoint}/{id}` and return the updated entity
    pub async fn update_and_validate(
        &self,
        id: &EntityId,
        request: &R,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<T> {
        let builder = RequestBuilder::put(item_template(endpoint))
            .path_param("id", id)
            .body(request.clone());
        let response = self.send(&builder, expected_status).await?;
        self.validated_item(&response)
    }

    /// DELETE `{endpoint}/{id}` and check the confirmation message
    pub async fn delete_and_validate(
        &self,
        id: &EntityId,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<Void>> {
        let builder = RequestBuilder::delete(item_template(endpoint)).path_param("id", id);
        let response = self.send(&builder, expected_status).await?;
        let json = Self::parse_body(&response, VoidShape.name())?;

        self.validator.validate_response_and_data(
            &json,
            &self.descriptor.wrapper_schema,
            None,
            None,
        )?;

        let envelope = self.decode(&VoidShape, json, &response)?;
        if !envelope.message_contains(&self.descriptor.delete_confirmation) {
            return Err(HarnessError::UnexpectedMessage {
                expected: self.descriptor.delete_confirmation.clone(),
                actual: envelope.message,
            });
        }

        info!("Deleted {} {}", self.descriptor.name, id);
        Ok(envelope)
    }

    pub async fn execute_invalid_create(
        &self,
        request: &R,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::post(endpoint).body(request.clone());
        self.send_expecting_failure(&builder, expected_status).await
    }

    /// Like [`Self::execute_invalid_create`] with an arbitrary JSON body,
    /// for payloads `R` cannot represent
    pub async fn execute_invalid_create_raw(
        &self,
        body: JsonValue,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::post(endpoint).body(body);
        self.send_expecting_failure(&builder, expected_status).await
    }

    pub async fn execute_invalid_get_by_id(
        &self,
        id: &EntityId,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::get(item_template(endpoint)).path_param("id", id);
        self.send_expecting_failure(&builder, expected_status).await
    }

    pub async fn execute_invalid_get_all(
        &self,
        endpoint: &str,
        query: &PageQuery,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::get(endpoint).query_params(query.to_query_pairs());
        self.send_expecting_failure(&builder, expected_status).await
    }

    pub async fn execute_invalid_update(
        &self,
        id: &EntityId,
        request: &R,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::put(item_template(endpoint))
            .path_param("id", id)
            .body(request.clone());
        self.send_expecting_failure(&builder, expected_status).await
    }

    pub async fn execute_invalid_delete(
        &self,
        id: &EntityId,
        endpoint: &str,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let builder = RequestBuilder::delete(item_template(endpoint)).path_param("id", id);
        self.send_expecting_failure(&builder, expected_status).await
    }

    /// Execute `builder`, assert the status and decode with an explicit shape
    ///
    /// No schema validation is applied; use this for endpoints outside the
    /// standard CRUD set.
    pub async fn execute_and_decode<S: ResponseShape>(
        &self,
        builder: &RequestBuilder,
        expected_status: u16,
        shape: &S,
    ) -> HarnessResult<S::Output> {
        let response = self.send(builder, expected_status).await?;
        shape
            .decode(&response.body_text)
            .map_err(|source| HarnessError::Decode {
                shape: shape.name(),
                source,
                body: response.body_text.clone(),
            })
    }

    /// Delete everything in `tracker` through this endpoint's transport
    pub async fn cleanup(&self, tracker: &mut EntityTracker) -> CleanupReport {
        let transport = self.transport.as_ref();
        tracker
            .cleanup(|entity| async move { delete_tracked(transport, &entity).await.map(|_| ()) })
            .await
    }

    async fn send(
        &self,
        builder: &RequestBuilder,
        expected_status: u16,
    ) -> HarnessResult<RawResponse> {
        let response = builder.execute(self.transport.as_ref()).await?;
        if response.status_code != expected_status {
            return Err(HarnessError::UnexpectedStatus {
                expected: expected_status,
                actual: response.status_code,
                body: response.body_text,
            });
        }
        Ok(response)
    }

    async fn send_expecting_failure(
        &self,
        builder: &RequestBuilder,
        expected_status: u16,
    ) -> HarnessResult<Envelope<JsonValue>> {
        let response = self.send(builder, expected_status).await?;
        let envelope = ErrorShape.decode(&response.body_text).unwrap_or_else(|_| {
            Envelope::failure(response.body_text.clone())
        });
        debug!(
            "{} negative-path call answered {}: {:?}",
            self.descriptor.name, response.status_code, envelope.message
        );
        Ok(envelope)
    }

    /// Cascade wrapper and item schemas, then decode a required entity
    fn validated_item(&self, response: &RawResponse) -> HarnessResult<T> {
        let json = Self::parse_body(response, "Envelope<T>")?;

        self.validator.validate_response_and_data(
            &json,
            &self.descriptor.wrapper_schema,
            Some(&self.descriptor.item_schema),
            None,
        )?;

        self.decode(&ItemShape::<T>::new(), json, response)?
            .into_data()
            .ok_or_else(|| self.missing_data(response))
    }

    fn parse_body(response: &RawResponse, shape: &'static str) -> HarnessResult<JsonValue> {
        response.body_json().map_err(|source| HarnessError::Decode {
            shape,
            source,
            body: response.body_text.clone(),
        })
    }

    fn decode<S: ResponseShape>(
        &self,
        shape: &S,
        json: JsonValue,
        response: &RawResponse,
    ) -> HarnessResult<S::Output> {
        shape
            .decode_value(json)
            .map_err(|source| HarnessError::Decode {
                shape: shape.name(),
                source,
                body: response.body_text.clone(),
            })
    }

    fn missing_data(&self, response: &RawResponse) -> HarnessError {
        HarnessError::MissingData {
            entity: self.descriptor.name.clone(),
            body: response.body_text.clone(),
        }
    }
}

/// Best-effort DELETE of a tracked entity
///
/// A 2xx answer or a 404 (already gone) counts as removed. Any other status
/// is reported as [`HarnessError::UnexpectedStatus`] so the entity shows up
/// in the cleanup report's failures.
pub async fn delete_tracked(
    transport: &dyn Transport,
    entity: &TrackedEntity,
) -> HarnessResult<u16> {
    let response = RequestBuilder::delete(entity.endpoint.as_str())
        .path_param("id", &entity.id)
        .execute(transport)
        .await?;

    if response.is_success() {
        debug!("Cleaned up {} with HTTP {}", entity, response.status_code);
        Ok(response.status_code)
    } else if response.status_code == 404 {
        debug!("{} was already gone", entity);
        Ok(response.status_code)
    } else {
        warn!(
            "Cleanup of {} answered HTTP {}: {}",
            entity, response.status_code, response.body_text
        );
        Err(HarnessError::UnexpectedStatus {
            expected: 200,
            actual: response.status_code,
            body: response.body_text,
        })
    }
}
