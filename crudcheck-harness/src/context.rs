//! Per-test bundle of transport, validator and tracker

use crate::endpoint::{delete_tracked, CrudEndpoint};
use crate::entities::{author_descriptor, book_descriptor, Author, AuthorRequest, Book, BookRequest};
use crate::entity::{Entity, EntityDescriptor};
use crate::error::HarnessResult;
use crate::tracker::{CleanupReport, EntityTracker};
use crudcheck_config::HarnessConfig;
use crudcheck_http::{DiagnosticSink, ReqwestTransport, Transport};
use crudcheck_schema::SchemaValidator;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Header carrying the context's run id on every request
pub const RUN_ID_HEADER: &str = "X-Test-Run-Id";

/// Everything one test needs, owned by that test alone
///
/// Contexts never share a transport, tracker or diagnostic sink, so tests
/// running in parallel each get their own last-request diagnostics and
/// their own cleanup.
pub struct TestContext {
    run_id: Uuid,
    config: HarnessConfig,
    transport: Arc<dyn Transport>,
    validator: Arc<SchemaValidator>,
    tracker: EntityTracker,
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("run_id", &self.run_id)
            .field("base_url", &self.config.http.base_url)
            .field("validator", &self.validator)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

impl TestContext {
    /// Context talking to the configured backend over HTTP
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate_all()?;

        let run_id = Uuid::new_v4();
        let mut http = config.http.clone();
        http.default_headers
            .insert(RUN_ID_HEADER.to_string(), run_id.to_string());

        let diagnostics = DiagnosticSink::with_capacity(config.cleanup.diagnostic_history);
        let transport = ReqwestTransport::with_diagnostics(&http, diagnostics)?;
        let validator = SchemaValidator::from_config(&config.schemas);
        debug!(
            "Created test context {} for {} with schemas from {}",
            run_id,
            config.http.base_url,
            config.schemas.root.display()
        );

        Ok(Self {
            run_id,
            config,
            transport: Arc::new(transport),
            validator: Arc::new(validator),
            tracker: EntityTracker::new(),
        })
    }

    /// Context over an injected transport and validator
    pub fn with_transport(
        config: HarnessConfig,
        transport: Arc<dyn Transport>,
        validator: Arc<SchemaValidator>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
            transport,
            validator,
            tracker: EntityTracker::new(),
        }
    }

    /// Id sent as [`RUN_ID_HEADER`] so backend logs can be matched to a test
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Endpoint for any entity type sharing this context's transport
    pub fn endpoint<T, R>(&self, descriptor: EntityDescriptor) -> CrudEndpoint<T, R>
    where
        T: Entity,
        R: Serialize + Clone + Send + Sync + 'static,
    {
        CrudEndpoint::new(self.transport.clone(), self.validator.clone(), descriptor)
    }

    pub fn authors(&self) -> CrudEndpoint<Author, AuthorRequest> {
        self.endpoint(
            author_descriptor().with_delete_confirmation(&self.config.cleanup.delete_confirmation),
        )
    }

    pub fn books(&self) -> CrudEndpoint<Book, BookRequest> {
        self.endpoint(
            book_descriptor().with_delete_confirmation(&self.config.cleanup.delete_confirmation),
        )
    }

    pub fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut EntityTracker {
        &mut self.tracker
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        self.transport.diagnostics()
    }

    /// Delete every tracked entity
    ///
    /// With cleanup disabled the tracked set is kept and an empty report is
    /// returned.
    pub async fn teardown(&mut self) -> CleanupReport {
        if !self.config.cleanup.enabled {
            if !self.tracker.is_empty() {
                warn!(
                    "Cleanup disabled, leaving {} tracked entities in place",
                    self.tracker.len()
                );
            }
            return CleanupReport::default();
        }

        let transport = self.transport.as_ref();
        let report = self
            .tracker
            .cleanup(|entity| async move { delete_tracked(transport, &entity).await.map(|_| ()) })
            .await;

        if !report.is_noop() {
            info!(
                "Teardown removed {} entities, {} failed",
                report.deleted.len(),
                report.failed.len()
            );
        }
        report
    }
}
