//! Entity tracking and teardown across authors and books


use anyhow::Result;
use crudcheck_config::HarnessConfig;
use crudcheck_harness::{
    AuthorRequest, BookRequest, EntityId, EntityTracker, TestContext, TrackerState,
};
use fake_backend::{init_logging, FakeBackend};

const AUTHORS: &str = "/api/authors";
const BOOKS: &str = "/api/books";

#[tokio::test]
async fn test_teardown_removes_authors_and_books() -> Result<()> {
    init_logging();
    let backend = FakeBackend::start().await?;
    let mut ctx = TestContext::new(backend.config())?;
    let authors = ctx.authors();
    let books = ctx.books();

    let author = authors
        .create_and_track(&AuthorRequest::new("Ursula"), AUTHORS, 201, ctx.tracker_mut())
        .await?;
    let author_id = author.id.expect("author id");

    let book = books
        .create_and_track(
            &BookRequest::new("The Dispossessed")
                .isbn("978-0-06-051275-0")
                .publication_year(1974)
                .author_id(author_id),
            BOOKS,
            201,
            ctx.tracker_mut(),
        )
        .await?;
    assert_eq!(book.author_id, Some(author_id));
    assert_eq!(book.publication_year, Some(1974));

    // Same numeric id in two collections is tracked twice
    assert_eq!(author.id, book.id);
    assert_eq!(ctx.tracker().len(), 2);
    assert_eq!(backend.count("authors"), 1);
    assert_eq!(backend.count("books"), 1);

    let report = ctx.teardown().await;
    assert_eq!(report.attempted(), 2);
    assert!(report.is_clean());
    assert_eq!(backend.count("authors"), 0);
    assert_eq!(backend.count("books"), 0);
    assert_eq!(ctx.tracker().state(), TrackerState::Empty);

    let again = ctx.teardown().await;
    assert!(again.is_noop());
    Ok(())
}

#[tokio::test]
async fn test_cleanup_tolerates_already_deleted_entities() -> Result<()> {
    init_logging();
    let backend = FakeBackend::start().await?;
    let ctx = TestContext::new(backend.config())?;
    let authors = ctx.authors();
    let mut tracker = EntityTracker::new();

    let mut ids = Vec::new();
    for name in ["Le Guin", "Butler", "Delany"] {
        let author = authors
            .create_and_track(&AuthorRequest::new(name), AUTHORS, 201, &mut tracker)
            .await?;
        ids.push(author.id.map(EntityId::from).expect("id"));
    }

    // Removed behind the tracker's back; its cleanup delete will answer 404
    authors.delete_and_validate(&ids[1], AUTHORS, 200).await?;

    let report = authors.cleanup(&mut tracker).await;
    assert_eq!(report.attempted(), 3);
    assert!(report.is_clean());
    assert!(tracker.is_empty());
    assert_eq!(backend.count("authors"), 0);

    assert!(authors.cleanup(&mut tracker).await.is_noop());
    Ok(())
}

#[tokio::test]
async fn test_cleanup_continues_after_transport_failures() -> Result<()> {
    init_logging();
    let backend = FakeBackend::start().await?;
    let mut ctx = TestContext::new(backend.config())?;
    let authors = ctx.authors();

    let author = authors
        .create_and_track(&AuthorRequest::new("Tiptree"), AUTHORS, 201, ctx.tracker_mut())
        .await?;

    // An absolute URL pointing at a closed port makes this delete fail at the transport
    ctx.tracker_mut()
        .track(1, "http://127.0.0.1:9/api/authors/{id}");

    let report = ctx.teardown().await;
    assert_eq!(report.attempted(), 2);
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.deleted[0].id, EntityId::from(author.id.expect("id")));
    assert!(report.failed[0].0.endpoint.starts_with("http://127.0.0.1:9"));
    assert!(ctx.tracker().is_empty());
    assert_eq!(backend.count("authors"), 0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_on_cleanup_is_reported() -> Result<()> {
    init_logging();
    let backend = FakeBackend::start().await?;
    let mut ctx = TestContext::new(backend.config())?;
    let authors = ctx.authors();

    let stuck = authors
        .create_and_track(&AuthorRequest::new("Stuck"), AUTHORS, 201, ctx.tracker_mut())
        .await?;
    authors
        .create_and_track(&AuthorRequest::new("Free"), AUTHORS, 201, ctx.tracker_mut())
        .await?;
    let stuck_id = stuck.id.expect("id");
    backend.lock_record("authors", stuck_id);

    let report = ctx.teardown().await;
    assert_eq!(report.attempted(), 2);
    assert!(!report.is_clean());
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.id, EntityId::from(stuck_id));
    assert!(report.failed[0].1.contains("500"));

    // The leaked record is still on the backend; the tracker is drained anyway
    assert!(backend.contains("authors", stuck_id));
    assert_eq!(backend.count("authors"), 1);
    assert!(ctx.tracker().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_disabled_cleanup_leaves_entities() -> Result<()> {
    init_logging();
    let backend = FakeBackend::start().await?;
    let mut config: HarnessConfig = backend.config();
    config.cleanup.enabled = false;
    let mut ctx = TestContext::new(config)?;

    ctx.authors()
        .create_and_track(&AuthorRequest::new("Kept"), AUTHORS, 201, ctx.tracker_mut())
        .await?;

    assert!(ctx.teardown().await.is_noop());
    assert_eq!(ctx.tracker().len(), 1);
    assert_eq!(backend.count("authors"), 1);
    Ok(())
}
