/// Database-backed lifecycle tests for presentations, slides and the
/// generation pipeline.
///
/// Requires Postgres at TEST_DATABASE_URL:
/// cargo test --test presentation_test -- --ignored

use std::time::Duration;

use serde_json::json;

use deckforge::deck::{DeckBuilder, DeckSettings};
use deckforge::errors::AppError;
use deckforge::generation::GenerationClient;
use deckforge::generation::providers::Provider;
use deckforge::images::ImageFinder;
use deckforge::models::generation_audit;
use deckforge::models::presentation::{self, CreatePresentationRequest, NewPresentation, PresentationPatch};
use deckforge::models::slide::{self, NewSlide, SlidePatch};
use deckforge::models::user;

mod common;
use common::{setup_test_db, unique_subject};

async fn create_plain(pool: &sqlx::PgPool, subject: &str, title: &str) -> presentation::Presentation {
    let owner = user::find_or_create(pool, subject).await.expect("owner");
    let new = NewPresentation {
        title: title.to_string(),
        description: None,
    };
    presentation::create_deck(pool, owner.id, &new, &[], None).await.expect("create")
}

fn titled_slide(title: &str, order: Option<i32>) -> NewSlide {
    NewSlide {
        order,
        title: Some(title.to_string()),
        ..Default::default()
    }
}

fn images() -> ImageFinder {
    ImageFinder::new(None, Duration::from_secs(1)).expect("image client")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore] // Requires running Postgres
async fn test_find_or_create_is_idempotent() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("user");

    let first = user::find_or_create(pool, &subject).await.expect("create");
    let second = user::find_or_create(pool, &subject).await.expect("find");
    assert_eq!(first.id, second.id);
    assert!(first.email.starts_with(&format!("user-{subject}-")));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_first_requests_share_one_user() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("race");

    let (a, b) = tokio::join!(user::find_or_create(pool, &subject), user::find_or_create(pool, &subject));
    assert_eq!(a.expect("a").id, b.expect("b").id);
}

// ---------------------------------------------------------------------------
// Presentations
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore]
async fn test_presentations_are_owner_scoped() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let alice = unique_subject("alice");
    let bob = unique_subject("bob");

    let deck = create_plain(pool, &alice, "Alice's deck").await;
    user::find_or_create(pool, &bob).await.expect("bob");

    assert!(matches!(
        presentation::find_by_id(pool, &bob, deck.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        presentation::delete(pool, &bob, deck.id).await,
        Err(AppError::NotFound)
    ));
    let bob_list = presentation::find_all_for_owner(pool, &bob).await.expect("list");
    assert!(bob_list.iter().all(|p| p.presentation.id != deck.id));

    let alice_list = presentation::find_all_for_owner(pool, &alice).await.expect("list");
    assert_eq!(alice_list.len(), 1);
    assert_eq!(alice_list[0].slide_count, 0);
}

#[tokio::test]
#[ignore]
async fn test_list_is_newest_update_first() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("order");

    let older = create_plain(pool, &subject, "Older").await;
    let newer = create_plain(pool, &subject, "Newer").await;
    let list = presentation::find_all_for_owner(pool, &subject).await.expect("list");
    assert_eq!(list[0].presentation.id, newer.id);

    let patch = PresentationPatch {
        title: Some("Older, touched".into()),
        ..Default::default()
    };
    presentation::update(pool, &subject, older.id, &patch).await.expect("update");
    let list = presentation::find_all_for_owner(pool, &subject).await.expect("list");
    assert_eq!(list[0].presentation.id, older.id);
}

#[tokio::test]
#[ignore]
async fn test_delete_removes_presentation_and_slides() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("delete");

    let deck = create_plain(pool, &subject, "Doomed").await;
    let created = slide::create(pool, &subject, deck.id, &titled_slide("One", None)).await.expect("slide");

    presentation::delete(pool, &subject, deck.id).await.expect("delete");
    assert!(matches!(
        presentation::find_detail(pool, &subject, deck.id).await,
        Err(AppError::NotFound)
    ));
    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM slides WHERE id = $1")
        .bind(created.id)
        .fetch_one(pool)
        .await
        .expect("count");
    assert_eq!(remaining, 0);
}

#[tokio::test]
#[ignore]
async fn test_toggling_visibility_twice_restores_it() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("public");
    let deck = create_plain(pool, &subject, "Visible").await;
    let original = deck.is_public;

    for _ in 0..2 {
        let current = presentation::find_by_id(pool, &subject, deck.id).await.expect("read");
        let patch = PresentationPatch {
            is_public: Some(!current.is_public),
            ..Default::default()
        };
        presentation::update(pool, &subject, deck.id, &patch).await.expect("toggle");
    }
    let after = presentation::find_by_id(pool, &subject, deck.id).await.expect("read");
    assert_eq!(after.is_public, original);
}

#[tokio::test]
#[ignore]
async fn test_update_rejects_blank_title_and_clears_description() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("patch");
    let deck = create_plain(pool, &subject, "Patched").await;

    let blank = PresentationPatch {
        title: Some("  ".into()),
        ..Default::default()
    };
    assert!(matches!(
        presentation::update(pool, &subject, deck.id, &blank).await,
        Err(AppError::Validation(_))
    ));

    let described = PresentationPatch {
        description: Some(Some("About tides".into())),
        ..Default::default()
    };
    let updated = presentation::update(pool, &subject, deck.id, &described).await.expect("describe");
    assert_eq!(updated.description.as_deref(), Some("About tides"));
    assert!(updated.updated_at >= deck.updated_at);

    let cleared = PresentationPatch {
        description: Some(None),
        ..Default::default()
    };
    let updated = presentation::update(pool, &subject, deck.id, &cleared).await.expect("clear");
    assert_eq!(updated.description, None);
}

#[tokio::test]
#[ignore]
async fn test_public_decks_are_viewable_by_anyone() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let owner = unique_subject("owner");
    let deck = create_plain(pool, &owner, "Shared").await;

    assert!(matches!(
        presentation::find_viewable(pool, None, deck.id).await,
        Err(AppError::NotFound)
    ));
    assert!(presentation::find_viewable(pool, Some(&owner), deck.id).await.is_ok());

    let patch = PresentationPatch {
        is_public: Some(true),
        ..Default::default()
    };
    presentation::update(pool, &owner, deck.id, &patch).await.expect("publish");
    assert!(presentation::find_viewable(pool, None, deck.id).await.is_ok());
}

// ---------------------------------------------------------------------------
// Slides
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore]
async fn test_slides_default_content_and_append_order() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("slides");
    let deck = create_plain(pool, &subject, "Slides").await;

    let first = slide::create(pool, &subject, deck.id, &titled_slide("First", None)).await.expect("first");
    let second = slide::create(pool, &subject, deck.id, &titled_slide("Second", None)).await.expect("second");
    assert_eq!(first.order, 1);
    assert_eq!(second.order, 2);
    assert_eq!(first.content, json!({}));

    // Duplicate orders are tolerated and broken by id
    let dup = slide::create(pool, &subject, deck.id, &titled_slide("Dup", Some(1))).await.expect("dup");
    let ordered: Vec<i64> = slide::find_all_for_presentation(pool, &subject, deck.id)
        .await
        .expect("list")
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ordered, vec![first.id, dup.id, second.id]);
}

#[tokio::test]
#[ignore]
async fn test_append_after_max_order_is_rejected() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("max_order");
    let deck = create_plain(pool, &subject, "Edge").await;

    let last = slide::create(pool, &subject, deck.id, &titled_slide("Last", Some(i32::MAX)))
        .await
        .expect("max order");
    assert_eq!(last.order, i32::MAX);

    assert!(matches!(
        slide::create(pool, &subject, deck.id, &NewSlide::default()).await,
        Err(AppError::Validation(_))
    ));
    let slides = slide::find_all_for_presentation(pool, &subject, deck.id).await.expect("list");
    assert_eq!(slides.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_slide_update_and_delete_are_owner_scoped() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let owner = unique_subject("slide_owner");
    let stranger = unique_subject("stranger");
    let deck = create_plain(pool, &owner, "Private").await;
    let created = slide::create(pool, &owner, deck.id, &titled_slide("Mine", None)).await.expect("slide");

    let patch = SlidePatch {
        notes: Some(Some("Remember to breathe".into())),
        ..Default::default()
    };
    assert!(matches!(
        slide::update(pool, &stranger, deck.id, created.id, &patch).await,
        Err(AppError::NotFound)
    ));
    let updated = slide::update(pool, &owner, deck.id, created.id, &patch).await.expect("update");
    assert_eq!(updated.notes.as_deref(), Some("Remember to breathe"));
    assert_eq!(updated.title.as_deref(), Some("Mine"));

    assert!(matches!(
        slide::delete(pool, &stranger, deck.id, created.id).await,
        Err(AppError::NotFound)
    ));
    slide::delete(pool, &owner, deck.id, created.id).await.expect("delete");
    assert!(matches!(
        slide::delete(pool, &owner, deck.id, created.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
#[ignore]
async fn test_reorder_renumbers_slides() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("reorder");
    let deck = create_plain(pool, &subject, "Reorder").await;

    let a = slide::create(pool, &subject, deck.id, &titled_slide("A", Some(10))).await.expect("a");
    let b = slide::create(pool, &subject, deck.id, &titled_slide("B", Some(20))).await.expect("b");
    let c = slide::create(pool, &subject, deck.id, &titled_slide("C", Some(30))).await.expect("c");

    let reordered = slide::reorder(pool, &subject, deck.id, &[c.id, a.id, b.id]).await.expect("reorder");
    let summary: Vec<(i64, i32)> = reordered.iter().map(|s| (s.id, s.order)).collect();
    assert_eq!(summary, vec![(c.id, 1), (a.id, 2), (b.id, 3)]);

    assert!(matches!(
        slide::reorder(pool, &subject, deck.id, &[c.id, a.id]).await,
        Err(AppError::Validation(_))
    ));
}

// ---------------------------------------------------------------------------
// Generation pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore]
async fn test_offline_generation_persists_deck_and_audit() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("ai");

    let generation = GenerationClient::offline();
    let images = images();
    let settings = DeckSettings {
        outline_slide_count: 3,
        max_generated_slides: 10,
    };
    let request = CreatePresentationRequest {
        title: "Cloud migration".into(),
        use_ai: true,
        topic: Some("cloud software migration".into()),
        ..Default::default()
    };
    let created = DeckBuilder::new(&generation, &images, settings)
        .create(pool, &subject, &request)
        .await
        .expect("create");

    let detail = presentation::find_detail(pool, &subject, created.id).await.expect("detail");
    assert_eq!(detail.slides.len(), 3);
    assert!(detail.slides.iter().all(|s| s.content["type"] == "fabric"));

    let audits = generation_audit::find_for_presentation(pool, created.id).await.expect("audits");
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].status, "COMPLETED");
    assert_eq!(audits[0].kind, "PRESENTATION_OUTLINE");
}

#[tokio::test]
#[ignore]
async fn test_outline_failure_stores_fallback_deck() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("fallback");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client");
    let generation = GenerationClient::with_providers(
        http,
        vec![Provider::Groq {
            api_key: "key".into(),
            base_url: "http://127.0.0.1:9".into(),
        }],
    );
    let images = images();
    let request = CreatePresentationRequest {
        title: "Tides".into(),
        use_ai: true,
        topic: Some("ocean tides".into()),
        ..Default::default()
    };
    let created = DeckBuilder::new(&generation, &images, DeckSettings::default())
        .create(pool, &subject, &request)
        .await
        .expect("create");

    let slides = slide::find_all_for_presentation(pool, &subject, created.id).await.expect("slides");
    assert_eq!(slides.len(), 4);
    let audits = generation_audit::find_for_presentation(pool, created.id).await.expect("audits");
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].status, "FAILED");
    assert!(audits[0].result.get("error").is_some());
}

#[tokio::test]
#[ignore]
async fn test_plain_create_has_no_slides_or_audit() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subject = unique_subject("plain");

    let generation = GenerationClient::offline();
    let images = images();
    let request = CreatePresentationRequest {
        title: "  Plain deck ".into(),
        topic: Some("ignored without useAI".into()),
        ..Default::default()
    };
    let created = DeckBuilder::new(&generation, &images, DeckSettings::default())
        .create(pool, &subject, &request)
        .await
        .expect("create");
    assert_eq!(created.title, "Plain deck");

    let detail = presentation::find_detail(pool, &subject, created.id).await.expect("detail");
    assert!(detail.slides.is_empty());
    let audits = generation_audit::find_for_presentation(pool, created.id).await.expect("audits");
    assert!(audits.is_empty());
}
