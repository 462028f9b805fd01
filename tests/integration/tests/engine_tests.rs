//! Engine scenario tests
//!
//! Exercise the service layer end to end against in-memory repositories
//! that enforce the same constraints as the SQL schema. No PostgreSQL or
//! Redis instance is required.
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use amity_core::entities::{Message, MessageKind};
use amity_core::{DomainError, MessageRepository, ProfileDirectory, RetentionPolicy, Snowflake};
use amity_service::{
    ConversationService, ConversationView, LikeService, MatchService, ModerationService,
    RetentionSweeper, ServiceError, SessionContext, UnreadTracker,
};
use chrono::{Duration, Utc};
use integration_tests::TestEngine;

// ============================================================================
// Like Ledger
// ============================================================================

#[tokio::test]
async fn test_mutual_like_creates_exactly_one_match() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let likes = LikeService::new(&engine.ctx);

    let outcome = likes.send_like(alice, bob).await.unwrap();
    assert!(!outcome.matched);
    assert!(outcome.match_id.is_none());

    let outcome = likes.send_like(bob, alice).await.unwrap();
    assert!(outcome.matched);
    let match_id = outcome.match_id.unwrap();

    // Exactly one match, findable from both orderings
    let matches = MatchService::new(&engine.ctx);
    let found = matches.find_match(alice, bob).await.unwrap().unwrap();
    assert_eq!(found.id, match_id);
    let found = matches.find_match(bob, alice).await.unwrap().unwrap();
    assert_eq!(found.id, match_id);

    assert_eq!(matches.match_ids(alice).await.unwrap(), vec![match_id]);
}

#[tokio::test]
async fn test_duplicate_like_is_rejected() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let likes = LikeService::new(&engine.ctx);

    likes.send_like(alice, bob).await.unwrap();
    let err = likes.send_like(alice, bob).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AlreadyLiked)
    ));
}

#[tokio::test]
async fn test_self_like_is_rejected() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");

    let err = LikeService::new(&engine.ctx)
        .send_like(alice, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::SelfLike)));
}

#[tokio::test]
async fn test_losing_the_match_race_still_reports_matched() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");

    // The other direction already landed both its like and the match
    let likes = LikeService::new(&engine.ctx);
    likes.send_like(bob, alice).await.unwrap();
    let existing = MatchService::new(&engine.ctx)
        .create_match(bob, alice)
        .await
        .unwrap();

    // This side's create_match hits DuplicateMatch and swallows it
    let outcome = likes.send_like(alice, bob).await.unwrap();
    assert!(outcome.matched);
    assert_eq!(outcome.match_id, Some(existing.id));
}

#[tokio::test]
async fn test_removing_like_preserves_match() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let likes = LikeService::new(&engine.ctx);

    likes.send_like(alice, bob).await.unwrap();
    likes.send_like(bob, alice).await.unwrap();
    likes.remove_like(alice, bob).await.unwrap();

    // Matches are monotonic
    let status = likes.check_like_status(alice, bob).await.unwrap();
    assert!(!status.liked);
    assert!(status.matched);
}

#[tokio::test]
async fn test_deactivated_profile_cannot_be_liked() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let mallory = engine.add_profile("mallory");
    engine.profiles.deactivate(mallory).await.unwrap();

    let err = LikeService::new(&engine.ctx)
        .send_like(alice, mallory)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_sent_and_received_listings() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let carol = engine.add_profile("carol");
    let likes = LikeService::new(&engine.ctx);

    likes.send_like(alice, bob).await.unwrap();
    likes.send_like(alice, carol).await.unwrap();
    likes.send_like(bob, carol).await.unwrap();

    assert_eq!(likes.likes_sent(alice).await.unwrap().len(), 2);
    let received = likes.likes_received(carol).await.unwrap();
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|l| l.receiver_id == carol));
}

// ============================================================================
// Conversation Store
// ============================================================================

async fn matched_pair(engine: &TestEngine) -> (Snowflake, Snowflake, Snowflake) {
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let likes = LikeService::new(&engine.ctx);
    likes.send_like(alice, bob).await.unwrap();
    let outcome = likes.send_like(bob, alice).await.unwrap();
    (alice, bob, outcome.match_id.unwrap())
}

#[tokio::test]
async fn test_messages_come_back_in_creation_order() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    let m1 = conv
        .send_message(match_id, alice, "hey", MessageKind::Text)
        .await
        .unwrap();
    let m2 = conv
        .send_message(match_id, bob, "hi!", MessageKind::Text)
        .await
        .unwrap();
    let m3 = conv
        .send_message(match_id, alice, "coffee?", MessageKind::Text)
        .await
        .unwrap();

    let fetched = conv.get_messages(match_id, alice).await.unwrap();
    let ids: Vec<Snowflake> = fetched.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![m1.id, m2.id, m3.id]);

    // Re-fetch is idempotent
    let again = conv.get_messages(match_id, alice).await.unwrap();
    assert_eq!(again.len(), 3);
}

#[tokio::test]
async fn test_identical_content_stays_two_messages() {
    let engine = TestEngine::new();
    let (alice, _bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    let first = conv
        .send_message(match_id, alice, "hey", MessageKind::Text)
        .await
        .unwrap();
    let second = conv
        .send_message(match_id, alice, "hey", MessageKind::Text)
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let fetched = conv.get_messages(match_id, alice).await.unwrap();
    let ids: Vec<Snowflake> = fetched.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(fetched.iter().all(|m| m.content == "hey"));
}

#[tokio::test]
async fn test_send_message_validation() {
    let engine = TestEngine::new();
    let (alice, _bob, match_id) = matched_pair(&engine).await;
    let stranger = engine.add_profile("stranger");
    let conv = ConversationService::new(&engine.ctx);

    let err = conv
        .send_message(match_id, alice, "   \n ", MessageKind::Text)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::EmptyContent)
    ));

    let too_long = "x".repeat(Message::MAX_CONTENT_LENGTH + 1);
    let err = conv
        .send_message(match_id, alice, &too_long, MessageKind::Text)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ContentTooLong { .. })
    ));
    // A failed send leaves the caller's buffer intact
    assert_eq!(too_long.len(), Message::MAX_CONTENT_LENGTH + 1);

    let err = conv
        .send_message(match_id, stranger, "hello", MessageKind::Text)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotParticipant)
    ));
}

#[tokio::test]
async fn test_block_suspends_messaging_both_directions() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    ModerationService::new(&engine.ctx)
        .block(alice, bob)
        .await
        .unwrap();

    let conv = ConversationService::new(&engine.ctx);
    let err = conv
        .send_message(match_id, bob, "hello?", MessageKind::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));

    let err = conv
        .send_message(match_id, alice, "nope", MessageKind::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));

    // The match itself stays
    assert!(MatchService::new(&engine.ctx)
        .find_match(alice, bob)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_mark_read_scopes_to_other_senders_and_is_idempotent() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    let from_bob = conv
        .send_message(match_id, bob, "one", MessageKind::Text)
        .await
        .unwrap();
    conv.send_message(match_id, alice, "mine", MessageKind::Text)
        .await
        .unwrap();

    let read = conv.mark_messages_read(match_id, alice).await.unwrap();
    assert_eq!(read, vec![from_bob.id]);

    // Second call updates nothing
    assert!(conv
        .mark_messages_read(match_id, alice)
        .await
        .unwrap()
        .is_empty());

    // Alice's own message is still unread for Bob
    assert_eq!(
        engine.messages.count_unread(match_id, bob).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_delete_message_is_sender_scoped() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    let message = conv
        .send_message(match_id, alice, "oops", MessageKind::Text)
        .await
        .unwrap();

    let err = conv.delete_message(message.id, bob).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotMessageSender)
    ));

    conv.delete_message(message.id, alice).await.unwrap();
    assert!(conv.get_messages(match_id, alice).await.unwrap().is_empty());
}

// ============================================================================
// Retention
// ============================================================================

fn aged_message(match_id: Snowflake, sender_id: Snowflake, id: i64, age: Duration) -> Message {
    let mut message = Message::new(
        Snowflake::new(id),
        match_id,
        sender_id,
        "old".to_string(),
    );
    message.created_at = Utc::now() - age;
    message
}

#[tokio::test]
async fn test_purge_boundary_is_exactly_24_hours() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;

    let now = Utc::now();
    let mut on_boundary = aged_message(match_id, bob, 1, Duration::hours(24));
    on_boundary.created_at = now - Duration::hours(24);
    let past_boundary = aged_message(match_id, bob, 2, Duration::hours(24) + Duration::seconds(1));
    engine.messages.create(&on_boundary).await.unwrap();
    engine.messages.create(&past_boundary).await.unwrap();

    let conv = ConversationService::new(&engine.ctx);
    let purged = conv.purge_expired(match_id, now).await.unwrap();
    assert_eq!(purged, vec![past_boundary.id]);

    // Exactly-24h message survives; a second purge removes nothing
    assert!(conv.purge_expired(match_id, now).await.unwrap().is_empty());
    let remaining = conv.get_messages(match_id, alice).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, on_boundary.id);
}

#[tokio::test]
async fn test_sweeper_purges_across_matches_and_is_idempotent() {
    let engine = TestEngine::new();
    let (_alice, bob, match_one) = matched_pair(&engine).await;
    let (_carol, dave, match_two) = matched_pair(&engine).await;

    for (i, (mid, sender)) in [(match_one, bob), (match_two, dave)].into_iter().enumerate() {
        let expired = aged_message(mid, sender, i as i64 + 1, Duration::hours(30));
        engine.messages.create(&expired).await.unwrap();
    }
    let fresh = Message::new(engine.ctx.generate_id(), match_one, bob, "new".to_string());
    engine.messages.create(&fresh).await.unwrap();

    let sweeper = RetentionSweeper::new(engine.ctx.clone(), std::time::Duration::from_secs(300));
    assert_eq!(sweeper.sweep_once().await.unwrap(), 2);
    assert_eq!(sweeper.sweep_once().await.unwrap(), 0);

    let left = engine.messages.find_by_match(match_one).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, fresh.id);
    assert!(engine
        .messages
        .find_by_match(match_two)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_custom_retention_window() {
    let engine = TestEngine::with_retention(RetentionPolicy::from_hours(1));
    let (_alice, bob, match_id) = matched_pair(&engine).await;

    let expired = aged_message(match_id, bob, 1, Duration::minutes(61));
    engine.messages.create(&expired).await.unwrap();

    let purged = ConversationService::new(&engine.ctx)
        .purge_expired(match_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(purged, vec![expired.id]);
}

// ============================================================================
// Match listing and unread counts
// ============================================================================

#[tokio::test]
async fn test_list_matches_is_enriched() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    conv.send_message(match_id, bob, "hello alice", MessageKind::Text)
        .await
        .unwrap();
    conv.send_message(match_id, bob, "are you there?", MessageKind::Text)
        .await
        .unwrap();

    let summaries = MatchService::new(&engine.ctx)
        .list_matches(alice)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    assert_eq!(summary.match_id, match_id);
    assert_eq!(summary.other.as_ref().unwrap().display_name, "bob");
    assert_eq!(summary.unread, 2);
    assert_eq!(
        summary.last_message.as_ref().unwrap().preview,
        "are you there?"
    );

    // Bob sent everything, so his own listing shows zero unread
    let summaries = MatchService::new(&engine.ctx)
        .list_matches(bob)
        .await
        .unwrap();
    assert_eq!(summaries[0].unread, 0);
}

#[tokio::test]
async fn test_unread_tracker_converges_with_storage() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    // Seed from the aggregate query, as a session start does
    conv.send_message(match_id, bob, "one", MessageKind::Text)
        .await
        .unwrap();
    let tracker = UnreadTracker::new();
    tracker.seed(
        engine
            .messages
            .count_unread_per_match(alice, &[match_id])
            .await
            .unwrap(),
    );
    assert_eq!(tracker.count(match_id), 1);

    // Feed event arithmetic tracks further traffic
    let m2 = conv
        .send_message(match_id, bob, "two", MessageKind::Text)
        .await
        .unwrap();
    SessionContext::track(
        &tracker,
        alice,
        &amity_core::DomainEvent::MessageCreated(
            amity_core::events::domain_event::MessageCreatedEvent::from_message(&m2),
        ),
    );
    assert_eq!(
        tracker.count(match_id),
        engine.messages.count_unread(match_id, alice).await.unwrap()
    );

    // Opening the conversation clears both sides
    conv.mark_messages_read(match_id, alice).await.unwrap();
    tracker.clear(match_id);
    assert_eq!(
        tracker.count(match_id),
        engine.messages.count_unread(match_id, alice).await.unwrap()
    );
    assert_eq!(tracker.total(), 0);
}

#[tokio::test]
async fn test_open_conversation_flow_without_feed() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let conv = ConversationService::new(&engine.ctx);

    let expired = aged_message(match_id, bob, 1, Duration::hours(25));
    engine.messages.create(&expired).await.unwrap();
    conv.send_message(match_id, bob, "still here", MessageKind::Text)
        .await
        .unwrap();

    // The open sequence: purge, fetch, mark read
    conv.purge_expired(match_id, Utc::now()).await.unwrap();
    let backlog = conv.get_messages(match_id, alice).await.unwrap();
    let mut view = ConversationView::from_backlog(match_id, alice, backlog);
    let read = conv.mark_messages_read(match_id, alice).await.unwrap();
    assert_eq!(read.len(), 1);

    assert_eq!(view.messages().len(), 1);
    assert_eq!(view.unread_count(), 1);

    // The read receipt comes back over the feed and reconciles the view
    view.apply(&amity_core::DomainEvent::MessagesRead(
        amity_core::events::domain_event::MessagesReadEvent::new(
            match_id,
            alice,
            read,
            Utc::now(),
        ),
    ));
    assert_eq!(view.unread_count(), 0);
}

// ============================================================================
// Moderation
// ============================================================================

#[tokio::test]
async fn test_duplicate_block_is_a_noop() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let bob = engine.add_profile("bob");
    let moderation = ModerationService::new(&engine.ctx);

    assert!(moderation.block(alice, bob).await.unwrap());
    assert!(!moderation.block(alice, bob).await.unwrap());

    let status = moderation.block_status(alice, bob).await.unwrap();
    assert!(status.i_blocked);
    assert!(!status.blocked_me);

    let status = moderation.block_status(bob, alice).await.unwrap();
    assert!(!status.i_blocked);
    assert!(status.blocked_me);
}

#[tokio::test]
async fn test_unblock_restores_messaging() {
    let engine = TestEngine::new();
    let (alice, bob, match_id) = matched_pair(&engine).await;
    let moderation = ModerationService::new(&engine.ctx);

    moderation.block(alice, bob).await.unwrap();
    moderation.unblock(alice, bob).await.unwrap();

    ConversationService::new(&engine.ctx)
        .send_message(match_id, bob, "back again", MessageKind::Text)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_three_distinct_reporters_deactivate_profile() {
    let engine = TestEngine::new();
    let mallory = engine.add_profile("mallory");
    let r1 = engine.add_profile("r1");
    let r2 = engine.add_profile("r2");
    let r3 = engine.add_profile("r3");
    let moderation = ModerationService::new(&engine.ctx);

    assert!(!moderation.report(r1, mallory, "spam").await.unwrap());
    assert!(!moderation.report(r2, mallory, "spam").await.unwrap());

    // The same reporter filing again does not move the count
    assert!(!moderation.report(r1, mallory, "spam again").await.unwrap());
    assert!(engine.profiles.is_active(mallory));

    assert!(moderation.report(r3, mallory, "harassment").await.unwrap());
    assert!(!engine.profiles.is_active(mallory));
}

#[tokio::test]
async fn test_self_report_and_self_block_are_rejected() {
    let engine = TestEngine::new();
    let alice = engine.add_profile("alice");
    let moderation = ModerationService::new(&engine.ctx);

    let err = moderation.block(alice, alice).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::SelfBlock)));

    let err = moderation.report(alice, alice, "me").await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::SelfReport)));
}
