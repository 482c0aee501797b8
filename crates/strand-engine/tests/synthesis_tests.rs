//! Synthesis engine scenarios

use pretty_assertions::assert_eq;
use std::sync::Arc;
use strand_engine::SynthesisEngine;
use strand_genai::ConceptGenerator;
use strand_store::{Repository, SessionStore};
use strand_test_utils::{
    active_session, test_user, variation_with_features, FailingGenerator, ScriptedGenerator,
    TestWorld,
};
use strand_types::config::EvolutionConfig;
use strand_types::record::{SessionStatus, SourceRef};
use strand_types::{SessionId, VariationId};

fn engine(world: &TestWorld, generator: Arc<dyn ConceptGenerator>) -> SynthesisEngine {
    SynthesisEngine::new(
        world.sessions.clone(),
        world.variations.clone(),
        world.mutations.clone(),
        world.syntheses.clone(),
        generator,
        EvolutionConfig::default(),
    )
}

async fn seeded_variations(world: &TestWorld, session: SessionId, titles: &[&str]) -> Vec<SourceRef> {
    let mut refs = Vec::new();
    for title in titles {
        let variation = world
            .variations
            .create(variation_with_features(session, title, &["core feature"]))
            .await
            .unwrap();
        refs.push(SourceRef::Variation(variation.id));
    }
    refs
}

#[tokio::test]
async fn single_selection_bypasses_synthesis() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Only"]).await;

    let result = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(session.id, refs.clone())
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(world.syntheses.is_empty());
    // The selection itself was recorded.
    let stored = world.sessions.get(session.id).await.unwrap().unwrap();
    assert_eq!(stored.selected_sources, refs);
}

#[tokio::test]
async fn two_selections_always_attempt_synthesis() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Alpha", "Beta"]).await;

    let synthesis = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(session.id, refs)
        .await
        .unwrap()
        .expect("two selections must produce a synthesis");

    assert!(!world.syntheses.is_empty());
    assert_eq!(synthesis.source_refs.len(), 2);
}

#[tokio::test]
async fn fallback_references_every_source_title() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Alpha", "Beta", "Gamma"]).await;

    let synthesis = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(session.id, refs)
        .await
        .unwrap()
        .unwrap();

    assert!(!synthesis.merged_title.trim().is_empty());
    assert_eq!(synthesis.merged_title, "Alpha (+2 alternatives)");
    for title in ["Alpha", "Beta", "Gamma"] {
        assert!(synthesis.merged_description.contains(title));
    }
    // Retained elements default to each source's raw feature list.
    assert!(synthesis
        .retained_elements
        .values()
        .all(|features| features == &vec!["core feature".to_string()]));
}

#[tokio::test]
async fn valid_merge_reply_is_used_as_is() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Alpha", "Beta"]).await;

    let generator = Arc::new(ScriptedGenerator::new(vec![
        r#"{"mergedTitle":"Alpha Beta One","mergedDescription":"One pitch.","thematicBridge":"Both serve makers."}"#,
    ]));
    let synthesis = engine(&world, generator)
        .submit_selection(session.id, refs)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(synthesis.merged_title, "Alpha Beta One");
    assert_eq!(synthesis.thematic_bridge, "Both serve makers.");
}

#[tokio::test]
async fn blank_merge_reply_triggers_fallback() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Alpha", "Beta"]).await;

    let generator = Arc::new(ScriptedGenerator::new(vec![
        r#"{"mergedTitle":"   ","mergedDescription":"x"}"#,
    ]));
    let synthesis = engine(&world, generator)
        .submit_selection(session.id, refs)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(synthesis.merged_title, "Alpha (+1 alternatives)");
}

#[tokio::test]
async fn selection_size_limits_are_enforced_before_writes() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let engine = engine(&world, Arc::new(FailingGenerator));

    let err = engine
        .submit_selection(session.id, vec![])
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());

    let oversized: Vec<SourceRef> = (0..11)
        .map(|_| SourceRef::Variation(VariationId::new()))
        .collect();
    let err = engine
        .submit_selection(session.id, oversized)
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());

    // Neither rejection touched the session.
    let stored = world.sessions.get(session.id).await.unwrap().unwrap();
    assert!(stored.selected_sources.is_empty());
}

#[tokio::test]
async fn completed_sessions_reject_selections() {
    let world = TestWorld::new();
    let mut session = active_session(&test_user());
    session.status = SessionStatus::Completed;
    let session = world.sessions.create(session).await.unwrap();

    let err = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(session.id, vec![SourceRef::Variation(VariationId::new())])
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let world = TestWorld::new();
    let err = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(
            SessionId::new(),
            vec![SourceRef::Variation(VariationId::new())],
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn selections_that_do_not_resolve_are_rejected() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let mut refs = seeded_variations(&world, session.id, &["Alpha"]).await;
    // The second ref points nowhere.
    refs.push(SourceRef::Variation(VariationId::new()));

    let err = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(session.id, refs)
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());

    // The rejection happened before the selection was written.
    let stored = world.sessions.get(session.id).await.unwrap().unwrap();
    assert!(stored.selected_sources.is_empty());
}

#[tokio::test]
async fn resynthesize_replaces_the_prior_record() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();
    let refs = seeded_variations(&world, session.id, &["Alpha", "Beta"]).await;

    let engine = engine(&world, Arc::new(FailingGenerator));
    let first = engine
        .submit_selection(session.id, refs)
        .await
        .unwrap()
        .unwrap();

    let second = engine.resynthesize(session.id).await.unwrap();
    assert_ne!(first.id, second.id);

    // Exactly one synthesis remains and it is the new one.
    assert_eq!(world.syntheses.len(), 1);
    assert!(world.syntheses.get(second.id).await.unwrap().is_some());
    assert!(world.syntheses.get(first.id).await.unwrap().is_none());
}

#[tokio::test]
async fn resynthesize_requires_a_stored_selection() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();

    let err = engine(&world, Arc::new(FailingGenerator))
        .resynthesize(session.id)
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());
}

#[tokio::test]
async fn mutations_and_variations_mix_as_sources() {
    let world = TestWorld::new();
    let session = world
        .sessions
        .create(active_session(&test_user()))
        .await
        .unwrap();

    let variation = world
        .variations
        .create(variation_with_features(session.id, "Variation", &["f"]))
        .await
        .unwrap();
    let mutation = world
        .mutations
        .create(strand_types::record::Mutation::new(
            session.id,
            vec![strand_types::IdeaId::new()],
            strand_types::record::MutationType::Repurposing,
            "Mutant",
            "desc",
            "why it works",
        ))
        .await
        .unwrap();

    let synthesis = engine(&world, Arc::new(FailingGenerator))
        .submit_selection(
            session.id,
            vec![
                SourceRef::Variation(variation.id),
                SourceRef::Mutation(mutation.id),
            ],
        )
        .await
        .unwrap()
        .unwrap();

    assert!(synthesis.merged_description.contains("Variation"));
    assert!(synthesis.merged_description.contains("Mutant"));
    // The mutation's rationale stands in for its feature list.
    assert_eq!(
        synthesis.retained_elements[&mutation.id.to_string()],
        vec!["why it works"]
    );
}
