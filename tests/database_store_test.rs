// ABOUTME: Store behavior tests: idempotent schema, recording completeness, persistence
// ABOUTME: Exercises the per-project store through and beneath the dispatcher
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

mod common;

use common::{call_tool, json_content, make_project, project_args, test_server};
use serde_json::json;
use srrd_mcp_server::database::documents::KIND_REFERENCE;
use srrd_mcp_server::database::ResearchStore;

async fn schema_dump(store: &ResearchStore) -> Vec<(String, String)> {
    sqlx::query_as(
        "SELECT name, sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY name",
    )
    .fetch_all(store.pool())
    .await
    .unwrap()
}

#[tokio::test]
async fn initialize_twice_leaves_the_schema_identical() {
    let project = make_project("demo", "physics");
    let store = ResearchStore::open(project.path()).await.unwrap();

    let first = schema_dump(&store).await;
    store.initialize().await.unwrap();
    let second = schema_dump(&store).await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn every_successful_call_is_preceded_by_a_matching_usage_row() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let tools = [
        ("clarify_research_goals", json!({ "research_area": "optics" })),
        ("suggest_methodology", json!({ "research_goals": "model lasing thresholds" })),
        ("simulate_peer_review", json!({ "content": "We report a threshold measurement." })),
    ];
    for (id, (tool, args)) in tools.iter().enumerate() {
        let reply = call_tool(
            &server,
            id as i64 + 1,
            tool,
            project_args(project.path(), args.clone()),
        )
        .await;
        assert!(reply.error.is_none());

        let store = server
            .resources
            .stores
            .get_or_open(project.path())
            .await
            .unwrap();
        let recent = store.recent_usage(1).await.unwrap();
        assert_eq!(recent[0].tool_name, *tool, "usage row must precede the reply");
    }
}

#[tokio::test]
async fn bibliography_round_trip_through_tools() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    for (id, title, authors, year) in [
        (1, "Paper One", "A. Author", 2019),
        (2, "Paper Two", "B. Author", 2023),
    ] {
        let reply = call_tool(
            &server,
            id,
            "store_bibliography_reference",
            project_args(
                project.path(),
                json!({ "title": title, "authors": authors, "year": year }),
            ),
        )
        .await;
        assert!(reply.error.is_none());
    }

    let retrieved = call_tool(
        &server,
        3,
        "retrieve_bibliography_references",
        project_args(project.path(), json!({ "filter": "paper one" })),
    )
    .await;
    let content = json_content(&retrieved);
    assert_eq!(content["reference_count"], 1);
    assert_eq!(content["references"][0]["title"], "Paper One");

    let bibliography = call_tool(
        &server,
        4,
        "generate_bibliography",
        project_args(project.path(), json!({ "style": "bibtex" })),
    )
    .await;
    let text = bibliography.result.unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(text.contains("@misc{paper_one"));
    assert!(text.contains("B. Author"));
}

#[tokio::test]
async fn novel_theory_tools_persist_their_rows() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let developed = call_tool(
        &server,
        1,
        "develop_alternative_framework",
        project_args(
            project.path(),
            json!({
                "theory_name": "control-noise ceiling",
                "theory_description": "scaling limits derive from classical control noise"
            }),
        ),
    )
    .await;
    assert!(developed.error.is_none());

    let compared = call_tool(
        &server,
        2,
        "compare_paradigms",
        project_args(
            project.path(),
            json!({
                "mainstream_paradigm": "decoherence-limited scaling of quantum processors",
                "alternative_paradigm": "control-noise ceiling on effective gate fidelity"
            }),
        ),
    )
    .await;
    let score = json_content(&compared)["equal_treatment_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));

    let store = server
        .resources
        .stores
        .get_or_open(project.path())
        .await
        .unwrap();
    let theories = store.list_novel_theories().await.unwrap();
    assert_eq!(theories.len(), 1);
    assert_eq!(theories[0].theory_name, "control-noise ceiling");
    assert_eq!(store.list_paradigm_comparisons().await.unwrap().len(), 1);
}

#[tokio::test]
async fn quality_gates_persist_results() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let reply = call_tool(
        &server,
        1,
        "check_quality_gates",
        project_args(project.path(), json!({ "content": "short draft", "phase": "draft" })),
    )
    .await;
    assert!(reply.error.is_none());

    let store = server
        .resources
        .stores
        .get_or_open(project.path())
        .await
        .unwrap();
    let checks = store.list_quality_checks().await.unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].check_type, "draft_readiness");
}

#[tokio::test]
async fn historical_tool_names_remain_valid_in_the_store() {
    let project = make_project("demo", "physics");
    let store = ResearchStore::open(project.path()).await.unwrap();

    // A row recorded under a name the registry no longer knows stays
    // readable and countable.
    store
        .record_tool_usage("legacy_synthesis_tool", "", None)
        .await
        .unwrap();
    let names = store.distinct_tool_names().await.unwrap();
    assert!(names.contains(&"legacy_synthesis_tool".to_owned()));

    let samples = store.usage_samples().await.unwrap();
    assert_eq!(samples.len(), 1);
}

#[tokio::test]
async fn reference_rows_use_the_reference_kind() {
    let project = make_project("demo", "physics");
    let store = ResearchStore::open(project.path()).await.unwrap();
    store
        .insert_document("Ref", KIND_REFERENCE, "{}", None)
        .await
        .unwrap();
    assert_eq!(store.list_documents(KIND_REFERENCE).await.unwrap().len(), 1);
    assert!(store.list_documents("document").await.unwrap().is_empty());
}
