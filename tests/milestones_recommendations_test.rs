// ABOUTME: Milestone detection and contextual recommendation sequencing tests
// ABOUTME: Drives real tool sequences through the dispatcher and checks the analytics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

mod common;

use common::{call_tool, json_content, make_project, project_args, test_server};
use serde_json::json;

#[tokio::test]
async fn ten_distinct_tools_earn_threshold_and_explorer_milestones() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let drives: [(&str, serde_json::Value); 10] = [
        ("clarify_research_goals", json!({ "research_area": "quantum computing" })),
        ("assess_foundational_assumptions", json!({ "research_context": "scaling" })),
        ("generate_critical_questions", json!({ "research_context": "scaling" })),
        ("suggest_methodology", json!({ "research_goals": "measure decoherence" })),
        ("explain_methodology", json!({ "methodology": "experimental" })),
        ("compare_approaches", json!({ "approach_a": "surface codes", "approach_b": "bosonic codes" })),
        ("validate_design", json!({ "design_description": "randomized benchmark" })),
        ("ensure_ethics", json!({ "design_description": "simulation only" })),
        ("extract_key_concepts", json!({ "content": "threshold theorem for fault tolerance" })),
        ("format_research_content", json!({ "content": "* a\n* b" })),
    ];
    for (id, (tool, args)) in drives.into_iter().enumerate() {
        let reply = call_tool(&server, id as i64 + 1, tool, project_args(project.path(), args)).await;
        assert!(reply.error.is_none(), "{tool} failed: {:?}", reply.error);
    }

    let reply = call_tool(
        &server,
        42,
        "detect_and_celebrate_milestones",
        project_args(project.path(), json!({})),
    )
    .await;
    let content = json_content(&reply);
    assert_eq!(content["celebration"], true);

    let milestones = content["milestones"].as_array().unwrap();
    assert!(milestones.len() >= 2);
    let titles: Vec<&str> = milestones
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"10 Tools Used Milestone"));
    assert!(titles.contains(&"Research Tool Explorer"));

    for milestone in milestones {
        for field in ["icon", "title", "description", "significance"] {
            assert!(
                milestone[field].as_str().is_some_and(|s| !s.is_empty()),
                "milestone missing {field}: {milestone}"
            );
        }
    }
}

#[tokio::test]
async fn clarify_then_suggest_yields_logical_progression() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    call_tool(
        &server,
        1,
        "clarify_research_goals",
        project_args(project.path(), json!({ "research_area": "quantum computing" })),
    )
    .await;
    call_tool(
        &server,
        2,
        "suggest_methodology",
        project_args(project.path(), json!({ "research_goals": "simulate decoherence" })),
    )
    .await;

    let reply = call_tool(
        &server,
        3,
        "get_contextual_recommendations",
        project_args(project.path(), json!({})),
    )
    .await;
    let recs = json_content(&reply);
    assert_eq!(recs["pattern_type"], "logical_progression");

    let prioritized = recs["prioritized_recommendations"].as_array().unwrap();
    assert!(!prioritized.is_empty());

    // At least one recommendation comes from the design-planning act and
    // has not been invoked yet.
    let framework = srrd_intelligence::ResearchFramework::new();
    let design_tools: Vec<&str> =
        framework.tools_for_act(srrd_intelligence::ResearchAct::DesignPlanning);
    assert!(prioritized.iter().any(|r| {
        let tool = r["tool"].as_str().unwrap();
        design_tools.contains(&tool) && tool != "suggest_methodology"
    }));
    for rec in prioritized {
        assert!(!rec["rationale"].as_str().unwrap().is_empty());
    }

    let paths = recs["alternative_paths"].as_array().unwrap();
    assert!((2..=3).contains(&paths.len()));
}

#[tokio::test]
async fn act_completion_milestone_fires_for_finished_conceptualization() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    for (id, (tool, args)) in [
        ("clarify_research_goals", json!({ "research_area": "optics" })),
        ("assess_foundational_assumptions", json!({ "research_context": "lasers" })),
        ("generate_critical_questions", json!({ "research_context": "lasers" })),
    ]
    .into_iter()
    .enumerate()
    {
        call_tool(&server, id as i64 + 1, tool, project_args(project.path(), args)).await;
    }

    let reply = call_tool(
        &server,
        9,
        "detect_and_celebrate_milestones",
        project_args(project.path(), json!({})),
    )
    .await;
    let content = json_content(&reply);
    let titles: Vec<&str> = content["milestones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Conceptualization Act Completed"));
}

#[tokio::test]
async fn session_summary_tracks_recent_tools() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let started = call_tool(
        &server,
        1,
        "start_research_session",
        project_args(project.path(), json!({ "session_type": "planning" })),
    )
    .await;
    assert!(started.error.is_none());

    call_tool(
        &server,
        2,
        "clarify_research_goals",
        project_args(project.path(), json!({ "research_area": "optics" })),
    )
    .await;

    let reply = call_tool(&server, 3, "get_session_summary", project_args(project.path(), json!({}))).await;
    let summary = json_content(&reply);
    assert_eq!(summary["active_session"], true);
    assert_eq!(summary["session_type"], "planning");
    let recent = summary["recent_tools"].as_array().unwrap();
    assert!(recent
        .iter()
        .any(|t| t.as_str() == Some("clarify_research_goals")));
}
