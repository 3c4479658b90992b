// ABOUTME: Progress computation, velocity, and guidance tests through the dispatcher
// ABOUTME: Covers act completion, boundary behavior on empty projects, and monotonicity
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

mod common;

use common::{call_tool, json_content, make_project, project_args, test_server};
use serde_json::json;

fn act_completion(report: &serde_json::Value, act: &str) -> f64 {
    report["report"]["acts"]
        .as_array()
        .expect("acts array")
        .iter()
        .find(|a| a["act"] == act)
        .expect("act present")["completion_percent"]
        .as_f64()
        .expect("completion number")
}

#[tokio::test]
async fn conceptualization_reaches_one_hundred_after_its_three_tools() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    for (id, (tool, args)) in [
        ("clarify_research_goals", json!({ "research_area": "quantum computing" })),
        ("assess_foundational_assumptions", json!({ "research_context": "qubit scaling" })),
        ("generate_critical_questions", json!({ "research_context": "qubit scaling" })),
    ]
    .into_iter()
    .enumerate()
    {
        let reply = call_tool(&server, id as i64 + 1, tool, project_args(project.path(), args)).await;
        assert!(reply.error.is_none(), "{tool} failed: {:?}", reply.error);
    }

    let reply = call_tool(&server, 9, "get_research_progress", project_args(project.path(), json!({}))).await;
    assert!(reply.error.is_none());
    let report = json_content(&reply);

    assert!((act_completion(&report, "conceptualization") - 100.0).abs() < f64::EPSILON);
    for act in [
        "design_planning",
        "knowledge_acquisition",
        "analysis_synthesis",
        "validation_refinement",
        "communication",
    ] {
        assert!(
            act_completion(&report, act).abs() < f64::EPSILON,
            "{act} should be 0"
        );
    }
    assert_eq!(report["report"]["total_invocations"], 3);
    assert_eq!(report["report"]["unique_tools"], 3);
    assert!(report["markdown"].as_str().unwrap().contains("Conceptualization"));
}

#[tokio::test]
async fn empty_project_reports_all_zero_and_neutral_responses() {
    let server = test_server(false, false);
    let project = make_project("fresh", "biology");

    let progress = call_tool(&server, 1, "get_research_progress", project_args(project.path(), json!({}))).await;
    let report = json_content(&progress);
    assert_eq!(report["report"]["total_invocations"], 0);
    assert!(report["report"]["last_activity"].is_null());

    let recs = call_tool(
        &server,
        2,
        "get_contextual_recommendations",
        project_args(project.path(), json!({})),
    )
    .await;
    // The progress call above is itself the only prior usage row.
    let pattern = json_content(&recs)["pattern_type"].as_str().unwrap().to_owned();
    assert_eq!(pattern, "initial");

    let milestones = call_tool(
        &server,
        3,
        "detect_and_celebrate_milestones",
        project_args(make_project("untouched", "").path(), json!({})),
    )
    .await;
    let content = json_content(&milestones);
    assert_eq!(content["celebration"], false);
    assert_eq!(content["milestones"][0]["title"], "Keep Going");
}

#[tokio::test]
async fn repeat_invocations_never_decrease_completion() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    let mut last = -1.0;
    for id in 0..3 {
        call_tool(
            &server,
            id * 2 + 1,
            "clarify_research_goals",
            project_args(project.path(), json!({ "research_area": "topology" })),
        )
        .await;
        let reply = call_tool(&server, id * 2 + 2, "get_research_progress", project_args(project.path(), json!({}))).await;
        let completion = act_completion(&json_content(&reply), "conceptualization");
        assert!(completion >= last);
        last = completion;
    }
}

#[tokio::test]
async fn velocity_reports_a_window_sized_sparkline() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    for id in 0..4 {
        call_tool(
            &server,
            id + 1,
            "clarify_research_goals",
            project_args(project.path(), json!({ "research_area": "chemistry" })),
        )
        .await;
    }

    let reply = call_tool(
        &server,
        10,
        "get_tool_usage_velocity",
        project_args(project.path(), json!({ "window_days": 7 })),
    )
    .await;
    let report = json_content(&reply);
    assert_eq!(report["window_days"], 7);
    assert_eq!(report["daily_counts"].as_array().unwrap().len(), 7);
    assert_eq!(report["sparkline"].as_str().unwrap().chars().count(), 7);

    // N=1 window: a single bar for today's count.
    let reply = call_tool(
        &server,
        11,
        "get_tool_usage_velocity",
        project_args(project.path(), json!({ "window_days": 1 })),
    )
    .await;
    let report = json_content(&reply);
    assert_eq!(report["daily_counts"].as_array().unwrap().len(), 1);
    assert_eq!(report["sparkline"].as_str().unwrap().chars().count(), 1);
}

#[tokio::test]
async fn act_guidance_suggests_unused_tools_with_rationales() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    call_tool(
        &server,
        1,
        "clarify_research_goals",
        project_args(project.path(), json!({ "research_area": "optics" })),
    )
    .await;

    let reply = call_tool(
        &server,
        2,
        "get_research_act_guidance",
        project_args(
            project.path(),
            json!({ "target_act": "conceptualization", "experience_level": "beginner" }),
        ),
    )
    .await;
    let guidance = json_content(&reply);
    let next: Vec<&str> = guidance["next_tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tool"].as_str().unwrap())
        .collect();
    assert_eq!(
        next,
        vec!["assess_foundational_assumptions", "generate_critical_questions"]
    );
    assert!(!guidance["purpose"].as_str().unwrap().is_empty());

    // Historical alias accepted on input.
    let reply = call_tool(
        &server,
        3,
        "get_research_act_guidance",
        project_args(project.path(), json!({ "target_act": "publication" })),
    )
    .await;
    assert_eq!(json_content(&reply)["act"], "communication");
}

#[tokio::test]
async fn journey_analytics_cover_timeline_and_predictions() {
    let server = test_server(false, false);
    let project = make_project("demo", "physics");

    for (id, tool, args) in [
        (1, "clarify_research_goals", json!({ "research_area": "quantum optics" })),
        (2, "assess_foundational_assumptions", json!({ "research_context": "photon sources" })),
    ] {
        call_tool(&server, id, tool, project_args(project.path(), args)).await;
    }

    let reply = call_tool(
        &server,
        5,
        "analyze_research_journey",
        project_args(
            project.path(),
            json!({ "time_period": "all_time", "include_predictions": true }),
        ),
    )
    .await;
    let report = json_content(&reply);
    assert_eq!(report["timeline"].as_array().unwrap().len(), 2);
    assert_eq!(report["timeline"][0]["act"], "conceptualization");
    assert_eq!(report["prediction"]["current_focus"], "conceptualization");
    assert_eq!(report["prediction"]["next_act"], "design_planning");
    assert_eq!(report["domain_evolution"]["dominant"], "physics");
}
