// ABOUTME: Frontend contract tests: catalog and defaults cover the registered tool set
// ABOUTME: Checked under every capability combination a deployment can have
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

mod common;

use common::test_server;
use srrd_mcp_server::frontend;

#[tokio::test]
async fn catalog_and_defaults_are_supersets_of_the_registry() {
    for (latex, vector) in [(false, false), (true, false), (false, true), (true, true)] {
        let server = test_server(latex, vector);
        let missing = frontend::validate_against_registry(&server.resources.registry);
        assert!(
            missing.is_empty(),
            "contract gaps with latex={latex} vector={vector}: {missing:?}"
        );
    }
}

#[tokio::test]
async fn catalog_entries_carry_display_metadata() {
    for entry in frontend::tool_catalog() {
        assert!(!entry.title.is_empty(), "{} lacks a title", entry.name);
        assert!(!entry.purpose.is_empty(), "{} lacks a purpose", entry.name);
        assert!(!entry.usage.is_empty(), "{} lacks usage text", entry.name);
        assert!(!entry.tags.is_empty(), "{} lacks tags", entry.name);
    }
}

#[tokio::test]
async fn defaults_exist_for_every_catalog_entry() {
    let defaults = frontend::default_arguments();
    for entry in frontend::tool_catalog() {
        assert!(
            defaults.contains_key(entry.name),
            "{} has no default arguments",
            entry.name
        );
    }
}
