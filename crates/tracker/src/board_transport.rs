// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BoardTransport` over the GitHub Projects v2 GraphQL API. Kept
//! deliberately thin: `pilot-board` owns the cache and idempotence
//! logic, this crate only issues the four GraphQL operations spec §4.4
//! names.

use async_trait::async_trait;
use pilot_core::{BoardSyncError, BoardTransport, OptionMap};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct GithubBoardTransport {
    client: Arc<octocrab::Octocrab>,
}

impl GithubBoardTransport {
    pub fn new(client: Arc<octocrab::Octocrab>) -> Self {
        Self { client }
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, BoardSyncError> {
        self.client
            .graphql(&json!({ "query": query, "variables": variables }))
            .await
            .map_err(|e| BoardSyncError::Transport(e.to_string()))
    }
}

const RESOLVE_ORG_PROJECT: &str = "query($owner: String!, $number: Int!) { \
    organization(login: $owner) { projectV2(number: $number) { id } } }";
const RESOLVE_USER_PROJECT: &str = "query($owner: String!, $number: Int!) { \
    user(login: $owner) { projectV2(number: $number) { id } } }";

#[async_trait]
impl BoardTransport for GithubBoardTransport {
    async fn resolve_project(&self, owner: &str, project_number: u64) -> Result<String, BoardSyncError> {
        let vars = json!({ "owner": owner, "number": project_number });

        let org_result = self.graphql(RESOLVE_ORG_PROJECT, vars.clone()).await?;
        if let Some(id) = org_result.pointer("/organization/projectV2/id").and_then(Value::as_str) {
            return Ok(id.to_string());
        }

        let user_result = self.graphql(RESOLVE_USER_PROJECT, vars).await?;
        user_result
            .pointer("/user/projectV2/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BoardSyncError::ProjectNotFound { owner: owner.to_string() })
    }

    async fn resolve_status_field(
        &self,
        project_id: &str,
    ) -> Result<(String, OptionMap), BoardSyncError> {
        const QUERY: &str = "query($project: ID!) { node(id: $project) { ... on ProjectV2 { \
            fields(first: 50) { nodes { ... on ProjectV2SingleSelectField { id name options { \
            id name } } } } } } }";
        let result = self.graphql(QUERY, json!({ "project": project_id })).await?;
        let nodes = result
            .pointer("/node/fields/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for node in nodes {
            let Some(name) = node.get("name").and_then(Value::as_str) else { continue };
            if !name.eq_ignore_ascii_case("status") {
                continue;
            }
            let Some(field_id) = node.get("id").and_then(Value::as_str) else { continue };
            let mut options = OptionMap::new();
            for option in node.get("options").and_then(Value::as_array).into_iter().flatten() {
                if let (Some(option_name), Some(option_id)) =
                    (option.get("name").and_then(Value::as_str), option.get("id").and_then(Value::as_str))
                {
                    options.insert(option_name.to_ascii_lowercase(), option_id.to_string());
                }
            }
            return Ok((field_id.to_string(), options));
        }

        Err(BoardSyncError::StatusFieldNotFound { project_id: project_id.to_string() })
    }

    async fn upsert_item(&self, project_id: &str, issue_node_id: &str) -> Result<String, BoardSyncError> {
        const MUTATION: &str = "mutation($project: ID!, $content: ID!) { \
            addProjectV2ItemById(input: { projectId: $project, contentId: $content }) { item { id } } }";
        let result = self
            .graphql(MUTATION, json!({ "project": project_id, "content": issue_node_id }))
            .await?;
        result
            .pointer("/addProjectV2ItemById/item/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BoardSyncError::Transport("addProjectV2ItemById returned no item id".into()))
    }

    async fn set_status(
        &self,
        project_id: &str,
        field_id: &str,
        item_id: &str,
        option_id: &str,
    ) -> Result<(), BoardSyncError> {
        const MUTATION: &str = "mutation($project: ID!, $item: ID!, $field: ID!, $option: String!) { \
            updateProjectV2ItemFieldValue(input: { projectId: $project, itemId: $item, \
            fieldId: $field, value: { singleSelectOptionId: $option } }) { \
            projectV2Item { id } } }";
        self.graphql(
            MUTATION,
            json!({ "project": project_id, "item": item_id, "field": field_id, "option": option_id }),
        )
        .await?;
        Ok(())
    }
}
