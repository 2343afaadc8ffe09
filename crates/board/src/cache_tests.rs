// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

struct CountingTransport {
    resolve_calls: Arc<Mutex<u32>>,
}

#[async_trait]
impl BoardTransport for CountingTransport {
    async fn resolve_project(&self, _owner: &str, _project_number: u64) -> Result<String, BoardSyncError> {
        *self.resolve_calls.lock() += 1;
        Ok("PROJECT_1".to_string())
    }

    async fn resolve_status_field(
        &self,
        _project_id: &str,
    ) -> Result<(String, OptionMap), BoardSyncError> {
        let mut options = OptionMap::new();
        options.insert("done".to_string(), "OPT_DONE".to_string());
        Ok(("FIELD_STATUS".to_string(), options))
    }

    async fn upsert_item(&self, _project_id: &str, _issue_node_id: &str) -> Result<String, BoardSyncError> {
        Ok("ITEM_1".to_string())
    }

    async fn set_status(
        &self,
        _project_id: &str,
        _field_id: &str,
        _item_id: &str,
        _option_id: &str,
    ) -> Result<(), BoardSyncError> {
        Ok(())
    }
}

#[tokio::test]
async fn resolves_exactly_once_across_repeated_calls() {
    let resolve_calls = Arc::new(Mutex::new(0));
    let transport = CountingTransport { resolve_calls: resolve_calls.clone() };
    let cache = BoardMappingCache::new();

    cache.get_or_resolve(&transport, "acme", 1).await.unwrap();
    cache.get_or_resolve(&transport, "acme", 1).await.unwrap();

    assert_eq!(*resolve_calls.lock(), 1);
}

#[tokio::test]
async fn reset_forces_re_resolution() {
    let resolve_calls = Arc::new(Mutex::new(0));
    let transport = CountingTransport { resolve_calls: resolve_calls.clone() };
    let cache = BoardMappingCache::new();

    cache.get_or_resolve(&transport, "acme", 1).await.unwrap();
    cache.reset();
    cache.get_or_resolve(&transport, "acme", 1).await.unwrap();

    assert_eq!(*resolve_calls.lock(), 2);
}
