//! Concurrency tests for the resolution cache
//!
//! Many tasks hammer one shared store; the gate must keep every invariant.

use libscout_core::{
    CacheConfig, LibraryInput, RecordKind, RepositoryInput, ResolutionCache, ResolutionStore,
    UpsertInput,
};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_never_exceed_capacity() -> anyhow::Result<()> {
    let cache = Arc::new(ResolutionCache::new(
        CacheConfig::default().with_max_entries(10),
    )?);

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let name = format!("lib-{}-{}", worker, i);
                cache
                    .upsert(LibraryInput::new(name.clone(), format!("/org/{}", name)))
                    .await?;
                assert!(cache.size().await <= 10);
            }
            Ok::<_, libscout_core::ScoutError>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(cache.size().await, 10);
    let stats = cache.stats().await;
    assert_eq!(stats.inserts, 200);
    assert_eq!(stats.evictions, 190);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_of_one_resource_keep_one_entry() -> anyhow::Result<()> {
    let cache = Arc::new(ResolutionCache::with_defaults());
    let terms = ["react", "reactjs", "react.js", "React", "facebook react"];

    let mut handles = Vec::new();
    for round in 0..10 {
        for term in terms {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .upsert(
                        LibraryInput::new(term, "/facebook/react").snippet_count(round),
                    )
                    .await
            }));
        }
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(cache.size().await, 1);
    let snapshot = cache.all().await;
    let names: HashSet<String> = snapshot[0].names.iter().map(|n| n.to_lowercase()).collect();
    for term in terms {
        assert!(names.contains(&term.to_lowercase()), "missing {}", term);
        assert_eq!(
            cache.get(term).await.map(|r| r.identifier().to_string()),
            Some("/facebook/react".to_string())
        );
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_observe_partial_updates() -> anyhow::Result<()> {
    let cache = Arc::new(ResolutionCache::with_defaults());
    cache
        .upsert(LibraryInput::new("axum", "/tokio-rs/axum").alias("axum-rs"))
        .await?;

    let writer = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            for i in 0..200 {
                let term = if i % 2 == 0 { "axum" } else { "axum web" };
                cache
                    .upsert(LibraryInput::new(term, "/tokio-rs/axum").alias("axum-rs"))
                    .await?;
            }
            Ok::<_, libscout_core::ScoutError>(())
        })
    };

    let reader = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            for _ in 0..200 {
                let record = cache.get("axum-rs").await.expect("alias always resolves");
                assert_eq!(record.identifier(), "/tokio-rs/axum");
                assert_eq!(cache.size().await, 1);
            }
        })
    };

    writer.await??;
    reader.await?;
    Ok(())
}

#[tokio::test]
async fn test_store_behind_trait_object() -> anyhow::Result<()> {
    let store: Arc<dyn ResolutionStore> = Arc::new(ResolutionCache::with_defaults());

    store
        .upsert(UpsertInput::from(RepositoryInput::new(
            "ripgrep",
            "BurntSushi/ripgrep",
        )))
        .await?;

    assert_eq!(store.size().await, 1);
    let snapshot = store.snapshot(5, Some(RecordKind::Repository)).await;
    assert_eq!(snapshot[0].identifier(), "BurntSushi/ripgrep");
    assert!(store.get("RIPGREP").await.is_some());
    Ok(())
}
