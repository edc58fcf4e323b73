//! Behaviour every [`ObjectStore`] backend must share, run against each one.

use std::sync::Arc;

use vos_crypto::ContentHasher;
use vos_types::{ObjectKey, ObjectMeta, OrgId, Summary, Timestamp, UserInfo, Version};

use crate::traits::{DeleteOutcome, ObjectStore, PutOutcome, StoredVersion};

const ORG: OrgId = OrgId(1);

pub fn record(kind: &str, uid: &str, seq: u64, body: &[u8]) -> StoredVersion {
    let actor = UserInfo { id: 1, login: "fake".into() };
    StoredVersion {
        meta: ObjectMeta {
            key: ObjectKey::new(kind, uid),
            version: Version::from_sequence(seq),
            created: Timestamp::from_millis(1_000),
            modified: Timestamp::from_millis(1_000 * seq as i64),
            created_by: actor.clone(),
            modified_by: actor,
            comment: Some(format!("v{seq}")),
            etag: ContentHasher::BODY.hash(body),
            size: body.len() as u64,
        },
        body: body.to_vec(),
        summary: Some(Summary::named(uid).with_label("seq", seq.to_string())),
    }
}

fn v(seq: u64) -> Version {
    Version::from_sequence(seq)
}

pub async fn create_then_get(store: &dyn ObjectStore) {
    let rec = record("dashboard", "my-test-entity", 1, b"{\"name\":\"John\"}");
    let key = rec.meta.key.clone();
    assert_eq!(store.get(ORG, &key, None).await.unwrap(), None);

    let out = store.conditional_put(ORG, None, rec.clone()).await.unwrap();
    assert_eq!(out, PutOutcome::Committed);

    let got = store.get(ORG, &key, None).await.unwrap().expect("should exist");
    assert_eq!(got, rec);
    assert_eq!(store.last_minted(ORG, &key).await.unwrap(), Some(v(1)));
}

pub async fn put_requires_matching_head(store: &dyn ObjectStore) {
    let rec = record("dashboard", "a", 1, b"one");
    let key = rec.meta.key.clone();
    store.conditional_put(ORG, None, rec).await.unwrap();

    let again = store
        .conditional_put(ORG, None, record("dashboard", "a", 2, b"two"))
        .await
        .unwrap();
    assert_eq!(again, PutOutcome::Conflict { current: Some(v(1)) });

    let stale = store
        .conditional_put(ORG, Some(&v(7)), record("dashboard", "a", 2, b"two"))
        .await
        .unwrap();
    assert_eq!(stale, PutOutcome::Conflict { current: Some(v(1)) });

    let absent = store
        .conditional_put(ORG, Some(&v(1)), record("dashboard", "missing", 2, b"x"))
        .await
        .unwrap();
    assert_eq!(absent, PutOutcome::Conflict { current: None });

    let head = store.get(ORG, &key, None).await.unwrap().unwrap();
    assert_eq!(head.body, b"one");
}

pub async fn chain_and_specific_versions(store: &dyn ObjectStore) {
    store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"one"))
        .await
        .unwrap();
    store
        .conditional_put(ORG, Some(&v(1)), record("dashboard", "a", 2, b"two"))
        .await
        .unwrap();
    store
        .conditional_put(ORG, Some(&v(2)), record("dashboard", "a", 3, b"three"))
        .await
        .unwrap();
    let key = ObjectKey::new("dashboard", "a");

    let head = store.get(ORG, &key, None).await.unwrap().unwrap();
    assert_eq!(head.meta.version, v(3));
    assert_eq!(head.body, b"three");

    let first = store.get(ORG, &key, Some(&v(1))).await.unwrap().unwrap();
    assert_eq!(first.body, b"one");
    assert_eq!(first.summary.unwrap().labels["seq"], "1");

    assert!(store.get(ORG, &key, Some(&v(9))).await.unwrap().is_none());

    let history: Vec<Version> = store
        .history(ORG, &key)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.version)
        .collect();
    assert_eq!(history, vec![v(1), v(2), v(3)]);
}

pub async fn delete_requires_matching_head(store: &dyn ObjectStore) {
    store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"one"))
        .await
        .unwrap();
    store
        .conditional_put(ORG, Some(&v(1)), record("dashboard", "a", 2, b"two"))
        .await
        .unwrap();
    let key = ObjectKey::new("dashboard", "a");

    let stale = store.conditional_delete(ORG, &key, &v(1)).await.unwrap();
    assert_eq!(stale, DeleteOutcome::Conflict { current: Some(v(2)) });
    let still = store.get(ORG, &key, None).await.unwrap().unwrap();
    assert_eq!(still.meta.version, v(2));
    assert_eq!(still.body, b"two");

    let done = store.conditional_delete(ORG, &key, &v(2)).await.unwrap();
    assert_eq!(done, DeleteOutcome::Deleted);
    assert!(store.get(ORG, &key, None).await.unwrap().is_none());
    assert!(store.get(ORG, &key, Some(&v(1))).await.unwrap().is_none());
    assert!(store.history(ORG, &key).await.unwrap().is_empty());

    let retry = store.conditional_delete(ORG, &key, &v(2)).await.unwrap();
    assert_eq!(retry, DeleteOutcome::Conflict { current: None });
}

pub async fn minted_versions_survive_delete(store: &dyn ObjectStore) {
    let key = ObjectKey::new("dashboard", "a");
    store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"one"))
        .await
        .unwrap();
    store.conditional_delete(ORG, &key, &v(1)).await.unwrap();
    assert_eq!(store.last_minted(ORG, &key).await.unwrap(), Some(v(1)));

    let reuse = store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"again"))
        .await
        .unwrap();
    assert_eq!(reuse, PutOutcome::Conflict { current: None });

    let fresh = store
        .conditional_put(ORG, None, record("dashboard", "a", 2, b"again"))
        .await
        .unwrap();
    assert_eq!(fresh, PutOutcome::Committed);
    assert_eq!(store.last_minted(ORG, &key).await.unwrap(), Some(v(2)));
}

/// A writer that minted its token before a later create, update and delete
/// must not commit it once the chain is gone.
pub async fn put_below_minted_mark_is_rejected(store: &dyn ObjectStore) {
    let key = ObjectKey::new("dashboard", "a");
    store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"one"))
        .await
        .unwrap();
    store
        .conditional_put(ORG, Some(&v(1)), record("dashboard", "a", 2, b"two"))
        .await
        .unwrap();
    store.conditional_delete(ORG, &key, &v(2)).await.unwrap();

    let stale = store
        .conditional_put(ORG, None, record("dashboard", "a", 1, b"late"))
        .await
        .unwrap();
    assert_eq!(stale, PutOutcome::Conflict { current: None });
    assert_eq!(store.last_minted(ORG, &key).await.unwrap(), Some(v(2)));
    assert!(store.get(ORG, &key, None).await.unwrap().is_none());

    let fresh = store
        .conditional_put(ORG, None, record("dashboard", "a", 3, b"three"))
        .await
        .unwrap();
    assert_eq!(fresh, PutOutcome::Committed);
    assert_eq!(store.last_minted(ORG, &key).await.unwrap(), Some(v(3)));
}

pub async fn orgs_are_isolated(store: &dyn ObjectStore) {
    let other = OrgId(2);
    let key = ObjectKey::new("dashboard", "shared");
    store
        .conditional_put(ORG, None, record("dashboard", "shared", 1, b"org1"))
        .await
        .unwrap();

    assert!(store.get(other, &key, None).await.unwrap().is_none());
    assert!(store.list(other, "dashboard").await.unwrap().is_empty());
    assert_eq!(store.last_minted(other, &key).await.unwrap(), None);

    let out = store
        .conditional_put(other, None, record("dashboard", "shared", 1, b"org2"))
        .await
        .unwrap();
    assert_eq!(out, PutOutcome::Committed);
    assert_eq!(store.get(ORG, &key, None).await.unwrap().unwrap().body, b"org1");
    assert_eq!(store.get(other, &key, None).await.unwrap().unwrap().body, b"org2");
}

pub async fn list_returns_heads_by_uid(store: &dyn ObjectStore) {
    for uid in ["b", "a", "c"] {
        store
            .conditional_put(ORG, None, record("dashboard", uid, 1, b"{}"))
            .await
            .unwrap();
    }
    store
        .conditional_put(ORG, None, record("playlist", "p", 1, b"{}"))
        .await
        .unwrap();
    store
        .conditional_put(ORG, Some(&v(1)), record("dashboard", "a", 2, b"{\"x\":1}"))
        .await
        .unwrap();

    let listed = store.list(ORG, "dashboard").await.unwrap();
    let uids: Vec<&str> = listed.iter().map(|l| l.meta.key.uid.as_str()).collect();
    assert_eq!(uids, vec!["a", "b", "c"]);
    assert_eq!(listed[0].meta.version, v(2));
    assert_eq!(listed[0].summary.as_ref().unwrap().labels["seq"], "2");
    assert_eq!(store.list(ORG, "playlist").await.unwrap().len(), 1);
    assert!(store.list(ORG, "folder").await.unwrap().is_empty());
}

pub async fn body_bytes_are_preserved(store: &dyn ObjectStore) {
    let body: Vec<u8> = (0..=255u8).chain([0, 0, 255]).collect();
    let rec = record("blob", "bytes", 1, &body);
    store.conditional_put(ORG, None, rec.clone()).await.unwrap();
    let got = store.get(ORG, &rec.meta.key, None).await.unwrap().unwrap();
    assert_eq!(got.body, body);
    assert!(ContentHasher::BODY.verify(&got.body, &got.meta.etag));
}

pub async fn concurrent_puts_with_same_expectation<S: ObjectStore + 'static>(store: Arc<S>) {
    store
        .conditional_put(ORG, None, record("dashboard", "race", 1, b"base"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let rec = record("dashboard", "race", 2, &[i]);
            store.conditional_put(ORG, Some(&v(1)), rec).await.unwrap()
        }));
    }

    let mut committed = 0;
    for h in handles {
        match h.await.unwrap() {
            PutOutcome::Committed => committed += 1,
            PutOutcome::Conflict { current } => assert_eq!(current, Some(v(2))),
        }
    }
    assert_eq!(committed, 1);
    let history = store
        .history(ORG, &ObjectKey::new("dashboard", "race"))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}
