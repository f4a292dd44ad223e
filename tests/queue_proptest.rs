//! Property tests for the sync queue and operation payload encoding.

use auditsync::shared::audit::{AuditStatus, SyncOperation};
use auditsync::LocalStore;
use proptest::prelude::*;
use uuid::Uuid;

fn status_from_index(index: u8) -> AuditStatus {
    match index % 4 {
        0 => AuditStatus::Pending,
        1 => AuditStatus::Passed,
        2 => AuditStatus::Failed,
        _ => AuditStatus::NotApplicable,
    }
}

proptest! {
    #[test]
    fn operation_payload_roundtrips(
        status_index in 0u8..4,
        comment in proptest::option::of(".{0,80}"),
        photos in proptest::collection::vec("[a-z0-9:/._-]{1,40}", 0..5),
    ) {
        let operation = SyncOperation::UpdateResult {
            result_id: Uuid::new_v4(),
            status: status_from_index(status_index),
            comment,
            photos,
        };
        let json = serde_json::to_string(&operation).unwrap();
        let back: SyncOperation = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, operation);
    }

    #[test]
    fn status_parse_never_panics(raw in ".{0,32}") {
        // Unknown strings degrade to Pending instead of failing a row read
        let status = AuditStatus::from_str(&raw);
        let known = ["pending", "passed", "failed", "not_applicable"];
        if !known.contains(&raw.as_str()) {
            prop_assert_eq!(status, AuditStatus::Pending);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn queue_preserves_insertion_order(count in 1usize..16) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let dir = tempfile::tempdir().unwrap();
            let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

            let mut expected = Vec::new();
            for i in 0..count {
                let operation = if i % 2 == 0 {
                    SyncOperation::UpdateResult {
                        result_id: Uuid::new_v4(),
                        status: AuditStatus::Passed,
                        comment: None,
                        photos: vec![],
                    }
                } else {
                    SyncOperation::UploadImage {
                        image_id: format!("img-{}", i),
                        result_id: Uuid::new_v4(),
                    }
                };
                let id = store.enqueue_operation(&operation).await.unwrap();
                expected.push(id);
            }

            let pending = store.pending_operations().await.unwrap();
            let actual: Vec<i64> = pending.iter().map(|op| op.id).collect();
            assert_eq!(actual, expected);
        });
    }
}
