use argus_core::errors::*;

#[test]
fn dimension_mismatch_carries_values() {
    let err = StoreError::DimensionMismatch {
        collection: "features_cnn".into(),
        expected: 2048,
        actual: 3,
    };
    let msg = err.to_string();
    assert!(msg.contains("features_cnn"));
    assert!(msg.contains("2048"));
    assert!(msg.contains("3"));
}

#[test]
fn connection_failed_carries_endpoint() {
    let err = StoreError::ConnectionFailed {
        endpoint: "http://localhost:19530".into(),
        reason: "connection refused".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("http://localhost:19530"));
    assert!(msg.contains("connection refused"));
}

#[test]
fn collection_not_found_carries_name() {
    let err = StoreError::CollectionNotFound {
        name: "features_motion".into(),
    };
    assert!(err.to_string().contains("features_motion"));
}

#[test]
fn hash_length_mismatch_carries_lengths() {
    let err = MatchError::HashLengthMismatch { left: 8, right: 16 };
    let msg = err.to_string();
    assert!(msg.contains("8"));
    assert!(msg.contains("16"));
}

#[test]
fn deadline_exceeded_carries_stage_and_elapsed() {
    let err = PipelineError::DeadlineExceeded {
        stage: "verify".into(),
        elapsed_ms: 30_000,
    };
    let msg = err.to_string();
    assert!(msg.contains("verify"));
    assert!(msg.contains("30000"));
}

// --- From impls ---

#[test]
fn store_error_converts_to_argus_error() {
    let store_err = StoreError::CollectionNotFound {
        name: "missing".into(),
    };
    let argus_err: ArgusError = store_err.into();
    assert!(matches!(argus_err, ArgusError::StoreError(_)));
}

#[test]
fn query_error_converts_to_argus_error() {
    let query_err = QueryError::SearchFailed {
        reason: "backend down".into(),
    };
    let argus_err: ArgusError = query_err.into();
    assert!(matches!(argus_err, ArgusError::QueryError(_)));
}

#[test]
fn match_error_converts_to_argus_error() {
    let match_err = MatchError::HashLengthMismatch { left: 4, right: 8 };
    let argus_err: ArgusError = match_err.into();
    assert!(matches!(argus_err, ArgusError::MatchError(_)));
}

#[test]
fn pipeline_error_converts_to_argus_error() {
    let pipe_err = PipelineError::ExtractionFailed {
        reason: "codec unsupported".into(),
    };
    let argus_err: ArgusError = pipe_err.into();
    assert!(matches!(argus_err, ArgusError::PipelineError(_)));
}

#[test]
fn serialization_error_converts_to_argus_error() {
    let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
    let argus_err: ArgusError = json_err.into();
    assert!(matches!(argus_err, ArgusError::SerializationError(_)));
}

// --- Connection-failure classification ---

#[test]
fn connection_failed_is_a_connection_failure() {
    let err: ArgusError = StoreError::ConnectionFailed {
        endpoint: "http://h".into(),
        reason: "timeout".into(),
    }
    .into();
    assert!(err.is_connection_failure());
}

#[test]
fn other_store_errors_are_not_connection_failures() {
    let err: ArgusError = StoreError::DimensionMismatch {
        collection: "c".into(),
        expected: 4,
        actual: 3,
    }
    .into();
    assert!(!err.is_connection_failure());
}
