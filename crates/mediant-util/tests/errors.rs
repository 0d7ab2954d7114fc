use mediant_util::errors::MediantError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = MediantError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_malformed_version_display() {
    let err = MediantError::malformed_version("[1.0", "missing closing bracket");
    assert_eq!(
        err.to_string(),
        "Malformed version '[1.0': missing closing bracket"
    );
}

#[test]
fn test_metadata_unavailable_display() {
    let err = MediantError::MetadataUnavailable {
        coordinate: "org.example:lib:1.0".to_string(),
        message: "timed out".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Metadata unavailable for org.example:lib:1.0: timed out"
    );
}

#[test]
fn test_manifest_error_display() {
    let err = MediantError::Manifest {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Manifest error: bad syntax");
}

#[test]
fn test_generic_error_display() {
    let err = MediantError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_error_converts_into_report() {
    let report: miette::Report = MediantError::malformed_version("", "empty").into();
    assert!(matches!(
        report.downcast_ref::<MediantError>(),
        Some(MediantError::MalformedVersion { .. })
    ));
}
