//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::{Path, PathBuf};
    use wavecollapse::AlgorithmError;
    use wavecollapse::io::error::{invalid_catalog, invalid_parameter, invalid_source};

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AlgorithmError::FileSystem {
            path: "/tmp/tiles.json".into(),
            operation: "read definition",
            source: io_error,
        };

        assert!(error.source().is_some());
        let message = error.to_string();
        assert!(message.contains("read definition"));
        assert!(message.contains("/tmp/tiles.json"));
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("symmetry", &9, &"must be between 1 and 8");

        let message = error.to_string();
        assert!(message.contains("symmetry"));
        assert!(message.contains('9'));
        assert!(message.contains("must be between 1 and 8"));
        assert!(error.source().is_none());
    }

    // Tests the helpers build the matching variants
    // Verified by swapping the helper targets
    #[test]
    fn test_error_helpers() {
        assert!(matches!(
            invalid_catalog(&"empty"),
            AlgorithmError::InvalidCatalog { reason } if reason == "empty"
        ));
        assert!(matches!(
            invalid_source(&"too small"),
            AlgorithmError::InvalidSourceData { reason } if reason == "too small"
        ));
    }

    // Tests geometry errors name the requested size and minimum
    // Verified by omitting the minimum from the message
    #[test]
    fn test_invalid_geometry_error() {
        let error = AlgorithmError::InvalidGeometry {
            width: 2,
            height: 1,
            minimum: 3,
        };

        let message = error.to_string();
        assert!(message.contains("2x1"));
        assert!(message.contains('3'));
    }

    // Tests unknown tile and tile index formatting
    // Verified by omitting the tile name from the message
    #[test]
    fn test_tile_errors() {
        let unknown = AlgorithmError::UnknownTile {
            name: "bridge".to_string(),
        };
        assert!(unknown.to_string().contains("bridge"));

        let index = AlgorithmError::InvalidTileIndex {
            index: 12,
            max_tiles: 4,
        };
        let message = index.to_string();
        assert!(message.contains("12"));
        assert!(message.contains('4'));
    }

    // Tests definition parse errors keep the path and the parser source
    // Verified by dropping the serde error from the source chain
    #[test]
    fn test_definition_error() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = AlgorithmError::Definition {
            path: PathBuf::from("sets/knots.json"),
            source: parse_error,
        };

        assert!(error.to_string().contains("sets/knots.json"));
        assert!(error.source().is_some());
    }

    // Tests ImageExport error with IO source
    // Verified by excluding source error from message
    #[test]
    fn test_image_export_error() {
        let image_error = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));

        let error = AlgorithmError::ImageExport {
            path: PathBuf::from("/restricted/output.png"),
            source: image_error,
        };

        let message = error.to_string();
        assert!(message.contains("/restricted/output.png"));
        assert!(message.contains("access denied"));
        assert!(error.source().is_some());
    }

    // Tests conversions used by the ? operator
    // Verified by dropping the From implementations
    #[test]
    fn test_from_conversions() {
        let io: AlgorithmError = std::io::Error::other("disk").into();
        assert!(matches!(io, AlgorithmError::FileSystem { .. }));

        let image_error = image::open(Path::new("/nonexistent/none.png")).unwrap_err();
        let converted: AlgorithmError = image_error.into();
        assert!(matches!(converted, AlgorithmError::ImageLoad { .. }));
    }
}
