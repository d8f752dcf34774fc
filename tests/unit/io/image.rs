//! Tests for PNG import and export of RGBA buffers

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use wavecollapse::AlgorithmError;
    use wavecollapse::io::image::{export_rgba_as_png, load_rgba};

    // Tests that exported pixels load back unchanged
    // Verified by exporting in RGB instead of RGBA
    #[test]
    fn test_export_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/out.png");
        let pixels = vec![
            255, 0, 0, 255, 0, 255, 0, 128, //
            0, 0, 255, 255, 10, 20, 30, 0,
        ];

        export_rgba_as_png(&pixels, 2, 2, &path).unwrap();
        let (loaded, width, height) = load_rgba(&path).unwrap();

        assert_eq!((width, height), (2, 2));
        assert_eq!(loaded, pixels);
    }

    // Tests rejection of a buffer that does not match the dimensions
    // Verified by padding short buffers with zeros
    #[test]
    fn test_export_wrong_length() {
        let temp_dir = TempDir::new().unwrap();
        let result = export_rgba_as_png(&[0; 12], 2, 2, temp_dir.path().join("out.png"));

        assert!(matches!(result, Err(AlgorithmError::InvalidSourceData { .. })));
        assert!(!temp_dir.path().join("out.png").exists());
    }

    // Tests the error for a missing input
    // Verified by returning an empty image for missing files
    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_rgba(temp_dir.path().join("absent.png"));

        assert!(matches!(result, Err(AlgorithmError::ImageLoad { .. })));
    }

    // Tests export into an existing file path used as a directory
    // Verified by ignoring directory creation failures
    #[test]
    fn test_export_into_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let result = export_rgba_as_png(&[0; 4], 1, 1, blocker.join("out.png"));

        assert!(matches!(result, Err(AlgorithmError::FileSystem { .. })));
    }
}
