/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Maximum accepted image size for logo and photo uploads (2 MiB)
pub const MAX_IMAGE_SIZE: u64 = 2 * 1024 * 1024;

/// Whether an image of `size` bytes is small enough to upload
pub fn validate_image_size(size: u64) -> bool {
    size <= MAX_IMAGE_SIZE
}

/// Lower-case extension of a file name, without the dot.
///
/// Falls back to `bin` when the name has no extension.
pub fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_limit() {
        assert!(validate_image_size(0));
        assert!(validate_image_size(MAX_IMAGE_SIZE));
        assert!(!validate_image_size(MAX_IMAGE_SIZE + 1));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("shop.JPG"), "jpg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "bin");
    }
}
