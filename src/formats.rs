use crate::error::{CompressionError, Result};

/// Output formats the compression pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Parses a user-supplied format token. Anything outside the three
    /// supported formats is rejected up front.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "webp" => Ok(OutputFormat::WebP),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(CompressionError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Infers an output format from a file extension, if it maps to one.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::from_name(extension).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracts the subtype from a MIME type like `image/png`, used to report
/// the format of outcomes that keep the original bytes.
pub fn format_name_from_mime(mime_type: &str) -> String {
    mime_type
        .split('/')
        .nth(1)
        .unwrap_or(mime_type)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_supported() {
        assert_eq!(OutputFormat::from_name("webp").unwrap(), OutputFormat::WebP);
        assert_eq!(OutputFormat::from_name("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("jpg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("PNG").unwrap(), OutputFormat::Png);
    }

    #[test]
    fn test_from_name_unsupported() {
        let result = OutputFormat::from_name("avif");
        assert!(matches!(
            result,
            Err(CompressionError::UnsupportedFormat(_))
        ));

        let result = OutputFormat::from_name("gif");
        assert!(matches!(
            result,
            Err(CompressionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_extension_and_mime() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Png.name(), "png");
    }

    #[test]
    fn test_format_name_from_mime() {
        assert_eq!(format_name_from_mime("image/png"), "png");
        assert_eq!(format_name_from_mime("image/jpeg"), "jpeg");
        assert_eq!(format_name_from_mime("weird"), "weird");
    }
}
