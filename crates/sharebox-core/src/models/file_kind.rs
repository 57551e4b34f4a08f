use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Display category of a file, derived from its declared MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Spreadsheet,
    Presentation,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let normalized = content_type.trim().to_lowercase();
        let essence = normalized.split(';').next().unwrap_or("").trim();

        if essence.starts_with("image/") {
            return FileKind::Image;
        }
        if essence.starts_with("video/") {
            return FileKind::Video;
        }
        if essence.starts_with("audio/") {
            return FileKind::Audio;
        }

        match essence {
            "application/pdf"
            | "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                FileKind::Document
            }
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                FileKind::Spreadsheet
            }
            "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                FileKind::Presentation
            }
            "application/zip" | "application/x-zip-compressed" => FileKind::Archive,
            _ => FileKind::Other,
        }
    }
}

/// Format a byte count the way the share page shows it ("512 B", "1.5 KB", "2.4 MB")
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_content_type() {
        assert_eq!(FileKind::from_content_type("image/jpeg"), FileKind::Image);
        assert_eq!(FileKind::from_content_type("video/mp4"), FileKind::Video);
        assert_eq!(FileKind::from_content_type("audio/mpeg"), FileKind::Audio);
        assert_eq!(
            FileKind::from_content_type("application/pdf"),
            FileKind::Document
        );
        assert_eq!(
            FileKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            FileKind::Spreadsheet
        );
        assert_eq!(
            FileKind::from_content_type("application/vnd.ms-powerpoint"),
            FileKind::Presentation
        );
        assert_eq!(
            FileKind::from_content_type("application/x-zip-compressed"),
            FileKind::Archive
        );
        assert_eq!(
            FileKind::from_content_type("application/octet-stream"),
            FileKind::Other
        );
    }

    #[test]
    fn test_kind_ignores_case_and_parameters() {
        assert_eq!(
            FileKind::from_content_type("IMAGE/PNG; charset=binary"),
            FileKind::Image
        );
    }

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * MIB), "3.0 MB");
        assert_eq!(format_file_size(2 * GIB), "2.0 GB");
    }
}
