//! What the results panel shows for a successful upload.

use crate::config::PLACEHOLDER_IMAGE;
use crate::types::UploadResult;

/// URL of an image served by the preview route.
pub fn preview_url(backend_url: &str, file: &str) -> String {
    format!("{}/preview/{}", backend_url, file)
}

/// URL of an artifact served by the download route.
pub fn download_url(backend_url: &str, file: &str) -> String {
    format!("{}/download/{}", backend_url, file)
}

/// Text of the success notice that follows every result.
pub fn success_message(file_count: usize) -> String {
    format!("Successfully processed {} image(s)!", file_count)
}

/// Render-ready description of a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultView {
    Single {
        /// Original image, placeholder when the server did not keep it
        original_src: String,
        processed_src: String,
        download_href: String,
    },
    Bulk {
        summary: String,
        download_href: String,
        download_label: String,
        file_count: usize,
    },
}

impl ResultView {
    pub fn from_result(result: &UploadResult, backend_url: &str) -> Self {
        match result {
            UploadResult::Single { original_file, output_file, .. } => ResultView::Single {
                original_src: original_file
                    .as_deref()
                    .map(|file| preview_url(backend_url, file))
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                processed_src: preview_url(backend_url, output_file),
                download_href: download_url(backend_url, output_file),
            },
            UploadResult::Bulk { output_file, file_count, .. } => ResultView::Bulk {
                summary: format!("Successfully processed {} images", file_count),
                download_href: download_url(backend_url, output_file),
                download_label: format!("Download All ({} Files)", file_count),
                file_count: *file_count,
            },
        }
    }

    /// The single download link of this view.
    pub fn download_href(&self) -> &str {
        match self {
            ResultView::Single { download_href, .. } | ResultView::Bulk { download_href, .. } => {
                download_href
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_view_points_at_preview_and_download() {
        let result = UploadResult::Single {
            original_file: Some("c0ffee_cat.jpg".into()),
            output_file: "processed_c0ffee.png".into(),
            file_count: 1,
        };

        let view = ResultView::from_result(&result, "");
        assert_eq!(
            view,
            ResultView::Single {
                original_src: "/preview/c0ffee_cat.jpg".into(),
                processed_src: "/preview/processed_c0ffee.png".into(),
                download_href: "/download/processed_c0ffee.png".into(),
            }
        );
    }

    #[test]
    fn test_single_view_without_original_uses_placeholder() {
        let result = UploadResult::Single {
            original_file: None,
            output_file: "processed_1.png".into(),
            file_count: 1,
        };

        match ResultView::from_result(&result, "http://localhost:5000") {
            ResultView::Single { original_src, processed_src, .. } => {
                assert_eq!(original_src, PLACEHOLDER_IMAGE);
                assert_eq!(processed_src, "http://localhost:5000/preview/processed_1.png");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_bulk_view_shows_count_and_archive_link() {
        let result = UploadResult::Bulk {
            output_file: "batch_0a1b2c3d.zip".into(),
            file_count: 7,
            total_size: Some(4096),
        };

        let view = ResultView::from_result(&result, "");
        assert_eq!(view.download_href(), "/download/batch_0a1b2c3d.zip");
        match view {
            ResultView::Bulk { summary, download_label, file_count, .. } => {
                assert_eq!(file_count, 7);
                assert_eq!(summary, "Successfully processed 7 images");
                assert_eq!(download_label, "Download All (7 Files)");
            }
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(success_message(7), "Successfully processed 7 image(s)!");
    }
}
