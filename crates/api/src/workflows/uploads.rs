//! Image uploads on behalf of the registry forms.

use qtrace_cloud::image_host::{ImageHost, ImageHostError, ImageUpload};
use qtrace_core::forms::PhotoChoice;

/// What a failed upload does to the submission it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    /// The failure aborts the submission; nothing is written.
    Strict,
    /// The failure is logged and the image is stored as an empty URL.
    Lenient,
}

/// Upload one image under `policy`.
pub async fn upload_image(
    host: &dyn ImageHost,
    image: ImageUpload,
    policy: UploadPolicy,
) -> Result<String, ImageHostError> {
    let file_name = image.file_name.clone();
    match host.upload(image).await {
        Ok(url) => Ok(url),
        Err(e) if policy == UploadPolicy::Lenient => {
            tracing::warn!(file_name = %file_name, error = %e, "Image upload failed, saving without it");
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

/// Upload images one after another, in order. Each upload starts only
/// once the previous one has finished.
pub async fn upload_sequentially(
    host: &dyn ImageHost,
    images: Vec<ImageUpload>,
    policy: UploadPolicy,
) -> Result<Vec<String>, ImageHostError> {
    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        urls.push(upload_image(host, image, policy).await?);
    }
    Ok(urls)
}

/// The URL to store for a photo field.
pub async fn resolve_photo(
    host: &dyn ImageHost,
    choice: PhotoChoice<ImageUpload>,
    policy: UploadPolicy,
) -> Result<String, ImageHostError> {
    match choice {
        PhotoChoice::Upload(image) => upload_image(host, image, policy).await,
        shown => Ok(shown.preview_url().unwrap_or_default().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;

    /// Records upload order and the peak number of concurrent uploads.
    #[derive(Default)]
    struct RecordingHost {
        active: AtomicUsize,
        peak: AtomicUsize,
        order: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl ImageHost for RecordingHost {
        async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            self.order.lock().unwrap().push(image.file_name.clone());
            if self.fail_on == Some(image.file_name.as_str()) {
                return Err(ImageHostError::Api {
                    status: 400,
                    body: "Invalid image".into(),
                });
            }
            Ok(format!("https://img.test/{}", image.file_name))
        }
    }

    fn image(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.into(),
            content_type: None,
            bytes: vec![0],
        }
    }

    #[tokio::test]
    async fn uploads_run_one_at_a_time_in_order() {
        let host = RecordingHost::default();
        let urls = upload_sequentially(
            &host,
            vec![image("a.png"), image("b.png"), image("c.png")],
            UploadPolicy::Strict,
        )
        .await
        .unwrap();

        assert_eq!(
            urls,
            vec!["https://img.test/a.png", "https://img.test/b.png", "https://img.test/c.png"]
        );
        assert_eq!(host.peak.load(Ordering::SeqCst), 1);
        assert_eq!(*host.order.lock().unwrap(), vec!["a.png", "b.png", "c.png"]);
    }

    #[tokio::test]
    async fn strict_failure_stops_the_batch() {
        let host = RecordingHost {
            fail_on: Some("b.png"),
            ..Default::default()
        };
        let result = upload_sequentially(
            &host,
            vec![image("a.png"), image("b.png"), image("c.png")],
            UploadPolicy::Strict,
        )
        .await;

        assert_matches!(result, Err(ImageHostError::Api { status: 400, .. }));
        assert_eq!(*host.order.lock().unwrap(), vec!["a.png", "b.png"]);
    }

    #[tokio::test]
    async fn lenient_failure_reads_as_empty_url() {
        let host = RecordingHost {
            fail_on: Some("logo.png"),
            ..Default::default()
        };
        let url = upload_image(&host, image("logo.png"), UploadPolicy::Lenient)
            .await
            .unwrap();
        assert_eq!(url, "");
    }

    #[tokio::test]
    async fn photo_choice_resolution() {
        let host = RecordingHost::default();
        let uploaded = resolve_photo(&host, PhotoChoice::Upload(image("p.png")), UploadPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(uploaded, "https://img.test/p.png");

        let typed = resolve_photo(&host, PhotoChoice::Url("https://x/y.png".into()), UploadPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(typed, "https://x/y.png");

        let kept = resolve_photo(&host, PhotoChoice::Keep("old".into()), UploadPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(kept, "old");

        let none = resolve_photo(&host, PhotoChoice::Keep(String::new()), UploadPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(none, "");
        assert_eq!(host.order.lock().unwrap().len(), 1);
    }
}
