use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;

use crate::documents::{DocumentKind, DocumentStore};

/// `documents/{user}/{plan}/{kind}-{job}.md`. Path separators in the parts
/// are replaced so each part stays one key segment.
pub fn document_key(user_id: &str, plan_id: &str, kind: DocumentKind, job_id: &str) -> String {
    let clean = |s: &str| s.replace(['/', '\\'], "_");
    format!(
        "documents/{}/{}/{}-{}.md",
        clean(user_id),
        clean(plan_id),
        kind.as_str(),
        clean(job_id)
    )
}

/// Markdown documents in the configured S3 (or MinIO) bucket.
#[derive(Clone)]
pub struct S3DocumentStore {
    s3: S3Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(s3: S3Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, markdown: &str) -> anyhow::Result<String> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(markdown.as_bytes().to_vec()))
            .content_type("text/markdown")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded document to s3://{}/{}", self.bucket, key);
        Ok(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_layout() {
        assert_eq!(
            document_key("u-1", "plan-9", DocumentKind::CoverLetter, "job-3"),
            "documents/u-1/plan-9/cover-letter-job-3.md"
        );
    }

    #[test]
    fn test_document_key_sanitises_separators() {
        assert_eq!(
            document_key("../u", "p", DocumentKind::Resume, "a/b"),
            "documents/.._u/p/resume-a_b.md"
        );
    }
}
