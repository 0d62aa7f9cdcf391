use thiserror::Error;

/// Characters of file content returned before truncating.
pub const PREVIEW_LIMIT: usize = 20_000;

const TRUNCATION_MARKER: &str = "\n\n/* ... (이후 내용 생략) */";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to fetch file: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Fetches stored project file content for inline viewing.
pub struct FilePreviewService {
    client: reqwest::Client,
}

impl FilePreviewService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<String, PreviewError> {
        let content = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(truncate_preview(content, PREVIEW_LIMIT))
    }
}

impl Default for FilePreviewService {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the first `limit` characters and appends a marker when anything was cut.
pub fn truncate_preview(content: String, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content,
    }
}
