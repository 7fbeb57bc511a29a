use std::path::PathBuf;

use review_core::model::Paper;
use url::Url;

/// Host that refuses to be embedded in a frame.
const EMBED_BLOCKED_HOST: &str = "ncbi.nlm.nih.gov";

/// Where a paper's PDF can be shown from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PdfSource {
    Remote(Url),
    /// Must be opened outside the app.
    EmbedBlocked(Url),
    Local(PathBuf),
    Unavailable,
}

/// Classify a paper's PDF. A configured URL wins over a local file.
#[must_use]
pub fn resolve_pdf_source(paper: &Paper) -> PdfSource {
    if let Some(url) = paper.remote_pdf() {
        let blocked = url
            .host_str()
            .is_some_and(|host| host == EMBED_BLOCKED_HOST || host.ends_with(".ncbi.nlm.nih.gov"));
        return if blocked {
            PdfSource::EmbedBlocked(url)
        } else {
            PdfSource::Remote(url)
        };
    }

    match paper.local_pdf() {
        Some(path) if path.is_file() => PdfSource::Local(path.to_path_buf()),
        _ => PdfSource::Unavailable,
    }
}

/// Bytes of the paper's local PDF, if it has one that can be read.
pub async fn read_local_pdf(paper: &Paper) -> Option<Vec<u8>> {
    let path = paper.local_pdf()?;
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "local pdf not readable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::model::{PaperId, ReviewConfig};

    #[test]
    fn pubmed_central_links_are_embed_blocked() {
        let config = ReviewConfig::builtin();
        let arxiv = config.paper(PaperId::new(1)).unwrap();
        let pmc = config.paper(PaperId::new(2)).unwrap();
        assert!(matches!(resolve_pdf_source(arxiv), PdfSource::Remote(_)));
        assert!(matches!(resolve_pdf_source(pmc), PdfSource::EmbedBlocked(_)));
    }

    #[tokio::test]
    async fn local_file_is_used_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let paper = Paper::new(PaperId::new(5), "Local").with_local_pdf(&path);
        assert_eq!(resolve_pdf_source(&paper), PdfSource::Unavailable);
        assert!(read_local_pdf(&paper).await.is_none());

        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();
        assert_eq!(resolve_pdf_source(&paper), PdfSource::Local(path));
        assert_eq!(read_local_pdf(&paper).await.unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn paper_without_sources_is_unavailable() {
        let paper = Paper::new(PaperId::new(9), "Nothing").with_pdf_url("");
        assert_eq!(resolve_pdf_source(&paper), PdfSource::Unavailable);
    }
}
