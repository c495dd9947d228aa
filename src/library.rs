use std::path::PathBuf;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{NebulaError, Result};

/// One book as it appears in the dataset file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "sinopse")]
    pub synopsis: String,
    #[serde(rename = "link_goodreads")]
    pub external_link: String,
    #[serde(rename = "citacao", default)]
    pub quote: Option<String>,
}

impl BookRecord {
    /// The quote, if present and non-empty.
    pub fn quote(&self) -> Option<&str> {
        self.quote.as_deref().filter(|q| !q.is_empty())
    }
}

/// The loaded dataset. Read-only once built; every view is derived from it.
#[derive(Clone, Debug, Default)]
pub struct Library {
    books: Vec<BookRecord>,
}

impl Library {
    pub fn new(books: Vec<BookRecord>) -> Self {
        Library { books }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let books: Vec<BookRecord> = serde_json::from_str(text)?;
        Ok(Library::new(books))
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Records carrying a quote, in dataset order.
    pub fn quoted(&self) -> impl Iterator<Item = &BookRecord> {
        self.books.iter().filter(|b| b.quote().is_some())
    }

    /// Titles of the first `n` records.
    pub fn sample_titles(&self, n: usize) -> Vec<String> {
        self.books.iter().take(n).map(|b| b.title.clone()).collect()
    }
}

/// Where the dataset comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Http(Url),
}

impl DataSource {
    /// Resolve a source string. URLs are taken as-is; anything else is a file
    /// path, unless `base_url` is given, in which case it is joined onto it
    /// the way a page-relative fetch would be.
    pub fn resolve(source: &str, base_url: Option<&str>) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source).map_err(|e| NebulaError::InvalidSource(e.to_string()))?;
            return Ok(DataSource::Http(url));
        }

        match base_url {
            Some(base) => {
                let base = Url::parse(base).map_err(|e| NebulaError::InvalidSource(e.to_string()))?;
                let url = base
                    .join(source)
                    .map_err(|e| NebulaError::InvalidSource(e.to_string()))?;
                Ok(DataSource::Http(url))
            }
            None => Ok(DataSource::File(PathBuf::from(source))),
        }
    }

    /// One-shot load. No retry; the caller decides what a failure shows.
    pub async fn load(&self) -> Result<Library> {
        let text = match self {
            DataSource::File(path) => {
                debug!(path = %path.display(), "reading dataset file");
                tokio::fs::read_to_string(path).await?
            }
            DataSource::Http(url) => {
                debug!(%url, "fetching dataset");
                let response = reqwest::Client::new().get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(NebulaError::Status(status.as_u16()));
                }
                response.text().await?
            }
        };

        let library = Library::from_json(&text)?;
        info!(books = library.len(), "dataset loaded");
        Ok(library)
    }
}
