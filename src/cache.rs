use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::browser::PageSource;
use crate::error::FetchError;

/// Flat per-page file cache in front of a [`PageSource`].
pub struct PageCache<S> {
    dir: PathBuf,
    base_url: String,
    source: S,
}

impl<S: PageSource> PageCache<S> {
    pub fn new(dir: impl Into<PathBuf>, base_url: &str, source: S) -> PageCache<S> {
        PageCache {
            dir: dir.into(),
            base_url: base_url.to_string(),
            source,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn url_for(&self, remote_path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, remote_path.trim_start_matches('/'))
        } else {
            format!("{}/{}", self.base_url, remote_path.trim_start_matches('/'))
        }
    }

    /// Returns the cached page for `identifier`, fetching `remote_path` on a miss.
    ///
    /// A cache file counts as a hit when it exists and is non-empty. Nothing
    /// is retried and no file is ever deleted.
    pub fn get_page(&self, identifier: &str, remote_path: &str) -> Result<String, FetchError> {
        let path = self.dir.join(identifier);
        if let Some(html) = read_cached(&path)? {
            info!(file = %path.display(), "read html from file");
            return Ok(html);
        }

        let url = self.url_for(remote_path);
        info!(%url, "fetch html from url");
        let html = self.source.get_text(&url)?;
        let cache_err = |source| FetchError::Cache {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(cache_err)?;
        fs::write(&path, html.as_bytes()).map_err(cache_err)?;
        Ok(html)
    }
}

fn read_cached(path: &Path) -> Result<Option<String>, FetchError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        _ => return Ok(None),
    }
    let bytes = fs::read(path).map_err(|source| FetchError::Cache {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| FetchError::Utf8(path.display().to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory page source that records every URL it serves.
    #[derive(Default)]
    pub struct FakeSource {
        pub pages: HashMap<String, String>,
        pub hits: RefCell<Vec<String>>,
    }

    impl FakeSource {
        pub fn with(pages: &[(&str, &str)]) -> FakeSource {
            FakeSource {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                hits: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeSource {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.hits.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    const BASE: &str = "http://zfcxjsj.huhhot.gov.cn/tjsj/";

    #[test]
    fn miss_fetches_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[("http://zfcxjsj.huhhot.gov.cn/tjsj/index.html", "<p>首页</p>")]);
        let cache = PageCache::new(dir.path(), BASE, source);

        let html = cache.get_page("index.html", "index.html").unwrap();
        assert_eq!(html, "<p>首页</p>");
        assert_eq!(fs::read_to_string(dir.path().join("index.html")).unwrap(), "<p>首页</p>");

        let again = cache.get_page("index.html", "index.html").unwrap();
        assert_eq!(again, html);
        assert_eq!(cache.source.hits.borrow().len(), 1);
    }

    #[test]
    fn empty_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index_1.html"), b"").unwrap();
        let source = FakeSource::with(&[("http://zfcxjsj.huhhot.gov.cn/tjsj/index_1.html", "body")]);
        let cache = PageCache::new(dir.path(), BASE, source);

        assert_eq!(cache.get_page("index_1.html", "index_1.html").unwrap(), "body");
        assert_eq!(cache.source.hits.borrow().as_slice(), ["http://zfcxjsj.huhhot.gov.cn/tjsj/index_1.html"]);
    }

    #[test]
    fn fetch_error_propagates_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path(), BASE, FakeSource::default());

        let err = cache.get_page("missing.html", "missing.html").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!dir.path().join("missing.html").exists());
    }

    #[test]
    fn url_join_handles_slashes() {
        let cache = PageCache::new("unused", "http://host/tjsj", FakeSource::default());
        assert_eq!(cache.url_for("/202301/a.html"), "http://host/tjsj/202301/a.html");
        let cache = PageCache::new("unused", BASE, FakeSource::default());
        assert_eq!(cache.url_for("index.html"), "http://zfcxjsj.huhhot.gov.cn/tjsj/index.html");
    }
}
