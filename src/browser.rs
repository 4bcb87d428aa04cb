use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::debug;

use crate::error::FetchError;

/// Something that can hand back the body of a URL as text.
pub trait PageSource {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Clone)]
pub struct Browser {
    client: Client,
    headers: HeaderMap,
}

impl Browser {
    pub fn new() -> Browser {
        Browser {
            client: Client::new(),
            headers: HeaderMap::new(),
        }
        .init()
    }

    fn init(mut self) -> Browser {
        self.headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2704.103 Safari/537.36"));
        self.headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        self
    }
}

impl PageSource for Browser {
    /// Body is read as raw bytes and decoded as UTF-8 whatever the declared charset.
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).headers(self.headers.clone()).send()?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "response");
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::Utf8(url.to_string()))
    }
}
