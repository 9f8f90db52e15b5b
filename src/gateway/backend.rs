use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

/// JSON client for one store. Every failure (transport, non-2xx status,
/// undecodable body) surfaces as a `reqwest::Error`.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    client: reqwest::Client,
    name: &'static str,
    base_url: String,
}

impl ServiceClient {
    pub fn new(client: reqwest::Client, name: &'static str, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, name, base_url }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self), fields(service = self.name))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> reqwest::Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.client.get(url).send().await?.error_for_status()?.json().await
    }

    #[instrument(skip(self, body), fields(service = self.name))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> reqwest::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        self.client.post(url).json(body).send().await?.error_for_status()?.json().await
    }
}

/// Encodes a user-supplied value for use as one path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = ServiceClient::new(reqwest::Client::new(), "content", "http://127.0.0.1:8000/");
        assert_eq!(client.url("/generos"), "http://127.0.0.1:8000/generos");
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("la casa"), "la%20casa");
        assert_eq!(segment("a/b"), "a%2Fb");
    }
}
