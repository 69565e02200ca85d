use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::NetworkError;

#[derive(Deserialize)]
struct BreedListing {
    message: Map<String, Value>,
}

/// Breed names from a `{ "message": { "<breed>": [...] } }` body.
pub fn parse_breed_listing(body: &str) -> Result<Vec<String>, NetworkError> {
    let listing: BreedListing =
        serde_json::from_str(body).map_err(|e| NetworkError::Decode(e.to_string()))?;
    Ok(listing.message.into_iter().map(|(breed, _)| breed).collect())
}

pub async fn fetch_breeds(url: &str) -> Result<Vec<String>, NetworkError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| NetworkError::Request(e.to_string()))?;
    if !response.ok() {
        return Err(NetworkError::Status(response.status()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| NetworkError::Decode(e.to_string()))?;
    parse_breed_listing(&body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Options of the breed picker and the search over them.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedCatalog {
    breeds: Vec<String>,
    term: String,
    open: bool,
    state: LoadState,
}

impl Default for BreedCatalog {
    fn default() -> Self {
        Self {
            breeds: Vec::new(),
            term: String::new(),
            open: false,
            state: LoadState::Idle,
        }
    }
}

impl BreedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once; the list is fetched a single time per page.
    pub fn begin_load(&mut self) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    pub fn finish_load(&mut self, result: Result<Vec<String>, NetworkError>) {
        match result {
            Ok(breeds) => {
                self.breeds = breeds;
                self.state = LoadState::Loaded;
            }
            Err(_) => {
                self.breeds.clear();
                self.state = LoadState::Failed;
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Updates the search term and opens the list.
    pub fn filter(&mut self, term: &str) {
        self.term = term.to_string();
        self.open = true;
    }

    pub fn is_visible(&self, breed: &str) -> bool {
        breed.to_lowercase().contains(&self.term.to_lowercase())
    }

    /// Visibility of every loaded breed under the current term.
    pub fn visibility(&self) -> Vec<(&str, bool)> {
        self.breeds
            .iter()
            .map(|b| (b.as_str(), self.is_visible(b)))
            .collect()
    }

    /// Picks `breed`, returning the value to store, and closes the list.
    pub fn select(&mut self, breed: &str) -> String {
        self.term = breed.to_string();
        self.open = false;
        breed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> BreedCatalog {
        let mut catalog = BreedCatalog::new();
        catalog.begin_load();
        catalog.finish_load(Ok(vec![
            "beagle".into(),
            "bulldog".into(),
            "labrador".into(),
        ]));
        catalog
    }

    #[test]
    fn parses_listing_keys() {
        let body = r#"{"message":{"beagle":[],"bulldog":["boston","french"]},"status":"success"}"#;
        assert_eq!(
            parse_breed_listing(body).unwrap(),
            vec!["beagle".to_string(), "bulldog".to_string()]
        );
    }

    #[test]
    fn malformed_listing_is_a_decode_error() {
        assert!(matches!(
            parse_breed_listing(r#"{"status":"error"}"#),
            Err(NetworkError::Decode(_))
        ));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut catalog = loaded();
        catalog.filter("BUL");
        assert!(catalog.is_open());
        let visible: Vec<&str> = catalog
            .visibility()
            .into_iter()
            .filter(|(_, shown)| *shown)
            .map(|(b, _)| b)
            .collect();
        assert_eq!(visible, vec!["bulldog"]);

        catalog.filter("");
        assert!(catalog.visibility().iter().all(|(_, shown)| *shown));
    }

    #[test]
    fn select_closes_the_list() {
        let mut catalog = loaded();
        catalog.open();
        assert_eq!(catalog.select("labrador"), "labrador");
        assert!(!catalog.is_open());
        assert_eq!(catalog.term(), "labrador");
    }

    #[test]
    fn loads_once_and_failure_leaves_list_empty() {
        let mut catalog = BreedCatalog::new();
        assert!(catalog.begin_load());
        assert!(!catalog.begin_load());

        catalog.finish_load(Err(NetworkError::Status(503)));
        assert_eq!(catalog.state(), LoadState::Failed);
        assert!(catalog.breeds().is_empty());
        assert!(!catalog.begin_load());
    }
}
