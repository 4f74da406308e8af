//! URL building for outbound calls

use crate::error::{DispatchError, DispatchResult};
use std::collections::BTreeMap;
use url::Url;

pub struct UrlBuilder;

impl UrlBuilder {
    /// Parse `raw` and append `query` pairs after any query already present.
    ///
    /// - `with_query("https://api.example.com/users", {limit: 10})` -> `https://api.example.com/users?limit=10`
    /// - `with_query("https://api.example.com/users?sort=name", {limit: 10})` -> `...?sort=name&limit=10`
    pub fn with_query(raw: &str, query: &BTreeMap<String, String>) -> DispatchResult<Url> {
        let mut url = Url::parse(raw)
            .map_err(|e| DispatchError::InvalidUrl(format!("'{}': {}", raw, e)))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
