use crate::domain::ports::{Parameter, ParameterPage, ParameterStore};
use crate::error::{ExportError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 10;

/// A thread-safe in-memory parameter store.
///
/// Uses `Arc<RwLock<BTreeMap<String, Option<String>>>>` so listings come back in
/// name order. Listings are paged like a remote store; the token is the offset of
/// the next entry.
#[derive(Clone)]
pub struct InMemoryParameterStore {
    parameters: Arc<RwLock<BTreeMap<String, Option<String>>>>,
    page_size: usize,
}

impl Default for InMemoryParameterStore {
    fn default() -> Self {
        Self {
            parameters: Arc::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl InMemoryParameterStore {
    /// Creates a new, empty in-memory parameter store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_parameters<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = parameters
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self {
            parameters: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    /// Stores a parameter. A `None` value is kept and listed without a value.
    pub async fn put(&self, name: impl Into<String>, value: Option<String>) {
        let mut parameters = self.parameters.write().await;
        parameters.insert(name.into(), value);
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                ExportError::ParameterStoreError(format!("invalid next token: {token}"))
            })?,
            None => 0,
        };

        let parameters = self.parameters.read().await;
        let mut matching = parameters
            .iter()
            .filter(|(name, _)| name.starts_with(path))
            .skip(offset);

        let page: Vec<Parameter> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(name, value)| Parameter {
                name: Some(name.clone()),
                value: value.clone(),
            })
            .collect();

        let next_token = matching
            .next()
            .map(|_| (offset + page.len()).to_string());

        Ok(ParameterPage {
            parameters: page,
            next_token,
        })
    }
}
