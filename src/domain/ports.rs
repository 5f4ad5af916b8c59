use crate::error::Result;
use async_trait::async_trait;

/// A single entry of a hierarchical key/value parameter store.
///
/// Both halves are optional because remote stores may return either one empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// One page of a `parameters_by_path` listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Lists the parameters whose names start with `path`, one page at a time.
    ///
    /// Pass the previous page's `next_token` to continue; `None` starts over.
    async fn parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage>;
}

pub type ParameterStoreBox = Box<dyn ParameterStore>;
