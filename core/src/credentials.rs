//! Bearer credential seam.
//!
//! The client asks its provider for a token before every dispatch and never
//! caches it; silent or interactive reauthentication is the provider's
//! business.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{ApiError, Result};

/// Source of bearer tokens for outgoing requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

#[async_trait]
impl<P: CredentialProvider + ?Sized> CredentialProvider for Arc<P> {
    async fn access_token(&self) -> Result<String> {
        (**self).access_token().await
    }
}

/// A fixed token, for service accounts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A token cell that a login flow can replace while clients hold it.
///
/// Clones share the same cell. Reads with no token set fail with
/// `ApiError::Credential`.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    current: Arc<RwLock<Option<String>>>,
}

impl TokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.current.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }
}

#[async_trait]
impl CredentialProvider for TokenSource {
    async fn access_token(&self) -> Result<String> {
        self.current
            .read()
            .clone()
            .ok_or_else(|| ApiError::Credential("not signed in".to_string()))
    }
}
