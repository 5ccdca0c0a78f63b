//! Ordered provider fallback with per-provider timeouts.
//!
//! Every external lookup in LeafCare follows the same policy:
//! - Providers are tried in order, each bounded by the chain timeout
//! - The first success wins; failures are logged and skipped
//! - Nothing is retried
//! - When every provider fails, the caller's static default is used
//!
//! The result always records where the value came from so views can flag
//! default data.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ProviderError;

/// Default per-provider timeout.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Boxed future returned by [`Provider::fetch`].
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// A single source for a value of type `T`, queried with a request of type `Req`.
pub trait Provider<Req, T>: Send + Sync {
    /// Short name used in logs and in [`Source::Provider`].
    fn name(&self) -> &str;

    /// Fetch the value. Timeouts are applied by the chain, not the provider.
    fn fetch<'a>(&'a self, request: &'a Req) -> ProviderFuture<'a, T>;
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Source {
    Provider(String),
    Fallback,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Provider(name) => write!(f, "{}", name),
            Source::Fallback => write!(f, "default"),
        }
    }
}

/// A value tagged with its [`Source`].
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn provider(name: impl Into<String>, value: T) -> Self {
        Self {
            value,
            source: Source::Provider(name.into()),
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: Source::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Every provider in the chain failed.
#[derive(Debug, thiserror::Error)]
#[error("All {} providers failed", .failures.len())]
pub struct FallbackExhausted {
    pub failures: Vec<(String, ProviderError)>,
}

/// Ordered list of providers tried in sequence.
pub struct FallbackChain<Req, T> {
    providers: Vec<Box<dyn Provider<Req, T>>>,
    timeout: Duration,
}

impl<Req, T> std::fmt::Debug for FallbackChain<Req, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<Req, T> Default for FallbackChain<Req, T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS))
    }
}

impl<Req, T> FallbackChain<Req, T> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    /// Append a provider; it is tried after every provider already added.
    pub fn with_provider(mut self, provider: impl Provider<Req, T> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl<Req: Sync, T> FallbackChain<Req, T> {
    /// Try each provider in order and return the first success.
    ///
    /// # Errors
    /// Returns [`FallbackExhausted`] listing every provider's failure when none
    /// succeeded (or the chain is empty).
    pub async fn first_success(&self, request: &Req) -> Result<Sourced<T>, FallbackExhausted> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let name = provider.name();
            tracing::debug!("Trying provider {}", name);

            let outcome = match tokio::time::timeout(self.timeout, provider.fetch(request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout),
            };

            match outcome {
                Ok(value) => {
                    if !failures.is_empty() {
                        tracing::info!(
                            "Provider {} succeeded after {} failure(s)",
                            name,
                            failures.len()
                        );
                    }
                    return Ok(Sourced::provider(name, value));
                }
                Err(ProviderError::NotConfigured(reason)) => {
                    tracing::debug!("Provider {} skipped: {}", name, reason);
                    failures.push((name.to_string(), ProviderError::NotConfigured(reason)));
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", name, e);
                    failures.push((name.to_string(), e));
                }
            }
        }

        Err(FallbackExhausted { failures })
    }

    /// Try each provider in order, falling back to `fallback()` when all fail.
    pub async fn resolve_or_else(&self, request: &Req, fallback: impl FnOnce() -> T) -> Sourced<T> {
        match self.first_success(request).await {
            Ok(resolved) => resolved,
            Err(exhausted) => {
                if !exhausted.failures.is_empty() {
                    tracing::warn!("{}; using static default", exhausted);
                }
                Sourced::fallback(fallback())
            }
        }
    }
}

/// Provider built from a name and a closure. The closure ignores the request.
pub struct FnProvider<F> {
    name: String,
    f: F,
}

/// Wrap a closure returning a future as a [`Provider`].
pub fn provider_fn<F>(name: impl Into<String>, f: F) -> FnProvider<F> {
    FnProvider { name: name.into(), f }
}

impl<Req, T, F, Fut> Provider<Req, T> for FnProvider<F>
where
    Req: Sync,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _request: &'a Req) -> ProviderFuture<'a, T> {
        Box::pin((self.f)())
    }
}
