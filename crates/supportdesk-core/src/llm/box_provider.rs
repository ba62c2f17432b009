//! BoxCompletionProvider -- object-safe dynamic dispatch wrapper for
//! CompletionProvider.
//!
//! 1. Define an object-safe `CompletionProviderDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionProviderDyn` for all `T: CompletionProvider`
//! 3. `BoxCompletionProvider` wraps `Box<dyn CompletionProviderDyn>` and
//!    delegates

use std::future::Future;
use std::pin::Pin;

use supportdesk_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

use super::provider::CompletionProvider;

/// Object-safe version of [`CompletionProvider`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch (`dyn CompletionProviderDyn`).
pub trait CompletionProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>>;
}

/// Blanket implementation: any `CompletionProvider` automatically
/// implements `CompletionProviderDyn`.
impl<T: CompletionProvider> CompletionProviderDyn for T {
    fn name(&self) -> &str {
        CompletionProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>>
    {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion provider for runtime backend selection.
///
/// Since `CompletionProvider` uses RPITIT, it cannot be used as a trait
/// object directly. `BoxCompletionProvider` provides equivalent methods
/// that delegate to the inner `CompletionProviderDyn` trait object.
pub struct BoxCompletionProvider {
    inner: Box<dyn CompletionProviderDyn + Send + Sync>,
}

impl std::fmt::Debug for BoxCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxCompletionProvider")
            .field("name", &self.inner.name())
            .finish()
    }
}

impl BoxCompletionProvider {
    /// Wrap a concrete `CompletionProvider` in a type-erased box.
    pub fn new<T: CompletionProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a completion request and receive the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.inner.complete_boxed(request).await
    }
}
