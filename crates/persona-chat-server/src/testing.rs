//! Test doubles shared by relay and route tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use persona_chat::{ApiKey, ChatProvider, GenerationRequest, PersonaRegistry, ProviderError};

use crate::application::{ChatRelay, RelayConfig};
use crate::AppState;

pub const TEST_KEY: &str = "AIza-test-secret-key";

/// Provider returning canned results and recording what it was asked
pub struct StubProvider {
    reply: Result<String, ProviderError>,
    models: Result<Vec<String>, ProviderError>,
    requests: Mutex<Vec<GenerationRequest>>,
    list_calls: AtomicUsize,
}

impl StubProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            models: Ok(vec![]),
            requests: Mutex::new(vec![]),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying("")
        }
    }

    pub fn with_models(mut self, models: Result<Vec<String>, ProviderError>) -> Self {
        self.models = models;
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for StubProvider {
    async fn generate(
        &self,
        _key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }

    async fn list_models(&self, _key: &ApiKey) -> Result<Vec<String>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.models.clone()
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// Provider that fails the test if it is ever invoked
pub struct UnreachableProvider;

#[async_trait]
impl ChatProvider for UnreachableProvider {
    async fn generate(
        &self,
        _key: &ApiKey,
        _request: &GenerationRequest,
    ) -> Result<String, ProviderError> {
        panic!("provider must not be called");
    }

    async fn list_models(&self, _key: &ApiKey) -> Result<Vec<String>, ProviderError> {
        panic!("provider must not be called");
    }

    fn provider_name(&self) -> &str {
        "unreachable"
    }
}

pub fn config_with_key() -> RelayConfig {
    RelayConfig {
        api_key: ApiKey::parse(Some(TEST_KEY)),
        ..RelayConfig::default()
    }
}

pub fn app_state(provider: Arc<dyn ChatProvider>, config: RelayConfig) -> AppState {
    let registry = Arc::new(PersonaRegistry::builtin());
    AppState {
        relay: Arc::new(ChatRelay::new(provider, registry.clone(), config)),
        registry,
    }
}
