use provider_client::GenerationConfig;

pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Where the provider API key comes from. Consulted on every request.
pub trait ApiKeySource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable at request time.
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    var: String,
}

impl EnvApiKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvApiKey {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl ApiKeySource for EnvApiKey {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|key| !key.is_empty())
    }
}

#[derive(Clone)]
pub struct StaticApiKey(Option<String>);

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl std::fmt::Debug for StaticApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticApiKey")
            .field(&self.0.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiKeySource for StaticApiKey {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    pub generation: GenerationConfig,
    /// Upper bound on message length in characters. `None` accepts any length.
    pub max_message_chars: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_is_read_on_each_call() {
        let var = "CHAT_PROXY_TEST_KEY_READ_EACH_CALL";
        let source = EnvApiKey::new(var);

        std::env::remove_var(var);
        assert_eq!(source.api_key(), None);

        std::env::set_var(var, "abc");
        assert_eq!(source.api_key().as_deref(), Some("abc"));

        std::env::set_var(var, "");
        assert_eq!(source.api_key(), None);
        std::env::remove_var(var);
    }

    #[test]
    fn static_key_debug_hides_secret() {
        let source = StaticApiKey::new("super-secret");
        assert_eq!(source.api_key().as_deref(), Some("super-secret"));
        assert!(!format!("{source:?}").contains("super-secret"));
        assert_eq!(StaticApiKey::missing().api_key(), None);
    }

    #[test]
    fn defaults_match_provider_parameters() {
        let config = ProxyConfig::default();
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_message_chars, None);
    }
}
