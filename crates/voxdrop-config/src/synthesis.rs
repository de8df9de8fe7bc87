use serde::Deserialize;

/// Speech synthesis service configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Polly engine; the service picks its own default when unset
    #[serde(default)]
    pub engine: Option<PollyEngine>,
    /// Endpoint override, mostly useful for local emulators
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Polly synthesis engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollyEngine {
    Standard,
    Neural,
    LongForm,
    Generative,
}

impl PollyEngine {
    /// Engine identifier as the service spells it
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::LongForm => "long-form",
            Self::Generative => "generative",
        }
    }
}
