use crate::encode::encode_image;
use crate::error::{CompressionError, Result};
use crate::planner::EncodePlan;
use crate::processing::{CompressionRequest, Decision, SourceImage};
use crate::warn;

/// What a provider hands back on success. `decision_hint` carries a skip or
/// no-gain decision the provider already made on its own side (the remote
/// service mirrors these in its response metadata); `None` means the
/// orchestrator evaluates the result itself.
#[derive(Debug, Clone)]
pub struct ProviderOutput {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality_used: u8,
    pub decision_hint: Option<Decision>,
}

/// One encode capability. Providers share this contract so the chain can try
/// them in preference order with the identical request.
pub trait CompressionProvider: Send + Sync {
    fn name(&self) -> &str;

    fn encode(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
        plan: &EncodePlan,
    ) -> Result<ProviderOutput>;
}

/// In-process provider: decodes the source bytes and runs the encode
/// strategy directly against the orchestrator's plan.
pub struct LocalProvider;

impl CompressionProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn encode(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
        plan: &EncodePlan,
    ) -> Result<ProviderOutput> {
        let decoded = image.decode()?;
        let bytes = encode_image(&decoded, plan, request.target_format)?;

        Ok(ProviderOutput {
            bytes,
            width: plan.width,
            height: plan.height,
            quality_used: plan.quality,
            decision_hint: None,
        })
    }
}

/// Ordered list of providers. Each provider failure is logged and the next
/// one is tried with the same request; only exhaustion is fatal. A provider
/// succeeding with a no-gain result is not a fallback trigger.
pub struct FallbackChain {
    providers: Vec<Box<dyn CompressionProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Box<dyn CompressionProvider>>) -> Self {
        Self { providers }
    }

    /// Local-only chain, used when no remote endpoint is configured.
    pub fn local_only() -> Self {
        Self::new(vec![Box::new(LocalProvider)])
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn encode(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
        plan: &EncodePlan,
    ) -> Result<ProviderOutput> {
        let mut last_error = String::from("no compression providers configured");

        for provider in &self.providers {
            match provider.encode(image, request, plan) {
                Ok(output) => return Ok(output),
                Err(e) => {
                    warn!("Provider '{}' failed: {}", provider.name(), e);
                    last_error = format!("{}: {}", provider.name(), e);
                }
            }
        }

        Err(CompressionError::CompressionFailed(last_error))
    }
}
