use mailgenie_core::catalog;
use mailgenie_core::types::{ReplyResult, Tone};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub const FALLBACK_CONFIDENCE: f32 = 0.3;
pub const TOTAL_FAILURE_CONFIDENCE: f32 = 0.1;

/// Picks one canned template for a tone.
pub fn choose_template<R: Rng + ?Sized>(tone: Tone, rng: &mut R) -> &'static str {
    catalog::fallbacks_for(tone)
        .choose(rng)
        .copied()
        .unwrap_or_default()
}

/// Serves canned replies when live generation is unavailable.
pub struct FallbackSelector {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl FallbackSelector {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    fn pick(&self, tone: Tone) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        choose_template(tone, &mut **rng)
    }

    /// Absent tone means `professional`.
    pub fn select(&self, tone: Option<Tone>) -> ReplyResult {
        let tone = tone.unwrap_or_default();
        debug!(%tone, "Serving fallback template");
        ReplyResult::fallback(self.pick(tone).to_string(), tone, FALLBACK_CONFIDENCE)
    }

    /// For tone names that have not been validated; unknown names become `professional`.
    pub fn select_str(&self, tone: Option<&str>) -> ReplyResult {
        self.select(tone.and_then(|t| Tone::parse(t).ok()))
    }

    /// Reply used when even the fallback-aware pipeline could not finish.
    pub fn total_failure(&self) -> ReplyResult {
        let tone = Tone::Professional;
        ReplyResult::fallback(self.pick(tone).to_string(), tone, TOTAL_FAILURE_CONFIDENCE)
    }
}

impl Default for FallbackSelector {
    fn default() -> Self {
        Self::new()
    }
}
