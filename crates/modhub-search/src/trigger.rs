//! Proximity trigger for infinite scrolling.

use modhub_config::SearchConfig;

/// Decides when a consumer should ask for the next page.
///
/// `remaining` is whatever unit the consumer measures unseen content in
/// (pixels, rows). The pager itself never polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    threshold: u32,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self { threshold: 500 }
    }
}

impl ScrollTrigger {
    #[must_use]
    pub const fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.scroll_threshold)
    }

    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub const fn should_fetch(&self, remaining: u32) -> bool {
        remaining < self.threshold
    }
}
