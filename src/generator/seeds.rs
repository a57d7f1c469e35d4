use rand::{Rng, seq::IndexedRandom};

/// Static query pools the sampling loop draws from.
#[derive(Debug, Clone)]
pub struct SeedPools {
    pub target: Vec<String>,
    pub mainstream: Vec<String>,
    pub obscure: Vec<String>,
}

impl SeedPools {
    pub fn new(target: Vec<String>) -> Self {
        Self {
            target,
            mainstream: [
                "love", "night", "heart", "baby", "dance", "summer", "fire", "dream", "home",
                "time", "life", "girl", "light", "rain", "a", "e", "o", "me", "you", "world",
            ]
            .map(String::from)
            .to_vec(),
            // rare letter combinations surface long-tail artists
            obscure: [
                "qz", "zxq", "zzx", "qxx", "zqq", "kjj", "ptk", "xhz", "vqx", "zzq", "tzz",
                "xxa", "mqq", "qvv", "zzp",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    /// Draws a seed uniformly from the pool matching the current need.
    ///
    /// Draws are independent, repeats are expected. Returns `None` only for an
    /// empty pool.
    pub fn pick_seed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        require_target_language: bool,
        mainstream_mode: bool,
    ) -> Option<&str> {
        let pool = if require_target_language {
            &self.target
        } else if mainstream_mode {
            &self.mainstream
        } else {
            &self.obscure
        };

        pool.choose(rng).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        !self.target.is_empty() && !self.mainstream.is_empty() && !self.obscure.is_empty()
    }
}
