use std::collections::HashMap;

use tracing_subscriber::EnvFilter;

/// Rounds half away from zero at `decimals` places.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Installs the global fmt subscriber for the embedding application.
///
/// The filter comes from `RUST_LOG`, falling back to `info`. Returns `false`
/// when a global subscriber is already set, in which case nothing changes.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Display precision per currency code.
///
/// Whole-unit currencies such as KRW show no decimals; everything else falls
/// back to `default_decimals`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionPolicy {
    decimals: HashMap<String, u32>,
    default_decimals: u32,
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        Self::new(2).with("KRW", 0)
    }
}

impl PrecisionPolicy {
    pub fn new(default_decimals: u32) -> Self {
        Self {
            decimals: HashMap::new(),
            default_decimals,
        }
    }

    pub fn with(mut self, code: &str, decimals: u32) -> Self {
        self.decimals.insert(code.to_uppercase(), decimals);
        self
    }

    pub fn decimals(&self, code: &str) -> u32 {
        self.decimals
            .get(&code.to_uppercase())
            .copied()
            .unwrap_or(self.default_decimals)
    }

    pub fn round(&self, code: &str, value: f64) -> f64 {
        round_to(value, self.decimals(code))
    }

    pub fn format(&self, code: &str, value: f64) -> String {
        format!("{:.*}", self.decimals(code) as usize, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KRW", 0)]
    #[case("krw", 0)]
    #[case("RUB", 2)]
    #[case("USDT", 2)]
    fn default_policy_decimals(#[case] code: &str, #[case] expected: u32) {
        assert_eq!(PrecisionPolicy::default().decimals(code), expected);
    }

    #[test]
    fn formats_by_currency() {
        let p = PrecisionPolicy::default();
        assert_eq!(p.format("KRW", 4_510_703.36), "4510703");
        assert_eq!(p.format("USDT", 3058.103975), "3058.10");
        assert_eq!(p.round("RUB", 10_578.3034), 10_578.3);
    }

    #[test]
    fn custom_entries_override_default() {
        let p = PrecisionPolicy::new(4).with("JPY", 0);
        assert_eq!(p.decimals("JPY"), 0);
        assert_eq!(p.decimals("USD"), 4);
    }

    #[test]
    fn init_tracing_is_safe_to_repeat() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn round_to_scales_by_decimals() {
        assert_eq!(round_to(2.344, 2), 2.34);
        assert_eq!(round_to(4_510_703.6, 0), 4_510_704.0);
    }
}
