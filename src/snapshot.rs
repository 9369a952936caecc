//! Flat input snapshots, one per calculator screen.
//!
//! Every field is independently editable and nothing is cross-validated here.
//! Deserialisation tolerates partial documents: a missing number reads as 0
//! and a missing flag as `false`, so a half-written persisted snapshot still
//! evaluates.

use serde::{Deserialize, Serialize};

use crate::logic::{compare_methods, evaluate_chain};
use crate::models::{ChainOutcome, Comparison, ConversionStep, CrossRate, Method};
use crate::rates::MidRates;

pub const P2P_METHOD: &str = "P2P";
pub const KORONA_METHOD: &str = "Korona + E9Pay";

/// Inputs of the RUB -> KRW transfer comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInputs {
    #[serde(default)]
    pub rub: f64,
    #[serde(default)]
    pub mid_rub_usd: f64,
    #[serde(default)]
    pub mid_usd_krw: f64,
    #[serde(default)]
    pub p2p_rub_usd: f64,
    #[serde(default)]
    pub p2p_usd_krw: f64,
    #[serde(default)]
    pub p2p_extra_krw: f64,
    #[serde(default)]
    pub korona_rub_usd: f64,
    #[serde(default)]
    pub e9pay_usd_krw: f64,
    #[serde(default)]
    pub e9pay_fixed_krw: f64,
    #[serde(default)]
    pub korona_sms_rub: f64,
    #[serde(default)]
    pub ozon_pct: f64,
    #[serde(default)]
    pub apply_ozon: bool,
}

impl Default for TransferInputs {
    fn default() -> Self {
        Self {
            rub: 250_000.0,
            mid_rub_usd: 79.9,
            mid_usd_krw: 1393.0,
            p2p_rub_usd: 81.75,
            p2p_usd_krw: 1475.0,
            p2p_extra_krw: 0.0,
            korona_rub_usd: 86.8021,
            e9pay_usd_krw: 1354.25,
            e9pay_fixed_krw: 7000.0,
            korona_sms_rub: 99.0,
            ozon_pct: 1.0,
            apply_ozon: true,
        }
    }
}

impl TransferInputs {
    pub fn mid_legs(&self) -> CrossRate {
        CrossRate::new(self.mid_rub_usd, self.mid_usd_krw)
    }

    /// The compared methods; the P2P method comes first and is the peer-quoted one.
    pub fn methods(&self) -> Vec<Method> {
        let p2p = Method::ideal(P2P_METHOD, CrossRate::new(self.p2p_rub_usd, self.p2p_usd_krw))
            .with_target_fee(self.p2p_extra_krw);

        let mut korona = Method::ideal(
            KORONA_METHOD,
            CrossRate::new(self.korona_rub_usd, self.e9pay_usd_krw),
        )
        .with_source_fee(self.korona_sms_rub)
        .with_target_fee(self.e9pay_fixed_krw);
        if self.apply_ozon {
            korona = korona.with_surcharge(self.ozon_pct);
        }

        vec![p2p, korona]
    }

    pub fn evaluate(&self) -> Comparison {
        compare_methods(self.rub, self.mid_legs(), &self.methods(), Some(0))
    }

    /// Replaces the two mid-market legs, leaving every other field as is.
    pub fn apply_mid_rates(&mut self, mid: MidRates) {
        self.mid_rub_usd = mid.source_per_intermediate;
        self.mid_usd_krw = mid.target_per_intermediate;
    }
}

/// Inputs of the RUB -> USDT -> KRW -> USDT -> RUB round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageInputs {
    #[serde(default)]
    pub initial_rub: f64,
    #[serde(default)]
    pub rub_to_usdt_rate: f64,
    #[serde(default)]
    pub rub_to_usdt_fee_percent: f64,
    #[serde(default)]
    pub rub_to_usdt_fee_fixed: f64,
    #[serde(default)]
    pub usdt_to_krw_rate: f64,
    #[serde(default)]
    pub usdt_to_krw_fee_percent: f64,
    #[serde(default)]
    pub usdt_to_krw_fee_fixed: f64,
    #[serde(default)]
    pub krw_to_usdt_rate: f64,
    #[serde(default)]
    pub krw_to_usdt_fee_percent: f64,
    /// Quoted in KRW, the input currency of that hop.
    #[serde(default)]
    pub krw_to_usdt_fee_fixed: f64,
    #[serde(default)]
    pub usdt_to_rub_rate: f64,
    #[serde(default)]
    pub usdt_to_rub_fee_percent: f64,
    #[serde(default)]
    pub usdt_to_rub_fee_fixed: f64,
}

impl Default for ArbitrageInputs {
    fn default() -> Self {
        Self {
            initial_rub: 250_000.0,
            rub_to_usdt_rate: 81.75,
            rub_to_usdt_fee_percent: 0.0,
            rub_to_usdt_fee_fixed: 0.0,
            usdt_to_krw_rate: 1475.0,
            usdt_to_krw_fee_percent: 0.0,
            usdt_to_krw_fee_fixed: 0.0,
            krw_to_usdt_rate: 1390.0,
            krw_to_usdt_fee_percent: 0.25,
            krw_to_usdt_fee_fixed: 0.0,
            usdt_to_rub_rate: 80.5,
            usdt_to_rub_fee_percent: 0.0,
            usdt_to_rub_fee_fixed: 0.0,
        }
    }
}

impl ArbitrageInputs {
    pub fn steps(&self) -> [ConversionStep; 4] {
        [
            ConversionStep::divide("USDT", self.rub_to_usdt_rate)
                .with_fee_percent(self.rub_to_usdt_fee_percent)
                .with_fee_fixed(self.rub_to_usdt_fee_fixed),
            ConversionStep::multiply("KRW", self.usdt_to_krw_rate)
                .with_fee_percent(self.usdt_to_krw_fee_percent)
                .with_fee_fixed(self.usdt_to_krw_fee_fixed),
            ConversionStep::divide("USDT", self.krw_to_usdt_rate)
                .with_fee_percent(self.krw_to_usdt_fee_percent)
                .with_fee_fixed(self.krw_to_usdt_fee_fixed)
                .with_fee_in_input(),
            ConversionStep::multiply("RUB", self.usdt_to_rub_rate)
                .with_fee_percent(self.usdt_to_rub_fee_percent)
                .with_fee_fixed(self.usdt_to_rub_fee_fixed),
        ]
    }

    pub fn evaluate(&self) -> ChainOutcome {
        evaluate_chain(self.initial_rub, &self.steps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transfer_comparison() {
        let cmp = TransferInputs::default().evaluate();
        let p2p = cmp.method(P2P_METHOD).unwrap();
        let korona = cmp.method(KORONA_METHOD).unwrap();

        assert!((cmp.baseline.target_out - 4_358_573.2165).abs() < 1e-3);
        assert!((p2p.target_out - 4_510_703.3639).abs() < 1e-3);
        assert!((korona.target_out - 3_852_846.7577).abs() < 1e-3);
        assert_eq!(p2p.loss_percent, 0.0);
        assert!(p2p.loss_amount < 0.0);
        assert!(korona.loss_percent > 11.0 && korona.loss_percent < 12.0);
        assert!(cmp.indicator.unwrap().advantage);
    }

    #[test]
    fn ozon_toggle_controls_surcharge() {
        let on = TransferInputs::default();
        let off = TransferInputs {
            apply_ozon: false,
            ..TransferInputs::default()
        };
        assert_eq!(on.methods()[1].surcharge_percent, Some(1.0));
        assert_eq!(off.methods()[1].surcharge_percent, None);
        let on_out = on.evaluate().methods[1].target_out;
        let off_out = off.evaluate().methods[1].target_out;
        assert!(off_out > on_out);
    }

    #[test]
    fn apply_mid_rates_only_touches_mid_legs() {
        let mut inputs = TransferInputs::default();
        inputs.apply_mid_rates(MidRates {
            source_per_intermediate: 90.0,
            target_per_intermediate: 1400.0,
        });
        assert_eq!(inputs.mid_rub_usd, 90.0);
        assert_eq!(inputs.mid_usd_krw, 1400.0);
        assert_eq!(inputs.p2p_rub_usd, 81.75);
        assert_eq!(inputs.rub, 250_000.0);
    }

    #[test]
    fn partial_snapshot_fills_zeroes() {
        let inputs: TransferInputs = serde_json::from_str(r#"{"rub": 1000, "midRubUsd": 80}"#).unwrap();
        assert_eq!(inputs.rub, 1000.0);
        assert_eq!(inputs.mid_rub_usd, 80.0);
        assert_eq!(inputs.mid_usd_krw, 0.0);
        assert!(!inputs.apply_ozon);

        let cmp = inputs.evaluate();
        assert_eq!(cmp.baseline.target_out, 0.0);
        assert!(cmp.methods.iter().all(|m| m.loss_percent == 0.0));
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let json = serde_json::to_value(TransferInputs::default()).unwrap();
        assert_eq!(json["e9payFixedKrw"], 7000.0);
        assert_eq!(json["applyOzon"], true);

        let json = serde_json::to_value(ArbitrageInputs::default()).unwrap();
        assert_eq!(json["krwToUsdtFeePercent"], 0.25);
    }

    #[test]
    fn default_round_trip_is_profitable() {
        let out = ArbitrageInputs::default().evaluate();
        assert!(out.is_profitable);
        assert!((out.total_profit - 10_578.3034).abs() < 1e-3);
        let currencies: Vec<_> = out.steps.iter().map(|s| s.currency.as_str()).collect();
        assert_eq!(currencies, ["USDT", "KRW", "USDT", "RUB"]);
    }

    #[test]
    fn krw_fixed_fee_is_converted_to_usdt() {
        let inputs = ArbitrageInputs {
            krw_to_usdt_fee_percent: 0.0,
            krw_to_usdt_fee_fixed: 1390.0,
            ..ArbitrageInputs::default()
        };
        let out = inputs.evaluate();
        assert!((out.steps[2].fee_fixed - 1.0).abs() < 1e-12);
        assert!((out.steps[2].loss - 1.0).abs() < 1e-9);
    }
}
