use crate::models::{
    percent_of, ratio, ArbitrageIndicator, Comparison, ComparisonOutcome, CrossRate, Method,
    ReverseIndicator,
};

/// Target-currency sample used for the reverse (target -> source) view.
pub const REVERSE_SAMPLE_AMOUNT: f64 = 1_000_000.0;

pub const BASELINE_NAME: &str = "Mid-Market";

/// Compares every method against the fee-free conversion over `baseline_legs`.
///
/// `peer` selects the method (by index into `methods`) whose composed rate is
/// checked directly against the baseline rate. That rate-based indicator is
/// independent of the output-based loss figures.
pub fn compare_methods(
    source_amount: f64,
    baseline_legs: CrossRate,
    methods: &[Method],
    peer: Option<usize>,
) -> Comparison {
    let baseline_rate = baseline_legs.rate();
    let baseline_out = source_amount * baseline_rate;

    let baseline = outcome(BASELINE_NAME, baseline_rate, source_amount, baseline_out, baseline_out);

    let outcomes = methods
        .iter()
        .map(|m| {
            let target_out = method_output(source_amount, m);
            outcome(&m.name, m.legs.rate(), source_amount, target_out, baseline_out)
        })
        .collect();

    let peer_legs = peer.and_then(|i| methods.get(i)).map(|m| m.legs);

    Comparison {
        baseline,
        methods: outcomes,
        indicator: peer_legs.map(|legs| indicator(legs, baseline_legs)),
        reverse: peer_legs.map(|legs| reverse_indicator(legs, baseline_legs)),
    }
}

/// Target amount delivered by `method` for `source_amount`, never below 0.
pub fn method_output(source_amount: f64, method: &Method) -> f64 {
    let after_surcharge = match method.surcharge_percent {
        Some(pct) => source_amount * (1.0 - pct / 100.0),
        None => source_amount,
    };
    let effective_source = (after_surcharge - method.fixed_source_fee).max(0.0);
    let gross_target = effective_source * method.legs.rate();
    (gross_target - method.fixed_target_fee).max(0.0)
}

fn outcome(
    name: &str,
    composed_rate: f64,
    source_amount: f64,
    target_out: f64,
    baseline_out: f64,
) -> ComparisonOutcome {
    let loss_amount = baseline_out - target_out;
    ComparisonOutcome {
        name: name.to_string(),
        composed_rate,
        target_out,
        effective_rate: ratio(target_out, source_amount),
        loss_amount,
        // only the percentage is floored; loss_amount keeps its sign
        loss_percent: percent_of(loss_amount, baseline_out).max(0.0),
    }
}

fn indicator(method: CrossRate, baseline: CrossRate) -> ArbitrageIndicator {
    let method_rate = method.rate();
    let baseline_rate = baseline.rate();
    ArbitrageIndicator {
        method_rate,
        baseline_rate,
        advantage: method_rate > baseline_rate,
        percent: percent_of(method_rate - baseline_rate, baseline_rate),
    }
}

fn reverse_indicator(method: CrossRate, baseline: CrossRate) -> ReverseIndicator {
    let method_inverse = method.inverse();
    let baseline_inverse = baseline.inverse();
    ReverseIndicator {
        method_inverse,
        baseline_inverse,
        sample_target_amount: REVERSE_SAMPLE_AMOUNT,
        method_source_out: REVERSE_SAMPLE_AMOUNT * method_inverse,
        baseline_source_out: REVERSE_SAMPLE_AMOUNT * baseline_inverse,
        advantage: method_inverse > baseline_inverse,
        percent: percent_of(method_inverse - baseline_inverse, baseline_inverse),
    }
}
