use crate::models::{percent_of, ChainOutcome, ConversionStep, StepResult};

/// Runs `initial_amount` through `steps` in order.
///
/// Each hop applies its rate, then deducts the percentage fee (taken from the
/// post-rate amount) and the fixed fee (in the hop's output currency). The
/// result is floored at 0 and becomes the next hop's input. For a closed path
/// the final amount is in the same currency as `initial_amount`, which is what
/// makes `total_profit` meaningful.
pub fn evaluate_chain(initial_amount: f64, steps: &[ConversionStep]) -> ChainOutcome {
    let mut amount = initial_amount;
    let mut results = Vec::with_capacity(steps.len());

    for step in steps {
        let r = evaluate_step(amount, step);
        amount = r.result;
        results.push(r);
    }

    let final_amount = amount;
    let total_profit = final_amount - initial_amount;

    ChainOutcome {
        initial_amount,
        steps: results,
        final_amount,
        total_profit,
        profit_percent: percent_of(total_profit, initial_amount),
        is_profitable: total_profit > 0.0,
    }
}

fn evaluate_step(amount_in: f64, step: &ConversionStep) -> StepResult {
    let gross = step.direction.apply(amount_in, step.rate);
    let fee_from_percent = gross * (step.fee_percent / 100.0);
    let fee_fixed = step.fixed_fee_in_output();
    let result = (gross - fee_from_percent - fee_fixed).max(0.0);

    StepResult {
        currency: step.currency.clone(),
        amount_in,
        gross,
        fee_from_percent,
        fee_fixed,
        result,
        loss: gross - result,
    }
}
