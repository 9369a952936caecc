//! Flat `(label, value)` rows for tabular export. Serialising the rows into a
//! file format is left to the caller.

use serde::Serialize;

use crate::models::{ChainOutcome, Comparison};
use crate::snapshot::{ArbitrageInputs, TransferInputs, KORONA_METHOD, P2P_METHOD};
use crate::utils::PrecisionPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub label: String,
    pub value: String,
}

impl ExportRow {
    fn new(label: &str, value: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    fn blank() -> Self {
        Self::new("", "")
    }
}

/// Header row first, then every input, then the results block.
pub fn transfer_rows(inputs: &TransferInputs, comparison: &Comparison) -> Vec<ExportRow> {
    let mut rows = vec![
        ExportRow::new("Parameter", "Value"),
        ExportRow::new("RUB Amount", inputs.rub),
        ExportRow::new("Mid RUB→USD", inputs.mid_rub_usd),
        ExportRow::new("Mid USD→KRW", inputs.mid_usd_krw),
        ExportRow::new("Mid RUB→KRW", format!("{:.4}", comparison.baseline.composed_rate)),
        ExportRow::new("P2P RUB→USDT", inputs.p2p_rub_usd),
        ExportRow::new("P2P USDT→KRW", inputs.p2p_usd_krw),
        ExportRow::new("P2P Extra Fee (KRW)", inputs.p2p_extra_krw),
        ExportRow::new("Korona RUB→USD", inputs.korona_rub_usd),
        ExportRow::new("E9Pay USD→KRW", inputs.e9pay_usd_krw),
        ExportRow::new("E9Pay Fixed Fee (KRW)", inputs.e9pay_fixed_krw),
        ExportRow::new("Korona SMS Fee (RUB)", inputs.korona_sms_rub),
        ExportRow::new("Ozon Surcharge (%)", inputs.ozon_pct),
        ExportRow::new("Apply Ozon", inputs.apply_ozon),
        ExportRow::blank(),
        ExportRow::new("Results", ""),
        ExportRow::new("Mid-Market KRW Out", format!("{:.0}", comparison.baseline.target_out)),
    ];

    let labels = [(P2P_METHOD, "P2P"), (KORONA_METHOD, "Korona+E9Pay")];
    for (name, label) in labels {
        if let Some(m) = comparison.method(name) {
            rows.push(ExportRow::new(&format!("{label} KRW Out"), format!("{:.0}", m.target_out)));
        }
    }
    for (name, label) in [(P2P_METHOD, "P2P"), (KORONA_METHOD, "Korona")] {
        if let Some(m) = comparison.method(name) {
            rows.push(ExportRow::new(&format!("{label} Loss %"), format!("{:.2}", m.loss_percent)));
        }
    }

    rows
}

pub fn arbitrage_rows(
    inputs: &ArbitrageInputs,
    outcome: &ChainOutcome,
    precision: &PrecisionPolicy,
) -> Vec<ExportRow> {
    let mut rows = vec![
        ExportRow::new("Parameter", "Value"),
        ExportRow::new("Initial RUB", inputs.initial_rub),
    ];

    for (i, step) in outcome.steps.iter().enumerate() {
        let n = i + 1;
        rows.push(ExportRow::new(
            &format!("Step {n} Result ({})", step.currency),
            precision.format(&step.currency, step.result),
        ));
        rows.push(ExportRow::new(
            &format!("Step {n} Loss ({})", step.currency),
            precision.format(&step.currency, step.loss),
        ));
    }

    rows.extend([
        ExportRow::blank(),
        ExportRow::new("Final RUB", precision.format("RUB", outcome.final_amount)),
        ExportRow::new("Total Profit", precision.format("RUB", outcome.total_profit)),
        ExportRow::new("Profit %", format!("{:.2}", outcome.profit_percent)),
        ExportRow::new("Profitable", outcome.is_profitable),
    ]);
    rows
}
