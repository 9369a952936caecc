use serde::{Deserialize, Serialize};

/// Which operator turns the input amount into the output amount for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rate is quoted as target units per source unit: `out = in * rate`.
    Multiply,
    /// Rate is quoted as source units per target unit: `out = in / rate`.
    Divide,
}

impl Direction {
    /// Applies the rate to `amount`. A divide hop with a non-positive rate yields 0.
    pub fn apply(self, amount: f64, rate: f64) -> f64 {
        match self {
            Direction::Multiply => amount * rate,
            Direction::Divide => ratio(amount, rate),
        }
    }
}

/// Currency a step's fixed fee is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeCurrency {
    /// Already in the step's output currency.
    #[default]
    Output,
    /// Quoted in the step's input currency; converted with the step's own rate.
    Input,
}

/// One hop of a conversion chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStep {
    /// Output currency of the hop, used for display precision only.
    pub currency: String,
    pub rate: f64,
    /// Percentage of the post-rate amount deducted, in [0, 100).
    pub fee_percent: f64,
    pub fee_fixed: f64,
    pub direction: Direction,
    #[serde(default)]
    pub fee_currency: FeeCurrency,
}

impl ConversionStep {
    pub fn multiply(currency: impl Into<String>, rate: f64) -> Self {
        Self::new(currency, rate, Direction::Multiply)
    }

    pub fn divide(currency: impl Into<String>, rate: f64) -> Self {
        Self::new(currency, rate, Direction::Divide)
    }

    fn new(currency: impl Into<String>, rate: f64, direction: Direction) -> Self {
        Self {
            currency: currency.into(),
            rate,
            fee_percent: 0.0,
            fee_fixed: 0.0,
            direction,
            fee_currency: FeeCurrency::Output,
        }
    }

    pub fn with_fee_percent(mut self, fee_percent: f64) -> Self {
        self.fee_percent = fee_percent;
        self
    }

    pub fn with_fee_fixed(mut self, fee_fixed: f64) -> Self {
        self.fee_fixed = fee_fixed;
        self
    }

    /// Marks the fixed fee as quoted in the hop's input currency.
    pub fn with_fee_in_input(mut self) -> Self {
        self.fee_currency = FeeCurrency::Input;
        self
    }

    /// Fixed fee expressed in the output currency.
    pub fn fixed_fee_in_output(&self) -> f64 {
        match self.fee_currency {
            FeeCurrency::Output => self.fee_fixed,
            FeeCurrency::Input => self.direction.apply(self.fee_fixed, self.rate),
        }
    }
}

/// Per-hop breakdown produced by the chain evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub currency: String,
    pub amount_in: f64,
    /// Amount after the rate, before any fee.
    pub gross: f64,
    pub fee_from_percent: f64,
    /// Fixed fee actually deducted, in the output currency.
    pub fee_fixed: f64,
    /// Amount after fees, never below 0.
    pub result: f64,
    /// `gross - result`.
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOutcome {
    pub initial_amount: f64,
    pub steps: Vec<StepResult>,
    pub final_amount: f64,
    pub total_profit: f64,
    pub profit_percent: f64,
    /// Strictly positive profit; break-even is not profitable.
    pub is_profitable: bool,
}

impl ChainOutcome {
    /// Index of the step that lost the most, if any step lost anything.
    pub fn largest_loss(&self) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.loss > 0.0)
            .max_by(|(_, a), (_, b)| a.loss.total_cmp(&b.loss))
            .map(|(i, _)| i)
    }
}

/// Two leg rates quoted against a common intermediate currency.
///
/// `source_per_intermediate` is how many source units buy one intermediate
/// unit (e.g. RUB per USD), `target_per_intermediate` how many target units
/// one intermediate unit buys (e.g. KRW per USD).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossRate {
    pub source_per_intermediate: f64,
    pub target_per_intermediate: f64,
}

impl CrossRate {
    pub fn new(source_per_intermediate: f64, target_per_intermediate: f64) -> Self {
        Self {
            source_per_intermediate,
            target_per_intermediate,
        }
    }

    /// Composed target-per-source rate, 0 when the source leg is not positive.
    pub fn rate(&self) -> f64 {
        ratio(self.target_per_intermediate, self.source_per_intermediate)
    }

    /// Source-per-target rate, 0 when the composed rate is not positive.
    pub fn inverse(&self) -> f64 {
        ratio(1.0, self.rate())
    }
}

/// A single-hop-equivalent transfer route compared against the ideal rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub legs: CrossRate,
    /// Percentage taken off the source amount before anything else.
    pub surcharge_percent: Option<f64>,
    /// Deducted in source currency after the surcharge.
    pub fixed_source_fee: f64,
    /// Deducted in target currency after conversion.
    pub fixed_target_fee: f64,
}

impl Method {
    /// A fee-free method over `legs`.
    pub fn ideal(name: impl Into<String>, legs: CrossRate) -> Self {
        Self {
            name: name.into(),
            legs,
            surcharge_percent: None,
            fixed_source_fee: 0.0,
            fixed_target_fee: 0.0,
        }
    }

    pub fn with_surcharge(mut self, percent: f64) -> Self {
        self.surcharge_percent = Some(percent);
        self
    }

    pub fn with_source_fee(mut self, fee: f64) -> Self {
        self.fixed_source_fee = fee;
        self
    }

    pub fn with_target_fee(mut self, fee: f64) -> Self {
        self.fixed_target_fee = fee;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub name: String,
    pub composed_rate: f64,
    pub target_out: f64,
    /// Target units received per source unit sent, fees included.
    pub effective_rate: f64,
    /// Shortfall against the baseline output; negative when the method beats it.
    pub loss_amount: f64,
    /// Shortfall as a percentage of the baseline output, floored at 0.
    pub loss_percent: f64,
}

/// Rate-based comparison of a peer-quoted method against the mid-market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageIndicator {
    pub method_rate: f64,
    pub baseline_rate: f64,
    /// Method rate strictly above the baseline rate.
    pub advantage: bool,
    /// `(method_rate - baseline_rate) / baseline_rate * 100`, 0 without a baseline.
    pub percent: f64,
}

/// The same comparison viewed from the target side (target → source).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverseIndicator {
    pub method_inverse: f64,
    pub baseline_inverse: f64,
    pub sample_target_amount: f64,
    pub method_source_out: f64,
    pub baseline_source_out: f64,
    pub advantage: bool,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: ComparisonOutcome,
    pub methods: Vec<ComparisonOutcome>,
    pub indicator: Option<ArbitrageIndicator>,
    pub reverse: Option<ReverseIndicator>,
}

impl Comparison {
    pub fn method(&self, name: &str) -> Option<&ComparisonOutcome> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// `num / den`, or 0 when the denominator is not positive.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}
