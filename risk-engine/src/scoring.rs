//! Risk scoring engine

use crate::{Error, Result, RiskAssessment, RiskFactor, RiskFactorKind, RiskInput, RiskScore, ScoringRules};
use rust_decimal::Decimal;
use tracing::debug;

/// Risk scorer
#[derive(Debug, Clone)]
pub struct RiskScorer {
    rules: ScoringRules,
}

impl RiskScorer {
    /// Create new risk scorer with the given rules
    pub fn new(rules: ScoringRules) -> Result<Self> {
        if rules.high_amount_threshold < Decimal::ZERO {
            return Err(Error::InvalidConfig(format!(
                "high amount threshold must be non-negative, got {}",
                rules.high_amount_threshold
            )));
        }

        if rules.home_currency.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "home currency must not be empty".to_string(),
            ));
        }

        Ok(Self { rules })
    }

    /// Rules in effect
    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Assess a transaction, reporting which factors fired
    pub fn assess(&self, input: &RiskInput) -> RiskAssessment {
        let mut factors = Vec::new();

        if input.amount > self.rules.high_amount_threshold {
            factors.push(RiskFactor {
                kind: RiskFactorKind::HighAmount,
                weight: self.rules.high_amount_weight,
                reason: format!("Amount above {}", self.rules.high_amount_threshold),
            });
        }

        if input.currency != self.rules.home_currency {
            factors.push(RiskFactor {
                kind: RiskFactorKind::ForeignCurrency,
                weight: self.rules.foreign_currency_weight,
                reason: format!("Currency is not {}", self.rules.home_currency),
            });
        }

        let risk_score = factors
            .iter()
            .fold(RiskScore::ZERO, |score, factor| score.with_weight(factor.weight));

        debug!(
            score = risk_score.score(),
            factors = factors.len(),
            "Risk assessed"
        );

        RiskAssessment {
            risk_score,
            factors,
        }
    }

    /// Score only
    pub fn score(&self, input: &RiskInput) -> RiskScore {
        self.assess(input).risk_score
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }
}
