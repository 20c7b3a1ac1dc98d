//! Risk evaluator: per-position health, portfolio aggregate, and alerts.
//!
//! Every call recomputes from the supplied snapshot. There is no state
//! between runs, so the evaluator can be shared freely across callers and
//! re-invoked on every price tick.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::RiskThresholds;
use crate::types::{
    AggregateRisk, AlertKind, Position, PositionRisk, RiskAlert, RiskReport, RiskTier,
};

use super::metrics::{
    classify_aggregate, classify_position, compute_aggregate_health_factor, compute_health_factor,
    compute_ltv, format_health_factor, format_percent, liquidation_risk_score, saturating_add,
    saturating_ratio,
};

/// Evaluate a portfolio with the default thresholds.
pub fn evaluate(positions: &[Position]) -> RiskReport {
    RiskEvaluator::default().evaluate(positions)
}

#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator {
    thresholds: RiskThresholds,
}

impl RiskEvaluator {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Classify every position, derive the aggregate, and collect alerts
    /// sorted by severity (descending) then position id.
    pub fn evaluate(&self, positions: &[Position]) -> RiskReport {
        let mut risks = Vec::with_capacity(positions.len());
        let mut alerts = Vec::new();

        for position in positions {
            let risk = self.evaluate_position(position);
            alerts.extend(self.alerts_for(position, &risk));
            risks.push(risk);
        }

        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.position_id.cmp(&b.position_id))
                .then_with(|| a.kind.cmp(&b.kind))
        });

        let aggregate = self.aggregate(positions);

        debug!(
            positions = risks.len(),
            alerts = alerts.len(),
            aggregate_hf = %format_health_factor(aggregate.aggregate_health_factor),
            tier = aggregate.tier.as_str(),
            "portfolio evaluated"
        );

        if aggregate.tier == RiskTier::Critical {
            warn!(
                aggregate_hf = %format_health_factor(aggregate.aggregate_health_factor),
                total_borrowed = %aggregate.total_borrowed,
                "portfolio aggregate risk is critical"
            );
        }

        RiskReport {
            positions: risks,
            aggregate,
            alerts,
        }
    }

    pub fn evaluate_position(&self, position: &Position) -> PositionRisk {
        let current_ltv = compute_ltv(position.collateral_value, position.borrowed_value);
        let health_factor = compute_health_factor(
            position.collateral_value,
            position.borrowed_value,
            position.liquidation_threshold,
        );
        let ltv_utilization = saturating_ratio(current_ltv, position.max_ltv);

        PositionRisk {
            position_id: position.id.clone(),
            kind: position.kind,
            current_ltv,
            health_factor,
            ltv_utilization,
            tier: classify_position(health_factor, &self.thresholds.position_tiers),
        }
    }

    pub fn aggregate(&self, positions: &[Position]) -> AggregateRisk {
        let total_collateral = positions
            .iter()
            .fold(Decimal::ZERO, |acc, p| saturating_add(acc, p.collateral_value));
        let total_borrowed = positions
            .iter()
            .fold(Decimal::ZERO, |acc, p| saturating_add(acc, p.borrowed_value));
        let aggregate_health_factor = compute_aggregate_health_factor(
            total_collateral,
            total_borrowed,
            self.thresholds.aggregate_safety_buffer,
        );

        AggregateRisk {
            total_collateral,
            total_borrowed,
            aggregate_ltv: compute_ltv(total_collateral, total_borrowed),
            aggregate_health_factor,
            tier: classify_aggregate(aggregate_health_factor, &self.thresholds.aggregate_tiers),
            liquidation_risk_score: liquidation_risk_score(
                aggregate_health_factor,
                &self.thresholds.liquidation_score,
            ),
        }
    }

    /// Each alert kind fires at most once per position.
    fn alerts_for(&self, position: &Position, risk: &PositionRisk) -> Vec<RiskAlert> {
        let mut alerts = Vec::new();
        let has_debt = position.borrowed_value > Decimal::ZERO;

        let liquidatable = has_debt
            && (position.collateral_value <= Decimal::ZERO
                || risk.current_ltv >= position.liquidation_threshold);
        if liquidatable {
            let message = if position.collateral_value <= Decimal::ZERO {
                format!(
                    "Position #{} carries {} of debt with no collateral and is eligible for liquidation.",
                    position.id, position.borrowed_value
                )
            } else {
                format!(
                    "Position #{} LTV ({}%) has reached its liquidation threshold ({}%).",
                    position.id,
                    format_percent(risk.current_ltv),
                    format_percent(position.liquidation_threshold)
                )
            };
            alerts.push(RiskAlert::new(&position.id, AlertKind::Liquidation, message));
        }

        if risk.health_factor < self.thresholds.alerts.low_health_below_hf {
            alerts.push(RiskAlert::new(
                &position.id,
                AlertKind::LowHealth,
                format!(
                    "Position #{} has critically low health factor ({}x). Consider adding collateral or reducing debt.",
                    position.id,
                    format_health_factor(risk.health_factor)
                ),
            ));
        }

        if has_debt && risk.ltv_utilization >= self.thresholds.alerts.high_ltv_warning_ratio {
            alerts.push(RiskAlert::new(
                &position.id,
                AlertKind::HighLtv,
                format!(
                    "Position #{} has high LTV ratio ({}% of {}% max). Monitor closely for potential liquidation risk.",
                    position.id,
                    format_percent(risk.current_ltv),
                    format_percent(position.max_ltv)
                ),
            ));
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::is_unbounded;
    use crate::types::{PositionKind, Severity};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn position(
        id: &str,
        collateral: Decimal,
        borrowed: Decimal,
        lt: Decimal,
        max_ltv: Decimal,
    ) -> Position {
        Position {
            id: id.into(),
            kind: PositionKind::Lending,
            collateral_value: collateral,
            borrowed_value: borrowed,
            liquidation_threshold: lt,
            max_ltv,
        }
    }

    fn kinds(alerts: &[RiskAlert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    // -----------------------------------------------------------------------
    // Concrete scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn test_debt_free_position_is_low_risk() {
        let pos = position("1", dec!(107500), Decimal::ZERO, dec!(0.8), dec!(0.75));
        let report = evaluate(&[pos]);

        let risk = &report.positions[0];
        assert!(is_unbounded(risk.health_factor));
        assert_eq!(risk.current_ltv, Decimal::ZERO);
        assert_eq!(risk.tier, RiskTier::Low);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_position_at_liquidation_threshold_is_critical() {
        let pos = position("4", dec!(40000), dec!(40000), dec!(0.5), dec!(0.3));
        let report = evaluate(&[pos]);

        let risk = &report.positions[0];
        assert_eq!(risk.current_ltv, dec!(1));
        assert_eq!(risk.health_factor, dec!(0.5));
        assert_eq!(risk.tier, RiskTier::Critical);
        assert_eq!(
            kinds(&report.alerts),
            vec![AlertKind::Liquidation, AlertKind::LowHealth, AlertKind::HighLtv]
        );
        assert_eq!(report.alerts[0].severity, Severity::Critical);
        assert!(report.alerts[1].message.contains("0.50x"), "{}", report.alerts[1].message);
    }

    #[test]
    fn test_empty_position_is_low_without_alerts() {
        let pos = position("empty", Decimal::ZERO, Decimal::ZERO, dec!(0.8), dec!(0.75));
        let report = evaluate(&[pos]);
        assert_eq!(report.positions[0].tier, RiskTier::Low);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_debt_without_collateral_is_critical_and_liquidatable() {
        let pos = position("orphan", Decimal::ZERO, dec!(2500), dec!(0.8), dec!(0.75));
        let report = evaluate(&[pos]);

        let risk = &report.positions[0];
        assert_eq!(risk.health_factor, Decimal::ZERO);
        assert_eq!(risk.tier, RiskTier::Critical);
        assert!(kinds(&report.alerts).contains(&AlertKind::Liquidation));
    }

    #[test]
    fn test_high_ltv_fires_while_otherwise_healthy() {
        // LTV 0.7 against a 0.75 ceiling (93%), but LT 0.95 keeps HF at ~1.36.
        let pos = position("3", dec!(1000), dec!(700), dec!(0.95), dec!(0.75));
        let report = evaluate(&[pos]);

        assert_eq!(report.positions[0].tier, RiskTier::High);
        assert_eq!(kinds(&report.alerts), vec![AlertKind::HighLtv]);
        assert_eq!(report.alerts[0].severity, Severity::Medium);
    }

    #[test]
    fn test_high_ltv_ratio_boundary() {
        // exactly 90% of max LTV
        let at = position("a", dec!(1000), dec!(450), dec!(0.8), dec!(0.5));
        assert_eq!(kinds(&evaluate(&[at]).alerts), vec![AlertKind::HighLtv]);

        let below = position("b", dec!(1000), dec!(449), dec!(0.8), dec!(0.5));
        assert!(evaluate(&[below]).alerts.is_empty());
    }

    #[test]
    fn test_low_health_boundary() {
        // HF = 1000 * 0.6 / 500 = 1.2 -> high tier, no low_health alert
        let at = position("a", dec!(1000), dec!(500), dec!(0.6), dec!(0.6));
        let report = evaluate(&[at]);
        assert_eq!(report.positions[0].tier, RiskTier::High);
        assert!(!kinds(&report.alerts).contains(&AlertKind::LowHealth));
    }

    #[test]
    fn test_dust_collateral_against_huge_debt_is_liquidatable() {
        // LTV 1e28 cannot be rendered as a percentage.
        let pos = position("dust", dec!(0.000001), dec!(10000000000000000000000), dec!(0.8), dec!(0.75));
        let report = evaluate(&[pos]);

        let risk = &report.positions[0];
        assert_eq!(risk.tier, RiskTier::Critical);
        assert_eq!(
            kinds(&report.alerts),
            vec![AlertKind::Liquidation, AlertKind::LowHealth, AlertKind::HighLtv]
        );
        let liquidation = &report.alerts[0].message;
        assert!(liquidation.contains("LTV (∞%)"), "{liquidation}");
        assert!(liquidation.contains("(80.0%)"), "{liquidation}");
    }

    #[test]
    fn test_unrepresentable_ltv_saturates() {
        let pos = position("dust", dec!(0.000001), dec!(100000000000000000000000), dec!(0.8), dec!(0.75));
        let report = evaluate(&[pos]);

        let risk = &report.positions[0];
        assert_eq!(risk.current_ltv, Decimal::MAX);
        assert_eq!(risk.ltv_utilization, Decimal::MAX);
        assert!(risk.health_factor < dec!(1));
        assert!(kinds(&report.alerts).contains(&AlertKind::Liquidation));
        assert!(kinds(&report.alerts).contains(&AlertKind::HighLtv));
        assert!(report.alerts.iter().all(|a| !a.message.is_empty()));
    }

    #[test]
    fn test_aggregate_totals_saturate() {
        let positions = [
            position("1", Decimal::MAX, Decimal::MAX, dec!(0.8), dec!(0.75)),
            position("2", Decimal::MAX, dec!(1), dec!(0.8), dec!(0.75)),
        ];
        let agg = evaluate(&positions).aggregate;
        assert_eq!(agg.total_collateral, Decimal::MAX);
        assert_eq!(agg.total_borrowed, Decimal::MAX);
        assert_eq!(agg.tier, RiskTier::Critical);
    }

    // -----------------------------------------------------------------------
    // Aggregate
    // -----------------------------------------------------------------------

    #[test]
    fn test_aggregate_uses_safety_buffer() {
        let positions = [
            position("1", dec!(60000), dec!(40000), dec!(0.8), dec!(0.75)),
            position("2", dec!(40000), dec!(40000), dec!(0.8), dec!(0.75)),
        ];
        let agg = evaluate(&positions).aggregate;

        assert_eq!(agg.total_collateral, dec!(100000));
        assert_eq!(agg.total_borrowed, dec!(80000));
        assert_eq!(agg.aggregate_ltv, dec!(0.8));
        // 100000 / 88000 ≈ 1.136
        assert!(agg.aggregate_health_factor > dec!(1.13));
        assert!(agg.aggregate_health_factor < dec!(1.14));
        assert_eq!(agg.tier, RiskTier::High);
        assert_eq!(agg.liquidation_risk_score, 85);
    }

    #[test]
    fn test_aggregate_of_empty_portfolio() {
        let agg = evaluate(&[]).aggregate;
        assert_eq!(agg.total_collateral, Decimal::ZERO);
        assert_eq!(agg.aggregate_ltv, Decimal::ZERO);
        assert!(is_unbounded(agg.aggregate_health_factor));
        assert_eq!(agg.tier, RiskTier::Low);
        assert_eq!(agg.liquidation_risk_score, 15);
    }

    #[test]
    fn test_custom_buffer_changes_aggregate_only() {
        let mut thresholds = RiskThresholds::default();
        thresholds.aggregate_safety_buffer = dec!(1.0);
        let evaluator = RiskEvaluator::new(thresholds);

        let positions = [position("1", dec!(130000), dec!(100000), dec!(0.8), dec!(0.75))];
        let report = evaluator.evaluate(&positions);
        assert_eq!(report.aggregate.aggregate_health_factor, dec!(1.3));
        assert_eq!(report.aggregate.tier, RiskTier::Medium);
        // position HF = 130000 * 0.8 / 100000 = 1.04
        assert_eq!(report.positions[0].health_factor, dec!(1.04));
    }

    // -----------------------------------------------------------------------
    // Ordering and determinism
    // -----------------------------------------------------------------------

    #[test]
    fn test_alerts_sorted_by_severity_then_id() {
        let positions = [
            position("b", dec!(1000), dec!(700), dec!(0.95), dec!(0.75)), // high_ltv
            position("c", dec!(1000), dec!(900), dec!(0.8), dec!(0.8)),   // all three
            position("a", dec!(1000), dec!(700), dec!(0.95), dec!(0.75)), // high_ltv
        ];
        let alerts = evaluate(&positions).alerts;
        let order: Vec<(&str, AlertKind)> = alerts
            .iter()
            .map(|a| (a.position_id.as_str(), a.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                ("c", AlertKind::Liquidation),
                ("c", AlertKind::LowHealth),
                ("a", AlertKind::HighLtv),
                ("b", AlertKind::HighLtv),
                ("c", AlertKind::HighLtv),
            ]
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let positions = [
            position("1", dec!(107500), Decimal::ZERO, dec!(0.8), dec!(0.75)),
            position("2", dec!(25000), dec!(12000), dec!(0.8), dec!(0.75)),
            position("4", dec!(40000), dec!(40000), dec!(0.5), dec!(0.3)),
        ];
        assert_eq!(evaluate(&positions), evaluate(&positions));
    }

    #[test]
    fn test_position_order_preserved() {
        let positions = [
            position("z", dec!(10), Decimal::ZERO, dec!(0.8), dec!(0.75)),
            position("a", dec!(10), Decimal::ZERO, dec!(0.8), dec!(0.75)),
        ];
        let ids: Vec<String> = evaluate(&positions)
            .positions
            .into_iter()
            .map(|p| p.position_id)
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    // -----------------------------------------------------------------------
    // proptest
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn debt_free_positions_never_alert(
            collateral in 0u64..10_000_000u64,
            lt_bps in 1u32..=10_000u32,
        ) {
            let lt = Decimal::from(lt_bps) / Decimal::from(10_000u32);
            let pos = position("p", Decimal::from(collateral), Decimal::ZERO, lt, lt);
            let report = evaluate(&[pos]);
            prop_assert!(is_unbounded(report.positions[0].health_factor));
            prop_assert_eq!(report.positions[0].tier, RiskTier::Low);
            prop_assert!(report.alerts.is_empty());
        }

        #[test]
        fn uncollateralized_debt_always_liquidatable(debt in 1u64..10_000_000u64) {
            let pos = position("p", Decimal::ZERO, Decimal::from(debt), dec!(0.8), dec!(0.75));
            let report = evaluate(&[pos]);
            prop_assert_eq!(report.positions[0].tier, RiskTier::Critical);
            prop_assert!(report.alerts.iter().any(|a| a.kind == AlertKind::Liquidation));
        }

        #[test]
        fn adding_collateral_never_raises_tier(
            collateral in 0u64..1_000_000u64,
            extra in 1u64..1_000_000u64,
            debt in 1u64..1_000_000u64,
        ) {
            let evaluator = RiskEvaluator::default();
            let before = evaluator.evaluate_position(
                &position("p", Decimal::from(collateral), Decimal::from(debt), dec!(0.8), dec!(0.75)),
            );
            let after = evaluator.evaluate_position(
                &position("p", Decimal::from(collateral + extra), Decimal::from(debt), dec!(0.8), dec!(0.75)),
            );
            prop_assert!(after.tier <= before.tier);
        }

        #[test]
        fn sub_unit_collateral_never_panics(
            mantissa in 1i64..1_000_000i64,
            scale in 0u32..=12u32,
            debt in 1u64..u64::MAX,
            exponent in 0u32..=9u32,
        ) {
            let borrowed = Decimal::from(debt) * Decimal::from(10u64.pow(exponent));
            let pos = position("p", Decimal::new(mantissa, scale), borrowed, dec!(0.8), dec!(0.75));
            let report = evaluate(&[pos]);
            let risk = &report.positions[0];
            if risk.current_ltv >= dec!(0.8) {
                prop_assert!(report.alerts.iter().any(|a| a.kind == AlertKind::Liquidation));
            }
            prop_assert!(report.alerts.iter().all(|a| !a.message.is_empty()));
        }
    }
}
