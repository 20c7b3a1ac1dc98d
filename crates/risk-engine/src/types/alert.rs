use serde::{Deserialize, Serialize};

/// Alert severity, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Finding raised against a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Current LTV has reached the liquidation threshold.
    Liquidation,
    /// Health factor below the low-health cutoff.
    LowHealth,
    /// Current LTV is close to the protocol borrowing ceiling.
    HighLtv,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Liquidation => "liquidation",
            Self::LowHealth => "low_health",
            Self::HighLtv => "high_ltv",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Liquidation => Severity::Critical,
            Self::LowHealth => Severity::High,
            Self::HighLtv => Severity::Medium,
        }
    }
}

/// Alert emitted by an evaluation run. Not persisted or deduplicated here;
/// retention and resolution belong to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub position_id: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}

impl RiskAlert {
    pub fn new(position_id: impl Into<String>, kind: AlertKind, message: String) -> Self {
        Self {
            position_id: position_id.into(),
            kind,
            severity: kind.severity(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(AlertKind::Liquidation.severity(), Severity::Critical);
        assert_eq!(AlertKind::LowHealth.severity(), Severity::High);
        assert_eq!(AlertKind::HighLtv.severity(), Severity::Medium);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AlertKind::LowHealth).unwrap(),
            "\"low_health\""
        );
        assert_eq!(AlertKind::HighLtv.as_str(), "high_ltv");
    }

    #[test]
    fn test_new_alert_takes_severity_from_kind() {
        let alert = RiskAlert::new("p1", AlertKind::HighLtv, "near ceiling".into());
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.position_id, "p1");
    }
}
