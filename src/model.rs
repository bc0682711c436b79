use std::fmt;

/// Readings strictly below this value are reported as oversold.
pub const OVERSOLD_THRESHOLD: f64 = 30.0;
/// Readings strictly above this value are reported as overbought.
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Oversold,
    Overbought,
}

impl AlertKind {
    /// Classify an indicator reading. Both thresholds are exclusive.
    pub fn classify(value: f64) -> Option<Self> {
        if value < OVERSOLD_THRESHOLD {
            Some(Self::Oversold)
        } else if value > OVERBOUGHT_THRESHOLD {
            Some(Self::Overbought)
        } else {
            None
        }
    }

    /// The threshold this kind breaches, as shown in alert text.
    fn bound(self) -> String {
        match self {
            Self::Oversold => format!("below {OVERSOLD_THRESHOLD}"),
            Self::Overbought => format!("above {OVERBOUGHT_THRESHOLD}"),
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversold => write!(f, "oversold"),
            Self::Overbought => write!(f, "overbought"),
        }
    }
}

/// A threshold breach for one symbol, built during a cycle and sent right away.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub kind: AlertKind,
    pub value: f64,
}

impl Alert {
    pub fn from_reading(symbol: &str, value: f64) -> Option<Self> {
        AlertKind::classify(value).map(|kind| Self {
            symbol: symbol.to_owned(),
            kind,
            value,
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Alert! {} is {}: MFI = {} ({})",
            self.symbol,
            self.kind,
            self.value,
            self.kind.bound()
        )
    }
}
