use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FinePolicy;
use crate::domain::transaction::{DEFAULT_LOAN_PERIOD_DAYS, DEFAULT_PER_DAY_FINE_RATE};

/// 貸出期間の環境変数名
pub const LOAN_PERIOD_DAYS_ENV: &str = "LIBRARY_LOAN_PERIOD_DAYS";
/// 1日あたりの延滞料金の環境変数名
pub const PER_DAY_FINE_RATE_ENV: &str = "LIBRARY_PER_DAY_FINE_RATE";

/// 貸出期間の上限（日数）
pub const MAX_LOAN_PERIOD_DAYS: i64 = 3650;

/// 1日あたりの延滞料金の上限（1,000,000）
pub const MAX_PER_DAY_FINE_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid number: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be between 0 and {max}, got {value}")]
    LoanPeriodOutOfRange {
        name: &'static str,
        value: i64,
        max: i64,
    },

    #[error("{name} must not be negative, got {value}")]
    NegativeRate { name: &'static str, value: Decimal },

    #[error("{name} must not exceed {max}, got {value}")]
    RateTooHigh {
        name: &'static str,
        value: Decimal,
        max: Decimal,
    },
}

/// 図書館の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// 延滞料金が発生するまでの日数（既定: 14）
    pub loan_period_days: i64,
    /// 1日あたりの延滞料金（既定: 0.50）
    pub per_day_fine_rate: Decimal,
}

impl LibraryConfig {
    pub fn new(loan_period_days: i64, per_day_fine_rate: Decimal) -> Self {
        Self {
            loan_period_days,
            per_day_fine_rate,
        }
    }

    /// 環境変数から設定を読み込む
    ///
    /// 未設定の項目は既定値を使う。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let loan_period_days = match lookup(LOAN_PERIOD_DAYS_ENV) {
            Some(raw) => parse_value(LOAN_PERIOD_DAYS_ENV, &raw)?,
            None => defaults.loan_period_days,
        };
        let per_day_fine_rate = match lookup(PER_DAY_FINE_RATE_ENV) {
            Some(raw) => parse_value(PER_DAY_FINE_RATE_ENV, &raw)?,
            None => defaults.per_day_fine_rate,
        };

        let config = Self::new(loan_period_days, per_day_fine_rate);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_LOAN_PERIOD_DAYS).contains(&self.loan_period_days) {
            return Err(ConfigError::LoanPeriodOutOfRange {
                name: LOAN_PERIOD_DAYS_ENV,
                value: self.loan_period_days,
                max: MAX_LOAN_PERIOD_DAYS,
            });
        }
        if self.per_day_fine_rate < Decimal::ZERO {
            return Err(ConfigError::NegativeRate {
                name: PER_DAY_FINE_RATE_ENV,
                value: self.per_day_fine_rate,
            });
        }
        if self.per_day_fine_rate > MAX_PER_DAY_FINE_RATE {
            return Err(ConfigError::RateTooHigh {
                name: PER_DAY_FINE_RATE_ENV,
                value: self.per_day_fine_rate,
                max: MAX_PER_DAY_FINE_RATE,
            });
        }
        Ok(())
    }

    pub fn fine_policy(&self) -> FinePolicy {
        FinePolicy::new(self.loan_period_days, self.per_day_fine_rate)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOAN_PERIOD_DAYS, DEFAULT_PER_DAY_FINE_RATE)
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LibraryConfig::default();
        assert_eq!(config.loan_period_days, 14);
        assert_eq!(config.per_day_fine_rate, dec!(0.50));
    }

    #[test]
    fn test_from_lookup_uses_defaults_when_unset() {
        let config = LibraryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, LibraryConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            (LOAN_PERIOD_DAYS_ENV, "21"),
            (PER_DAY_FINE_RATE_ENV, " 0.25 "),
        ]))
        .unwrap();

        assert_eq!(config.loan_period_days, 21);
        assert_eq!(config.per_day_fine_rate, dec!(0.25));
        assert_eq!(config.fine_policy().loan_period_days, 21);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result =
            LibraryConfig::from_lookup(lookup_from(&[(LOAN_PERIOD_DAYS_ENV, "two weeks")]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_from_lookup_rejects_negative_values() {
        let result = LibraryConfig::from_lookup(lookup_from(&[(LOAN_PERIOD_DAYS_ENV, "-1")]));
        assert!(matches!(
            result,
            Err(ConfigError::LoanPeriodOutOfRange { value: -1, .. })
        ));

        let result = LibraryConfig::from_lookup(lookup_from(&[(PER_DAY_FINE_RATE_ENV, "-0.10")]));
        assert!(matches!(result, Err(ConfigError::NegativeRate { .. })));
    }

    #[test]
    fn test_from_lookup_rejects_rate_above_limit() {
        let huge = Decimal::MAX.to_string();
        let result =
            LibraryConfig::from_lookup(lookup_from(&[(PER_DAY_FINE_RATE_ENV, huge.as_str())]));
        assert!(matches!(result, Err(ConfigError::RateTooHigh { .. })));

        let config = LibraryConfig::new(14, MAX_PER_DAY_FINE_RATE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let config =
            LibraryConfig::from_lookup(lookup_from(&[(PER_DAY_FINE_RATE_ENV, "0")])).unwrap();
        assert_eq!(config.per_day_fine_rate, Decimal::ZERO);
    }
}
