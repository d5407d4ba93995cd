use core_config::{env_parse, ConfigError, FromEnv};

use crate::calculator::CalculatorOptions;
use crate::models::MarginConvention;

impl FromEnv for CalculatorOptions {
    /// - QUOTE_MARGIN_CONVENTION: `on_price` (default) or `markup`
    /// - QUOTE_STRICT_REGIONS: `true` to require region shares adding up to 100
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            margin_convention: env_parse("QUOTE_MARGIN_CONVENTION", MarginConvention::default())?,
            strict_regions: env_parse("QUOTE_STRICT_REGIONS", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(["QUOTE_MARGIN_CONVENTION", "QUOTE_STRICT_REGIONS"], || {
            let options = CalculatorOptions::from_env().unwrap();
            assert_eq!(options, CalculatorOptions::default());
            assert_eq!(options.margin_convention, MarginConvention::OnPrice);
        });
    }

    #[test]
    fn test_markup_and_strict_regions() {
        temp_env::with_vars(
            [
                ("QUOTE_MARGIN_CONVENTION", Some("markup")),
                ("QUOTE_STRICT_REGIONS", Some("true")),
            ],
            || {
                let options = CalculatorOptions::from_env().unwrap();
                assert_eq!(options.margin_convention, MarginConvention::Markup);
                assert!(options.strict_regions);
            },
        );
    }

    #[test]
    fn test_unknown_convention_is_an_error() {
        temp_env::with_var("QUOTE_MARGIN_CONVENTION", Some("discount"), || {
            let err = CalculatorOptions::from_env().unwrap_err();
            assert!(err.to_string().contains("QUOTE_MARGIN_CONVENTION"));
        });
    }
}
