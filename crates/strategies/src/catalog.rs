// In crates/strategies/src/catalog.rs

use serde::Serialize;

/// Descriptive metadata for a built-in strategy, as shown on the strategies page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDescriptor {
    /// Stable identifier accepted by the factory (e.g., "mean_reversion").
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub time_frame: &'static str,
    pub success_rate: &'static str,
    pub best_market_condition: &'static str,
    pub risk_rating: &'static str,
}

const CATALOG: [StrategyDescriptor; 5] = [
    StrategyDescriptor {
        slug: "mean_reversion",
        name: "Mean Reversion",
        description: "Assumes prices and returns eventually move back towards their mean. \
            When the price deviates too far from the mean, it trades expecting a reversion.",
        time_frame: "Hourly data, 2-hour trades",
        success_rate: "65% - 75%",
        best_market_condition: "Ranging/Sideways markets",
        risk_rating: "Medium",
    },
    StrategyDescriptor {
        slug: "momentum",
        name: "Momentum Trading",
        description: "Capitalizes on the continuance of existing trends. Buys assets that \
            have been rising and sells those that have been declining.",
        time_frame: "Hourly data, 2-hour trades",
        success_rate: "60% - 70%",
        best_market_condition: "Trending markets",
        risk_rating: "High",
    },
    StrategyDescriptor {
        slug: "rsi",
        name: "RSI Strategy",
        description: "Uses the Relative Strength Index to identify overbought and oversold \
            conditions. Buys below 30 and sells above 70.",
        time_frame: "Hourly data, 2-hour trades",
        success_rate: "65% - 70%",
        best_market_condition: "Volatile markets",
        risk_rating: "Medium",
    },
    StrategyDescriptor {
        slug: "ma_crossover",
        name: "Moving Average Crossover",
        description: "Buys when a short-term moving average crosses above a long-term one \
            and sells when it crosses below.",
        time_frame: "Hourly data, 2-hour trades",
        success_rate: "55% - 65%",
        best_market_condition: "Trending markets",
        risk_rating: "Medium",
    },
    StrategyDescriptor {
        slug: "macd",
        name: "MACD",
        description: "Trades the MACD histogram against the buy and sell thresholds, \
            using the fast, slow and signal periods as its windows.",
        time_frame: "Hourly data, 2-hour trades",
        success_rate: "Not rated",
        best_market_condition: "Trending markets",
        risk_rating: "Medium",
    },
];

/// All built-in strategies, in display order.
pub fn catalog() -> &'static [StrategyDescriptor] {
    &CATALOG
}

/// Looks a strategy up by slug or display name, ignoring case.
pub fn find(name: &str) -> Option<&'static StrategyDescriptor> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .find(|d| d.slug.eq_ignore_ascii_case(wanted) || d.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_the_four_builtins_plus_macd() {
        let names: Vec<_> = catalog().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["Mean Reversion", "Momentum Trading", "RSI Strategy", "Moving Average Crossover", "MACD"]
        );
    }

    #[test]
    fn finds_by_slug_or_name() {
        assert_eq!(find("RSI").unwrap().slug, "rsi");
        assert_eq!(find("momentum trading").unwrap().slug, "momentum");
        assert_eq!(find(" Mean Reversion ").unwrap().risk_rating, "Medium");
        assert!(find("grid").is_none());
    }
}
