//! Dashboard data model: stocks, analysis requests and analysis results

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Immutable quote snapshot for one symbol
///
/// Snapshots are replaced wholesale on refresh; nothing mutates them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// Ticker symbol, the stable identity of the stock
    pub symbol: String,
    /// Display name from the static catalog
    pub name: String,
    /// Last traded price
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Percent change since previous close
    pub change_percent: f64,
}

impl Stock {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        change: f64,
        change_percent: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change,
            change_percent,
        }
    }

    /// Zero-valued entry for a symbol the provider did not report
    pub fn unquoted(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, 0.0, 0.0, 0.0)
    }

    /// True when every numeric field is zero, i.e. the provider had no quote
    pub fn is_unquoted(&self) -> bool {
        self.price == 0.0 && self.change == 0.0 && self.change_percent == 0.0
    }
}

/// Sampling interval for technical indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 8] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
    ];

    /// Wire token for this interval
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::SixtyMinutes => "60min",
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s.trim())
            .ok_or_else(|| format!("unknown interval: {s}"))
    }
}

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub days_back: u32,
    pub technical_interval: Interval,
    pub technical_limit: u32,
}

/// Per-request parameters applied to every analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Lookback window in days
    pub days_back: u32,
    /// Indicator sampling interval
    pub technical_interval: Interval,
    /// Number of indicator samples
    pub technical_limit: u32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            days_back: 7,
            technical_interval: Interval::OneDay,
            technical_limit: 100,
        }
    }
}

impl AnalysisParams {
    /// Build a fresh request for `symbol`
    pub fn request_for(&self, symbol: impl Into<String>) -> AnalysisRequest {
        AnalysisRequest {
            symbol: symbol.into(),
            days_back: self.days_back,
            technical_interval: self.technical_interval,
            technical_limit: self.technical_limit,
        }
    }
}

/// Symbol and price as reported back by the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEcho {
    pub symbol: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    /// Trend label, e.g. "Bullish"
    pub trend: String,
    pub support: f64,
    pub resistance: f64,
    pub rsi: f64,
    /// MACD signal label
    pub macd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnalysis {
    pub sentiment: String,
    /// News score on a 0-10 scale
    pub news_score: f64,
    pub social_media_buzz: String,
    pub analyst_rating: String,
}

/// Typed response of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub stock: StockEcho,
    pub technical_analysis: TechnicalAnalysis,
    pub semantic_analysis: SemanticAnalysis,
    pub ai_insight: String,
}

impl AnalysisResult {
    /// Parse and validate a response body
    pub fn from_json(body: &str) -> Result<Self, AnalysisError> {
        let result: Self = serde_json::from_str(body)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
        result.validate()?;
        Ok(result)
    }

    /// Range checks the schema alone cannot express
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let malformed = |msg: String| Err(AnalysisError::MalformedResponse(msg));

        if self.stock.symbol.trim().is_empty() {
            return malformed("stock.symbol is empty".to_string());
        }

        let numbers = [
            ("stock.price", self.stock.price),
            ("technicalAnalysis.support", self.technical_analysis.support),
            ("technicalAnalysis.resistance", self.technical_analysis.resistance),
            ("technicalAnalysis.rsi", self.technical_analysis.rsi),
            ("semanticAnalysis.newsScore", self.semantic_analysis.news_score),
        ];
        if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return malformed(format!("{field} is not a finite number"));
        }

        if !(0.0..=100.0).contains(&self.technical_analysis.rsi) {
            return malformed(format!(
                "technicalAnalysis.rsi out of range: {}",
                self.technical_analysis.rsi
            ));
        }

        if !(0.0..=10.0).contains(&self.semantic_analysis.news_score) {
            return malformed(format!(
                "semanticAnalysis.newsScore out of range: {}",
                self.semantic_analysis.news_score
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Well-formed `/analyze` body used across tests
    pub const AAPL_ANALYSIS: &str = r#"{
        "stock": { "symbol": "AAPL", "price": 175.50 },
        "technicalAnalysis": {
            "trend": "Bullish",
            "support": 166.73,
            "resistance": 184.28,
            "rsi": 62.4,
            "macd": "Bullish crossover"
        },
        "semanticAnalysis": {
            "sentiment": "Positive",
            "newsScore": 7.5,
            "socialMediaBuzz": "High",
            "analystRating": "Buy"
        },
        "aiInsight": "Momentum remains constructive above support."
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_names() {
        let request = AnalysisParams::default().request_for("AAPL");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "AAPL",
                "days_back": 7,
                "technical_interval": "1D",
                "technical_limit": 100
            })
        );
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!("60min".parse::<Interval>(), Ok(Interval::SixtyMinutes));
        assert_eq!("15min".parse::<Interval>(), Ok(Interval::FifteenMinutes));
        assert!("2D".parse::<Interval>().is_err());
        assert_eq!(Interval::default().to_string(), "1D");
    }

    #[test]
    fn test_interval_tokens_match_service() {
        let tokens: Vec<_> = Interval::ALL.iter().map(Interval::as_str).collect();
        assert_eq!(
            tokens,
            ["1min", "5min", "15min", "30min", "60min", "1D", "1W", "1M"]
        );
        for token in tokens {
            assert_eq!(token.parse::<Interval>().unwrap().as_str(), token);
        }
        assert!("1H".parse::<Interval>().is_err());
        assert!("4H".parse::<Interval>().is_err());
        assert_eq!(
            serde_json::to_value(Interval::SixtyMinutes).unwrap(),
            serde_json::json!("60min")
        );
    }

    #[test]
    fn test_parse_analysis_result() {
        let result = AnalysisResult::from_json(fixtures::AAPL_ANALYSIS).unwrap();
        assert_eq!(result.stock.symbol, "AAPL");
        assert!((result.stock.price - 175.50).abs() < f64::EPSILON);
        assert_eq!(result.technical_analysis.trend, "Bullish");
        assert!((result.technical_analysis.support - 166.73).abs() < f64::EPSILON);
        assert_eq!(result.semantic_analysis.social_media_buzz, "High");
        assert_eq!(result.semantic_analysis.analyst_rating, "Buy");
    }

    #[test]
    fn test_missing_block_is_malformed() {
        let body = r#"{ "stock": { "symbol": "AAPL", "price": 1.0 }, "aiInsight": "x" }"#;
        let err = AnalysisResult::from_json(body).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(msg) if msg.contains("technicalAnalysis")));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let body = fixtures::AAPL_ANALYSIS.replace("166.73", "\"166.73\"");
        assert!(matches!(
            AnalysisResult::from_json(&body),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_news_score_out_of_range() {
        let body = fixtures::AAPL_ANALYSIS.replace("7.5", "11.0");
        let err = AnalysisResult::from_json(&body).unwrap_err();
        assert!(err.to_string().contains("newsScore"));
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(
            AnalysisResult::from_json("<html>Bad Gateway</html>"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unquoted_stock() {
        let stock = Stock::unquoted("NFLX", "Netflix Inc.");
        assert!(stock.is_unquoted());
        assert!(!Stock::new("AAPL", "Apple Inc.", 175.5, 1.2, 0.69).is_unquoted());
    }
}
