//! Feature-importance bar chart data
//!
//! Filters out attributes without influence and derives the x-axis category
//! order for the two chart orderings.

use crate::error::{DtvisError, Result};
use crate::export::FeatureImportance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keep only attributes with a positive importance, in their original order
pub fn filter_important(data: &[FeatureImportance]) -> Vec<FeatureImportance> {
    data.iter().filter(|d| d.importance > 0.0).cloned().collect()
}

/// Attribute names by descending importance; equal scores keep input order
pub fn rank_by_importance(data: &[FeatureImportance]) -> Vec<String> {
    attribute_names(BarOrder::Rank.sorted(data))
}

/// Attribute names in ascending lexicographic order
pub fn sort_alphabetically(data: &[FeatureImportance]) -> Vec<String> {
    attribute_names(BarOrder::Alphabetical.sorted(data))
}

fn attribute_names(bars: Vec<&FeatureImportance>) -> Vec<String> {
    bars.into_iter().map(|d| d.attribute.clone()).collect()
}

/// Ordering of the bars along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarOrder {
    #[default]
    Rank,
    Alphabetical,
}

impl BarOrder {
    /// The records themselves in this order. Both sorts are stable, so
    /// records sharing a name or a score keep their input order.
    pub fn sorted(self, data: &[FeatureImportance]) -> Vec<&FeatureImportance> {
        let mut sorted: Vec<&FeatureImportance> = data.iter().collect();
        match self {
            BarOrder::Rank => sorted.sort_by(|a, b| b.importance.total_cmp(&a.importance)),
            BarOrder::Alphabetical => sorted.sort_by(|a, b| a.attribute.cmp(&b.attribute)),
        }
        sorted
    }

    pub fn apply(self, data: &[FeatureImportance]) -> Vec<String> {
        attribute_names(self.sorted(data))
    }
}

impl FromStr for BarOrder {
    type Err = DtvisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "rank" => Ok(BarOrder::Rank),
            "alphabetical" => Ok(BarOrder::Alphabetical),
            other => Err(DtvisError::invalid(format!(
                "unknown bar order `{}` (expected `rank` or `alphabetical`)",
                other
            ))),
        }
    }
}

impl fmt::Display for BarOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarOrder::Rank => write!(f, "rank"),
            BarOrder::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

/// Category order for `mode` (`"rank"` or `"alphabetical"`).
///
/// Any other mode is rejected rather than silently treated as alphabetical.
pub fn select_order(mode: &str, data: &[FeatureImportance]) -> Result<Vec<String>> {
    let order: BarOrder = mode.parse()?;
    Ok(order.apply(data))
}

/// Bars of one chart: the filtered importances, computed once and reused for
/// every re-ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceChart {
    bars: Vec<FeatureImportance>,
}

impl ImportanceChart {
    pub fn new(data: &[FeatureImportance]) -> Self {
        Self {
            bars: filter_important(data),
        }
    }

    pub fn bars(&self) -> &[FeatureImportance] {
        &self.bars
    }

    /// Value axis domain: zero to the largest importance
    pub fn value_domain(&self) -> (f64, f64) {
        let max = self
            .bars
            .iter()
            .map(|d| d.importance)
            .fold(0.0_f64, f64::max);
        (0.0, max)
    }

    /// Bars in display order, one entry per bar even when names repeat
    pub fn ordered_bars(&self, order: BarOrder) -> Vec<&FeatureImportance> {
        order.sorted(&self.bars)
    }

    pub fn category_order(&self, order: BarOrder) -> Vec<String> {
        attribute_names(self.ordered_bars(order))
    }
}

/// Bars plus category order, as handed to a renderer
#[derive(Debug, Clone, Serialize)]
pub struct ChartView<'a> {
    pub order: BarOrder,
    pub categories: Vec<String>,
    pub domain: (f64, f64),
    pub bars: &'a [FeatureImportance],
}

impl ImportanceChart {
    pub fn view(&self, order: BarOrder) -> ChartView<'_> {
        ChartView {
            order,
            categories: self.category_order(order),
            domain: self.value_domain(),
            bars: &self.bars,
        }
    }
}
