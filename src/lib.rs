//! dtvis - data shaping for decision-tree visualizations
//!
//! Turns a tree-model export into the data a renderer needs to draw two
//! views: a table of decision paths and a feature-importance bar chart.
//!
//! # Overview
//!
//! | View | Model | Output |
//! |------|-------|--------|
//! | Decision paths | [`PathTable`] | columns, ranked rows, leaf order |
//! | Feature importance | [`ImportanceChart`] | bars, value domain, category order |
//!
//! Both models are plain values built from an immutable [`TreeExport`];
//! re-sorting recomputes the derived view and nothing else.
//!
//! # Quick Start
//!
//! ```no_run
//! use dtvis::{BarOrder, ImportanceChart, PathTable, SortCriterion, TableLayout, TreeExport};
//!
//! let export = TreeExport::from_path("d3tree_data.json").unwrap();
//!
//! // Decision paths, sorted by the observations of the first class
//! let mut table = PathTable::new(&export, TableLayout::default()).unwrap();
//! for row in table.sort_by(SortCriterion::Class(0)).unwrap() {
//!     println!("{} {}", row.rank, row.row.leaf_id);
//! }
//!
//! // Bars ordered by importance
//! let chart = ImportanceChart::new(export.importances());
//! println!("{:?}", chart.category_order(BarOrder::Rank));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod importance;
pub mod paths;

pub use config::{BarsConfig, Config, TableConfig};
pub use error::{DtvisError, Result};
pub use export::{DecisionPath, FeatureImportance, LeafValue, LeafValues, TreeExport};
pub use importance::{
    filter_important, rank_by_importance, select_order, sort_alphabetically, BarOrder,
    ChartView, ImportanceChart,
};
pub use paths::{
    build_columns, build_rows, build_rows_with, class_cell_text, column_count, leaf_breakdown,
    leaf_ordinal, rank, sort_options, sort_rows, Cell, ClassCount, LeafOrdinal, PathRow, PathTable,
    RankedRow, SortCriterion, SortOption, TableLayout, TableView, LEAF_NUMBER_LABEL,
};

// Re-export TS trait for downstream use
#[cfg(feature = "ts-rs")]
pub use ts_rs::TS;
