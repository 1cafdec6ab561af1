//! Decision-path table
//!
//! Turns the decision paths of an export into table columns and row records,
//! and re-sorts them by leaf number or by per-class observation count.
//! Ranks are never stored: they are projected from the current row order.

use crate::error::{DtvisError, Result};
use crate::export::{DecisionPath, LeafValue, LeafValues, TreeExport};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

lazy_static::lazy_static! {
    // Trailing digits of a leaf identifier: "leaf12" -> "12"
    static ref LEAF_ORDINAL: Regex = Regex::new(r"(\d+)$").expect("leaf ordinal pattern");
}

/// Label of the leaf-number entry in the sort options
pub const LEAF_NUMBER_LABEL: &str = "Leaf number";

/// Column naming and whether the table leads with a rank column.
///
/// Data columns start at index `offset()`: 1 when the rank column is shown,
/// 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub rank_column: bool,
    pub rank_header: String,
    /// Prefix of the numbered split columns ("decision 1", "decision 2", ...)
    pub step_header: String,
    pub class_header: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            rank_column: true,
            rank_header: "rank".to_string(),
            step_header: "decision".to_string(),
            class_header: "class".to_string(),
        }
    }
}

impl TableLayout {
    /// Layout without the leading rank column
    pub fn without_rank() -> Self {
        Self {
            rank_column: false,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> usize {
        usize::from(self.rank_column)
    }

    /// Number of columns needed to show paths of `longest_path` elements
    pub fn table_width(&self, longest_path: usize) -> usize {
        longest_path + self.offset()
    }

    /// Header names for a table `width` columns wide.
    ///
    /// The rank column (if any) and the class column are always present;
    /// the remaining `width - fixed` columns are numbered split columns.
    pub fn columns(&self, width: usize) -> Vec<String> {
        let fixed = self.offset() + 1;
        let steps = width.saturating_sub(fixed);

        let mut columns = Vec::with_capacity(fixed + steps);
        if self.rank_column {
            columns.push(self.rank_header.clone());
        }
        columns.extend((1..=steps).map(|i| format!("{} {}", self.step_header, i)));
        columns.push(self.class_header.clone());
        columns
    }
}

/// Length of the longest decision path (0 for no paths)
pub fn column_count(paths: &[DecisionPath]) -> usize {
    paths.iter().map(DecisionPath::len).max().unwrap_or(0)
}

/// Default-layout headers: `["rank", "decision 1", ..., "class"]`, `ncols` wide
pub fn build_columns(ncols: usize) -> Vec<String> {
    TableLayout::default().columns(ncols)
}

/// One value of a table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub struct Cell {
    pub column: String,
    /// `None` for the rank cell and for split columns past the end of a short path
    pub value: Option<String>,
}

/// Table row for one decision path, with its leaf summary attached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub struct PathRow {
    pub key: String,
    pub cells: Vec<Cell>,
    pub leaf_id: String,
    pub leaf_value: LeafValue,
    /// Insertion index in the export; breaks ties in every sort
    pub position: usize,
}

/// Rows for `paths` in insertion order, using the default layout
pub fn build_rows(paths: &[DecisionPath], leaf_values: &LeafValues) -> Result<Vec<PathRow>> {
    build_rows_with(paths, leaf_values, &TableLayout::default())
}

/// Rows for `paths` in insertion order.
///
/// Split `j` of a path lands in split column `j + 1`; the leaf identifier
/// always lands in the class column, so short paths leave their trailing
/// split columns empty.
pub fn build_rows_with(
    paths: &[DecisionPath],
    leaf_values: &LeafValues,
    layout: &TableLayout,
) -> Result<Vec<PathRow>> {
    let columns = layout.columns(layout.table_width(column_count(paths)));
    paths
        .iter()
        .enumerate()
        .map(|(position, path)| build_row(position, path, leaf_values, layout, &columns))
        .collect()
}

fn build_row(
    position: usize,
    path: &DecisionPath,
    leaf_values: &LeafValues,
    layout: &TableLayout,
    columns: &[String],
) -> Result<PathRow> {
    let leaf_id = path
        .leaf_id()
        .ok_or_else(|| DtvisError::schema(format!("decision path `{}` is empty", path.key)))?;
    let leaf_value = leaf_values.get(leaf_id).cloned().ok_or_else(|| {
        DtvisError::schema(format!(
            "decision path `{}` ends in `{}`, which has no entry in `leaf_values`",
            path.key, leaf_id
        ))
    })?;

    let splits = path.splits();
    let class_index = columns.len() - 1;
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = if layout.rank_column && i == 0 {
                None
            } else if i == class_index {
                Some(leaf_id.to_string())
            } else {
                splits.get(i - layout.offset()).cloned()
            };
            Cell {
                column: column.clone(),
                value,
            }
        })
        .collect();

    Ok(PathRow {
        key: path.key.clone(),
        cells,
        leaf_id: leaf_id.to_string(),
        leaf_value,
        position,
    })
}

/// A row paired with its 1-based position in the current order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedRow<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub row: &'a PathRow,
}

impl RankedRow<'_> {
    /// Display text for each cell: the rank for the rank cell, the leaf with
    /// its counts for the class cell, the split text otherwise.
    pub fn cell_texts(&self, layout: &TableLayout) -> Vec<String> {
        let class_index = self.row.cells.len().saturating_sub(1);
        self.row
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if layout.rank_column && i == 0 {
                    self.rank.to_string()
                } else if i == class_index {
                    class_cell_text(&self.row.leaf_id, &self.row.leaf_value)
                } else {
                    cell.value.clone().unwrap_or_default()
                }
            })
            .collect()
    }
}

/// Assign ranks `1..=n` to `rows` in their current order
pub fn rank(rows: &[PathRow]) -> Vec<RankedRow<'_>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| RankedRow { rank: i + 1, row })
        .collect()
}

/// What a table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    /// Ascending by the numeric suffix of the leaf identifier
    #[default]
    LeafIndex,
    /// Descending by the observation count of a class (0-based)
    Class(usize),
}

impl SortCriterion {
    /// Resolve a sort-option value against the class labels of a table.
    ///
    /// Accepts `"default"`, a class index, or a class label.
    pub fn resolve(value: &str, class_labels: &[String]) -> Result<Self> {
        let value = value.trim();
        // Numeric values are indices even if a class happens to be named "1".
        if value.parse::<usize>().is_err() {
            if let Some(class) = class_labels.iter().position(|label| label == value) {
                return Ok(SortCriterion::Class(class));
            }
        }

        let criterion: SortCriterion = value.parse()?;
        if let SortCriterion::Class(class) = criterion {
            check_class(class, class_labels.len())?;
        }
        Ok(criterion)
    }
}

impl FromStr for SortCriterion {
    type Err = DtvisError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "default" {
            return Ok(SortCriterion::LeafIndex);
        }
        s.parse::<usize>().map(SortCriterion::Class).map_err(|_| {
            DtvisError::invalid(format!(
                "unknown sort criterion `{}` (expected `default`, a class index or a class label)",
                s
            ))
        })
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortCriterion::LeafIndex => write!(f, "default"),
            SortCriterion::Class(class) => write!(f, "{}", class),
        }
    }
}

fn check_class(class: usize, n_classes: usize) -> Result<()> {
    if class >= n_classes {
        return Err(DtvisError::invalid(format!(
            "class index {} is out of range for {} class labels",
            class, n_classes
        )));
    }
    Ok(())
}

/// Numeric suffix of a leaf identifier, kept as its digits so that no
/// suffix is too long to order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafOrdinal(String);

impl LeafOrdinal {
    /// Digits without leading zeros (`"0"` for an all-zero suffix)
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Ord for LeafOrdinal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for LeafOrdinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LeafOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric suffix of a leaf identifier: `"leaf12"` -> 12
pub fn leaf_ordinal(leaf_id: &str) -> Result<LeafOrdinal> {
    let digits = LEAF_ORDINAL
        .captures(leaf_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| DtvisError::MalformedIdentifier {
            id: leaf_id.to_string(),
        })?;
    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() {
        &digits[digits.len() - 1..]
    } else {
        trimmed
    };
    Ok(LeafOrdinal(digits.to_string()))
}

#[derive(Debug, Clone)]
enum SortKey {
    Ordinal(LeafOrdinal),
    Count(f64),
}

impl SortKey {
    fn for_row(row: &PathRow, criterion: SortCriterion) -> Result<Self> {
        match criterion {
            SortCriterion::LeafIndex => leaf_ordinal(&row.leaf_id).map(SortKey::Ordinal),
            SortCriterion::Class(class) => row
                .leaf_value
                .class_value(class)
                .map(SortKey::Count)
                .ok_or_else(|| {
                    DtvisError::schema(format!(
                        "leaf `{}` has no observation count for class {}",
                        row.leaf_id, class
                    ))
                }),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Ordinal(a), SortKey::Ordinal(b)) => a.cmp(b),
            (SortKey::Count(a), SortKey::Count(b)) => b.total_cmp(a),
            _ => Ordering::Equal,
        }
    }
}

/// Reorder `rows` by `criterion`, ties falling back to insertion order.
///
/// Every key is computed before anything moves, so on error the rows keep
/// their current order.
pub fn sort_rows(rows: &mut Vec<PathRow>, criterion: SortCriterion, n_classes: usize) -> Result<()> {
    if let SortCriterion::Class(class) = criterion {
        check_class(class, n_classes)?;
    }

    let keys = rows
        .iter()
        .map(|row| SortKey::for_row(row, criterion))
        .collect::<Result<Vec<_>>>()?;

    let mut keyed: Vec<(SortKey, PathRow)> = keys.into_iter().zip(rows.drain(..)).collect();
    keyed.sort_by(|(key_a, a), (key_b, b)| {
        key_a
            .compare(key_b)
            .then_with(|| a.position.cmp(&b.position))
    });
    rows.extend(keyed.into_iter().map(|(_, row)| row));
    Ok(())
}

/// An entry of the sort selector offered next to the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub struct SortOption {
    pub value: String,
    pub label: String,
}

/// "Leaf number" first, then one option per class in label order
pub fn sort_options(class_labels: &[String]) -> Vec<SortOption> {
    std::iter::once(SortOption {
        value: SortCriterion::LeafIndex.to_string(),
        label: LEAF_NUMBER_LABEL.to_string(),
    })
    .chain(class_labels.iter().enumerate().map(|(i, label)| SortOption {
        value: SortCriterion::Class(i).to_string(),
        label: label.clone(),
    }))
    .collect()
}

/// Observation count of one class at a leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub struct ClassCount {
    pub label: String,
    pub n_obs: f64,
}

/// Per-class counts of a leaf, paired with their labels.
/// Scalar summaries have no breakdown.
pub fn leaf_breakdown(value: &LeafValue, class_labels: &[String]) -> Vec<ClassCount> {
    match value {
        LeafValue::Scalar(_) => Vec::new(),
        LeafValue::Counts(counts) => class_labels
            .iter()
            .zip(counts)
            .map(|(label, &n_obs)| ClassCount {
                label: label.clone(),
                n_obs,
            })
            .collect(),
    }
}

/// Class cell text, e.g. `leaf3: [12,0,4]`
pub fn class_cell_text(leaf_id: &str, value: &LeafValue) -> String {
    let values = match value {
        LeafValue::Scalar(v) => v.to_string(),
        LeafValue::Counts(counts) => counts
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(","),
    };
    format!("{}: [{}]", leaf_id, values)
}

/// Columns plus ranked rows, as handed to a renderer
#[derive(Debug, Clone, Serialize)]
pub struct TableView<'a> {
    pub columns: &'a [String],
    pub criterion: Option<String>,
    pub rows: Vec<RankedRow<'a>>,
}

/// Decision-path table built from one export.
///
/// Rows start in insertion order; `sort_by` reorders them and hands back the
/// re-ranked view.
#[derive(Debug, Clone)]
pub struct PathTable {
    layout: TableLayout,
    columns: Vec<String>,
    rows: Vec<PathRow>,
    class_labels: Vec<String>,
    criterion: Option<SortCriterion>,
}

impl PathTable {
    pub fn new(export: &TreeExport, layout: TableLayout) -> Result<Self> {
        let paths = export.decision_paths();
        let columns = layout.columns(layout.table_width(column_count(paths)));
        let rows = build_rows_with(paths, export.leaf_values(), &layout)?;
        Ok(Self {
            layout,
            columns,
            rows,
            class_labels: export.class_labels().to_vec(),
            criterion: None,
        })
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[PathRow] {
        &self.rows
    }

    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Criterion of the last successful sort, `None` while in insertion order
    pub fn criterion(&self) -> Option<SortCriterion> {
        self.criterion
    }

    pub fn ranked(&self) -> Vec<RankedRow<'_>> {
        rank(&self.rows)
    }

    /// Sort by `criterion` and re-rank
    pub fn sort_by(&mut self, criterion: SortCriterion) -> Result<Vec<RankedRow<'_>>> {
        sort_rows(&mut self.rows, criterion, self.class_labels.len())?;
        self.criterion = Some(criterion);
        Ok(rank(&self.rows))
    }

    /// Leaf identifiers in the current row order
    pub fn leaf_order(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.leaf_id.as_str()).collect()
    }

    pub fn sort_options(&self) -> Vec<SortOption> {
        sort_options(&self.class_labels)
    }

    /// Class breakdown of a leaf shown in the table
    pub fn breakdown(&self, leaf_id: &str) -> Option<Vec<ClassCount>> {
        self.rows
            .iter()
            .find(|row| row.leaf_id == leaf_id)
            .map(|row| leaf_breakdown(&row.leaf_value, &self.class_labels))
    }

    pub fn view(&self) -> TableView<'_> {
        TableView {
            columns: &self.columns,
            criterion: self.criterion.map(|c| c.to_string()),
            rows: self.ranked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FeatureImportance;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn export(paths: &[(&str, &[&str])], leaves: &[(&str, &[f64])], classes: &[&str]) -> TreeExport {
        let paths = paths
            .iter()
            .map(|(key, steps)| DecisionPath::new(*key, steps.iter().copied()))
            .collect();
        let leaves = leaves
            .iter()
            .map(|(id, counts)| (id.to_string(), LeafValue::Counts(counts.to_vec())))
            .collect();
        TreeExport::new(paths, leaves, labels(classes), Vec::<FeatureImportance>::new()).unwrap()
    }

    fn iris() -> TreeExport {
        export(
            &[
                ("p10", &["w ≤ 0.8", "l ≤ 4.9", "leaf10"]),
                ("p2", &["w ≤ 0.8", "leaf2"]),
                ("p1", &["w > 0.8", "l > 4.9", "leaf1"]),
                ("p3", &["w > 0.8", "l ≤ 4.9", "leaf3"]),
            ],
            &[
                ("leaf1", &[0.0, 5.0, 40.0]),
                ("leaf2", &[50.0, 0.0, 0.0]),
                ("leaf3", &[0.0, 40.0, 5.0]),
                ("leaf10", &[0.0, 5.0, 5.0]),
            ],
            &["setosa", "versicolor", "virginica"],
        )
    }

    #[test]
    fn test_column_count_is_longest_path() {
        let paths = vec![
            DecisionPath::new("p1", ["r", "n1", "leaf1"]),
            DecisionPath::new("p2", ["r", "leaf2"]),
        ];
        assert_eq!(column_count(&paths), 3);
        assert_eq!(column_count(&[]), 0);
    }

    #[test]
    fn test_build_columns() {
        assert_eq!(build_columns(3), ["rank", "decision 1", "class"]);
        assert_eq!(build_columns(1), ["rank", "class"]);
        assert_eq!(build_columns(0), ["rank", "class"]);
        assert_eq!(
            build_columns(5),
            ["rank", "decision 1", "decision 2", "decision 3", "class"]
        );
    }

    #[test]
    fn test_columns_without_rank() {
        let layout = TableLayout::without_rank();
        assert_eq!(layout.offset(), 0);
        assert_eq!(layout.columns(3), ["decision 1", "decision 2", "class"]);
        assert_eq!(layout.columns(0), ["class"]);
    }

    #[test]
    fn test_custom_headers() {
        let layout = TableLayout {
            rank_column: true,
            rank_header: "#".to_string(),
            step_header: "node".to_string(),
            class_header: "terminal_node".to_string(),
        };
        assert_eq!(layout.columns(4), ["#", "node 1", "node 2", "terminal_node"]);
    }

    #[test]
    fn test_table_has_a_column_per_split() {
        let table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        assert_eq!(
            table.columns(),
            ["rank", "decision 1", "decision 2", "class"]
        );
    }

    #[test]
    fn test_rows_place_splits_and_leaf() {
        let export = iris();
        let rows = build_rows(export.decision_paths(), export.leaf_values()).unwrap();
        assert_eq!(rows.len(), 4);

        let full = &rows[0];
        let values: Vec<Option<&str>> = full.cells.iter().map(|c| c.value.as_deref()).collect();
        assert_eq!(values, [None, Some("w ≤ 0.8"), Some("l ≤ 4.9"), Some("leaf10")]);
        assert_eq!(full.leaf_id, "leaf10");
        assert_eq!(full.position, 0);

        let short = &rows[1];
        let values: Vec<Option<&str>> = short.cells.iter().map(|c| c.value.as_deref()).collect();
        assert_eq!(values, [None, Some("w ≤ 0.8"), None, Some("leaf2")]);
        assert_eq!(short.cells[3].column, "class");
        assert_eq!(short.leaf_value, LeafValue::Counts(vec![50.0, 0.0, 0.0]));
    }

    #[test]
    fn test_rows_without_rank_column() {
        let export = iris();
        let rows =
            build_rows_with(export.decision_paths(), export.leaf_values(), &TableLayout::without_rank())
                .unwrap();
        let values: Vec<Option<&str>> = rows[0].cells.iter().map(|c| c.value.as_deref()).collect();
        assert_eq!(values, [Some("w ≤ 0.8"), Some("l ≤ 4.9"), Some("leaf10")]);
    }

    #[test]
    fn test_rows_reject_unknown_leaf() {
        let paths = vec![DecisionPath::new("p", ["x", "leaf4"])];
        let err = build_rows(&paths, &LeafValues::new()).unwrap_err();
        assert!(matches!(err, DtvisError::SchemaViolation { .. }));
    }

    #[test]
    fn test_default_sort_is_numeric() {
        let mut table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        table.sort_by(SortCriterion::LeafIndex).unwrap();
        assert_eq!(table.leaf_order(), ["leaf1", "leaf2", "leaf3", "leaf10"]);
    }

    #[test]
    fn test_default_sort_of_spec_example() {
        let table = export(
            &[
                ("a", &["leaf10"]),
                ("b", &["leaf2"]),
                ("c", &["leaf1"]),
            ],
            &[("leaf1", &[1.0]), ("leaf2", &[1.0]), ("leaf10", &[1.0])],
            &["only"],
        );
        let mut table = PathTable::new(&table, TableLayout::default()).unwrap();
        table.sort_by(SortCriterion::LeafIndex).unwrap();
        assert_eq!(table.leaf_order(), ["leaf1", "leaf2", "leaf10"]);
    }

    #[test]
    fn test_class_sort_is_descending_with_stable_ties() {
        let mut table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        // versicolor: leaf10=5, leaf2=0, leaf1=5, leaf3=40
        table.sort_by(SortCriterion::Class(1)).unwrap();
        assert_eq!(table.leaf_order(), ["leaf3", "leaf10", "leaf1", "leaf2"]);
    }

    #[test]
    fn test_resort_is_idempotent_and_reranked() {
        let mut table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        let first: Vec<(usize, String)> = table
            .sort_by(SortCriterion::Class(2))
            .unwrap()
            .iter()
            .map(|r| (r.rank, r.row.leaf_id.clone()))
            .collect();

        table.sort_by(SortCriterion::LeafIndex).unwrap();

        let second: Vec<(usize, String)> = table
            .sort_by(SortCriterion::Class(2))
            .unwrap()
            .iter()
            .map(|r| (r.rank, r.row.leaf_id.clone()))
            .collect();

        assert_eq!(first, second);
        let ranks: Vec<usize> = second.iter().map(|(rank, _)| *rank).collect();
        assert_eq!(ranks, [1, 2, 3, 4]);
        assert_eq!(table.criterion(), Some(SortCriterion::Class(2)));
    }

    #[test]
    fn test_malformed_leaf_id_leaves_order_untouched() {
        let export = export(
            &[("a", &["leaf2"]), ("b", &["root"]), ("c", &["leaf1"])],
            &[("leaf1", &[1.0]), ("leaf2", &[2.0]), ("root", &[3.0])],
            &["only"],
        );
        let mut table = PathTable::new(&export, TableLayout::default()).unwrap();
        let err = table.sort_by(SortCriterion::LeafIndex).unwrap_err();
        match err {
            DtvisError::MalformedIdentifier { id } => assert_eq!(id, "root"),
            other => panic!("expected malformed identifier, got {:?}", other),
        }
        assert_eq!(table.leaf_order(), ["leaf2", "root", "leaf1"]);
        assert_eq!(table.criterion(), None);

        // Class sorting does not need the suffix.
        table.sort_by(SortCriterion::Class(0)).unwrap();
        assert_eq!(table.leaf_order(), ["root", "leaf2", "leaf1"]);
    }

    #[test]
    fn test_class_out_of_range() {
        let mut table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        let err = table.sort_by(SortCriterion::Class(3)).unwrap_err();
        assert!(matches!(err, DtvisError::InvalidArgument { .. }));
    }

    #[test]
    fn test_rank_keeps_order() {
        let export = iris();
        let rows = build_rows(export.decision_paths(), export.leaf_values()).unwrap();
        let ranked = rank(&rows);
        let again = rank(&rows);
        assert_eq!(ranked, again);
        let leaves: Vec<&str> = ranked.iter().map(|r| r.row.leaf_id.as_str()).collect();
        assert_eq!(leaves, ["leaf10", "leaf2", "leaf1", "leaf3"]);

        let shorter = rank(&rows[1..]);
        assert_eq!(shorter[0].rank, 1);
        assert_eq!(shorter[0].row.leaf_id, "leaf2");
    }

    #[test]
    fn test_leaf_ordinal() {
        assert_eq!(leaf_ordinal("leaf12").unwrap().digits(), "12");
        assert_eq!(leaf_ordinal("node_7").unwrap().digits(), "7");
        assert_eq!(leaf_ordinal("leaf007").unwrap(), leaf_ordinal("leaf7").unwrap());
        assert_eq!(leaf_ordinal("leaf000").unwrap().digits(), "0");
        assert!(leaf_ordinal("leaf").is_err());
        assert!(leaf_ordinal("3leaf").is_err());
    }

    #[test]
    fn test_leaf_ordinal_beyond_u64() {
        let huge = leaf_ordinal("leaf18446744073709551616").unwrap();
        assert_eq!(huge.digits(), "18446744073709551616");
        assert!(huge > leaf_ordinal("leaf18446744073709551615").unwrap());
        assert!(huge > leaf_ordinal("leaf2").unwrap());
        assert!(leaf_ordinal("leaf10").unwrap() > leaf_ordinal("leaf9").unwrap());
    }

    #[test]
    fn test_default_sort_orders_leaf_numbers_beyond_u64() {
        let paths = vec![
            DecisionPath::new("big", ["x > 1", "leaf18446744073709551616"]),
            DecisionPath::new("small", ["x ≤ 1", "leaf2"]),
        ];
        let leaves: LeafValues = [
            ("leaf18446744073709551616".to_string(), LeafValue::Scalar(1.0)),
            ("leaf2".to_string(), LeafValue::Scalar(2.0)),
        ]
        .into_iter()
        .collect();
        let mut rows = build_rows(&paths, &leaves).unwrap();
        sort_rows(&mut rows, SortCriterion::LeafIndex, 1).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.leaf_id.as_str()).collect();
        assert_eq!(order, ["leaf2", "leaf18446744073709551616"]);
    }

    #[test]
    fn test_resolve_criterion() {
        let classes = labels(&["setosa", "versicolor"]);
        assert_eq!(
            SortCriterion::resolve("default", &classes).unwrap(),
            SortCriterion::LeafIndex
        );
        assert_eq!(
            SortCriterion::resolve("1", &classes).unwrap(),
            SortCriterion::Class(1)
        );
        assert_eq!(
            SortCriterion::resolve("setosa", &classes).unwrap(),
            SortCriterion::Class(0)
        );
        assert!(SortCriterion::resolve("2", &classes).is_err());
        assert!(SortCriterion::resolve("petal", &classes).is_err());
    }

    #[test]
    fn test_sort_option_values_round_trip() {
        let classes = labels(&["yes", "no"]);
        let options = sort_options(&classes);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, LEAF_NUMBER_LABEL);
        assert_eq!(options[0].value, "default");
        assert_eq!(options[2].label, "no");
        for option in &options {
            assert!(SortCriterion::resolve(&option.value, &classes).is_ok());
        }
    }

    #[test]
    fn test_breakdown_and_class_text() {
        let table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        let breakdown = table.breakdown("leaf3").unwrap();
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[1].label, "versicolor");
        assert_eq!(breakdown[1].n_obs, 40.0);
        assert!(table.breakdown("leaf99").is_none());

        assert_eq!(
            class_cell_text("leaf3", &LeafValue::Counts(vec![0.0, 40.0, 5.0])),
            "leaf3: [0,40,5]"
        );
        assert_eq!(class_cell_text("leaf1", &LeafValue::Scalar(2.5)), "leaf1: [2.5]");
        assert!(leaf_breakdown(&LeafValue::Scalar(2.5), &labels(&["a"])).is_empty());
    }

    #[test]
    fn test_cell_texts() {
        let mut table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        table.sort_by(SortCriterion::LeafIndex).unwrap();
        let layout = table.layout().clone();
        let ranked = table.ranked();
        assert_eq!(
            ranked[1].cell_texts(&layout),
            ["2", "w ≤ 0.8", "", "leaf2: [50,0,0]"]
        );
    }

    #[test]
    fn test_view_serializes_ranked_rows() {
        let table = PathTable::new(&iris(), TableLayout::default()).unwrap();
        let json = serde_json::to_value(table.view()).unwrap();
        assert_eq!(json["columns"][0], "rank");
        assert_eq!(json["rows"][0]["rank"], 1);
        assert_eq!(json["rows"][0]["leaf_id"], "leaf10");
        assert!(json["criterion"].is_null());
    }

    #[test]
    fn test_empty_table() {
        let empty = export(&[], &[], &[]);
        let mut table = PathTable::new(&empty, TableLayout::default()).unwrap();
        assert_eq!(table.columns(), ["rank", "class"]);
        assert!(table.sort_by(SortCriterion::LeafIndex).unwrap().is_empty());
    }
}
