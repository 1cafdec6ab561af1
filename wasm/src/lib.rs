use dtvis::{BarOrder, DtvisError, ImportanceChart, PathTable, SortCriterion, TableLayout, TreeExport};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// =============================================================================
// ERRORS
// =============================================================================

fn to_js(err: DtvisError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn layout_from(rank_column: Option<bool>) -> TableLayout {
    TableLayout {
        rank_column: rank_column.unwrap_or(true),
        ..TableLayout::default()
    }
}

// =============================================================================
// DECISION PATH TABLE
// =============================================================================

/// Decision-path table for the `#decision-path-table` element.
///
/// The page builds one per export and calls `sort` from the sort selector's
/// change handler; the returned rows already carry their new ranks.
#[wasm_bindgen]
pub struct DecisionPathTable {
    table: PathTable,
}

#[wasm_bindgen]
impl DecisionPathTable {
    #[wasm_bindgen(constructor)]
    pub fn new(export_json: &str, rank_column: Option<bool>) -> Result<DecisionPathTable, JsValue> {
        let export = TreeExport::from_json(export_json).map_err(to_js)?;
        let table = PathTable::new(&export, layout_from(rank_column)).map_err(to_js)?;
        Ok(DecisionPathTable { table })
    }

    /// Header names, left to right
    #[wasm_bindgen]
    pub fn columns(&self) -> Result<JsValue, JsValue> {
        to_value(self.table.columns())
    }

    /// Ranked rows in the current order
    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        to_value(&self.table.ranked())
    }

    /// Cell texts per row, ready to drop into `<td>` elements
    #[wasm_bindgen(js_name = cellTexts)]
    pub fn cell_texts(&self) -> Result<JsValue, JsValue> {
        let layout = self.table.layout();
        let texts: Vec<Vec<String>> = self
            .table
            .ranked()
            .iter()
            .map(|row| row.cell_texts(layout))
            .collect();
        to_value(&texts)
    }

    /// Re-sort by a sort-option value and return the re-ranked rows
    #[wasm_bindgen]
    pub fn sort(&mut self, criterion: &str) -> Result<JsValue, JsValue> {
        let criterion =
            SortCriterion::resolve(criterion, self.table.class_labels()).map_err(to_js)?;
        let ranked = self.table.sort_by(criterion).map_err(to_js)?;
        to_value(&ranked)
    }

    #[wasm_bindgen(js_name = sortOptions)]
    pub fn sort_options(&self) -> Result<JsValue, JsValue> {
        to_value(&self.table.sort_options())
    }

    #[wasm_bindgen(js_name = leafOrder)]
    pub fn leaf_order(&self) -> Result<JsValue, JsValue> {
        to_value(&self.table.leaf_order())
    }

    /// Per-class counts of one leaf, `null` for unknown leaves
    #[wasm_bindgen]
    pub fn breakdown(&self, leaf_id: &str) -> Result<JsValue, JsValue> {
        to_value(&self.table.breakdown(leaf_id))
    }
}

// =============================================================================
// IMPORTANCE BARS
// =============================================================================

/// Feature-importance bars for the `#barplot_container` chart.
///
/// Sort buttons call `order` with "rank" or "alphabetical" and feed the
/// result to the x scale's domain.
#[wasm_bindgen]
pub struct ImportanceBars {
    chart: ImportanceChart,
}

#[wasm_bindgen]
impl ImportanceBars {
    #[wasm_bindgen(constructor)]
    pub fn new(export_json: &str) -> Result<ImportanceBars, JsValue> {
        let export = TreeExport::from_json(export_json).map_err(to_js)?;
        Ok(ImportanceBars {
            chart: ImportanceChart::new(export.importances()),
        })
    }

    /// Bars with a positive importance, in export order
    #[wasm_bindgen]
    pub fn bars(&self) -> Result<JsValue, JsValue> {
        to_value(self.chart.bars())
    }

    /// Attribute names in the requested order
    #[wasm_bindgen]
    pub fn order(&self, mode: &str) -> Result<JsValue, JsValue> {
        let order: BarOrder = mode.parse().map_err(to_js)?;
        to_value(&self.chart.category_order(order))
    }

    /// `[0, max importance]` for the y scale
    #[wasm_bindgen]
    pub fn domain(&self) -> Vec<f64> {
        let (low, high) = self.chart.value_domain();
        vec![low, high]
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
