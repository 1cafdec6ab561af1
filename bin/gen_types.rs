//! Write TypeScript declarations for the records dtvis hands to a renderer.
//!
//! Usage: gen_types [OUTPUT]   (default: web/src/types/generated.ts)

use dtvis::{Cell, ClassCount, FeatureImportance, LeafValue, PathRow, SortOption, TS};
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("web/src/types/generated.ts"));

    let decls = [
        FeatureImportance::decl(),
        LeafValue::decl(),
        Cell::decl(),
        PathRow::decl(),
        SortOption::decl(),
        ClassCount::decl(),
    ];

    let mut contents = String::from("// Generated by gen_types. Do not edit.\n\n");
    for decl in decls {
        contents.push_str("export ");
        contents.push_str(&decl);
        contents.push_str("\n\n");
    }

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, contents)?;
    println!("Wrote {}", out.display());
    Ok(())
}
