//! The `markwise weights` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use markwise_core::model::{Difficulty, Dimension};
use markwise_core::weights::{select_weights, ContextFocus};

pub fn execute(difficulty: &str, context: &str) -> Result<()> {
    let weights = select_weights(difficulty, context);

    let level = Difficulty::from_label(difficulty)
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{difficulty} (weighted as Medium)"));
    println!("Difficulty: {level}");
    println!("Context focus: {:?}", ContextFocus::detect(context));

    let mut table = Table::new();
    table.set_header(vec!["Dimension", "Weight"]);
    for dimension in Dimension::ALL {
        table.add_row(vec![
            Cell::new(dimension),
            Cell::new(format!("{}", weights.get(dimension))),
        ]);
    }
    table.add_row(vec![Cell::new("total"), Cell::new(format!("{}", weights.total()))]);
    println!("{table}");

    Ok(())
}
