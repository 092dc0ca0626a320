//! Output formatting: property tables and JSON.

use std::io::{self, Write};
use std::sync::Arc;

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use rngbridge_core::{CoreError, PropertyStore, PropertyValue};

use crate::error::CliError;

/// One bus property, as shown by `probe` and `run --once`.
#[derive(Debug, Serialize, Tabled)]
pub struct PropertyRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Value", display_with = "display_value")]
    pub value: Arc<PropertyValue>,
    #[tabled(rename = "Text")]
    pub text: String,
}

fn display_value(value: &Arc<PropertyValue>) -> String {
    match value.as_ref() {
        PropertyValue::Empty => "-".into(),
        other => other.to_string(),
    }
}

/// Rows for the given paths, in the given order.
pub fn property_rows<'a>(
    store: &PropertyStore,
    paths: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<PropertyRow>, CoreError> {
    paths
        .into_iter()
        .map(|path| {
            Ok(PropertyRow {
                path: path.to_owned(),
                value: store.get(path)?,
                text: store.text(path)?,
            })
        })
        .collect()
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
