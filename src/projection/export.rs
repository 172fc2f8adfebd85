//! CSV export of projection rows
//!
//! Amounts are written in shortest round-trip form, so reading an export back
//! reproduces the table totals exactly.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::cashflows::ProjectionResult;
use crate::error::{PlannerError, Result};

/// Columns present in every export, before the scenario's extra columns
pub const BASE_HEADER: [&str; 6] = ["Month", "Date", "Inflow", "Outflow", "Net", "Balance"];

/// File name offered for downloads
pub const DEFAULT_EXPORT_NAME: &str = "cashflow-plan.csv";

/// Header row for a result: base columns plus its extra columns
pub fn header(result: &ProjectionResult) -> Vec<String> {
    BASE_HEADER
        .iter()
        .map(|h| h.to_string())
        .chain(result.extra_columns.iter().cloned())
        .collect()
}

/// Write the export to any writer
pub fn write_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(header(result))?;

    for row in &result.rows {
        let mut record = vec![
            row.index.to_string(),
            row.label.clone(),
            row.inflow.to_string(),
            row.outflow.to_string(),
            row.net.to_string(),
            row.balance.to_string(),
        ];
        record.extend(
            result
                .extra_columns
                .iter()
                .map(|column| row.amount_for(column).to_string()),
        );
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Export as an in-memory string
pub fn to_csv_string(result: &ProjectionResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(result, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| PlannerError::MalformedExport(e.to_string()))
}

/// Export to a file
pub fn write_csv_file<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(result, file)?;
    log::info!(
        "Wrote {} rows to {}",
        result.rows.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Totals recovered from an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTotals {
    pub rows: usize,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub total_net: f64,
    pub final_balance: Option<f64>,
    pub min_balance: Option<f64>,
}

/// Read an export back and total its columns
pub fn read_totals<R: Read>(reader: R) -> Result<ExportTotals> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlannerError::MalformedExport(format!("missing column {name}")))
    };
    let inflow_col = column("Inflow")?;
    let outflow_col = column("Outflow")?;
    let net_col = column("Net")?;
    let balance_col = column("Balance")?;

    let mut inflows = Vec::new();
    let mut outflows = Vec::new();
    let mut nets = Vec::new();
    let mut balances = Vec::new();

    for record in csv.records() {
        let record = record?;
        let cell = |col: usize| -> Result<f64> {
            let raw = record.get(col).unwrap_or_default();
            raw.parse::<f64>()
                .map_err(|_| PlannerError::MalformedExport(format!("bad amount {raw:?}")))
        };
        inflows.push(cell(inflow_col)?);
        outflows.push(cell(outflow_col)?);
        nets.push(cell(net_col)?);
        balances.push(cell(balance_col)?);
    }

    Ok(ExportTotals {
        rows: balances.len(),
        total_inflow: inflows.iter().sum(),
        total_outflow: outflows.iter().sum(),
        total_net: nets.iter().sum(),
        final_balance: balances.last().copied(),
        min_balance: balances.iter().copied().reduce(f64::min),
    })
}
