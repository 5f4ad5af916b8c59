#![allow(dead_code)]

use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const HEADER: [&str; 11] = [
    "netsuite_id",
    "customer_external_id",
    "memo",
    "subsidiary_external_id",
    "tran_date",
    "tran_id",
    "amount",
    "parcs_reference",
    "customer_category",
    "parcs_tran_code",
    "tran_type",
];

/// One CSV row with the fields tests usually care about; the rest are fixed.
pub struct Row<'a> {
    pub subsidiary: &'a str,
    pub tran_id: &'a str,
    pub amount: i64,
    pub memo: &'a str,
    pub customer_id: &'a str,
    pub category: &'a str,
    pub tran_type: &'a str,
}

impl Default for Row<'_> {
    fn default() -> Self {
        Self {
            subsidiary: "XYZ",
            tran_id: "CS90384",
            amount: 1110,
            memo: "Sample Transaction Description",
            customer_id: "223944_XXX",
            category: "10",
            tran_type: "CashSale",
        }
    }
}

pub fn write_transactions_csv(rows: &[Row]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_writer(file.reopen()?);

    wtr.write_record(HEADER)?;
    for row in rows {
        let amount = row.amount.to_string();
        wtr.write_record([
            "111111",
            row.customer_id,
            row.memo,
            row.subsidiary,
            "2025-07-31",
            row.tran_id,
            amount.as_str(),
            "ref1",
            row.category,
            "MC",
            row.tran_type,
        ])?;
    }

    wtr.flush()?;
    Ok(file)
}

pub fn write_parameters_json(json: &str) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Writes `rows` transactions spread over `subsidiaries` subsidiaries.
pub fn generate_csv(path: &std::path::Path, rows: usize, subsidiaries: usize) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let subsidiary = format!("SUB{}", i % subsidiaries.max(1));
        let tran_id = format!("CS{i}");
        let amount = ((i as i64 % 2000) - 1000).to_string();
        wtr.write_record([
            i.to_string().as_str(),
            "223944_XXX",
            "Generated <memo> & 'text'",
            subsidiary.as_str(),
            "2025-07-31",
            tran_id.as_str(),
            amount.as_str(),
            "ref1",
            ["2", "12", "10", "7", "1"][i % 5],
            "MC",
            "CashSale",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
