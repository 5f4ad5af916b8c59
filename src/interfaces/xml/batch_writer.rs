//! Renders a subsidiary batch as a PMIS batch XML document.
//!
//! The document is an XML declaration followed by `PMISBatch`, indented with one
//! tab per level. Empty values are written as `<Tag></Tag>`, never `<Tag/>`, and a
//! batch without transactions has no `PMISTran` element at all.

use crate::domain::pmis::{PmisBatch, PmisHeader, PmisTran};
use crate::domain::transaction::SubsidiaryTransactions;
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

const ROOT: &str = "PMISBatch";
const HEADER: &str = "Header";
const TRAN: &str = "PMISTran";

/// Writes the batch document for `st` to `w`.
///
/// The whole document is rendered before anything reaches `w`, so a rendering
/// failure writes nothing. A failure of `w` itself may leave it partially written.
pub fn write_xml<W: Write>(st: &SubsidiaryTransactions, mut w: W) -> Result<()> {
    let document = render(&PmisBatch::from(st))?;
    w.write_all(&document)?;
    Ok(())
}

/// Renders the batch document for `st` into a byte buffer.
pub fn create_xml_document(st: &SubsidiaryTransactions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_xml(st, &mut buffer)?;
    Ok(buffer)
}

fn render(batch: &PmisBatch) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
    write_header(&mut writer, &batch.header)?;
    for tran in &batch.trans {
        write_tran(&mut writer, tran)?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    Ok(writer.into_inner())
}

fn write_header(writer: &mut Writer<Vec<u8>>, header: &PmisHeader) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(HEADER)))?;
    write_field(writer, "BatchCount", &header.batch_count.to_string())?;
    write_field(writer, "BatchTotal", &header.batch_total.to_string())?;
    write_field(writer, "Originating_PP", &header.originating_pp)?;
    writer.write_event(Event::End(BytesEnd::new(HEADER)))?;
    Ok(())
}

fn write_tran(writer: &mut Writer<Vec<u8>>, tran: &PmisTran) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(TRAN)))?;
    write_field(writer, "TranType", &tran.tran_type)?;
    write_field(writer, "RPP", &tran.rpp)?;
    write_field(
        writer,
        "OPP_Transaction_Amount",
        &tran.opp_transaction_amount.to_string(),
    )?;
    write_field(writer, "Transaction_Description", &tran.transaction_description)?;
    write_field(writer, "Household_Code", &tran.household_code)?;
    write_field(writer, "RPP_Destination_String", &tran.rpp_destination)?;
    write_field(writer, "RPP_Trans_Type_Code", &tran.rpp_tran_code)?;
    write_field(writer, "OPP_Transaction_Ref", &tran.opp_transaction_ref)?;
    write_field(writer, "Originating_Person", &tran.originating_person)?;
    write_field(writer, "OPP_Transaction_Date", &tran.opp_transaction_date)?;
    writer.write_event(Event::End(BytesEnd::new(TRAN)))?;
    Ok(())
}

// A text event between start and end keeps empty values from collapsing to `<Tag/>`.
fn write_field(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(value))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Escapes `&`, `<`, `>`, `"` and `'`, writing the apostrophe as `&#39;`.
///
/// Tab, line feed and carriage return become character references so a parser's
/// line-end normalization cannot alter them. Characters XML 1.0 does not allow at
/// all are replaced with U+FFFD.
fn escape_text(value: &str) -> String {
    let allowed: String = value
        .chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect();
    // `&apos;` cannot appear in the output of `escape` except where it produced it.
    let escaped = escape(allowed.as_str()).replace("&apos;", "&#39;");

    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
    out
}

// The `Char` production of XML 1.0; surrogates cannot occur in a `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..)
}
