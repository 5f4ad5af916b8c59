use crate::domain::money::MinorUnits;
use crate::domain::transaction::{SourceTransaction, SubsidiaryTransactions};
use crate::error::{ExportError, Result};
use crate::interfaces::xml::batch_writer::create_xml_document;
use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// A single named XML batch document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlDocument {
    #[serde(rename = "filename")]
    pub name: String,
    pub content: String,
}

/// Groups transactions by `subsidiary_external_id` into batches.
///
/// Batches come out in order of first appearance and keep their transactions in
/// input order. Each batch total is the sum of its transaction amounts; a total
/// that overflows `i64` is an error rather than a wrapped value.
pub fn group_by_subsidiary(
    transactions: Vec<SourceTransaction>,
) -> Result<Vec<SubsidiaryTransactions>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut batches: Vec<SubsidiaryTransactions> = Vec::new();

    for tx in transactions {
        let slot = *index
            .entry(tx.subsidiary_external_id.clone())
            .or_insert_with(|| {
                batches.push(SubsidiaryTransactions {
                    subsidiary: tx.subsidiary_external_id.clone(),
                    ..Default::default()
                });
                batches.len() - 1
            });
        batches[slot].transactions.push(tx);
    }

    for batch in &mut batches {
        let amounts = batch.transactions.iter().map(|t| t.amount);
        batch.total_amount =
            MinorUnits::checked_sum(amounts).ok_or_else(|| ExportError::AmountOverflowError {
                subsidiary: batch.subsidiary.clone(),
            })?;
    }
    Ok(batches)
}

// Exactly one normal component: no separators, no `..`, no root.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Renders one named document per batch, stamped with the current local time.
pub fn create_xml_documents(batches: &[SubsidiaryTransactions]) -> Result<Vec<XmlDocument>> {
    create_xml_documents_at(batches, Local::now())
}

/// Renders one document per batch, named `{subsidiary}_{generated_at}.xml`.
///
/// The first batch that fails aborts the run; its subsidiary is named in the error.
/// A subsidiary that would not make a plain file name is such a failure.
pub fn create_xml_documents_at<Tz>(
    batches: &[SubsidiaryTransactions],
    generated_at: DateTime<Tz>,
) -> Result<Vec<XmlDocument>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    batches
        .iter()
        .map(|st| {
            let name = format!("{}_{}.xml", st.subsidiary, stamp);
            let content = if is_plain_file_name(&name) {
                create_xml_document(st)
            } else {
                Err(ExportError::DocumentNameError(name.clone()))
            };
            let content = content
                .and_then(|bytes| {
                    String::from_utf8(bytes).map_err(|e| {
                        ExportError::IoError(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            e,
                        ))
                    })
                })
                .map_err(|e| ExportError::DocumentError {
                    subsidiary: st.subsidiary.clone(),
                    source: Box::new(e),
                })?;

            tracing::debug!(
                subsidiary = %st.subsidiary,
                transactions = st.transactions.len(),
                "created batch document"
            );

            Ok(XmlDocument { name, content })
        })
        .collect()
}

/// Saves each document as `dir/{name}`, creating `dir` when it does not exist.
///
/// Every name is checked before anything is written, so a name that would land
/// outside `dir` leaves `dir` untouched.
pub fn save_documents(dir: &Path, documents: &[XmlDocument]) -> Result<Vec<PathBuf>> {
    if let Some(doc) = documents.iter().find(|doc| !is_plain_file_name(&doc.name)) {
        return Err(ExportError::DocumentNameError(doc.name.clone()));
    }
    fs::create_dir_all(dir)?;

    let mut saved = Vec::with_capacity(documents.len());
    for doc in documents {
        let path = dir.join(&doc.name);
        fs::write(&path, &doc.content)?;
        tracing::info!(path = %path.display(), "saved batch document");
        saved.push(path);
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn tx(subsidiary: &str, tran_id: &str, amount: i64) -> SourceTransaction {
        SourceTransaction {
            netsuite_id: "1".to_string(),
            customer_external_id: "223944_XXX".to_string(),
            memo: "memo".to_string(),
            subsidiary_external_id: subsidiary.to_string(),
            tran_date: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            tran_id: tran_id.to_string(),
            amount: MinorUnits(amount),
            parcs_reference: "ref1".to_string(),
            customer_category: "10".to_string(),
            parcs_tran_code: "MC".to_string(),
            tran_type: "CashSale".to_string(),
        }
    }

    #[test]
    fn test_group_by_subsidiary() {
        let batches = group_by_subsidiary(vec![
            tx("XYZ", "1", 1110),
            tx("ABC", "2", 500),
            tx("XYZ", "3", -9990),
            tx("ABC", "4", 1),
        ])
        .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].subsidiary, "XYZ");
        assert_eq!(batches[0].total_amount, MinorUnits(-8880));
        let ids: Vec<&str> = batches[0].transactions.iter().map(|t| t.tran_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert_eq!(batches[1].subsidiary, "ABC");
        assert_eq!(batches[1].total_amount, MinorUnits(501));
    }

    #[test]
    fn test_group_by_subsidiary_empty() {
        assert!(group_by_subsidiary(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_group_by_subsidiary_total_overflow() {
        let err = group_by_subsidiary(vec![
            tx("OK", "1", i64::MAX),
            tx("BIG", "2", i64::MAX),
            tx("BIG", "3", 1),
        ])
        .unwrap_err();

        match err {
            ExportError::AmountOverflowError { subsidiary } => assert_eq!(subsidiary, "BIG"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_xml_documents_at() {
        let generated_at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 8, 1, 9, 30, 0)
            .unwrap();
        let batches = group_by_subsidiary(vec![tx("XYZ", "1", 1110), tx("ABC", "2", 5)]).unwrap();

        let docs = create_xml_documents_at(&batches, generated_at).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "XYZ_2025-08-01T09:30:00+02:00.xml");
        assert_eq!(docs[1].name, "ABC_2025-08-01T09:30:00+02:00.xml");
        assert_eq!(
            docs[0].content,
            String::from_utf8(create_xml_document(&batches[0]).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_create_xml_documents_uses_utc_suffix() {
        let generated_at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).unwrap();
        let batches = group_by_subsidiary(vec![tx("XYZ", "1", 1)]).unwrap();
        let docs = create_xml_documents_at(&batches, generated_at).unwrap();
        assert_eq!(docs[0].name, "XYZ_2025-08-01T09:30:00Z.xml");
    }

    #[test]
    fn test_create_xml_documents_name_prefix() {
        let batches = group_by_subsidiary(vec![tx("XYZ", "1", 1110)]).unwrap();
        let docs = create_xml_documents(&batches).unwrap();

        assert!(docs[0].name.starts_with("XYZ_"));
        assert!(docs[0].name.ends_with(".xml"));
        assert!(docs[0].content.contains("<Originating_PP>XYZ</Originating_PP>"));
    }

    #[test]
    fn test_first_failing_batch_aborts_with_its_subsidiary() {
        let generated_at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).unwrap();
        let batches = group_by_subsidiary(vec![
            tx("OK", "1", 1),
            tx("../escape", "2", 2),
            tx("/abs", "3", 3),
        ])
        .unwrap();

        let err = create_xml_documents_at(&batches, generated_at).unwrap_err();

        match err {
            ExportError::DocumentError { subsidiary, source } => {
                assert_eq!(subsidiary, "../escape");
                assert!(matches!(*source, ExportError::DocumentNameError(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("XYZ_2025-08-01T09:30:00Z.xml"));
        assert!(is_plain_file_name("..xml"));
        assert!(!is_plain_file_name("../escape_now.xml"));
        assert!(!is_plain_file_name("/abs_now.xml"));
        assert!(!is_plain_file_name("a/b_now.xml"));
        assert!(!is_plain_file_name("a\\b_now.xml"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn test_document_json_shape() {
        let doc = XmlDocument {
            name: "XYZ_now.xml".to_string(),
            content: "<PMISBatch></PMISBatch>".to_string(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["filename"], "XYZ_now.xml");
        assert_eq!(json["content"], "<PMISBatch></PMISBatch>");
    }

    #[test]
    fn test_save_documents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let docs = vec![XmlDocument {
            name: "XYZ_now.xml".to_string(),
            content: "<PMISBatch></PMISBatch>".to_string(),
        }];

        let saved = save_documents(&out, &docs).unwrap();

        assert_eq!(saved, vec![out.join("XYZ_now.xml")]);
        assert_eq!(fs::read_to_string(&saved[0]).unwrap(), "<PMISBatch></PMISBatch>");
    }

    #[test]
    fn test_save_documents_rejects_names_outside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let docs = vec![
            XmlDocument {
                name: "XYZ_now.xml".to_string(),
                content: "<PMISBatch></PMISBatch>".to_string(),
            },
            XmlDocument {
                name: "../escape_now.xml".to_string(),
                content: "<PMISBatch></PMISBatch>".to_string(),
            },
        ];

        let err = save_documents(&out, &docs).unwrap_err();

        assert!(matches!(err, ExportError::DocumentNameError(name) if name == "../escape_now.xml"));
        assert!(!dir.path().join("escape_now.xml").exists());
        assert!(!out.exists());
    }
}
