//! Output records of the PMIS batch document and the mapping that produces them.

use super::money::MajorUnits;
use super::transaction::{SourceTransaction, SubsidiaryTransactions};

/// Transaction type code written for every mapped record.
pub const TRAN_TYPE: &str = "GT";
/// Originating person written for every mapped record.
pub const ORIGINATING_PERSON: &str = "OppExport_Workday";
/// Upstream system name embedded in every transaction reference.
pub const SOURCE_SYSTEM: &str = "Netsuite";

const HOUSEHOLD_CODE_LEN: usize = 6;

/// The top-level object of the batch document.
#[derive(Debug, PartialEq, Clone)]
pub struct PmisBatch {
    pub header: PmisHeader,
    pub trans: Vec<PmisTran>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PmisHeader {
    pub batch_count: usize,
    pub batch_total: MajorUnits,
    pub originating_pp: String,
}

/// One transaction record of the batch document.
///
/// Field order matches the element order of the document.
#[derive(Debug, PartialEq, Clone)]
pub struct PmisTran {
    pub tran_type: String,
    pub rpp: String,
    pub opp_transaction_amount: MajorUnits,
    pub transaction_description: String,
    pub household_code: String,
    pub rpp_destination: String,
    pub rpp_tran_code: String,
    pub opp_transaction_ref: String,
    pub originating_person: String,
    pub opp_transaction_date: String,
}

/// Maps one source transaction to its batch record. Never fails.
pub fn convert_transaction(t: &SourceTransaction) -> PmisTran {
    let rpp = if t.routes_to_party() {
        t.customer_external_id.clone()
    } else {
        String::new()
    };
    let household_code = if t.carries_household_code() {
        clamp_household_code(&t.customer_external_id).to_string()
    } else {
        String::new()
    };

    PmisTran {
        tran_type: TRAN_TYPE.to_string(),
        rpp,
        opp_transaction_amount: t.amount.to_major(),
        transaction_description: t.memo.clone(),
        household_code,
        rpp_destination: t.parcs_reference.clone(),
        rpp_tran_code: t.parcs_tran_code.clone(),
        opp_transaction_ref: format!("{SOURCE_SYSTEM}: {}_{}", t.tran_type, t.tran_id),
        originating_person: ORIGINATING_PERSON.to_string(),
        opp_transaction_date: t.tran_date.format("%Y-%m-%d").to_string(),
    }
}

/// First six characters of the customer id, or all of it when shorter.
fn clamp_household_code(customer_id: &str) -> &str {
    match customer_id.char_indices().nth(HOUSEHOLD_CODE_LEN) {
        Some((end, _)) => &customer_id[..end],
        None => customer_id,
    }
}

impl From<&SourceTransaction> for PmisTran {
    fn from(t: &SourceTransaction) -> Self {
        convert_transaction(t)
    }
}

impl From<&SubsidiaryTransactions> for PmisBatch {
    fn from(st: &SubsidiaryTransactions) -> Self {
        Self {
            header: PmisHeader {
                batch_count: st.transactions.len(),
                batch_total: st.total_amount.to_major(),
                originating_pp: st.subsidiary.clone(),
            },
            trans: st.transactions.iter().map(PmisTran::from).collect(),
        }
    }
}
