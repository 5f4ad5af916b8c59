use super::money::MinorUnits;
use chrono::NaiveDate;
use serde::Deserialize;

/// Customer categories whose external id is forwarded as the routing party.
pub const ROUTING_PARTY_CATEGORIES: [&str; 2] = ["2", "12"];
/// Customer categories whose external id yields a household code.
pub const HOUSEHOLD_CATEGORIES: [&str; 2] = ["10", "7"];

/// A transaction as read from the accounting system, before it is mapped for the batch document.
///
/// `amount` is signed: refunds arrive already negated by the caller.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SourceTransaction {
    pub netsuite_id: String,
    pub customer_external_id: String,
    pub memo: String,
    pub subsidiary_external_id: String,
    pub tran_date: NaiveDate,
    pub tran_id: String,
    pub amount: MinorUnits,
    pub parcs_reference: String,
    pub customer_category: String,
    pub parcs_tran_code: String,
    pub tran_type: String,
}

impl SourceTransaction {
    pub fn routes_to_party(&self) -> bool {
        ROUTING_PARTY_CATEGORIES.contains(&self.customer_category.as_str())
    }

    pub fn carries_household_code(&self) -> bool {
        HOUSEHOLD_CATEGORIES.contains(&self.customer_category.as_str())
    }
}

/// All transactions of one subsidiary, serialized as one batch document.
///
/// `total_amount` is supplied by whoever builds the batch and is written to the
/// header as given; it is never reconciled against `transactions`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SubsidiaryTransactions {
    pub subsidiary: String,
    pub total_amount: MinorUnits,
    pub transactions: Vec<SourceTransaction>,
}
