//! State messages written by the conformance suite.
//!
//! Hand-written `prost` messages under the `durastate.conformance` package,
//! so backends can be checked without a protobuf build step.

use std::sync::Arc;

use durastate_domain::codec::TypeRegistry;

/// Account balance state
#[derive(Clone, PartialEq, prost::Message)]
pub struct Account {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(double, tag = "2")]
    pub balance: f64,
}

impl prost::Name for Account {
    const NAME: &'static str = "Account";
    const PACKAGE: &'static str = "durastate.conformance";

    fn type_url() -> String {
        "type.googleapis.com/durastate.conformance.Account".to_string()
    }
}

/// Ledger state with repeated fields
#[derive(Clone, PartialEq, prost::Message)]
pub struct Ledger {
    #[prost(string, tag = "1")]
    pub owner: String,
    #[prost(int64, repeated, tag = "2")]
    pub entries: Vec<i64>,
    #[prost(bool, tag = "3")]
    pub frozen: bool,
}

impl prost::Name for Ledger {
    const NAME: &'static str = "Ledger";
    const PACKAGE: &'static str = "durastate.conformance";

    fn type_url() -> String {
        "type.googleapis.com/durastate.conformance.Ledger".to_string()
    }
}

/// Registry with every fixture type
pub fn registry() -> Arc<TypeRegistry> {
    TypeRegistry::new()
        .with::<Account>()
        .with::<Ledger>()
        .into_shared()
}

pub fn account(account_id: &str, balance: f64) -> Account {
    Account {
        account_id: account_id.to_string(),
        balance,
    }
}

pub fn ledger(owner: &str, entries: &[i64]) -> Ledger {
    Ledger {
        owner: owner.to_string(),
        entries: entries.to_vec(),
        frozen: false,
    }
}
