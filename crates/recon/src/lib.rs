//! `roilens-recon` — Reconciliation between the two ledgers.
//!
//! Two jobs: derive weekly-comparable aggregates from the transactional CRM
//! ledger (`crm`), and merge imported CSV tables into the weekly collection
//! without duplicating rows (`import`). Pure string-and-slice computation;
//! file and store traffic live elsewhere.

pub mod crm;
pub mod error;
pub mod import;

pub use crm::{
    crm_by_channel, crm_series, crm_totals, customer_summary, prepare, totals_between, CrmBucket,
    CrmChannelRow, CrmTotals, CustomerSummary, Prepared,
};
pub use error::ImportError;
pub use import::{
    export_csv, import_csv, merge_rows, parse_rows, ImportOutcome, CSV_HEADERS,
};
