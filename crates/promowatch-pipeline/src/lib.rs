//! Pass orchestration: scrape the platforms, filter for promocode posts,
//! read the code out of the image, dedup against the ledger, announce.
//!
//! [`pass::run_pass`] is the entry point the binary calls once per
//! interval. The stages underneath are independently testable:
//! [`filter::filter_candidates`] narrows posts to announceable candidates
//! and [`ledger::Ledger`] keeps the durable record of announced codes.

pub mod error;
pub mod filter;
pub mod ledger;
pub mod pass;

pub use error::{LedgerError, PassError};
pub use filter::{filter_candidates, PROMOCODE_KEYWORD};
pub use ledger::Ledger;
pub use pass::{announce_new_codes, run_pass, PassOptions, PassSummary};
