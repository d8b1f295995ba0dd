pub mod hotfolder;
pub mod ledger;

pub use hotfolder::{is_pdf_name, CycleReport, Hotfolder};
pub use ledger::KeptFileLedger;
