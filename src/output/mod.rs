//! Output formatting module
//!
//! Console text streamed during a run, or a JSON report at the end.

mod formatter;
mod printer;
mod report;

pub use formatter::{ColorMode, OutputFormat, ResultFormatter};
pub use printer::ConsolePrinter;
pub use report::RunReport;
