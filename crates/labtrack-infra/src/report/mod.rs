//! Report renderers.

mod csv;

pub use self::csv::CsvReportGenerator;
