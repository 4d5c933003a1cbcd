// File access: lenient reading of CSV import files, the local dataset file

pub mod csv;
pub mod dataset;
