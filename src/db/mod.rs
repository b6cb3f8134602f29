mod csv_store;

pub use csv_store::{BuySignalRow, CsvStore};
