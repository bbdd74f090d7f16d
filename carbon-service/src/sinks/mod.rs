pub mod table;

pub use table::TableSink;
