pub mod aggregate;
pub mod categories;
pub mod errors;
pub mod filter;
pub mod information;
pub mod input;
pub mod loader;
pub mod months;
pub mod options;
pub mod output;
pub mod parallelism;
pub mod queries;
pub mod selection;
pub mod table;
pub mod xlsx;
