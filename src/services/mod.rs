pub mod batch;
pub mod candidates;
pub mod catalog;
pub mod similar;
pub mod similarity;
