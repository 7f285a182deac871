pub mod fold;
pub mod models;

pub use fold::case_fold;
