pub mod import;
pub mod minecraft;
