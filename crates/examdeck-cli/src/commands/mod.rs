pub mod analyze;
pub mod generate;
pub mod inspect;
pub mod pages;
pub mod regions;
