//! Generated by rulecfg-codegen - one module per category - DO NOT EDIT

pub mod layout;
pub mod style;

pub use layout::LayoutCategory;
pub use style::StyleCategory;
