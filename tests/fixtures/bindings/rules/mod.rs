//! Generated by rulecfg-codegen - one module per rule schema - DO NOT EDIT

pub mod layout_indentation_consistency;
pub mod layout_line_length;
pub mod style_string_literals;

pub use layout_indentation_consistency::LayoutIndentationConsistency;
pub use layout_line_length::LayoutLineLength;
pub use style_string_literals::StyleStringLiterals;
