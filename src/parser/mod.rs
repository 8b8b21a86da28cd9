//! Optimizer log parsers.
//!
//! Sub-modules split the parsing into focused areas:
//!
//! - [`source`] – File I/O abstraction, shared-mode reads with retry
//! - [`helpers`] – Delimiter inference, header de-duplication, lenient numbers
//! - [`state`] – State log → [`crate::model::NumericTable`]
//! - [`char_log`] – Char log → error columns + solution catalog

pub mod char_log;
pub mod helpers;
pub mod source;
pub mod state;

pub use char_log::{
    CharLog, parse_char_log, parse_char_log_from_text, parse_char_log_from_text_with,
    parse_char_log_with,
};
pub use source::{ContentSource, FsSource, RetryPolicy, read_lines_shared, split_lines};
pub use state::{parse_numeric_table, parse_numeric_table_from_text, parse_numeric_table_with};
