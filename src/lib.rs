//! Date/period search expressions for document listings.
//!
//! ```text
//! "p2...p5"  ──recognizer──▶ PeriodRange ──lexer/parser──▶ FilterDescriptor::Period
//!                                                              │
//!                                              search::SearchRequest (JSON payload)
//!                                                              │
//!                                                  query::QueryCompiler (SQL)
//! ```

pub mod config;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod recognizer;
pub mod search;
pub mod token;

pub use filter::{FilterDescriptor, IsoDate, Period};
pub use parser::{handle_date_search, InterpretOptions, Interpreter, SearchError};
pub use recognizer::{is_complete_input, recognize, InputShape};
pub use search::{resolve_filter, SearchRequest};
