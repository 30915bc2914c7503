//! Turns raw search-box text into the request payload sent to listing endpoints.
//!
//! Search-as-you-type input is often half finished (`p1..`, `01/01/20`), so
//! nothing here fails: an expression that cannot be interpreted simply
//! contributes no filter.

use crate::filter::FilterDescriptor;
use crate::parser::Interpreter;
use crate::recognizer::is_complete_input;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Resolve `input` to a filter, falling back to [`FilterDescriptor::Empty`].
pub fn resolve_filter(input: &str, interpreter: &Interpreter) -> FilterDescriptor {
    if !is_complete_input(input) {
        return FilterDescriptor::Empty;
    }

    match interpreter.interpret(input.trim()) {
        Ok(filter) => filter,
        Err(e) => {
            debug!(input, error = %e, "ignoring malformed date search");
            FilterDescriptor::Empty
        }
    }
}

/// One page of a paginated listing request.
///
/// Serializes with the filter fields inlined:
///
/// ```text
/// {"page":1,"limit":20,"type":"period","start_month":2,"end_month":5}
/// {"search":"acme","page":2,"limit":20}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based
    pub page: u32,
    pub limit: u32,
    #[serde(flatten)]
    pub filter: FilterDescriptor,
}

impl SearchRequest {
    /// Build the first page for `input`.
    ///
    /// A complete date/period expression is never sent as free text; if the
    /// interpreter rejects it the request carries neither filter nor `search`.
    /// Any other non-blank input is sent as `search`.
    pub fn from_input(input: &str, limit: u32, interpreter: &Interpreter) -> Self {
        let trimmed = input.trim();
        if is_complete_input(trimmed) {
            return Self::from_filter(resolve_filter(trimmed, interpreter), limit);
        }

        let search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Self { search, page: 1, limit: limit.max(1), filter: FilterDescriptor::Empty }
    }

    /// First page for an already resolved filter, without free text.
    pub fn from_filter(filter: FilterDescriptor, limit: u32) -> Self {
        Self { search: None, page: 1, limit: limit.max(1), filter }
    }

    /// The same request for the following page.
    pub fn next_page(&self) -> Self {
        Self { page: self.page.saturating_add(1), ..self.clone() }
    }

    pub fn with_page(self, page: u32) -> Self {
        Self { page: page.max(1), ..self }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}
