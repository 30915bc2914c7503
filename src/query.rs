//! Renders a [`SearchRequest`] as a listing query using sea-query.
//!
//! This mirrors what the backend does with the payload: a period filter
//! becomes a `BETWEEN` on the document's period column, a date filter a
//! `BETWEEN` on its date column, and free text an `OR` of `LIKE`s across
//! the searchable columns. Rows are newest first and paged with
//! `LIMIT`/`OFFSET`.

use crate::config::{DocumentMapping, SearchConfig, SqlDialect};
use crate::filter::FilterDescriptor;
use crate::search::SearchRequest;
use sea_query::{
    Alias, Asterisk, Expr, LikeExpr, MysqlQueryBuilder, Order, PostgresQueryBuilder,
    SelectStatement, SimpleExpr, SqliteQueryBuilder, Values,
};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown document kind: {0}")]
    UnknownDocument(String),

    #[error("document kind {0} has no period column")]
    NoPeriodColumn(String),
}

/// Compiles search requests against a set of document mappings.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    dialect: SqlDialect,
    /// Maps document kinds to their table layout
    documents: BTreeMap<String, DocumentMapping>,
}

impl QueryCompiler {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect, documents: BTreeMap::new() }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self { dialect: config.dialect, documents: config.documents.clone() }
    }

    /// Register or replace the mapping for a document kind
    pub fn add_document(&mut self, kind: &str, mapping: DocumentMapping) {
        self.documents.insert(kind.to_string(), mapping);
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Build the SELECT for one page of `document`.
    pub fn build_select(
        &self,
        request: &SearchRequest,
        document: &str,
    ) -> Result<SelectStatement, CompileError> {
        let mapping = self
            .documents
            .get(document)
            .ok_or_else(|| CompileError::UnknownDocument(document.to_string()))?;

        let mut select = SelectStatement::new();
        select.column(Asterisk).from(Alias::new(mapping.table.as_str()));

        if let Some(condition) = filter_condition(document, mapping, &request.filter)? {
            select.and_where(condition);
        }
        if let Some(term) = request.search.as_deref() {
            if let Some(condition) = text_condition(mapping, term) {
                select.and_where(condition);
            }
        }

        select
            .order_by(Alias::new(mapping.date_column.as_str()), Order::Desc)
            .limit(u64::from(request.limit))
            .offset(request.offset());

        Ok(select)
    }

    /// Compile to SQL with values inlined.
    pub fn compile(&self, request: &SearchRequest, document: &str) -> Result<String, CompileError> {
        let select = self.build_select(request, document)?;
        let sql = match self.dialect {
            SqlDialect::Postgres => select.to_string(PostgresQueryBuilder),
            SqlDialect::Mysql => select.to_string(MysqlQueryBuilder),
            SqlDialect::Sqlite => select.to_string(SqliteQueryBuilder),
        };
        debug!(document, %sql, "compiled search query");
        Ok(sql)
    }

    /// Compile to SQL with placeholders and the bound values.
    pub fn compile_parameterized(
        &self,
        request: &SearchRequest,
        document: &str,
    ) -> Result<(String, Values), CompileError> {
        let select = self.build_select(request, document)?;
        Ok(match self.dialect {
            SqlDialect::Postgres => select.build(PostgresQueryBuilder),
            SqlDialect::Mysql => select.build(MysqlQueryBuilder),
            SqlDialect::Sqlite => select.build(SqliteQueryBuilder),
        })
    }
}

fn filter_condition(
    document: &str,
    mapping: &DocumentMapping,
    filter: &FilterDescriptor,
) -> Result<Option<SimpleExpr>, CompileError> {
    let expr = match filter {
        FilterDescriptor::Period { start_month, end_month } => {
            let column = mapping
                .period_column
                .as_deref()
                .ok_or_else(|| CompileError::NoPeriodColumn(document.to_string()))?;
            Expr::col(Alias::new(column))
                .between(i32::from(start_month.0), i32::from(end_month.0))
        }
        FilterDescriptor::Date { start_date, end_date } => {
            Expr::col(Alias::new(mapping.date_column.as_str()))
                .between(start_date.to_string(), end_date.to_string())
        }
        FilterDescriptor::Empty => return Ok(None),
    };
    Ok(Some(expr))
}

/// Escape character for LIKE patterns; renders the same in every dialect
const LIKE_ESCAPE: char = '!';

/// Make `%`, `_` and the escape character in user text match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `None` when the document has no searchable columns
fn text_condition(mapping: &DocumentMapping, term: &str) -> Option<SimpleExpr> {
    let pattern = format!("%{}%", escape_like(term));
    mapping
        .search_columns
        .iter()
        .map(|column| {
            Expr::col(Alias::new(column.as_str()))
                .like(LikeExpr::new(pattern.as_str()).escape(LIKE_ESCAPE))
        })
        .reduce(|acc, expr| acc.or(expr))
}
