//! 配置模块，负责加载JSON配置文件
//!
//! ```json
//! {
//!   "strict_calendar": true,
//!   "page_size": 20,
//!   "dialect": "postgres",
//!   "documents": {
//!     "cash_receipts": {
//!       "table": "cash_receipts",
//!       "date_column": "receipt_date",
//!       "period_column": "period",
//!       "search_columns": ["reference", "description"]
//!     }
//!   }
//! }
//! ```
//!
//! 所有字段都可以省略，省略时使用默认值。

use crate::parser::InterpretOptions;
use crate::search::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("无法读取配置文件 {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("无法解析JSON配置文件 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 生成 SQL 时使用的数据库方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

/// 单据类型到数据库表/列的映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMapping {
    pub table: String,
    /// 日期过滤和排序使用的列
    pub date_column: String,
    /// 会计期间列，没有期间的单据不支持 p1~p12 过滤
    #[serde(default)]
    pub period_column: Option<String>,
    /// 自由文本搜索匹配的列
    #[serde(default)]
    pub search_columns: Vec<String>,
}

impl DocumentMapping {
    pub fn new(table: &str, date_column: &str) -> Self {
        Self {
            table: table.to_string(),
            date_column: date_column.to_string(),
            period_column: None,
            search_columns: Vec::new(),
        }
    }

    pub fn with_period_column(mut self, column: &str) -> Self {
        self.period_column = Some(column.to_string());
        self
    }

    pub fn with_search_columns(mut self, columns: &[&str]) -> Self {
        self.search_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// 搜索配置结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 拒绝 p1~p12 以外的期间和不存在的日期
    pub strict_calendar: bool,
    /// 每页条数
    pub page_size: u32,
    pub dialect: SqlDialect,
    /// 单据类型名到表映射
    pub documents: BTreeMap<String, DocumentMapping>,
}

impl Default for SearchConfig {
    /// 默认配置：现金收款单和库存调拨单
    fn default() -> Self {
        let mut documents = BTreeMap::new();
        documents.insert(
            "cash_receipts".to_string(),
            DocumentMapping::new("cash_receipts", "receipt_date")
                .with_period_column("period")
                .with_search_columns(&["reference", "customer_name", "description"]),
        );
        documents.insert(
            "stock_transfers".to_string(),
            DocumentMapping::new("stock_transfers", "transfer_date")
                .with_search_columns(&["reference", "from_location", "to_location"]),
        );

        Self {
            strict_calendar: true,
            page_size: DEFAULT_PAGE_SIZE,
            dialect: SqlDialect::default(),
            documents,
        }
    }
}

impl SearchConfig {
    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(ConfigError::NotFound(path_ref.to_path_buf()));
        }

        // 读取文件内容
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;

        // 解析JSON
        let config: SearchConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// 检查解析后的配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size 必须大于 0".to_string()));
        }
        for (kind, mapping) in &self.documents {
            if mapping.table.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("单据 {} 缺少表名", kind)));
            }
            if mapping.date_column.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("单据 {} 缺少日期列", kind)));
            }
        }
        Ok(())
    }

    /// 获取单据类型对应的映射
    pub fn document(&self, kind: &str) -> Option<&DocumentMapping> {
        self.documents.get(kind)
    }

    /// 解释器选项
    pub fn interpret_options(&self) -> InterpretOptions {
        InterpretOptions { strict_calendar: self.strict_calendar }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_valid_json_config() {
        let file = write_config(
            r#"{
                "strict_calendar": false,
                "page_size": 50,
                "dialect": "sqlite",
                "documents": {
                    "receipts": {
                        "table": "rcpt",
                        "date_column": "rcpt_date",
                        "period_column": "fiscal_period",
                        "search_columns": ["ref"]
                    }
                }
            }"#,
        );

        let config = SearchConfig::from_json_file(file.path()).unwrap();
        assert!(!config.strict_calendar);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.dialect, SqlDialect::Sqlite);
        assert!(!config.interpret_options().strict_calendar);

        let mapping = config.document("receipts").unwrap();
        assert_eq!(mapping.table, "rcpt");
        assert_eq!(mapping.period_column.as_deref(), Some("fiscal_period"));
        assert_eq!(mapping.search_columns, vec!["ref".to_string()]);
        assert!(config.document("cash_receipts").is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config(r#"{"page_size": 10}"#);
        let config = SearchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.page_size, 10);
        assert!(config.strict_calendar);
        assert_eq!(config.dialect, SqlDialect::Postgres);
        assert!(config.document("stock_transfers").is_some());
    }

    #[test]
    fn test_invalid_json_config() {
        let file = write_config("invalid json");
        let result = SearchConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_page_size_is_invalid() {
        let file = write_config(r#"{"page_size": 0}"#);
        let result = SearchConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_table_is_invalid() {
        let file = write_config(
            r#"{"documents": {"x": {"table": " ", "date_column": "d"}}}"#,
        );
        let result = SearchConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SearchConfig::from_json_file("non_existent_file.json");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);

        let receipts = config.document("cash_receipts").unwrap();
        assert_eq!(receipts.period_column.as_deref(), Some("period"));

        let transfers = config.document("stock_transfers").unwrap();
        assert_eq!(transfers.period_column, None);
    }
}
