mod logging;

use anyhow::{bail, Context};
use clap::Parser;
use period_search::config::SearchConfig;
use period_search::query::QueryCompiler;
use period_search::{recognize, FilterDescriptor, Interpreter, SearchRequest};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 把搜索框输入解释为日期/期间过滤条件，并生成请求体和 SQL
#[derive(Parser, Debug)]
#[command(name = "period-search", version)]
struct Args {
    /// JSON 配置文件
    #[arg(long, default_value = "search_config.json")]
    config: PathBuf,

    /// 单据类型，例如 cash_receipts、stock_transfers
    #[arg(long, default_value = "cash_receipts")]
    document: String,

    /// 页码（从 1 开始）
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// 日志级别 (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// 要求值的表达式；省略时进入交互模式
    expression: Option<String>,
}

/// 加载配置，失败时使用默认配置
fn load_config(path: &Path) -> SearchConfig {
    match SearchConfig::from_json_file(path) {
        Ok(config) => {
            info!(path = %path.display(), documents = config.documents.len(), "loaded search config");
            config
        }
        Err(e) => {
            warn!(error = %e, "using default search config");
            SearchConfig::default()
        }
    }
}

struct Session {
    config: SearchConfig,
    interpreter: Interpreter,
    compiler: QueryCompiler,
    document: String,
    page: u32,
}

impl Session {
    fn new(config: SearchConfig, document: String, page: u32) -> anyhow::Result<Self> {
        if config.document(&document).is_none() {
            bail!("未知的单据类型: {}", document);
        }
        Ok(Self {
            interpreter: Interpreter::with_options(config.interpret_options()),
            compiler: QueryCompiler::from_config(&config),
            config,
            document,
            page: page.max(1),
        })
    }

    /// 对一行输入求值并打印每个阶段的结果
    fn evaluate(&self, input: &str) -> anyhow::Result<()> {
        let request = match recognize(input) {
            Some(shape) => {
                let kind = if shape.is_range() { "区间" } else { "单值" };
                println!("[识别]: {:?} ({})", shape, kind);
                let filter = match self.interpreter.interpret(input.trim()) {
                    Ok(filter) => filter,
                    Err(e) => {
                        println!("⚠️ 解释失败，忽略该过滤条件: {}", e);
                        FilterDescriptor::Empty
                    }
                };
                SearchRequest::from_filter(filter, self.config.page_size)
            }
            None => {
                println!("[识别]: 不是日期/期间表达式，按自由文本搜索");
                SearchRequest::from_input(input, self.config.page_size, &self.interpreter)
            }
        }
        .with_page(self.page);
        println!("[请求]: {}", serde_json::to_string(&request)?);

        let sql = self
            .compiler
            .compile(&request, &self.document)
            .with_context(|| format!("无法为 {} 生成 SQL", self.document))?;
        println!("[SQL]: {}", sql);
        Ok(())
    }

    /// 处理 `:doc <kind>` 和 `:page <n>` 命令
    fn command(&mut self, line: &str) -> anyhow::Result<()> {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(":doc"), Some(kind)) => {
                if self.config.document(kind).is_none() {
                    bail!("未知的单据类型: {}", kind);
                }
                self.document = kind.to_string();
                println!("✅ 当前单据类型: {}", self.document);
            }
            (Some(":page"), Some(n)) => {
                let page: u32 = n.parse().with_context(|| format!("无效的页码: {}", n))?;
                self.page = page.max(1);
                println!("✅ 当前页码: {}", self.page);
            }
            _ => bail!("未知命令: {} (可用: :doc <kind>, :page <n>)", line),
        }
        Ok(())
    }
}

fn run_repl(session: &mut Session) -> anyhow::Result<()> {
    println!("--- Period Search: 日期/期间搜索表达式 ---");
    println!("示例: p3, p2...p5, 01/01/2025, 01-01-2025...31-01-2025");
    println!("命令: :doc <kind>, :page <n>, exit");

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("search> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit") {
                    break;
                }
                rl.add_history_entry(line)?;

                let result = if line.starts_with(':') {
                    session.command(line)
                } else {
                    session.evaluate(line)
                };
                if let Err(e) = result {
                    println!("✗ {:#}", e);
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let config = load_config(&args.config);
    let mut session = Session::new(config, args.document, args.page)?;

    match args.expression.as_deref() {
        Some(expression) => session.evaluate(expression),
        None => run_repl(&mut session),
    }
}
