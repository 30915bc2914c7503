//! 日期/会计期间搜索表达式的解释器
//!
//! ## 解析流程图
//!
//! ```text
//! interpret()
//!   ├─ Lexer 分词
//!   ├─ 按 Ellipsis (`...`) 切分为片段
//!   │   └─ 片段数不是 1 或 2 → InvalidRangeFormat
//!   ├─ classify_segment() (每个片段独立分类)
//!   │   ├─ Period  → 期间 (1~2 位数字)
//!   │   ├─ Date    → 日期 (日/月 1~2 位, 年 4 位, 补零为 YYYY-MM-DD)
//!   │   └─ 其他     → 无法分类
//!   ├─ 单个片段 → 起止相同的区间, 无法分类 → InvalidInputFormat
//!   └─ 两个片段 → 类型必须一致, 否则 MismatchedOrInvalidInterval
//!                 └─ 结束早于开始 → EndBeforeStart / EndDateBeforeStart
//! ```
//!
//! ## 日历校验
//!
//! 识别器只做词法匹配，`31/02/2025` 或 `p13` 这样的值在词法上都合法。
//! `InterpretOptions::strict_calendar` 打开时（默认），解释器额外拒绝
//! 超出 p1~p12 的期间和不存在的日期；关闭时保持纯词法行为。
//!
//! 解释器假定调用者已经通过 `recognizer::is_complete_input` 检查，
//! 它自己的分类只是尽力而为，不能用来防御性地拒绝畸形输入。

use crate::filter::{FilterDescriptor, IsoDate, Period};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use thiserror::Error;

/// 解释失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid input format: {0:?} is neither a period nor a date")]
    InvalidInputFormat(String),

    #[error("mismatched or invalid interval: {0:?}")]
    MismatchedOrInvalidInterval(String),

    #[error("end period {end} is before start period {start}")]
    EndBeforeStart { start: Period, end: Period },

    #[error("end date {end} is before start date {start}")]
    EndDateBeforeStart { start: IsoDate, end: IsoDate },

    #[error("invalid range format: expected at most one '...', found {segments} segments")]
    InvalidRangeFormat { segments: usize },

    #[error("period {0} is outside p1..p12")]
    PeriodOutOfRange(Period),

    #[error("{0} is not a calendar date")]
    InvalidCalendarDate(IsoDate),
}

/// 解释器选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpretOptions {
    /// 拒绝 p1~p12 以外的期间以及不存在的日期
    pub strict_calendar: bool,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self { strict_calendar: true }
    }
}

/// 单个片段分类后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Period(Period),
    Date(IsoDate),
}

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: InterpretOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InterpretOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> InterpretOptions {
        self.options
    }

    /// 将已识别的搜索串转换为 FilterDescriptor
    pub fn interpret(&self, input: &str) -> Result<FilterDescriptor, SearchError> {
        let tokens: Vec<_> = Lexer::new(input).collect();
        let segments: Vec<&[Token]> = tokens
            .split(|t| t.kind == TokenKind::Ellipsis)
            .collect();

        match segments.as_slice() {
            [single] => match classify_segment(single) {
                Some(segment) => {
                    self.check_calendar(segment)?;
                    Ok(match segment {
                        Segment::Period(p) => FilterDescriptor::single_period(p),
                        Segment::Date(d) => FilterDescriptor::single_date(d),
                    })
                }
                None => Err(SearchError::InvalidInputFormat(input.to_string())),
            },
            [start, end] => {
                // 先确认两端类型一致，再做日历校验
                match (classify_segment(start), classify_segment(end)) {
                    (Some(Segment::Period(start)), Some(Segment::Period(end))) => {
                        self.check_calendar(Segment::Period(start))?;
                        self.check_calendar(Segment::Period(end))?;
                        if end < start {
                            return Err(SearchError::EndBeforeStart { start, end });
                        }
                        Ok(FilterDescriptor::Period { start_month: start, end_month: end })
                    }
                    (Some(Segment::Date(start)), Some(Segment::Date(end))) => {
                        self.check_calendar(Segment::Date(start))?;
                        self.check_calendar(Segment::Date(end))?;
                        if end < start {
                            return Err(SearchError::EndDateBeforeStart { start, end });
                        }
                        Ok(FilterDescriptor::Date { start_date: start, end_date: end })
                    }
                    _ => Err(SearchError::MismatchedOrInvalidInterval(input.to_string())),
                }
            }
            _ => Err(SearchError::InvalidRangeFormat { segments: segments.len() }),
        }
    }

    /// strict_calendar 打开时拒绝 p1~p12 以外的期间和不存在的日期
    fn check_calendar(&self, segment: Segment) -> Result<(), SearchError> {
        if !self.options.strict_calendar {
            return Ok(());
        }
        match segment {
            Segment::Period(period) if !period.is_valid() => {
                Err(SearchError::PeriodOutOfRange(period))
            }
            Segment::Date(date) if date.to_naive_date().is_none() => {
                Err(SearchError::InvalidCalendarDate(date))
            }
            _ => Ok(()),
        }
    }
}

/// 片段必须恰好由一个期间或日期 token 组成，否则返回 `None`
/// 这里只做词法分类，不做日历校验
fn classify_segment(segment: &[Token]) -> Option<Segment> {
    let [token] = segment else {
        return None;
    };

    match token.kind {
        TokenKind::Period(digits) => parse_width(digits, 1, 2).map(|n| Segment::Period(Period(n))),
        TokenKind::Date { day, month, year } => {
            let day = parse_width::<u8>(day, 1, 2)?;
            let month = parse_width::<u8>(month, 1, 2)?;
            let year = parse_width::<u16>(year, 4, 4)?;
            Some(Segment::Date(IsoDate::new(year, month, day)))
        }
        _ => None,
    }
}

/// 解析位数在 [min, max] 之间的数字串
fn parse_width<T: std::str::FromStr>(digits: &str, min: usize, max: usize) -> Option<T> {
    if !(min..=max).contains(&digits.len()) {
        return None;
    }
    digits.parse().ok()
}

/// 使用默认选项解释搜索串
pub fn handle_date_search(input: &str) -> Result<FilterDescriptor, SearchError> {
    Interpreter::new().interpret(input)
}
