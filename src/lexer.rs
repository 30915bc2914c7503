//! 日期/会计期间搜索表达式的词法分析器

use crate::token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    /// 输入字符串中的当前位置（字节索引）
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// 返回当前位置的字符，不推进位置
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// 返回当前位置之后第 n 个字符，不推进位置
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    /// 推进位置一个字符并返回该字符
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// 跳过空白字符
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// 读取连续的 ASCII 数字
    fn read_digits(&mut self) -> &'a str {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
        &self.input[start..self.position]
    }

    /// 当前是否位于日期分隔符 (`-` 或 `/`) 且其后紧跟数字
    fn at_date_separator(&self) -> bool {
        matches!(self.peek(), Some('-' | '/'))
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
    }

    /// 读取数字或日期字面量
    /// 注意：第一个数字已经被调用者消费
    ///
    /// 每个分隔符位置可以独立地使用 `-` 或 `/`，只有凑齐三段才算日期，
    /// 只有两段（例如 `1-2`）时返回 Illegal
    fn read_number_or_date(&mut self, start: usize) -> Token<'a> {
        self.read_digits();
        let day = &self.input[start..self.position];

        if !self.at_date_separator() {
            return Token {
                kind: TokenKind::Number(day),
                span: Span::new(start, self.position),
            };
        }
        self.bump(); // 消费分隔符
        let month = self.read_digits();

        if !self.at_date_separator() {
            return Token {
                kind: TokenKind::Illegal,
                span: Span::new(start, self.position),
            };
        }
        self.bump(); // 消费分隔符
        let year = self.read_digits();

        Token {
            kind: TokenKind::Date { day, month, year },
            span: Span::new(start, self.position),
        }
    }

    /// 读取单词或会计期间
    /// `p`/`P` 后面全部是数字时为期间 token，否则为普通单词
    fn read_word(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }
        let literal = &self.input[start..self.position];

        let digits = literal
            .strip_prefix('p')
            .or_else(|| literal.strip_prefix('P'));
        let kind = match digits {
            Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()) => {
                TokenKind::Period(d)
            }
            _ => TokenKind::Word(literal),
        };
        Token { kind, span: Span::new(start, self.position) }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.position;

        let Some(c) = self.bump() else {
            return None; // 到达输入末尾
        };

        let token = match c {
            '.' => {
                if self.peek() == Some('.') && self.peek_nth(1) == Some('.') {
                    self.bump();
                    self.bump();
                    Token { kind: TokenKind::Ellipsis, span: Span::new(start, self.position) }
                } else {
                    Token { kind: TokenKind::Illegal, span: Span::new(start, self.position) }
                }
            }
            c if c.is_ascii_digit() => self.read_number_or_date(start),
            c if c.is_alphabetic() => self.read_word(start),
            _ => Token { kind: TokenKind::Illegal, span: Span::new(start, self.position) },
        };
        Some(token)
    }
}
