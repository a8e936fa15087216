//! 章节分割器
//!
//! 按标题行把纯文本切分为有序章节

use regex::Regex;
use std::sync::LazyLock;

use super::chapter::Chapter;

/// 首个标题出现前的默认章节标题
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// 未识别到任何章节时的兜底标题
pub const FULL_TEXT_TITLE: &str = "Full Text";

/// 默认标题规则: `chapter 12` / `chapter iv` / `12.` / `part 3`（行首，忽略大小写）
///
/// `numeral` 分组还须是合法的罗马数字（1 - 399）。
pub const DEFAULT_HEADING_PATTERN: &str =
    r"(?i)^(?:chapter\s+(?:\d+|(?P<numeral>[ivxlc]+)\b)|part\s+\d+|\d+\.)";

static DEFAULT_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_HEADING_PATTERN).expect("default heading pattern is valid")
});

static ROMAN_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^c{0,3}(?:xc|xl|l?x{0,3})(?:ix|iv|v?i{0,3})$")
        .expect("roman numeral pattern is valid")
});

fn is_roman_numeral(word: &str) -> bool {
    !word.is_empty() && ROMAN_NUMERAL.is_match(word)
}

/// 标题判定（可替换的纯函数）
pub trait HeadingMatcher: Send + Sync {
    /// `line` 已去除首尾空白
    fn is_heading(&self, line: &str) -> bool;
}

impl<F> HeadingMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_heading(&self, line: &str) -> bool {
        self(line)
    }
}

/// 基于正则的标题判定
///
/// 正则中名为 `numeral` 的分组匹配到的内容必须是罗马数字，否则不算标题。
#[derive(Debug, Clone)]
pub struct RegexHeadingMatcher {
    pattern: Regex,
}

impl RegexHeadingMatcher {
    /// 使用自定义正则
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Default for RegexHeadingMatcher {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_HEADING.clone(),
        }
    }
}

impl HeadingMatcher for RegexHeadingMatcher {
    fn is_heading(&self, line: &str) -> bool {
        match self.pattern.captures(line) {
            Some(caps) => caps
                .name("numeral")
                .map_or(true, |numeral| is_roman_numeral(numeral.as_str())),
            None => false,
        }
    }
}

/// 使用默认标题规则分章
pub fn segment(text: &str) -> Vec<Chapter> {
    segment_with(text, &RegexHeadingMatcher::default())
}

/// 对文本进行分章
///
/// 分章策略：
/// 1. 丢弃空白行，逐行判断是否为标题
/// 2. 标题行开启新章节；上一章节只有空白内容时直接丢弃
/// 3. 非标题行（连同换行符）追加到当前章节
/// 4. 一个章节都没有产出时，整段原文作为 "Full Text"
///
/// 空白输入返回空列表。
pub fn segment_with(text: &str, matcher: &dyn HeadingMatcher) -> Vec<Chapter> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chapters: Vec<Chapter> = Vec::new();
    let mut current = Chapter::new(INTRODUCTION_TITLE, String::new());

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let trimmed = line.trim();
        if matcher.is_heading(trimmed) {
            let finished = std::mem::replace(&mut current, Chapter::new(trimmed, String::new()));
            if finished.has_text() {
                chapters.push(finished);
            }
        } else {
            current.append_line(line);
        }
    }

    if current.has_text() {
        chapters.push(current);
    }

    if chapters.is_empty() {
        chapters.push(Chapter::new(FULL_TEXT_TITLE, text));
    }

    chapters
}
