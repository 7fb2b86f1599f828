//! 模型响应清洗与解析
//!
//! 生成模型返回的"JSON"经常裹着 markdown 代码块、前后缀说明文字、
//! 尾逗号或注释。这里先做一轮清洗再解析，解析失败时还有一次
//! 正则提取兜底。所有失败都以 `Err(原因)` 返回，由流程层决定
//! 是否换下一个模型重试。

use regex::Regex;
use serde_json::Value;

use crate::models::question::{Question, QuestionOutline};

/// 清洗并解析模型返回的 JSON 文本
pub fn parse_json_payload(raw: &str) -> Result<Value, String> {
    let cleaned = clean_json_text(raw)?;

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => Ok(value),
        Err(parse_err) => {
            // 兜底：用正则从文本里抠出候选 JSON 块逐个尝试
            if let Some(value) = extract_json_candidates(&cleaned)? {
                return Ok(value);
            }
            Err(format!("JSON解析失败: {}", parse_err))
        }
    }
}

/// 解析第一阶段的大纲响应
///
/// 模型偶尔会返回单个对象而不是数组，这里统一包装成数组。
pub fn parse_outline(raw: &str) -> Result<Vec<QuestionOutline>, String> {
    let value = parse_json_payload(raw)?;
    let value = match value {
        Value::Array(_) => value,
        other => Value::Array(vec![other]),
    };
    serde_json::from_value(value).map_err(|e| format!("大纲结构不符合预期: {}", e))
}

/// 解析第二阶段的单题响应
pub fn parse_question(raw: &str) -> Result<Question, String> {
    let value = parse_json_payload(raw)?;
    if !value.is_object() {
        return Err("题目响应不是 JSON 对象".to_string());
    }
    if value.get("parts").is_none() {
        return Err("题目响应缺少 parts 字段".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("题目结构不符合预期: {}", e))
}

/// 逐步清洗响应文本
///
/// 1. 去掉 markdown 代码块标记
/// 2. 截取第一个 `[`/`{` 到最后一个 `]`/`}` 的区间
/// 3. 去掉 `//` 与 `/* */` 注释（保留字符串里的 `://`）
/// 4. 去掉 `]`/`}` 前的尾逗号
pub fn clean_json_text(raw: &str) -> Result<String, String> {
    let fence_re = Regex::new(r"```(?:json)?").map_err(|e| e.to_string())?;
    let mut text = fence_re.replace_all(raw, "").to_string();

    let start = text
        .find(|c| c == '[' || c == '{')
        .ok_or_else(|| "响应中没有 JSON 起始符".to_string())?;
    let end = text
        .rfind(|c| c == ']' || c == '}')
        .ok_or_else(|| "响应中没有 JSON 结束符".to_string())?;
    if end < start {
        return Err("响应中的 JSON 区间不完整".to_string());
    }
    text = text[start..=end].to_string();

    let line_comment_re = Regex::new(r"(?m)(^|[^:])//[^\n]*").map_err(|e| e.to_string())?;
    text = line_comment_re.replace_all(&text, "$1").to_string();

    let block_comment_re = Regex::new(r"(?s)/\*.*?\*/").map_err(|e| e.to_string())?;
    text = block_comment_re.replace_all(&text, "").to_string();

    let trailing_comma_re = Regex::new(r",(\s*[}\]])").map_err(|e| e.to_string())?;
    text = trailing_comma_re.replace_all(&text, "$1").to_string();

    Ok(text.trim().to_string())
}

/// 兜底提取：抠出文本中形如 JSON 对象/数组的片段逐个解析
fn extract_json_candidates(text: &str) -> Result<Option<Value>, String> {
    let candidate_re = Regex::new(
        r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}|\[[^\[\]]*(?:\[[^\[\]]*\][^\[\]]*)*\]",
    )
    .map_err(|e| e.to_string())?;

    for candidate in candidate_re.find_iter(text) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate.as_str()) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
