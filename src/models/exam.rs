//! 考试类型与结构模板
//!
//! 考试类型决定整张试卷的结构参数（题目数量、时长、每小问分值），
//! 以及卷面上显示的满分/及格分常量。

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ValidationError};

/// 考试类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    /// 第一次月考
    #[serde(rename = "MST-1")]
    MstOne,
    /// 第二次月考
    #[serde(rename = "MST-2")]
    MstTwo,
    /// 期末考试
    #[serde(rename = "End-Sem")]
    EndSem,
}

/// 考试类型别名表，键为归一化（去空白、大写）后的输入
static EXAM_TYPE_ALIASES: phf::Map<&'static str, ExamType> = phf::phf_map! {
    "MST-1" => ExamType::MstOne,
    "MST1" => ExamType::MstOne,
    "MST 1" => ExamType::MstOne,
    "MST-2" => ExamType::MstTwo,
    "MST2" => ExamType::MstTwo,
    "MST 2" => ExamType::MstTwo,
    "END-SEM" => ExamType::EndSem,
    "ENDSEM" => ExamType::EndSem,
    "END SEM" => ExamType::EndSem,
    "END-SEMESTER" => ExamType::EndSem,
    "END SEMESTER" => ExamType::EndSem,
};

impl ExamType {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ExamType::MstOne => "MST-1",
            ExamType::MstTwo => "MST-2",
            ExamType::EndSem => "End-Sem",
        }
    }

    /// 从字符串解析考试类型（容忍大小写和常见写法差异）
    pub fn find(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase();
        EXAM_TYPE_ALIASES.get(normalized.as_str()).copied()
    }

    /// 获取对应的结构模板
    ///
    /// 对三种考试类型全覆盖，无失败分支。
    pub fn template(self) -> ExamTemplate {
        match self {
            ExamType::MstOne | ExamType::MstTwo => ExamTemplate {
                num_questions: 2,
                duration: "1 Hour",
                part_marks: [3, 3, 4],
            },
            ExamType::EndSem => ExamTemplate {
                num_questions: 5,
                duration: "3 Hours",
                part_marks: [4, 4, 6],
            },
        }
    }

    /// 卷面满分（固定常量，不由小问分值求和得出）
    pub fn max_marks(self) -> u32 {
        match self {
            ExamType::MstOne | ExamType::MstTwo => 20,
            ExamType::EndSem => 70,
        }
    }

    /// 卷面及格分（固定常量）
    pub fn min_pass_marks(self) -> u32 {
        match self {
            ExamType::MstOne | ExamType::MstTwo => 8,
            ExamType::EndSem => 28,
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 考试结构模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamTemplate {
    /// 题目数量
    pub num_questions: usize,
    /// 考试时长
    pub duration: &'static str,
    /// 每小问分值（按 a/b/c 顺序）
    pub part_marks: [u32; 3],
}

/// 返回给前端展示用的考试信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamInfo {
    pub duration: String,
    #[serde(rename = "numQuestions")]
    pub num_questions: usize,
}

impl From<ExamType> for ExamInfo {
    fn from(exam_type: ExamType) -> Self {
        let template = exam_type.template();
        Self {
            duration: template.duration.to_string(),
            num_questions: template.num_questions,
        }
    }
}

/// 校验通过后的生成请求
#[derive(Debug, Clone)]
pub struct ExamRequest {
    pub course_name: String,
    pub exam_type: ExamType,
    /// 逗号拆分、去空白后的主题列表，保持原始顺序
    pub topics: Vec<String>,
}

impl ExamRequest {
    /// 解析并校验原始请求字段
    ///
    /// 课程名和主题列表去空白后不能为空，考试类型必须是已知枚举值。
    /// 所有校验在发起任何上游调用之前完成。
    pub fn parse(course_name: &str, exam_type: &str, topic_headings: &str) -> AppResult<Self> {
        let course_name = course_name.trim();
        if course_name.is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyCourseName));
        }

        let exam_type = ExamType::find(exam_type).ok_or_else(|| {
            AppError::Validation(ValidationError::UnknownExamType {
                value: exam_type.to_string(),
            })
        })?;

        let topics: Vec<String> = topic_headings
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if topics.is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyTopicHeadings));
        }

        Ok(Self {
            course_name: course_name.to_string(),
            exam_type,
            topics,
        })
    }

    /// 主题列表的展示形式（用于提示词）
    pub fn topics_joined(&self) -> String {
        self.topics.join(", ")
    }
}
