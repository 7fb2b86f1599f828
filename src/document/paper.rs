//! 打印试卷文档构建
//!
//! 把生成的题目填进固定的 HTML/CSS 模板，输出一份独立的可打印
//! 文档（自带打印/关闭按钮）。题目文本来自模型输出，插入 HTML
//! 前必须转义。

use chrono::Local;

use crate::models::exam::ExamType;
use crate::models::question::Question;

/// 卷面页眉字段
#[derive(Debug, Clone)]
pub struct PaperHeader {
    pub course_name: String,
    pub course_code: String,
    pub department: String,
    pub semester: String,
    pub exam_type: ExamType,
}

/// 试卷文档
pub struct PaperDocument<'a> {
    header: &'a PaperHeader,
    questions: &'a [Question],
}

impl<'a> PaperDocument<'a> {
    pub fn new(header: &'a PaperHeader, questions: &'a [Question]) -> Self {
        Self { header, questions }
    }

    /// 渲染完整的独立 HTML 文档
    pub fn render(&self) -> String {
        let template = self.header.exam_type.template();
        let session = Local::now().format("%B %Y");

        let mut html = String::with_capacity(8 * 1024);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!(
            "<title>{} - {} Question Paper</title>\n",
            escape_html(&self.header.course_name),
            self.header.exam_type.name()
        ));
        html.push_str("<style>\n");
        html.push_str(PAPER_CSS);
        html.push_str("</style>\n</head>\n<body>\n");

        // 打印/关闭控件（打印时隐藏）
        html.push_str(concat!(
            "<div class=\"no-print toolbar\">\n",
            "  <button onclick=\"window.print()\">Print</button>\n",
            "  <button onclick=\"window.close()\">Close</button>\n",
            "</div>\n",
        ));

        html.push_str("<div class=\"paper\">\n");

        // ========== 页眉 ==========
        html.push_str("<div class=\"paper-header\">\n");
        html.push_str("  <h1>University Institute of Technology</h1>\n");
        html.push_str(&format!(
            "  <h2>{} &mdash; {}</h2>\n",
            self.header.exam_type.period_label(),
            session
        ));
        html.push_str("  <table class=\"meta\">\n");
        html.push_str(&format!(
            "    <tr><td>Course: {}</td><td>Course Code: {}</td></tr>\n",
            escape_html(&self.header.course_name),
            escape_html(&self.header.course_code)
        ));
        html.push_str(&format!(
            "    <tr><td>Department: {}</td><td>Semester: {}</td></tr>\n",
            escape_html(&self.header.department),
            escape_html(&self.header.semester)
        ));
        html.push_str(&format!(
            "    <tr><td>Duration: {}</td><td>Maximum Marks: {} &nbsp;|&nbsp; Minimum Pass Marks: {}</td></tr>\n",
            template.duration,
            self.header.exam_type.max_marks(),
            self.header.exam_type.min_pass_marks()
        ));
        html.push_str("  </table>\n</div>\n");

        // ========== 考生须知 ==========
        html.push_str(concat!(
            "<div class=\"instructions\">\n",
            "  <h3>Instructions</h3>\n",
            "  <ol>\n",
            "    <li>Attempt all questions. All parts of a question must be answered together.</li>\n",
            "    <li>Where an OR choice is given, attempt either the original part or its alternative, not both.</li>\n",
            "    <li>Marks for each part are indicated against it.</li>\n",
            "    <li>Assume suitable data wherever necessary and state the assumption clearly.</li>\n",
            "  </ol>\n",
            "</div>\n",
        ));

        // ========== 题目 ==========
        for question in self.questions {
            html.push_str(&self.render_question(question));
        }

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn render_question(&self, question: &Question) -> String {
        let mut block = String::new();
        block.push_str("<div class=\"question\">\n");
        block.push_str(&format!(
            "  <div class=\"question-number\">Q{}.</div>\n",
            question.question_number
        ));

        for (idx, part) in question.parts.iter().enumerate() {
            block.push_str(&format!(
                "  <p class=\"part\">({}) {} <span class=\"marks\">[{} Marks]</span></p>\n",
                escape_html(&part.label),
                escape_html(&part.text),
                format_marks(part.marks)
            ));

            // OR 备选问：先插入分隔行，再以下一个字母作为标号
            if part.has_or {
                if let Some(or_text) = &part.or_text {
                    block.push_str("  <div class=\"or-divider\">OR</div>\n");
                    block.push_str(&format!(
                        "  <p class=\"part\">({}) {} <span class=\"marks\">[{} Marks]</span></p>\n",
                        alternative_label(idx),
                        escape_html(or_text),
                        format_marks(part.marks)
                    ));
                }
            }
        }

        block.push_str("</div>\n");
        block
    }
}

/// 分值两位零填充显示（4 → "04"，12 → "12"）
pub fn format_marks(marks: u32) -> String {
    format!("{:02}", marks)
}

/// 备选问标号：原小问的下一个字母（c 的备选是 d）
fn alternative_label(part_index: usize) -> char {
    (b'a' + part_index as u8 + 1) as char
}

impl ExamType {
    /// 卷面上的考试场次名称
    pub fn period_label(self) -> &'static str {
        match self {
            ExamType::MstOne => "Mid Semester Test - I",
            ExamType::MstTwo => "Mid Semester Test - II",
            ExamType::EndSem => "End Semester Examination",
        }
    }
}

/// HTML 转义，题目文本全部来自模型输出
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 试卷样式，打印与屏显共用
const PAPER_CSS: &str = r#"
body {
    font-family: "Times New Roman", Georgia, serif;
    margin: 0;
    padding: 24px;
    background: #f2f2f2;
    color: #111;
}
.paper {
    max-width: 800px;
    margin: 0 auto;
    background: #fff;
    padding: 40px 48px;
    box-shadow: 0 1px 6px rgba(0, 0, 0, 0.2);
}
.paper-header { text-align: center; border-bottom: 2px solid #111; padding-bottom: 12px; }
.paper-header h1 { font-size: 20px; margin: 0 0 4px; text-transform: uppercase; }
.paper-header h2 { font-size: 16px; margin: 0 0 12px; font-weight: normal; }
.meta { width: 100%; font-size: 14px; text-align: left; border-collapse: collapse; }
.meta td { padding: 2px 4px; }
.instructions { font-size: 13px; margin: 16px 0; }
.instructions h3 { margin: 0 0 4px; font-size: 14px; }
.instructions ol { margin: 0; padding-left: 20px; }
.question { margin: 18px 0; page-break-inside: avoid; }
.question-number { font-weight: bold; margin-bottom: 4px; }
.part { margin: 6px 0 6px 24px; }
.marks { float: right; font-weight: bold; }
.or-divider { text-align: center; font-weight: bold; margin: 4px 0; }
.toolbar { text-align: right; max-width: 800px; margin: 0 auto 12px; }
.toolbar button { padding: 6px 16px; margin-left: 8px; cursor: pointer; }
@media print {
    body { background: #fff; padding: 0; }
    .paper { box-shadow: none; padding: 0; }
    .no-print { display: none; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionPart;

    fn sample_header(exam_type: ExamType) -> PaperHeader {
        PaperHeader {
            course_name: "Data Structures".to_string(),
            course_code: "CS-301".to_string(),
            department: "Computer Science".to_string(),
            semester: "III".to_string(),
            exam_type,
        }
    }

    fn sample_question() -> Question {
        Question {
            question_number: 1,
            parts: vec![
                QuestionPart {
                    label: "a".to_string(),
                    text: "Define a stack".to_string(),
                    marks: 3,
                    has_or: false,
                    or_text: None,
                },
                QuestionPart {
                    label: "b".to_string(),
                    text: "Explain push and pop".to_string(),
                    marks: 3,
                    has_or: false,
                    or_text: None,
                },
                QuestionPart {
                    label: "c".to_string(),
                    text: "Apply stacks to expression conversion".to_string(),
                    marks: 4,
                    has_or: true,
                    or_text: Some("Analyze recursion using stacks".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_format_marks_zero_pads_below_ten() {
        assert_eq!(format_marks(4), "04");
        assert_eq!(format_marks(6), "06");
        assert_eq!(format_marks(10), "10");
        assert_eq!(format_marks(12), "12");
    }

    #[test]
    fn test_render_contains_or_divider_and_alternative() {
        let header = sample_header(ExamType::MstOne);
        let questions = vec![sample_question()];
        let html = PaperDocument::new(&header, &questions).render();

        assert!(html.contains(">OR</div>"));
        assert!(html.contains("(d) Analyze recursion using stacks"));
        assert!(html.contains("[04 Marks]"));
        assert!(html.contains("[03 Marks]"));
    }

    #[test]
    fn test_render_header_constants() {
        let header = sample_header(ExamType::EndSem);
        let questions = vec![sample_question()];
        let html = PaperDocument::new(&header, &questions).render();

        assert!(html.contains("Maximum Marks: 70"));
        assert!(html.contains("Minimum Pass Marks: 28"));
        assert!(html.contains("Duration: 3 Hours"));
        assert!(html.contains("End Semester Examination"));
    }

    #[test]
    fn test_render_mst_constants() {
        let header = sample_header(ExamType::MstTwo);
        let questions = vec![sample_question()];
        let html = PaperDocument::new(&header, &questions).render();

        assert!(html.contains("Maximum Marks: 20"));
        assert!(html.contains("Minimum Pass Marks: 8"));
        assert!(html.contains("Mid Semester Test - II"));
    }

    #[test]
    fn test_render_escapes_model_output() {
        let header = sample_header(ExamType::MstOne);
        let mut question = sample_question();
        question.parts[0].text = "<script>alert('x')</script>".to_string();
        let questions = vec![question];
        let html = PaperDocument::new(&header, &questions).render();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_includes_print_controls() {
        let header = sample_header(ExamType::MstOne);
        let questions = vec![sample_question()];
        let html = PaperDocument::new(&header, &questions).render();

        assert!(html.contains("window.print()"));
        assert!(html.contains("window.close()"));
        assert!(html.contains("no-print"));
    }
}
