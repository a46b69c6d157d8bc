// src/smoke/suites.rs
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Thai,
}

impl Language {
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Thai => "Thai",
        }
    }
}

/// One question put to one tool.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub language: Language,
    pub question: &'static str,
    pub arguments: Value,
}

impl Prompt {
    /// Builds a prompt whose arguments also carry the question text, so the
    /// server can pick its reply language.
    fn asking(language: Language, question: &'static str, mut arguments: Value) -> Self {
        if let Value::Object(map) = &mut arguments {
            map.insert("question".to_string(), Value::String(question.to_string()));
        }
        Self { language, question, arguments }
    }
}

#[derive(Debug, Clone)]
pub struct BilingualCase {
    pub title: &'static str,
    pub tool: &'static str,
    pub english: Prompt,
    pub thai: Prompt,
}

#[derive(Debug, Clone)]
pub struct ToolCase {
    pub tool: &'static str,
    pub prompt: Prompt,
}

fn bilingual(
    title: &'static str,
    tool: &'static str,
    args: Value,
    english: &'static str,
    thai: &'static str,
) -> BilingualCase {
    BilingualCase {
        title,
        tool,
        english: Prompt::asking(Language::English, english, args.clone()),
        thai: Prompt::asking(Language::Thai, thai, args),
    }
}

/// Every tool, asked the same thing in English and in Thai.
pub fn bilingual_cases() -> Vec<BilingualCase> {
    vec![
        bilingual(
            "Test 1: get_rmf_fund_performance",
            "get_rmf_fund_performance",
            json!({"period": "1y", "limit": 3}),
            "Show me the best 1-year performers",
            "แสดงกองทุนที่มีผลตอบแทนดีที่สุดในช่วง 1 ปี",
        ),
        bilingual(
            "Test 2: search_rmf_funds",
            "search_rmf_funds",
            json!({"maxRiskLevel": 3, "limit": 3, "sortBy": "ytd"}),
            "Find low risk RMF funds",
            "ค้นหากองทุน RMF ที่มีความเสี่ยงต่ำ",
        ),
        bilingual(
            "Test 3: get_rmf_fund_detail",
            "get_rmf_fund_detail",
            json!({"fundCode": "DAOL-GOLDRMF"}),
            "Tell me about DAOL-GOLDRMF",
            "บอกข้อมูลกองทุน DAOL-GOLDRMF",
        ),
        bilingual(
            "Test 4: get_rmf_funds",
            "get_rmf_funds",
            json!({"page": 1, "limit": 3}),
            "Show me the first page of RMF funds",
            "แสดงกองทุน RMF หน้าแรก",
        ),
        bilingual(
            "Test 5: get_rmf_fund_nav_history",
            "get_rmf_fund_nav_history",
            json!({"fundCode": "ASP-DIGIBLOCRMF", "days": 30}),
            "Show NAV history for ASP-DIGIBLOCRMF",
            "แสดงประวัติราคา NAV ของ ASP-DIGIBLOCRMF",
        ),
        bilingual(
            "Test 6: compare_rmf_funds",
            "compare_rmf_funds",
            json!({"fundCodes": ["DAOL-GOLDRMF", "ASP-DIGIBLOCRMF"]}),
            "Compare DAOL-GOLDRMF with ASP-DIGIBLOCRMF",
            "เปรียบเทียบ DAOL-GOLDRMF กับ ASP-DIGIBLOCRMF",
        ),
    ]
}

fn tool_case(tool: &'static str, language: Language, question: &'static str, args: Value) -> ToolCase {
    ToolCase { tool, prompt: Prompt::asking(language, question, args) }
}

/// Five English questions followed by the same five in Thai.
pub fn production_cases() -> Vec<ToolCase> {
    let questions: [(&'static str, Value, &'static str, &'static str); 5] = [
        (
            "get_rmf_fund_performance",
            json!({"period": "ytd", "limit": 5}),
            "What are the top 5 RMF funds this year?",
            "กองทุน RMF ที่ดีที่สุดในปีนี้ 5 อันดับแรก",
        ),
        (
            "search_rmf_funds",
            json!({"maxRiskLevel": 3, "sortBy": "ytd", "limit": 5}),
            "Show me low risk RMF funds with good returns",
            "แสดงกองทุน RMF ความเสี่ยงต่ำที่มีผลตอบแทนดี",
        ),
        (
            "get_rmf_fund_detail",
            json!({"fundCode": "DAOL-GOLDRMF"}),
            "Tell me about DAOL-GOLDRMF fund",
            "บอกข้อมูลกองทุน DAOL-GOLDRMF",
        ),
        (
            "compare_rmf_funds",
            json!({"fundCodes": ["DAOL-GOLDRMF", "ASP-DIGIBLOCRMF"]}),
            "Compare the top 2 performing funds",
            "เปรียบเทียบกองทุน 2 อันดับแรก",
        ),
        (
            "get_rmf_fund_nav_history",
            json!({"fundCode": "ASP-DIGIBLOCRMF", "days": 30}),
            "Show me 30-day NAV history for ASP-DIGIBLOCRMF",
            "แสดงประวัติราคา NAV 30 วันของ ASP-DIGIBLOCRMF",
        ),
    ];

    let english = questions
        .iter()
        .map(|(tool, args, en, _)| tool_case(*tool, Language::English, *en, args.clone()));
    let thai = questions
        .iter()
        .map(|(tool, args, _, th)| tool_case(*tool, Language::Thai, *th, args.clone()));
    english.chain(thai).collect()
}

/// A tax-planning user's questions. Arguments are sent as-is, without the question text.
pub fn user_qa_cases() -> Vec<ToolCase> {
    let plain = |tool: &'static str, question: &'static str, arguments: Value| ToolCase {
        tool,
        prompt: Prompt { language: Language::English, question, arguments },
    };

    vec![
        plain(
            "get_rmf_fund_performance",
            "What are the top 5 performing RMF funds this year (YTD)?",
            json!({"period": "ytd", "limit": 5, "sortOrder": "desc"}),
        ),
        plain(
            "search_rmf_funds",
            "I'm risk-averse, show me low-risk RMF funds (risk level 1-3)",
            json!({"minRiskLevel": 1, "maxRiskLevel": 3, "sortBy": "ytd", "limit": 5}),
        ),
        plain(
            "search_rmf_funds",
            "What RMF funds does BBL (Bangkok Bank) offer?",
            json!({"amc": "BBL", "limit": 8}),
        ),
        plain(
            "get_rmf_fund_detail",
            "Tell me details about ABAPAC-RMF fund",
            json!({"fundCode": "ABAPAC-RMF"}),
        ),
        plain(
            "get_rmf_fund_nav_history",
            "Show me NAV trend for ABAPAC-RMF over the past 30 days",
            json!({"fundCode": "ABAPAC-RMF", "days": 30}),
        ),
        plain(
            "get_rmf_fund_performance",
            "Which RMF funds had the best 1-year performance?",
            json!({"period": "1y", "limit": 5}),
        ),
        plain(
            "compare_rmf_funds",
            "Compare ABAPAC-RMF, B-ASEANRMF, and K-PROPIRMF",
            json!({"fundCodes": ["ABAPAC-RMF", "B-ASEANRMF", "K-PROPIRMF"], "compareBy": "performance"}),
        ),
        plain(
            "search_rmf_funds",
            "Show me moderate risk funds (4-5) with YTD return > 5%",
            json!({"minRiskLevel": 4, "maxRiskLevel": 5, "minYtdReturn": 5, "sortBy": "ytd", "limit": 5}),
        ),
        plain(
            "get_rmf_fund_performance",
            "What are the top 3-year performers? (Long-term view)",
            json!({"period": "3y", "limit": 5}),
        ),
        plain(
            "search_rmf_funds",
            "Show me SCB equity RMF funds with their performance",
            json!({"search": "SCB", "category": "Equity", "sortBy": "ytd", "limit": 5}),
        ),
    ]
}
