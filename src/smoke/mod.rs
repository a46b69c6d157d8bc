// src/smoke/mod.rs
pub mod display;
pub mod suites;

use crate::mcp::McpClient;
use display::{banner, describe_payload, has_thai, preview_lines, rule, truncate_chars};
use suites::{Language, Prompt};

const BILINGUAL_PREVIEW_CHARS: usize = 200;
const PRODUCTION_PREVIEW_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SuiteKind {
    /// Every tool asked once in English and once in Thai
    Bilingual,
    /// Five English and five Thai question/answer pairs
    Production,
    /// Ten tax-planning questions with structured payload display
    Qa,
}

/// How an answer relates to the language it was asked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCheck {
    Matched,
    Mismatched,
    /// The call itself failed, so there is no answer to judge.
    Failed,
}

pub fn check_language(language: Language, answer: &str) -> LanguageCheck {
    if answer.starts_with("ERROR: ") {
        return LanguageCheck::Failed;
    }
    if has_thai(answer) == (language == Language::Thai) {
        LanguageCheck::Matched
    } else {
        LanguageCheck::Mismatched
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub calls: usize,
    pub errors: usize,
    pub language_mismatches: usize,
}

impl SuiteSummary {
    fn record(&mut self, check: LanguageCheck) {
        self.calls += 1;
        match check {
            LanguageCheck::Matched => {}
            LanguageCheck::Mismatched => self.language_mismatches += 1,
            LanguageCheck::Failed => self.errors += 1,
        }
    }
}

/// Runs one suite to completion. Failed calls are printed and counted, never fatal.
pub async fn run_suite(kind: SuiteKind, client: &McpClient) -> SuiteSummary {
    println!("{}", banner(match kind {
        SuiteKind::Bilingual => "BILINGUAL MCP SERVER TEST",
        SuiteKind::Production => "MCP SERVER - BILINGUAL Q&A",
        SuiteKind::Qa => "Thai RMF Investment - User Q&A Simulation",
    }));
    println!("Endpoint: {}", client.endpoint());
    println!("Started:  {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    let summary = match kind {
        SuiteKind::Bilingual => run_bilingual(client).await,
        SuiteKind::Production => run_production(client).await,
        SuiteKind::Qa => run_user_qa(client).await,
    };

    println!("\n{}", banner("TEST COMPLETE"));
    println!("  Calls: {}", summary.calls);
    println!("  Failed calls: {}", summary.errors);
    if kind != SuiteKind::Qa {
        println!("  Language mismatches: {}", summary.language_mismatches);
    }
    tracing::info!(
        "Suite {:?} finished: {} calls, {} failed, {} language mismatches",
        kind, summary.calls, summary.errors, summary.language_mismatches
    );
    summary
}

async fn ask_bilingual(client: &McpClient, tool: &str, prompt: &Prompt) -> LanguageCheck {
    let label = prompt.language.label();
    println!("📝 {} Question: \"{}\"", label, prompt.question);
    let answer = client.call_tool_text(tool, &prompt.arguments).await;

    println!("🔤 {} Response:", label);
    let (preview, truncated) = truncate_chars(&answer, BILINGUAL_PREVIEW_CHARS);
    println!("{}", preview);
    if truncated {
        println!("[... truncated ...]");
    }

    let check = check_language(prompt.language, &answer);
    match (check, prompt.language) {
        (LanguageCheck::Matched, lang) => println!("✅ Correctly responded in {}", lang.label()),
        (LanguageCheck::Mismatched, Language::English) => {
            println!("❌ WARNING: Thai characters found in English response!")
        }
        (LanguageCheck::Mismatched, Language::Thai) => {
            println!("❌ WARNING: No Thai characters found in Thai response!")
        }
        (LanguageCheck::Failed, _) => println!("❌ Call failed"),
    }
    println!();
    check
}

async fn run_bilingual(client: &McpClient) -> SuiteSummary {
    let mut summary = SuiteSummary::default();

    for case in suites::bilingual_cases() {
        println!("\n{}", rule('='));
        println!("{}", case.title);
        println!("{}\n", rule('='));

        for prompt in [&case.english, &case.thai] {
            let check = ask_bilingual(client, case.tool, prompt).await;
            summary.record(check);
        }
    }
    summary
}

async fn run_production(client: &McpClient) -> SuiteSummary {
    let mut summary = SuiteSummary::default();
    let mut current_language = None;

    for (idx, case) in suites::production_cases().iter().enumerate() {
        let language = case.prompt.language;
        if current_language != Some(language) {
            let heading = format!("{} QUESTIONS", language.label().to_uppercase());
            println!("\n{}", banner(&heading));
            current_language = Some(language);
        }

        let answer = client.call_tool_text(case.tool, &case.prompt.arguments).await;

        println!("\n{}", rule('═'));
        println!("Question {} ({}): {}", idx + 1, language.label(), case.prompt.question);
        println!("\nAnswer:");
        for line in preview_lines(&answer, PRODUCTION_PREVIEW_LINES) {
            println!("{}", line);
        }

        if has_thai(&answer) {
            println!("\n✓ Contains Thai characters");
        } else {
            println!("\n○ English only");
        }
        summary.record(check_language(language, &answer));
    }
    summary
}

async fn run_user_qa(client: &McpClient) -> SuiteSummary {
    let mut summary = SuiteSummary::default();
    println!("👤 User Profile: Planning to invest in RMF for tax benefits before year-end\n");

    for (idx, case) in suites::user_qa_cases().iter().enumerate() {
        println!("\n{}", rule('━'));
        println!("❓ Question {}: {}", idx + 1, case.prompt.question);
        println!("{}", rule('━'));

        summary.calls += 1;
        match client.call_tool(case.tool, &case.prompt.arguments).await {
            Ok(response) => {
                println!("\n{}\n", response.summary_text());
                if let Some(payload) = response.json_payload(1) {
                    for line in describe_payload(&payload) {
                        println!("{}", line);
                    }
                }
            }
            Err(e) => {
                summary.errors += 1;
                println!("\nERROR: {}", e);
            }
        }
    }
    summary
}
