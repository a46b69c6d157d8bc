// src/smoke/display.rs
use serde_json::Value;

pub const RULE_WIDTH: usize = 70;

/// True when `text` has at least one character from the Thai block (U+0E00..=U+0E7F).
pub fn has_thai(text: &str) -> bool {
    text.chars().any(|c| ('\u{0E00}'..='\u{0E7F}').contains(&c))
}

/// Cuts `text` to at most `max_chars` characters. The flag says whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// The first `max_lines` lines of `text`, indented, plus a count of what was left out.
pub fn preview_lines(text: &str, max_lines: usize) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = lines.iter().take(max_lines).map(|l| format!("  {}", l)).collect();
    if lines.len() > max_lines {
        out.push(format!("  ... [{} more lines]", lines.len() - max_lines));
    }
    out
}

pub fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

pub fn banner(title: &str) -> String {
    format!("{}\n{:^width$}\n{}", rule('='), title, rule('='), width = RULE_WIDTH)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar)
}

fn fund_metrics(fund: &Value) -> String {
    let mut parts = Vec::new();
    if let Some(risk) = field(fund, "risk_level") {
        parts.push(format!("Risk: {}/8", risk));
    }
    if let Some(perf) = field(fund, "performance") {
        parts.push(format!("Performance: {}%", perf));
    }
    for (key, label) in [("perf_ytd", "YTD"), ("perf_1y", "1Y"), ("perf_3y", "3Y")] {
        if let Some(v) = field(fund, key) {
            parts.push(format!("{}: {}%", label, v));
        }
    }
    if let Some(nav) = field(fund, "nav_value") {
        parts.push(format!("NAV: {} THB", nav));
    }
    if let Some(amc) = field(fund, "amc") {
        parts.push(format!("AMC: {}", amc));
    }
    parts.join(" | ")
}

/// Human-readable lines for the structured payload a tool returns alongside its summary.
pub fn describe_payload(payload: &Value) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(funds) = payload.get("funds").and_then(Value::as_array) {
        for fund in funds {
            let rank = field(fund, "rank").map(|r| format!("{}. ", r)).unwrap_or_default();
            let symbol = field(fund, "symbol").unwrap_or_else(|| "?".to_string());
            match field(fund, "fund_name") {
                Some(name) => lines.push(format!("  • {}{} - {}", rank, symbol, name)),
                None => lines.push(format!("  • {}{}", rank, symbol)),
            }
            let metrics = fund_metrics(fund);
            if !metrics.is_empty() {
                lines.push(format!("    {}", metrics));
            }
        }
        return lines;
    }

    if let Some(name) = field(payload, "fund_name") {
        lines.push(format!("  Fund: {}", name));
        for (key, label) in [
            ("amc", "AMC"),
            ("fund_classification", "Classification"),
            ("dividend_policy", "Dividend Policy"),
        ] {
            if let Some(v) = field(payload, key) {
                lines.push(format!("  {}: {}", label, v));
            }
        }
        if let Some(risk) = field(payload, "risk_level") {
            lines.push(format!("  Risk Level: {}/8", risk));
        }
        if let Some(nav) = field(payload, "nav_value") {
            lines.push(format!("  Current NAV: {} THB", nav));
        }
        if let Some(perf) = payload.get("performance").filter(|p| p.is_object()) {
            let periods: Vec<String> = ["ytd", "1y", "3y", "5y"]
                .iter()
                .filter_map(|k| field(perf, k).map(|v| format!("{} {}%", k.to_uppercase(), v)))
                .collect();
            if !periods.is_empty() {
                lines.push(format!("  Performance: {}", periods.join(" | ")));
            }
        }
        return lines;
    }

    if let Some(stats) = payload.get("statistics") {
        for (key, label) in [
            ("minNav", "Min NAV"),
            ("maxNav", "Max NAV"),
            ("avgNav", "Avg NAV"),
            ("periodReturn", "Period Return"),
            ("volatility", "Volatility"),
        ] {
            if let Some(v) = field(stats, key) {
                lines.push(format!("  {}: {}", label, v));
            }
        }
        if let Some(history) = payload.get("navHistory").and_then(Value::as_array) {
            lines.push("  Recent NAV (last 7 days):".to_string());
            for nav in history.iter().take(7) {
                let date = field(nav, "date").unwrap_or_default();
                let value = field(nav, "nav").unwrap_or_default();
                match field(nav, "change_percent") {
                    Some(change) => lines.push(format!("    {}: {} THB ({}%)", date, value, change)),
                    None => lines.push(format!("    {}: {} THB", date, value)),
                }
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_thai() {
        assert!(has_thai("แสดงกองทุน RMF"));
        assert!(has_thai("NAV ๑๒"));
        assert!(!has_thai("Top 5 RMF funds"));
        assert!(!has_thai(""));
        assert!(!has_thai("日本語 한국어"));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let thai = "กองทุน".repeat(50);
        let (cut, truncated) = truncate_chars(&thai, 200);
        assert!(truncated);
        assert_eq!(cut.chars().count(), 200);

        let (same, truncated) = truncate_chars("short", 200);
        assert_eq!(same, "short");
        assert!(!truncated);
    }

    #[test]
    fn test_preview_lines() {
        let text = "1\n2\n3\n4\n5\n6\n7";
        let preview = preview_lines(text, 5);
        assert_eq!(preview.len(), 6);
        assert_eq!(preview[0], "  1");
        assert_eq!(preview[5], "  ... [2 more lines]");
        assert_eq!(preview_lines("one", 5), vec!["  one".to_string()]);
    }

    #[test]
    fn test_describe_fund_list() {
        let payload = json!({
            "funds": [
                {"rank": 1, "symbol": "DAOL-GOLDRMF", "fund_name": "DAOL Gold RMF", "performance": 41.2, "risk_level": 8, "amc": "DAOL"},
                {"symbol": "B-ASEANRMF", "fund_name": "Bualuang ASEAN", "perf_ytd": 3.5, "nav_value": "12.34", "risk_level": null}
            ]
        });
        let lines = describe_payload(&payload);
        assert_eq!(lines[0], "  • 1. DAOL-GOLDRMF - DAOL Gold RMF");
        assert_eq!(lines[1], "    Risk: 8/8 | Performance: 41.2% | AMC: DAOL");
        assert_eq!(lines[2], "  • B-ASEANRMF - Bualuang ASEAN");
        assert_eq!(lines[3], "    YTD: 3.5% | NAV: 12.34 THB");
    }

    #[test]
    fn test_describe_detail_and_history() {
        let detail = json!({
            "fund_name": "abrdn Asia Pacific Equity RMF",
            "amc": "abrdn",
            "risk_level": 6,
            "performance": {"ytd": 5.1, "1y": 7.0, "3y": null}
        });
        let lines = describe_payload(&detail);
        assert_eq!(lines[0], "  Fund: abrdn Asia Pacific Equity RMF");
        assert!(lines.contains(&"  Risk Level: 6/8".to_string()));
        assert!(lines.contains(&"  Performance: YTD 5.1% | 1Y 7.0%".to_string()));

        let history = json!({
            "statistics": {"minNav": 10.1, "maxNav": 11.0},
            "navHistory": [{"date": "2025-01-02", "nav": 10.5, "change_percent": 0.4}]
        });
        let lines = describe_payload(&history);
        assert_eq!(lines[0], "  Min NAV: 10.1");
        assert_eq!(lines[3], "    2025-01-02: 10.5 THB (0.4%)");

        assert!(describe_payload(&json!({"other": true})).is_empty());
    }
}
