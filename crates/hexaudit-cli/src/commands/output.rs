//! Shared output formatting for review reports.

use anyhow::Result;

use hexaudit_core::AnnotatedReport;

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &AnnotatedReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
    }
    Ok(())
}

fn print_text(report: &AnnotatedReport) {
    if !report.titles.is_empty() {
        println!("Sections: {}", report.titles.join(", "));
        println!();
    }

    for finding in &report.project_findings {
        println!("project [{}]", finding.kind);
        for line in finding.message.lines() {
            println!("  {line}");
        }
        println!();
    }

    for annotated in &report.code_findings {
        let finding = &annotated.finding;
        let path = finding.filepath.as_deref().unwrap_or("<unknown>");
        let start = finding.start_line.unwrap_or(1);
        let end = finding.end_line.unwrap_or(start);
        println!("{path}:{start}-{end} [{}]", finding.kind);
        println!("  {}", finding.message);
        for line in &annotated.lines {
            println!("  {:>5} | {}", line.line_number, line.text);
        }
        if let Some(suggestion) = &finding.suggestion {
            println!("  = help: {suggestion}");
        }
        println!();
    }

    println!(
        "Found {} code finding(s), {} project finding(s)",
        report.code_findings.len(),
        report.project_findings.len()
    );
}

fn print_json(report: &AnnotatedReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
