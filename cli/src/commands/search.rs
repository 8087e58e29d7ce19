use anyhow::{Context, Result};
use asyncgen_spec::parse::parse_document_file;
use asyncgen_spec::{search_document, MatchType};
use colored::Colorize;

pub fn search(document: &str, query: &str) -> Result<()> {
    let doc = parse_document_file(document)
        .with_context(|| format!("Failed to load document: {}", document))?;
    let results = search_document(&doc, query);

    if results.is_empty() {
        println!("{} No entries match {:?}", "!".yellow(), query);
        return Ok(());
    }

    println!("{} {} match(es) for {:?}:", "✓".green().bold(), results.len(), query);
    for result in &results {
        let marker = match result.match_type {
            MatchType::Exact => "=".green(),
            MatchType::CaseInsensitive => "~".cyan(),
            MatchType::Contains => "…".dimmed(),
        };
        println!(
            "  {} {} {}",
            marker,
            result.name.bold(),
            result.section.as_str().dimmed()
        );
    }
    Ok(())
}
