//! Interactive text menu and plain-text result formatting.
use std::io::{BufRead, Write};

use anyhow::Result;

use crate::answer::Answer;
use crate::engine::QaEngine;
use crate::index::search::SearchResult;
use crate::kb::Stats;

/// Menu settings taken from the config.
#[derive(Debug, Clone, Copy)]
pub struct MenuOptions {
    pub answer_top_n: usize,
    pub search_top_n: usize,
    pub snippet_chars: usize,
}

/// First `max_chars` characters of `text`, with `...` appended.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

pub fn write_answer<W: Write>(out: &mut W, answer: &Answer, snippet_chars: usize) -> Result<()> {
    writeln!(out, "\nAnswer:")?;
    writeln!(out, "{}", answer.answer)?;

    if answer.is_found() {
        writeln!(out, "\nReferences:")?;
        for (i, r) in answer.references.iter().enumerate() {
            writeln!(
                out,
                "{}. [{}] {} (score: {:.2})",
                i + 1,
                r.question,
                snippet(&r.evidence, snippet_chars),
                r.score
            )?;
        }
    }
    Ok(())
}

pub fn write_results<W: Write>(
    out: &mut W,
    results: &[SearchResult],
    snippet_chars: usize,
) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "No matching knowledge found")?;
        return Ok(());
    }

    writeln!(out, "\nFound {} matching entries:", results.len())?;
    for (i, r) in results.iter().enumerate() {
        writeln!(
            out,
            "{}. [{}] {} (score: {:.2})",
            i + 1,
            r.question,
            snippet(&r.evidence, snippet_chars),
            r.score
        )?;
    }
    Ok(())
}

pub fn write_stats<W: Write>(out: &mut W, stats: &Stats) -> Result<()> {
    writeln!(out, "\nKnowledge base statistics:")?;
    writeln!(out, "- Questions: {}", stats.questions)?;
    writeln!(out, "- Evidences: {}", stats.evidences)?;
    writeln!(out, "- Indexed:   {}", stats.indexed)?;
    Ok(())
}

/// Run the menu loop until `q` or end of input.
pub fn run_menu<R: BufRead, W: Write>(
    engine: &QaEngine,
    options: MenuOptions,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out, "\n===== Menu =====")?;
        writeln!(out, "1. Ask a question")?;
        writeln!(out, "2. Search the knowledge base")?;
        writeln!(out, "3. Show statistics")?;
        writeln!(out, "q. Quit")?;

        let Some(cmd) = prompt(input, out, "Choose: ")? else {
            return Ok(());
        };

        match cmd.trim() {
            "1" => {
                let Some(question) = prompt(input, out, "Your question: ")? else {
                    return Ok(());
                };
                if question.trim().is_empty() {
                    continue;
                }
                let answer = engine.generate_answer(&question, options.answer_top_n);
                write_answer(out, &answer, options.snippet_chars)?;
            }
            "2" => {
                let Some(keyword) = prompt(input, out, "Search keywords: ")? else {
                    return Ok(());
                };
                if keyword.trim().is_empty() {
                    continue;
                }
                let results = engine.search(&keyword, options.search_top_n);
                write_results(out, &results, options.snippet_chars)?;
            }
            "3" => write_stats(out, &engine.stats())?,
            c if c.eq_ignore_ascii_case("q") => return Ok(()),
            _ => writeln!(out, "Invalid choice, please try again")?,
        }
    }
}

/// Print `label`, read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
