//! Terminal front-ends
//!
//! Generic over the reader and writer so the prompt loop runs against
//! in-memory buffers in tests.

use std::io::{self, BufRead, Write};

use crate::pipeline::{QueryPipeline, SearchSummarizer};

pub const ONE_SHOT_PROMPT: &str = "Enter your search query: ";
pub const QUERY_PROMPT: &str = "\nQuery: ";
pub const INVALID_QUERY: &str = "Please enter a valid query.";

const QUIT: &str = "quit";

/// Prompt until a non-empty line arrives; `None` on end of input
pub fn read_query<R, W>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let query = line.trim();
        if query.is_empty() {
            writeln!(output, "{INVALID_QUERY}")?;
            continue;
        }
        return Ok(Some(query.to_string()));
    }
}

pub fn is_quit(query: &str) -> bool {
    query.eq_ignore_ascii_case(QUIT)
}

pub fn banner(topic: Option<&str>) -> String {
    match topic {
        Some(topic) => format!(
            "Welcome to the {topic} Information Search Agent!\nEnter your query about {topic} (or '{QUIT}' to exit)"
        ),
        None => format!("Welcome to the Information Search Agent!\nEnter your query (or '{QUIT}' to exit)"),
    }
}

/// Ask once, answer once
pub async fn run_once<R, W>(pipeline: &QueryPipeline, input: &mut R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let Some(query) = read_query(input, output, ONE_SHOT_PROMPT)? else {
        writeln!(output)?;
        return Ok(());
    };

    let result = pipeline.process_query(&query).await;
    writeln!(output, "\nResult: {result}")?;
    Ok(())
}

/// Query loop until `quit` or end of input
pub async fn run_interactive<R, W>(
    pipeline: &mut SearchSummarizer,
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", banner(pipeline.topic()))?;

    while let Some(query) = read_query(input, output, QUERY_PROMPT)? {
        if is_quit(&query) {
            writeln!(output, "Goodbye!")?;
            return Ok(());
        }

        writeln!(output, "\nSearching...")?;
        output.flush()?;
        let result = pipeline.search_and_summarize(&query).await;
        writeln!(output, "\nResult:\n{result}")?;
    }

    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use agent_core::mock::ScriptedProvider;
    use agent_core::{AgentBuilder, GenerationOptions};
    use web_search::tools::SearchTool;
    use web_search::{MockSearchClient, Summarizer};

    fn one_shot(reply: &str) -> QueryPipeline {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new([reply])))
            .tool(SearchTool::new(Arc::new(MockSearchClient::with_results(""))))
            .build()
            .unwrap();
        QueryPipeline::new(agent, false)
    }

    fn interactive(agent_replies: &[&str], summaries: &[&str]) -> SearchSummarizer {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(agent_replies.to_vec())))
            .tool(SearchTool::new(Arc::new(MockSearchClient::with_results(""))))
            .build()
            .unwrap();
        let summarizer = Summarizer::new(
            Arc::new(ScriptedProvider::new(summaries.to_vec())),
            GenerationOptions::default(),
        )
        .unwrap();
        SearchSummarizer::new(agent, summarizer, Some("Grok 3".into()))
    }

    #[test]
    fn test_read_query_skips_blank_lines() {
        let mut input = Cursor::new("\n   \n  what is grok?  \n");
        let mut output = Vec::new();

        let query = read_query(&mut input, &mut output, "> ").unwrap();

        assert_eq!(query.as_deref(), Some("what is grok?"));
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches(INVALID_QUERY).count(), 2);
        assert_eq!(shown.matches("> ").count(), 3);
    }

    #[test]
    fn test_read_query_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(read_query(&mut input, &mut output, "> ").unwrap(), None);
    }

    #[test]
    fn test_quit_is_case_insensitive() {
        assert!(is_quit("quit"));
        assert!(is_quit("QUIT"));
        assert!(is_quit("Quit"));
        assert!(!is_quit("quit now"));
    }

    #[tokio::test]
    async fn test_run_once_prints_result() {
        let pipeline = one_shot("Thought: I now know the final answer\nFinal Answer: Rust 1.83");
        let mut input = Cursor::new("latest rust\n");
        let mut output = Vec::new();

        run_once(&pipeline, &mut input, &mut output).await.unwrap();

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with(ONE_SHOT_PROMPT));
        assert!(shown.ends_with("\nResult: Rust 1.83\n"));
    }

    #[tokio::test]
    async fn test_interactive_session() {
        let mut pipeline = interactive(
            &["Thought: I now know the final answer\nFinal Answer: raw answer"],
            &["short summary"],
        );
        let mut input = Cursor::new("\nrelease date\nQuit\nnever read\n");
        let mut output = Vec::new();

        run_interactive(&mut pipeline, &mut input, &mut output).await.unwrap();

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Welcome to the Grok 3 Information Search Agent!"));
        assert!(shown.contains(INVALID_QUERY));
        assert!(shown.contains("\nSearching...\n\nResult:\nshort summary\n"));
        assert!(shown.ends_with("Goodbye!\n"));
        assert_eq!(pipeline.memory().exchanges(), 1);
    }

    #[tokio::test]
    async fn test_interactive_errors_keep_looping() {
        let mut pipeline = interactive(&[], &[]);
        let mut input = Cursor::new("first\nsecond\n");
        let mut output = Vec::new();

        run_interactive(&mut pipeline, &mut input, &mut output).await.unwrap();

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Result:\nAn error occurred: ").count(), 2);
        assert!(!shown.contains("Goodbye!"));
    }
}
