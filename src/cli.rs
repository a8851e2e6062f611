use clap::{ArgGroup, Parser};

use crate::language::Language;

#[derive(Parser, Debug, Clone)]
#[command(name = "code-explainer", about = "Explain code with an LLM or run it in a hosted sandbox", version)]
#[command(group(ArgGroup::new("mode").args(["run", "serve", "tui"]).multiple(false)))]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
pub struct Cli {
    /// Source file to analyze or run. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Language of the snippet (javascript, typescript, python, java, c, cpp).
    #[arg(short = 'l', long, value_parser = clap::value_parser!(Language))]
    pub language: Option<Language>,

    /// Large language model to use for explanations.
    #[arg(long)]
    pub model: Option<String>,

    /// Run the snippet on the execution service instead of explaining it.
    #[arg(short = 'r', long)]
    pub run: bool,

    /// Serve the explanation endpoint over HTTP.
    #[arg(long)]
    pub serve: bool,

    /// Open the interactive terminal UI.
    #[arg(long)]
    pub tui: bool,

    /// Address to listen on with --serve (defaults to LISTEN_ADDR).
    #[arg(long)]
    pub addr: Option<String>,

    /// Explanation endpoint used by --tui. When omitted an embedded server is started.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Render the explanation as Markdown.
    #[arg(long)]
    pub md: bool,
    /// Print the explanation as plain text.
    #[arg(long = "no-md")]
    pub no_md: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_are_mutually_exclusive() {
        let err = <Cli as Parser>::try_parse_from(["code-explainer", "--run", "--serve"]);
        assert!(err.is_err());
    }

    #[test]
    fn language_is_parsed_into_enum() {
        let cli = <Cli as Parser>::try_parse_from(["code-explainer", "-l", "python", "main.py"]).unwrap();
        assert_eq!(cli.language, Some(Language::Python));
        assert_eq!(cli.file.as_deref(), Some("main.py"));
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(<Cli as Parser>::try_parse_from(["code-explainer", "-l", "cobol"]).is_err());
    }
}
