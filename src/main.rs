use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use code_explainer::{cli, config::Config, handlers, language::Language, logging, tui};
use is_terminal::IsTerminal;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Load config; CLI overrides win
    let mut cfg = Config::load();
    if let Some(model) = &args.model {
        cfg.set("DEFAULT_MODEL", model.clone());
    }

    let language = args
        .language
        .or_else(|| cfg.get("DEFAULT_LANGUAGE").and_then(|l| l.parse::<Language>().ok()))
        .unwrap_or_default();

    if args.serve {
        logging::init_stderr("info,tower_http=debug");
        let addr = args.addr.clone().unwrap_or_else(|| cfg.listen_addr());
        return handlers::serve::run(&cfg, &addr).await;
    }

    if args.tui {
        let _guard = logging::init_file(&cfg.log_path(), "info")?;
        return tui::run_tui(&cfg, args.endpoint.clone(), language).await;
    }

    logging::init_stderr("warn");

    // Snippet: file argument, else piped stdin
    let code = match args.file.as_deref() {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => {
            if io::stdin().is_terminal() {
                bail!("Provide a source file or pipe code via stdin (or use --tui)");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if code.trim().is_empty() {
        bail!("No code provided");
    }

    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN")
    };

    if args.run {
        handlers::run::run(&cfg, &code, language.as_str()).await
    } else {
        handlers::explain::run(&cfg, &code, language.as_str(), markdown).await
    }
}
