use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use outline_clip::config::load_or_default;
use outline_clip::docx::load_source_paragraphs;
use outline_clip::outline::index_paragraphs;
use outline_clip::progress::ConsoleProgress;
use outline_clip::session::Session;

#[derive(Parser, Debug)]
#[command(name = "outline-clip")]
#[command(about = "Copy DOCX paragraphs as outline-keyed key/value blocks", long_about = None)]
struct Args {
    /// Input .docx
    #[arg(value_name = "DOCX")]
    input: Option<PathBuf>,

    /// Read selection lines from a file, run one copy pass, then exit
    #[arg(long, value_name = "TXT")]
    select_file: Option<PathBuf>,

    /// Dump the paragraph index as JSON, then exit (no session)
    #[arg(long, value_name = "JSON")]
    extract_index_json: Option<PathBuf>,

    /// Print blocks to stdout instead of writing the system clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Config file path (default: search for outline-clip.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(true);

    let input = match args.input {
        Some(p) => p,
        None => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            eprintln!(
                "\n\nUSAGE:\n  outline-clip <input.docx>\n\nTIPS:\n  - Paste paragraph text on stdin; an empty line copies the accumulated block.\n  - Default config search: outline-clip.toml (upwards), or set OUTLINE_CLIP_CONFIG.\n"
            );
            return Ok(());
        }
    };

    let cfg = load_or_default(args.config.as_deref()).context("load config")?;

    let paragraphs = load_source_paragraphs(&input, cfg.index.include_tables)
        .with_context(|| format!("index document: {}", input.display()))?;
    let index = index_paragraphs(&paragraphs);
    progress.info(format!(
        "indexed {} paragraphs ({} records)",
        paragraphs.len(),
        index.len()
    ));

    if let Some(json_path) = args.extract_index_json {
        std::fs::write(
            &json_path,
            serde_json::to_vec_pretty(&index).context("serialize index json")?,
        )
        .with_context(|| format!("write index json: {}", json_path.display()))?;
        return Ok(());
    }

    let use_clipboard = cfg.clipboard.enabled && !args.no_clipboard;
    let mut session = Session::new(&index, &progress, use_clipboard);

    if let Some(select_file) = args.select_file {
        session.run_select_file(&select_file)?;
        return Ok(());
    }

    session.run_interactive()
}
