use anyhow::Result;
use clap::Parser;

use agribot_cli::{build_app, init_tracing, CommonArgs};
use agribot_text::TfidfMatcher;

/// Answer a single question and exit.
#[derive(Parser)]
#[command(name = "agribot-ask", version)]
struct Cli {
    /// The question to answer
    utterance: String,

    #[command(flatten)]
    common: CommonArgs,

    /// Print the similarity of every candidate question
    #[arg(long)]
    scores: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);
    let mut app = build_app(&cli.common, false)?;

    if cli.scores {
        let candidates = app.engine.store().candidates(app.session.category(), app.session.language())?;
        let scores = TfidfMatcher::new().similarities(candidates.questions(), &cli.utterance);
        println!("🔍 {} candidates (threshold {:.2}):", candidates.len(), app.engine.threshold());
        for (q, s) in candidates.questions().iter().zip(&scores) { println!("  {s:.4}  {q}"); }
        println!();
    }

    let reply = app.engine.respond(&mut app.session, &cli.utterance)?;
    println!("{}", reply.text);
    Ok(())
}
