use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use agribot_cli::{build_app, init_tracing, theme_filter, App, CommonArgs};
use agribot_chat::Reply;
use agribot_core::types::{CategoryFilter, Role};

#[derive(Parser)]
#[command(name = "agribot", version, about = "🌱 AgriBot: agricultural questions & answers")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Do not append conversations to the history log
    #[arg(long)]
    no_history: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);
    let mut app = build_app(&cli.common, !cli.no_history)?;

    println!("🌱 AgriBot");
    println!("==========");
    print_status(&app);
    println!("Type /help for commands.\n");

    chat_loop(&mut app)
}

fn chat_loop(app: &mut App) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("vous> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() { continue; }

        let (command, arg) = match input.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (input, ""),
        };
        match command {
            "/help" | "/h" => show_help(),
            "/quit" | "/q" | "/exit" => break,
            "/lang" | "/l" => set_language(app, arg),
            "/theme" | "/t" => set_theme(app, arg),
            "/themes" => show_themes(app),
            "/suggest" | "/s" => show_suggestions(app),
            "/ask" => ask_suggestion(app, arg),
            "/save" => save(app),
            "/history" => show_history(app),
            "/clear" => { app.session.clear(); println!("🧹 Conversation cleared"); }
            c if c.starts_with('/') => println!("❓ Unknown command: {c} (see /help)"),
            _ => ask(app, input),
        }
    }
    println!("👋 Au revoir !");
    Ok(())
}

fn show_help() {
    println!("🎯 Commands:");
    println!("  /lang <code>     - Switch language (e.g. fr, br)");
    println!("  /theme <name>    - Restrict answers to one theme, or ALL");
    println!("  /themes          - List available themes");
    println!("  /suggest         - Quick questions for the current theme");
    println!("  /ask <n>         - Ask the n-th quick question");
    println!("  /save            - Save this conversation to the history log");
    println!("  /history         - Show saved conversations");
    println!("  /clear           - Forget the current conversation");
    println!("  /quit            - Exit");
    println!("  <question>       - Ask AgriBot");
}

fn print_status(app: &App) {
    println!("Langue: {} | Thème: {}", app.session.language().to_uppercase(), app.session.category());
}

fn ask(app: &mut App, utterance: &str) {
    let reply = app.engine.respond(&mut app.session, utterance);
    print_reply(reply);
}

fn print_reply(reply: agribot_core::Result<Reply>) {
    match reply {
        Ok(reply) => {
            let marker = if reply.result.matched() { "🌾" } else { "🤷" };
            println!("{marker} {}", reply.text);
        }
        Err(e) => println!("❌ {e}"),
    }
}

fn set_language(app: &mut App, code: &str) {
    if code.is_empty() {
        println!("Usage: /lang <code>   available: {}", app.engine.store().languages().join(", "));
        return;
    }
    if !app.engine.store().languages().iter().any(|l| l == code) {
        println!("⚠️  No entry is translated to '{code}' yet");
    }
    app.session.set_language(code);
    print_status(app);
}

fn set_theme(app: &mut App, name: &str) {
    if name.is_empty() { println!("Usage: /theme <name|ALL>"); return; }
    match app.engine.select_category(&mut app.session, theme_filter(app.engine.store(), name)) {
        Ok(()) => print_status(app),
        Err(e) => println!("❌ {e}"),
    }
}

fn show_themes(app: &App) {
    println!("📚 Themes:");
    println!("  {}", CategoryFilter::All);
    for name in app.engine.store().categories() {
        let marker = if app.session.category().as_str() == name { "*" } else { " " };
        println!("{marker} {name}");
    }
}

fn show_suggestions(app: &App) {
    match app.engine.suggestions(&app.session) {
        Ok(list) if list.is_empty() => println!("💡 Pick a theme with /theme to get quick questions"),
        Ok(list) => {
            println!("💡 Quick questions:");
            for (i, q) in list.iter().enumerate() { println!("  {}. {}", i + 1, q); }
        }
        Err(e) => println!("❌ {e}"),
    }
}

fn ask_suggestion(app: &mut App, arg: &str) {
    let Ok(n) = arg.parse::<usize>() else { println!("Usage: /ask <n>"); return; };
    let question = match app.engine.suggestions(&app.session) {
        Ok(list) => list.into_iter().nth(n.wrapping_sub(1)),
        Err(e) => { println!("❌ {e}"); return; }
    };
    match question {
        Some(q) => {
            println!("vous> {q}");
            let reply = app.engine.reply(&mut app.session, &q);
            print_reply(reply);
        }
        None => println!("No quick question #{n}; see /suggest"),
    }
}

fn save(app: &App) {
    let Some(log) = &app.history else { println!("History is disabled"); return; };
    match app.engine.save(&app.session) {
        Ok(()) => println!("💾 Conversation saved to {}", log.path().display()),
        Err(e) => { warn!("Failed to save conversation: {e:#}"); println!("❌ Could not save: {e}"); }
    }
}

fn show_history(app: &App) {
    let Some(log) = &app.history else { println!("History is disabled"); return; };
    let records = match log.read_all() {
        Ok(r) => r,
        Err(e) => { println!("❌ {e:#}"); return; }
    };
    if records.is_empty() { println!("No saved history yet"); return; }
    println!("📜 {} saved conversations:", records.len());
    for r in &records {
        let questions = r.messages.iter().filter(|m| m.role == Role::User).count();
        println!("  {}  {}  {:<12} {} question(s)", r.timestamp.format("%Y-%m-%d %H:%M:%S"), r.language, r.category.as_str(), questions);
    }
}
