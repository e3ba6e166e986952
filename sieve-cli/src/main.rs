//! Sieve CLI
//!
//! Inspect how CSS selectors tokenize, parse and score.
//!
//! Set `RUST_LOG=sieve_selector=trace` to see each pipeline stage.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use owo_colors::OwoColorize;
use sieve_selector::{Ast, ParseOptions, Token, TokenKind, parse, tokenize};

/// Sieve: CSS selector tokenizer, AST and specificity inspector
#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Specificity of each selector
    sieve '#nav > li.active' ':is(#a, .b)'

    # Token table
    sieve --tokens 'a[href^="http"]:not(.internal)'

    # AST as JSON, without parsing pseudo-class arguments
    sieve --ast --json --flat 'ul li:nth-child(2n+1 of .item)'
"#)]
struct Cli {
    /// Selectors to inspect
    #[arg(value_name = "SELECTOR", required = true)]
    selectors: Vec<String>,

    /// Print the token sequence instead of the specificity
    #[arg(short, long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the AST instead of the specificity
    #[arg(short, long)]
    ast: bool,

    /// Print output as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    parse_args: ParseArgs,
}

/// Flags that become the library's [`ParseOptions`].
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
struct ParseArgs {
    /// Do not parse pseudo-class arguments into subtrees
    #[arg(long)]
    flat: bool,

    /// Do not split comma-separated selectors into a list
    #[arg(long)]
    no_list: bool,
}

impl ParseArgs {
    const fn options(self) -> ParseOptions {
        ParseOptions {
            recursive: !self.flat,
            list: !self.no_list,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut failed = false;
    for selector in &cli.selectors {
        if let Err(err) = inspect(&cli, selector) {
            eprintln!("{} {}: {err:#}", "error".red().bold(), selector.bold());
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Install a `tracing` subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Print one selector in the requested form.
fn inspect(cli: &Cli, selector: &str) -> Result<()> {
    if cli.tokens {
        let tokens = tokenize(selector)?.unwrap_or_default();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        } else {
            print_tokens(selector, &tokens);
        }
        return Ok(());
    }

    let ast = parse(selector, cli.parse_args.options())?.context("no selector given")?;
    if cli.ast {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&ast)?);
        } else {
            println!("{}", selector.bold());
            print_ast(&ast, 1);
        }
    } else if cli.json {
        println!("{}", serde_json::to_string(&ast.specificity())?);
    } else {
        println!("{}  {}", selector.bold(), ast.specificity().green());
    }
    Ok(())
}

fn print_tokens(selector: &str, tokens: &[Token]) {
    println!("{}", selector.bold());
    for token in tokens {
        let pos = format!("{}..{}", token.pos.start, token.pos.end);
        println!(
            "  {:<15} {:>8}  {:?}",
            token.token_type().cyan(),
            pos.dimmed(),
            token.content
        );
    }
}

fn print_ast(ast: &Ast, depth: usize) {
    let indent = "  ".repeat(depth);
    match ast {
        Ast::List { list } => {
            println!("{indent}{}", "list".yellow());
            for child in list {
                print_ast(child, depth + 1);
            }
        }
        Ast::Complex {
            combinator,
            left,
            right,
        } => {
            println!("{indent}{} {:?}", "complex".yellow(), combinator.as_str());
            print_ast(left, depth + 1);
            print_ast(right, depth + 1);
        }
        Ast::Compound { list } => {
            println!("{indent}{}", "compound".yellow());
            for token in list {
                print_token(token, depth + 1);
            }
        }
        Ast::Token(token) => print_token(token, depth),
    }
}

fn print_token(token: &Token, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{} {:?}", token.token_type().cyan(), token.content);
    if let TokenKind::PseudoClass {
        index: Some(index), ..
    } = &token.kind
    {
        println!("{indent}  {} {index:?}", "index".dimmed());
    }
    if let Some(subtree) = token.subtree() {
        print_ast(subtree, depth + 1);
    }
}
