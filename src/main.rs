//! vibecore - evaluate scalar SQL functions and JSON values from the command line

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use vibecore::context::ExecutionContext;
use vibecore::expression::{ExprRef, FunctionRegistry, Literal};
use vibecore::types::{Row, SqlType, SqlValue, Value, JSON};

/// vibecore - scalar SQL types and expression evaluation
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Session id recorded in the execution context
    #[arg(short, long, global = true, default_value = "0")]
    session_id: u64,

    /// Abort evaluation after this many milliseconds
    #[arg(short, long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate TRUNCATE(value, places)
    Truncate {
        /// Number to truncate
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Decimal places to keep; negative values zero digits left of the point
        #[arg(allow_hyphen_values = true)]
        places: String,
    },
    /// Parse a JSON document and print its canonical SQL encoding
    Json {
        text: String,
    },
    /// Compare two JSON documents
    JsonCompare {
        left: String,
        right: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut ctx = ExecutionContext::new(args.session_id);
    if let Some(ms) = args.timeout_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }
    log::debug!("session {} starting {:?}", ctx.session_id, args.command);

    match args.command {
        Command::Truncate { value, places } => run_truncate(&ctx, value, places),
        Command::Json { text } => run_json(&ctx, text),
        Command::JsonCompare { left, right } => run_json_compare(&ctx, &left, &right),
    }
}

fn run_truncate(ctx: &ExecutionContext, value: String, places: String) -> Result<()> {
    let registry = FunctionRegistry::with_builtins();
    let args: Vec<ExprRef> = vec![
        Arc::new(Literal::from_value(Value::String(value))),
        Arc::new(Literal::from_value(Value::String(places))),
    ];
    let call = registry
        .resolve("truncate", args)
        .context("Failed to build truncate call")?;

    let result = call
        .eval(ctx, &Row::empty())
        .with_context(|| format!("Failed to evaluate {}", call))?;
    let encoded = call
        .sql_type()
        .sql(ctx, &result)
        .context("Failed to encode result")?;
    print_sql(&encoded);
    Ok(())
}

fn run_json(ctx: &ExecutionContext, text: String) -> Result<()> {
    let doc = JSON
        .convert(ctx, &Value::String(text))
        .context("Failed to parse JSON document")?;
    let encoded = JSON.sql(ctx, &doc).context("Failed to encode JSON document")?;
    print_sql(&encoded);
    Ok(())
}

fn run_json_compare(ctx: &ExecutionContext, left: &str, right: &str) -> Result<()> {
    let ordering = JSON
        .compare(ctx, &Value::from(left), &Value::from(right))
        .context("Failed to compare JSON documents")?;
    let symbol = match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", left, symbol, right);
    Ok(())
}

fn print_sql(value: &SqlValue) {
    match value.as_str() {
        Some(text) => println!("{} ({})", text, value.type_id),
        None => println!("NULL ({})", value.type_id),
    }
}
