//! # MiniSQL CLI
//!
//! An interactive SQL shell over an in-memory MiniSQL database, plus a
//! batch mode that runs a script file passed as the first argument.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use minisql::{Database, StatementResult, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db = Database::new();

    if args.len() > 1 {
        run_script(&mut db, &args[1]);
        return;
    }

    println!("MiniSQL v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter \".help\" for usage hints.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut sql_buffer = String::new();

    loop {
        let prompt = if sql_buffer.is_empty() {
            "minisql> "
        } else {
            "    ...> "
        };
        print!("{}", prompt);
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(_) => break,
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if sql_buffer.is_empty() && trimmed.starts_with('.') {
            handle_dot_command(trimmed, &db);
            continue;
        }

        sql_buffer.push_str(&line);

        // Keep reading until the statement is complete.
        if !sql_buffer.trim_end().ends_with(';') {
            continue;
        }

        let sql = std::mem::take(&mut sql_buffer);
        run_batch(&mut db, &sql);
    }

    println!();
}

/// Run a script file, reporting per-statement errors without aborting.
fn run_script(db: &mut Database, path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    run_batch(db, &source);
}

/// Split a batch on `;` and execute each statement in order. A failing
/// statement is reported and the batch continues.
fn run_batch(db: &mut Database, source: &str) {
    for sql in split_statements(source) {
        match db.execute(&sql) {
            Ok(result) => print_result(&result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Split on semicolons outside of string literals, dropping blank pieces.
/// Comments survive the split; the lexer discards them.
fn split_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in source.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                current.push(c);
                quote = Some(c);
            }
            None if c == ';' => {
                if !current.trim().is_empty() {
                    statements.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            None => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        statements.push(current);
    }
    statements
}

fn print_result(result: &StatementResult) {
    match result {
        StatementResult::Rows { title, columns, rows } => {
            println!("Table: {}", title);
            let header = columns.join(" | ");
            println!("{}", header);
            println!("{}", "-".repeat(header.len()));
            for row in rows {
                let cells: Vec<String> = row.iter().map(Value::to_string).collect();
                println!("{}", cells.join(" | "));
            }
            println!("{} row(s) selected", rows.len());
        }
        StatementResult::RowsAffected(n) => println!("{} row(s) affected", n),
        StatementResult::TableCreated(name) => println!("Table '{}' created", name),
        StatementResult::TableDropped(name) => println!("Table '{}' dropped", name),
    }
}

fn handle_dot_command(cmd: &str, db: &Database) {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let command = parts[0].to_lowercase();

    match command.as_str() {
        ".help" => {
            println!(".help              Show this help");
            println!(".tables            List all tables");
            println!(".quit              Exit this program");
            println!(".exit              Exit this program");
        }
        ".tables" => {
            let names = db.catalog().table_names();
            if names.is_empty() {
                println!("(no tables)");
            } else {
                println!("{}", names.join("  "));
            }
        }
        ".quit" | ".exit" => {
            std::process::exit(0);
        }
        _ => {
            eprintln!("Error: unknown command: {}", command);
            eprintln!("Use .help for a list of commands.");
        }
    }
}
