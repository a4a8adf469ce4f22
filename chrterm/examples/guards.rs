use std::io::Write;

use chrterm::prelude::*;
use clap::Parser;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Parse a guard, optionally bind some of its variables and print
/// the simplified result
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File holding one guard per line
    #[arg(short, long)]
    pub file: Option<String>,

    /// Guard given on the command line (overrides file)
    #[arg(short, long)]
    pub code: Option<String>,

    /// Bindings applied before evaluation, as `Name=term`
    #[arg(short, long = "bind")]
    pub bindings: Vec<String>,
}

fn parse_binding(src: &str) -> TermResult<(Variable, Term)> {
    let Some((name, value)) = src.split_once('=') else {
        return Err(Error::Parse(vec![format!("expected `Name=term`, found `{src}`")]));
    };
    Ok((Variable::new(name.trim()), parse(value)?))
}

fn main() {
    let args = Args::parse();

    let guards: Vec<String> = if let Some(code) = args.code {
        vec![code]
    } else if let Some(file) = args.file {
        std::fs::read_to_string(file)
            .expect("Failed to read file")
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect()
    } else {
        [
            "X > 3 && X < 10",
            "X < Y || X == Y",
            "!(3>4) && a<= b || 3<4 && a>b",
            "Item in [1, 2, 3] && Item * 2 == 4",
            "5*8.2 + 1",
        ]
        .map(str::to_owned)
        .to_vec()
    };

    let mut env = Bindings::new();
    for binding in &args.bindings {
        match parse_binding(binding) {
            Ok((var, term)) => env = env.add_binding(var, term),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    let mut error_color = ColorSpec::new();
    error_color.set_fg(Some(termcolor::Color::Red));
    error_color.set_intense(true);

    let mut ok_color = ColorSpec::new();
    ok_color.set_fg(Some(termcolor::Color::Green));
    ok_color.set_intense(true);

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();

    for src in &guards {
        match parse(src) {
            Ok(guard) => {
                let simplified = evaluate(&substitute(&guard, &env));
                stdout.set_color(&ok_color).unwrap();
                write!(stdout, "{src:>40}  =>  ").unwrap();
                stdout.reset().unwrap();
                stdout.flush().unwrap();
                simplified.pretty_print().unwrap();
                println!();
            }
            Err(e) => {
                stdout.set_color(&error_color).unwrap();
                writeln!(stdout, "{src:>40}  !!  {e}").unwrap();
                stdout.reset().unwrap();
            }
        }
    }
    stdout.flush().unwrap();
}
