use chembal::Equation;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "chembal", version, about = "Balance chemical equations")]
struct Args {
    /// Equation to balance, e.g. "H2 + O2 = H2O"; read from standard input when omitted
    equation: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let input = match args.equation {
        Some(equation) => equation,
        None => {
            print!("Enter a chemical equation (e.g. H2 + O2 = H2O): ");
            if io::stdout().flush().is_err() {
                return ExitCode::FAILURE;
            }
            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                Ok(n) if n > 0 => line,
                _ => {
                    eprintln!("No equation entered");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    log::debug!("balancing {:?}", input.trim());

    let mut equation = match Equation::parse(&input) {
        Ok(equation) => equation,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = equation.solve() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match equation.solution_str() {
        Some(solution) => {
            println!("{solution}");
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}
