use chembal::Equation;
use wasm_bindgen::prelude::*;


// Export an `equation_io` function from Rust to JavaScript.
#[wasm_bindgen]
/// Process input equation and return output
pub fn equation_io(equation: &str) -> String {
    let mut equation = match Equation::parse(equation) {
        Ok(equation) => equation,
        Err(err) => return format!("0{}", err),
    };

    // first char is 1 if success, 0 if error
    match equation.solve() {
        Ok(_) => match equation.solution_str() {
            Some(solution) => format!("1{}", solution),
            None => format!("0{}", chembal::BalanceError::InvalidSolution),
        },
        Err(err) => format!("0{}", err),
    }
}
