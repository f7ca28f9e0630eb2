//! Entry points for JavaScript callers.

use wasm_bindgen::prelude::*;

use crate::parse::parse_colony;
use crate::solver::SolverConfig;

/// Parses a colony description and returns the move lines, one turn per line.
///
/// Route selection runs on the calling thread; browsers give the module no thread pool to spread it over.
#[wasm_bindgen(js_name = solveText)]
pub fn solve_text(input: &str) -> Result<String, JsError> {
    let colony = parse_colony(input)?;
    let outcome = colony.solve_with(SolverConfig::default().with_parallel(false))?;
    Ok(outcome.plan().schedule().display(&colony).to_string())
}

/// Like [`solve_text`], but splits the result into an array of turns.
#[wasm_bindgen(js_name = solveLines)]
pub fn solve_lines(input: &str) -> Result<js_sys::Array, JsError> {
    let text = solve_text(input)?;
    Ok(text.lines().map(JsValue::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_text_without_touching_js() {
        let lines = solve_text("2\n##start\na 0 0\n##end\nb 1 0\na-b\n").ok();
        assert_eq!(lines.as_deref(), Some("L1-b\nL2-b\n"));
    }
}
