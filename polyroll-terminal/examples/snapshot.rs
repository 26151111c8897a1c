/// Example: Roll once and print the die without taking over the terminal
///
/// Usage: cargo run --example snapshot -- 3d20+1

use std::env;
use std::io::{self, stdout, Write};

use polyroll_core::{parse_notation, RenderStyle, RollRequest};
use polyroll_terminal::{AsciiRenderer, DiceViewer};

fn main() -> io::Result<()> {
    let request = match env::args().nth(1) {
        Some(text) => parse_notation(&text)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?,
        None => {
            eprintln!("No notation provided, rolling a d20...");
            RollRequest::single(polyroll_core::DieType::D20)
        }
    };

    let mut viewer = DiceViewer::new(RenderStyle::default(), request, rand::thread_rng());
    let outcome = viewer.roll().clone();
    println!("{} -> {:?} = {}", request, outcome.results, outcome.total);

    let mut renderer = AsciiRenderer::new(60, 24);
    viewer
        .render_into(&mut renderer)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let mut out = stdout();
    for y in 0..renderer.height() {
        writeln!(out, "{}", renderer.row_text(y))?;
    }
    out.flush()
}
