//! Lay out a JSON scene headlessly and print the committed draw commands.
//!
//! ```text
//! layer-canvas-dump [--scale N] [--height-only] <scene.json | ->
//! ```

use std::io::Read;
use std::process::ExitCode;

use layer_canvas_render::{Canvas, CanvasConfig, RecordingSurface};

struct Args {
    scale: f32,
    height_only: bool,
    input: String,
}

fn usage() -> &'static str {
    "usage: layer-canvas-dump [--scale N] [--height-only] <scene.json | ->"
}

fn parse_args() -> Result<Args, String> {
    let mut scale = 1.0;
    let mut height_only = false;
    let mut input = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scale" => {
                let value = args.next().ok_or("--scale needs a value")?;
                scale = value
                    .parse()
                    .map_err(|_| format!("--scale: not a number: {}", value))?;
            }
            "--height-only" => height_only = true,
            "-h" | "--help" => return Err(usage().to_string()),
            _ if input.is_none() => input = Some(arg),
            _ => return Err(format!("unexpected argument: {}", arg)),
        }
    }

    Ok(Args {
        scale,
        height_only,
        input: input.ok_or_else(|| usage().to_string())?,
    })
}

fn read_scene(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| format!("stdin: {}", e))?;
        return Ok(json);
    }
    std::fs::read_to_string(input).map_err(|e| format!("{}: {}", input, e))
}

fn run(args: Args) -> Result<(), String> {
    let json = read_scene(&args.input)?;
    let mut canvas = Canvas::new(CanvasConfig::with_scale(args.scale), RecordingSurface::new())
        .map_err(|e| e.to_string())?;
    canvas.apply_json(&json).map_err(|e| e.to_string())?;
    canvas.present(|| {}).map_err(|e| e.to_string())?;

    for diagnostic in canvas.diagnostics() {
        eprintln!("warning: {}", diagnostic);
    }

    let height = canvas.auto_height();
    if args.height_only {
        match height {
            Some(height) => println!("{}", height),
            None => println!("-"),
        }
        return Ok(());
    }

    eprintln!(
        "layers={} auto_height={}",
        canvas.registry().len(),
        height.map_or_else(|| "-".to_string(), |h| h.to_string())
    );
    let frame = canvas
        .surface()
        .frame()
        .to_json()
        .map_err(|e| format!("encode frame: {}", e))?;
    println!("{}", frame);
    Ok(())
}

fn main() -> ExitCode {
    match parse_args().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
