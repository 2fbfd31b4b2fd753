// mealy-list: Print the entries stored in a compiled machine.
//
// Usage:
//   mealy-list [-m MACHINE] [--min N] [--max N]
//
// Options:
//   -m, --machine PATH   Compiled machine (default: $MEALY_MACHINE, then words.mealy)
//   --min N              Only entries of at least N bytes
//   --max N              Only entries of at most N bytes
//   -h, --help           Print help

use std::io::{self, Write};

use mealy_fst::LengthWindow;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (machine_arg, args) = mealy_cli::take_option(&args, "-m", "--machine");
    let (min, args) = mealy_cli::take_option(&args, "--min", "--min");
    let (max, args) = mealy_cli::take_option(&args, "--max", "--max");

    if mealy_cli::wants_help(&args) {
        println!("mealy-list: Print the entries stored in a compiled machine.");
        println!();
        println!("Usage: mealy-list [-m MACHINE] [--min N] [--max N]");
        println!();
        println!("Options:");
        println!("  -m, --machine PATH   Compiled machine (default: ${}, then words.mealy)", mealy_cli::MACHINE_ENV);
        println!("  --min N              Only entries of at least N bytes");
        println!("  --max N              Only entries of at most N bytes");
        println!("  -h, --help           Print this help");
        return;
    }
    if let Some(unknown) = args.first() {
        mealy_cli::fatal(&format!("unexpected argument {unknown:?} (see --help)"));
    }

    let mut window = LengthWindow::default();
    if let Some(min) = min {
        window.min = mealy_cli::parse_count("--min", &min);
    }
    if let Some(max) = max {
        window.max = mealy_cli::parse_count("--max", &max);
    }

    let path = mealy_cli::machine_path(machine_arg.as_deref());
    let machine = mealy_cli::load_machine(&path).unwrap_or_else(|e| mealy_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for entry in machine.constrained_sequences(window) {
        if out.write_all(&entry).and_then(|()| out.write_all(b"\n")).is_err() {
            return;
        }
    }
    if let Err(e) = out.flush() {
        eprintln!("error writing output: {e}");
    }
}
