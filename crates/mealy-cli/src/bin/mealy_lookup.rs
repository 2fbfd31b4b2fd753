// mealy-lookup: Check words from stdin against a compiled machine.
//
// Reads words from stdin (one per line) and reports whether each is stored:
//   C: word    (stored)
//   W: word    (not stored)
//
// Usage:
//   mealy-lookup [-m MACHINE] [OPTIONS]
//
// Options:
//   -m, --machine PATH   Compiled machine (default: $MEALY_MACHINE, then words.mealy)
//   --keep-case          Do not upper-case input words
//   -h, --help           Print help

use std::io;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (machine_arg, args) = mealy_cli::take_option(&args, "-m", "--machine");

    if mealy_cli::wants_help(&args) {
        println!("mealy-lookup: Check words from stdin against a compiled machine.");
        println!();
        println!("Usage: mealy-lookup [-m MACHINE] [OPTIONS]");
        println!();
        println!("Reads words from stdin (one per line). Prints:");
        println!("  C: word    (stored)");
        println!("  W: word    (not stored)");
        println!();
        println!("Options:");
        println!("  -m, --machine PATH   Compiled machine (default: ${}, then words.mealy)", mealy_cli::MACHINE_ENV);
        println!("  --keep-case          Do not upper-case input words");
        println!("  -h, --help           Print this help");
        return;
    }

    let keep_case = mealy_cli::has_flag(&args, "--keep-case");
    let path = mealy_cli::machine_path(machine_arg.as_deref());
    let machine = mealy_cli::load_machine(&path).unwrap_or_else(|e| mealy_cli::fatal(&e));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if let Err(e) = mealy_cli::check_words(&machine, stdin.lock(), &mut out, keep_case) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            mealy_cli::fatal(&e.to_string());
        }
    }
}
