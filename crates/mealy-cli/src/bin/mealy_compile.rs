// mealy-compile: Build a Mealy machine from a sorted word list.
//
// Reads INPUT (one entry per line), builds the machine, checks that it
// enumerates exactly the input, prints statistics, then writes the machine
// to OUTPUT and checks that the written file reads back identically.
//
// Usage:
//   mealy-compile [OPTIONS] INPUT [OUTPUT]
//
// Options:
//   --no-write      Only build, verify and print statistics
//   --json          Print statistics as JSON
//   --keep-case     Do not upper-case entries
//   -h, --help      Print help

use std::io::{self, BufWriter, Write};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if mealy_cli::wants_help(&args) {
        println!("mealy-compile: Build a Mealy machine from a sorted word list.");
        println!();
        println!("Usage: mealy-compile [OPTIONS] INPUT [OUTPUT]");
        println!();
        println!("INPUT holds one entry per line. Entries are trimmed and upper-cased,");
        println!("and must be in ascending byte order after that.");
        println!();
        println!("Options:");
        println!("  --no-write      Only build, verify and print statistics");
        println!("  --json          Print statistics as JSON");
        println!("  --keep-case     Do not upper-case entries");
        println!("  -h, --help      Print this help");
        return;
    }

    let no_write = mealy_cli::has_flag(&args, "--no-write");
    let json = mealy_cli::has_flag(&args, "--json");
    let keep_case = mealy_cli::has_flag(&args, "--keep-case");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let Some(input) = positional.first() else {
        mealy_cli::fatal("missing INPUT (see --help)");
    };
    let output = positional.get(1);
    if output.is_none() && !no_write {
        mealy_cli::fatal("missing OUTPUT (or pass --no-write)");
    }

    eprintln!("Reading file '{input}'...");
    let entries = mealy_cli::read_entries(Path::new(input.as_str()), keep_case)
        .unwrap_or_else(|e| mealy_cli::fatal(&e));
    let machine = mealy_cli::build_machine(&entries).unwrap_or_else(|e| mealy_cli::fatal(&e));

    eprint!("Comparing sources for equivalence...");
    let expected = entries.iter().map(|e| e.as_bytes().to_vec());
    match mealy_cli::first_difference(expected, machine.all_sequences()) {
        None => eprintln!("  EQUAL"),
        Some(diff) => {
            eprintln!("  NOT EQUAL");
            mealy_cli::fatal(&diff);
        }
    }

    let report = mealy_cli::StatsReport::from(machine.stats());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = if json {
        serde_json::to_writer_pretty(&mut out, &report)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out))
    } else {
        report.write_text(&mut out)
    };
    if let Err(e) = written.and_then(|()| out.flush()) {
        mealy_cli::fatal(&format!("failed to write statistics: {e}"));
    }

    let Some(output) = output.filter(|_| !no_write) else {
        eprintln!("Not writing because of --no-write.");
        return;
    };
    let output = Path::new(output.as_str());

    eprintln!("Writing serialized machine to '{}'...", output.display());
    mealy_cli::write_machine(output, &machine).unwrap_or_else(|e| mealy_cli::fatal(&e));

    eprintln!("Reading serialized machine from '{}'...", output.display());
    let written = mealy_cli::load_machine(output).unwrap_or_else(|e| mealy_cli::fatal(&e));

    eprint!("Comparing built machine to deserialized version...");
    match mealy_cli::first_difference(machine.all_sequences(), written.all_sequences()) {
        None => eprintln!("  EQUAL"),
        Some(diff) => {
            eprintln!("  NOT EQUAL");
            mealy_cli::fatal(&diff);
        }
    }
}
