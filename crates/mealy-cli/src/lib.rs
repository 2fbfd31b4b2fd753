// mealy-cli: shared utilities for the command-line tools.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use mealy_fst::{Builder, Recognizer, Stats};
use serde::Serialize;

/// Environment variable naming the default machine file.
pub const MACHINE_ENV: &str = "MEALY_MACHINE";

/// Machine file used when neither `-m` nor `MEALY_MACHINE` is given.
const DEFAULT_MACHINE: &str = "words.mealy";

/// Normalize one input line: trim it and, unless `keep_case`, upper-case it.
/// Blank lines yield `None`.
pub fn normalize(line: &str, keep_case: bool) -> Option<String> {
    let entry = line.trim();
    if entry.is_empty() {
        None
    } else if keep_case {
        Some(entry.to_string())
    } else {
        Some(entry.to_uppercase())
    }
}

/// Read a word list, one entry per line, normalized with [`normalize`].
pub fn read_entries(path: &Path, keep_case: bool) -> Result<Vec<String>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Ok(text.lines().filter_map(|l| normalize(l, keep_case)).collect())
}

/// Build a machine from entries that must already be sorted.
pub fn build_machine(entries: &[String]) -> Result<Recognizer, String> {
    let mut builder = Builder::new();
    for (line, entry) in entries.iter().enumerate() {
        builder
            .insert(entry.as_bytes())
            .map_err(|e| format!("entry {} ({entry:?}): {e}", line + 1))?;
    }
    builder
        .finish()
        .map_err(|e| format!("failed to finish machine: {e}"))
}

/// Write a serialized machine to `path`.
pub fn write_machine(path: &Path, machine: &Recognizer) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("failed to create {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);
    machine
        .write_to(&mut out)
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
    out.flush()
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))
}

/// Read a serialized machine from `path`.
pub fn load_machine(path: &Path) -> Result<Recognizer, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    Recognizer::read_from(BufReader::new(file))
        .map_err(|e| format!("failed to load {}: {}", path.display(), e))
}

/// Check each line of `input` against `machine`. Stored words are written as
/// `C: word`, everything else as `W: word`. Blank lines are skipped.
///
/// `out` is flushed before returning, so a failed final write is reported.
pub fn check_words<R: BufRead, W: Write>(
    machine: &Recognizer,
    input: R,
    out: &mut W,
    keep_case: bool,
) -> io::Result<()> {
    for line in input.lines() {
        let Some(word) = normalize(&line?, keep_case) else {
            continue;
        };
        let tag = if machine.recognizes(word.as_bytes()) { 'C' } else { 'W' };
        writeln!(out, "{tag}: {word}")?;
    }
    out.flush()
}

/// Pick the machine file: explicit argument, then `MEALY_MACHINE`, then
/// `words.mealy` in the current directory.
pub fn machine_path(arg: Option<&str>) -> PathBuf {
    if let Some(p) = arg {
        return PathBuf::from(p);
    }
    if let Ok(env_path) = std::env::var(MACHINE_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }
    PathBuf::from(DEFAULT_MACHINE)
}

/// Compare two sequence streams and describe the first difference, if any.
pub fn first_difference<A, B>(expected: A, actual: B) -> Option<String>
where
    A: IntoIterator<Item = Vec<u8>>,
    B: IntoIterator<Item = Vec<u8>>,
{
    let mut expected = expected.into_iter();
    let mut actual = actual.into_iter();
    let mut index = 0usize;
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return None,
            (Some(e), Some(a)) if e == a => {}
            (Some(e), Some(a)) => {
                return Some(format!(
                    "entry {index}: expected {:?}, got {:?}",
                    String::from_utf8_lossy(&e),
                    String::from_utf8_lossy(&a)
                ));
            }
            (Some(e), None) => {
                return Some(format!(
                    "entry {index}: expected {:?}, got end of sequence",
                    String::from_utf8_lossy(&e)
                ));
            }
            (None, Some(a)) => {
                return Some(format!(
                    "entry {index}: expected end of sequence, got {:?}",
                    String::from_utf8_lossy(&a)
                ));
            }
        }
        index += 1;
    }
}

/// Number of bits needed to represent `value`.
pub fn bits_needed(value: usize) -> u32 {
    usize::BITS - value.leading_zeros()
}

/// A count together with the width needed to store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub count: usize,
    pub bits: u32,
}

impl Figure {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            bits: bits_needed(count),
        }
    }
}

/// Machine statistics as reported by `mealy-compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub states: Figure,
    pub unique_transitions: Figure,
    pub total_transitions: usize,
    pub max_state_transitions: Figure,
    pub trigger_values: Figure,
    pub triggers: Vec<u8>,
}

impl From<Stats> for StatsReport {
    fn from(stats: Stats) -> Self {
        Self {
            states: Figure::new(stats.states),
            unique_transitions: Figure::new(stats.unique_transitions),
            total_transitions: stats.total_transitions,
            max_state_transitions: Figure::new(stats.max_state_transitions),
            trigger_values: Figure::new(stats.triggers.len()),
            triggers: stats.triggers,
        }
    }
}

impl StatsReport {
    /// Human-readable report, one figure per line.
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        fn line<W: Write>(out: &mut W, label: &str, s: Figure) -> std::io::Result<()> {
            writeln!(out, "  {label}: {} ({:x}) ({} bits)", s.count, s.count, s.bits)
        }
        writeln!(out, "Statistics for compiled machine:")?;
        line(out, "Number of states", self.states)?;
        line(out, "Number of unique transitions", self.unique_transitions)?;
        writeln!(out, "  Total transitions: {}", self.total_transitions)?;
        line(out, "Max transitions per state", self.max_state_transitions)?;
        line(out, "Number of trigger values", self.trigger_values)?;
        writeln!(out, "  Triggers:")?;
        for t in &self.triggers {
            writeln!(out, "    {t:08x}")?;
        }
        Ok(())
    }
}

/// Take the value of a `--long=VALUE`, `--long VALUE` or `-s VALUE` option
/// out of `args`.
///
/// Returns `(value, remaining_args)`. A missing value is a fatal usage error.
pub fn take_option(args: &[String], short: &str, long: &str) -> (Option<String>, Vec<String>) {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Parse a numeric option value, exiting with a usage error if it is invalid.
pub fn parse_count(name: &str, value: &str) -> usize {
    value
        .parse()
        .unwrap_or_else(|_| fatal(&format!("{name} expects a non-negative integer, got {value:?}")))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

/// Check for a boolean flag.
pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_lines() {
        assert_eq!(normalize("  dabber \n", false), Some("DABBER".to_string()));
        assert_eq!(normalize("Dabber", true), Some("Dabber".to_string()));
        assert_eq!(normalize("   ", false), None);
        assert_eq!(normalize("öljy", false), Some("ÖLJY".to_string()));
    }

    #[test]
    fn take_option_forms() {
        let (v, rest) = take_option(&args(&["-m", "a.mealy", "x"]), "-m", "--machine");
        assert_eq!(v.as_deref(), Some("a.mealy"));
        assert_eq!(rest, args(&["x"]));

        let (v, rest) = take_option(&args(&["x", "--machine=b.mealy"]), "-m", "--machine");
        assert_eq!(v.as_deref(), Some("b.mealy"));
        assert_eq!(rest, args(&["x"]));

        let (v, rest) = take_option(&args(&["--machine", "c", "--json"]), "-m", "--machine");
        assert_eq!(v.as_deref(), Some("c"));
        assert_eq!(rest, args(&["--json"]));

        let (v, rest) = take_option(&args(&["x", "y"]), "-m", "--machine");
        assert_eq!(v, None);
        assert_eq!(rest, args(&["x", "y"]));
    }

    #[test]
    fn flags() {
        let a = args(&["--no-write", "in.txt"]);
        assert!(has_flag(&a, "--no-write"));
        assert!(!has_flag(&a, "--json"));
        assert!(wants_help(&args(&["-h"])));
        assert!(!wants_help(&a));
    }

    #[test]
    fn explicit_machine_path_wins() {
        assert_eq!(machine_path(Some("x.mealy")), PathBuf::from("x.mealy"));
    }

    #[test]
    fn bits() {
        assert_eq!(bits_needed(0), 0);
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(12), 4);
        assert_eq!(bits_needed(255), 8);
        assert_eq!(bits_needed(256), 9);
    }

    #[test]
    fn build_reports_line() {
        let entries = args(&["B", "A"]);
        let err = build_machine(&entries).unwrap_err();
        assert!(err.starts_with("entry 2 (\"A\")"), "{err}");

        let machine = build_machine(&args(&["A", "B"])).unwrap();
        assert!(machine.recognizes(b"B"));
    }

    #[test]
    fn check_words_tags_lines() {
        let machine = build_machine(&args(&["AA", "AB"])).unwrap();
        let mut out = Vec::new();
        check_words(&machine, &b"aa\n\n  ab \nzz\nAb\n"[..], &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "C: AA\nC: AB\nW: ZZ\nC: AB\n");

        let mut out = Vec::new();
        check_words(&machine, &b"Ab\n"[..], &mut out, true).unwrap();
        assert_eq!(out, b"W: Ab\n");
    }

    /// Accepts every write, then fails when flushed.
    struct FlushFails(Vec<u8>);

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("device full"))
        }
    }

    #[test]
    fn check_words_reports_flush_failure() {
        let machine = build_machine(&args(&["AA"])).unwrap();
        let mut out = FlushFails(Vec::new());
        let err = check_words(&machine, &b"aa\n"[..], &mut out, false).unwrap_err();
        assert_eq!(err.to_string(), "device full");
        assert_eq!(out.0, b"C: AA\n");
    }

    #[test]
    fn differences() {
        let a = || vec![b"A".to_vec(), b"B".to_vec()];
        assert_eq!(first_difference(a(), a()), None);
        assert_eq!(
            first_difference(a(), vec![b"A".to_vec(), b"C".to_vec()]),
            Some("entry 1: expected \"B\", got \"C\"".to_string())
        );
        assert_eq!(
            first_difference(a(), vec![b"A".to_vec()]),
            Some("entry 1: expected \"B\", got end of sequence".to_string())
        );
        assert!(first_difference(Vec::<Vec<u8>>::new(), a()).is_some());
    }

    #[test]
    fn stats_report() {
        let machine = build_machine(&args(&["AX", "BX", "BY"])).unwrap();
        let report = StatsReport::from(machine.stats());
        assert_eq!(report.states, Figure { count: 4, bits: 3 });
        assert_eq!(report.total_transitions, 5);
        assert_eq!(report.trigger_values.count, 4);

        let mut text = Vec::new();
        report.write_text(&mut text).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("  Number of states: 4 (4) (3 bits)\n"));
        assert!(text.contains("    00000058\n")); // 'X'

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["states"]["count"], 4);
        assert_eq!(json["total_transitions"], 5);
        assert_eq!(json["triggers"], serde_json::json!([65, 66, 88, 89]));
    }

    #[test]
    fn write_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("mealy-cli-test-{}", process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("words.txt");
        std::fs::write(&input, "aa\nab\n\nba\n").unwrap();

        let entries = read_entries(&input, false).unwrap();
        assert_eq!(entries, args(&["AA", "AB", "BA"]));

        let machine = build_machine(&entries).unwrap();
        let path = dir.join("words.mealy");
        write_machine(&path, &machine).unwrap();
        let loaded = load_machine(&path).unwrap();
        assert_eq!(loaded, machine);

        assert!(load_machine(&dir.join("missing.mealy")).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
