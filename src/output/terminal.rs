//! Report lines on stdout and colored preflight summaries on stderr.

use std::io::{self, Write};

use colored::Colorize;

use crate::preflight::SystemWarning;
use crate::result::Record;

/// Format one report line, without the trailing newline.
///
/// `<name>: total time = <elapsed><suffix>`
pub fn format_line(record: &Record) -> String {
    format!(
        "{}: total time = {}{}",
        record.name,
        record.elapsed,
        record.unit.suffix()
    )
}

/// Write one report line followed by `\n`.
pub fn write_line<W: Write + ?Sized>(out: &mut W, record: &Record) -> io::Result<()> {
    writeln!(out, "{}", format_line(record))
}

/// Human-readable block listing host warnings. Empty when there are none.
pub fn format_warnings(warnings: &[SystemWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{}\n",
        format!("\u{26A0} {} preflight warning(s)", warnings.len())
            .yellow()
            .bold()
    ));
    for warning in warnings {
        output.push_str(&format!("  - {}\n", warning.description()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;

    fn record(name: &str, elapsed: u64, unit: Unit) -> Record {
        Record {
            name: name.to_string(),
            elapsed,
            unit,
        }
    }

    #[test]
    fn test_cycle_line() {
        assert_eq!(
            format_line(&record("memcpy", 1234, Unit::Cycles)),
            "memcpy: total time = 1234."
        );
    }

    #[test]
    fn test_nanosecond_line() {
        assert_eq!(
            format_line(&record("byte_loop", 980, Unit::Nanoseconds)),
            "byte_loop: total time = 980 nanoseconds"
        );
    }

    #[test]
    fn test_write_line_matches_format() {
        let r = record("word_loop", 7, Unit::Cycles);
        let mut out = Vec::new();
        write_line(&mut out, &r).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format_line(&r) + "\n");
    }

    #[test]
    fn test_warnings_block() {
        colored::control::set_override(false);
        assert!(format_warnings(&[]).is_empty());

        let text = format_warnings(&[SystemWarning::TurboBoostEnabled]);
        assert!(text.starts_with("\u{26A0} 1 preflight warning(s)\n"));
        assert!(text.contains("Turbo boost"));
    }
}
