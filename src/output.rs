//! Output formatting for ranked lines
//!
//! Two renderings of the same result:
//! - colored lines on stdout, each claimed character wrapped in a 24-bit
//!   foreground escape of its first claiming predicate
//! - one JSON document on stderr with the highlight runs of every line

use crate::highlight::HighlightedLine;
use crate::query::executor::LineMatches;
use crate::query::scorer::ScoredLine;
use std::io::{self, Write};
use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};

/// Print ranked lines to stdout
pub fn print_colored(lines: &[ScoredLine<'_>], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = BufferedStandardStream::stdout(choice);

    for line in lines {
        write_colored_line(&mut stdout, &line.matches)?;
    }

    stdout.flush()
}

/// Write one line, coloring every claimed character on its own
pub fn write_colored_line<W: WriteColor>(out: &mut W, matches: &LineMatches<'_>) -> io::Result<()> {
    let mut buf = [0u8; 4];

    for (offset, ch) in matches.content.char_indices() {
        let encoded = ch.encode_utf8(&mut buf).as_bytes();

        match matches.claims_at(offset).first() {
            Some(predicate) => {
                let (r, g, b) = predicate.paint.rgb();
                out.set_color(
                    ColorSpec::new()
                        .set_fg(Some(Color::Rgb(r, g, b)))
                        .set_reset(false),
                )?;
                out.write_all(encoded)?;
                out.reset()?;
            }
            None => out.write_all(encoded)?,
        }
    }

    writeln!(out)
}

/// Write the highlight document as a single JSON array plus newline
pub fn write_document<W: Write>(mut out: W, lines: &[ScoredLine<'_>]) -> io::Result<()> {
    let document: Vec<HighlightedLine> = lines.iter().map(HighlightedLine::from_scored).collect();

    serde_json::to_writer(&mut out, &document)?;
    writeln!(out)?;
    out.flush()
}
