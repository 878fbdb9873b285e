//! Text bar chart of an [`OffsetTally`].

use crate::tally::OffsetTally;
use std::io::{self, Write};

pub const DEFAULT_TITLE: &str = "Ethereum Classic Block Interval Distribution (blocks 13M..14M)";
pub const X_LABEL: &str = "Interval in Seconds (derived as timestamp offset)";
pub const Y_LABEL: &str = "Number of occurrences";

pub struct Chart<'a> {
    pub title: &'a str,
    /// Width of the longest bar, in characters.
    pub width: usize,
}

/// Bar length for `count`, scaled so that `max` fills `width`. Any non-zero count gets at
/// least one mark.
pub fn bar_len(count: u64, max: u64, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count as u128 * width as u128 + max as u128 / 2) / max as u128;
    (scaled as usize).clamp(1, width.max(1))
}

impl Chart<'_> {
    /// One row per offset, ascending: `offset | bars count`.
    pub fn render(&self, tally: &OffsetTally, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.title)?;
        writeln!(out, "x: {X_LABEL}")?;
        writeln!(out, "y: {Y_LABEL}")?;

        let max = tally.iter().map(|(_, c)| c).max().unwrap_or_default();
        let offset_width = tally
            .iter()
            .map(|(offset, _)| offset.to_string().len())
            .max()
            .unwrap_or_default();
        let width = self.width;
        for (offset, count) in tally.iter() {
            let bar = "#".repeat(bar_len(count, max, width));
            writeln!(out, "{offset:>offset_width$} | {bar:<width$} {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bar_lengths() {
        assert_eq!(bar_len(0, 10, 60), 0);
        assert_eq!(bar_len(10, 10, 60), 60);
        assert_eq!(bar_len(5, 10, 60), 30);
        // rounds, but never hides a non-zero count
        assert_eq!(bar_len(1, 1_000_000, 60), 1);
        assert_eq!(bar_len(1, 3, 8), 3);
        assert_eq!(bar_len(3, 0, 8), 0);
    }

    #[test]
    fn render() {
        let mut tally = OffsetTally::new();
        for offset in [5, 5, 13, 13, 13, 13, -1] {
            tally.record(offset);
        }
        let chart = Chart {
            title: "Intervals",
            width: 8,
        };
        let mut out = Vec::new();
        chart.render(&tally, &mut out).unwrap();

        let expected = [
            "Intervals",
            "x: Interval in Seconds (derived as timestamp offset)",
            "y: Number of occurrences",
            "-1 | ##       1",
            " 0 |          0",
            " 1 |          0",
            " 2 |          0",
            " 3 |          0",
            " 5 | ####     2",
            "13 | ######## 4",
            "",
        ]
        .join("\n");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
