use indexmap::IndexMap;

use std::{
    collections::HashMap,
    fmt::{self, Display},
};

use crate::row::{Row, Totals};

/// Holds the aggregated impact data for one run.
///
/// To create a new, empty `Report`, use [`Report::new`].
///
/// To aggregate data, feed every extracted row to [`Report::add`], in file
/// order.
///
/// To get the printable totals, breakdown and duplicate sections, use its
/// [`Display`] implementation.
#[derive(Debug, Default)]
pub struct Report {
    grand: Totals,
    materials: IndexMap<String, Totals>,
    occurrences: HashMap<(String, String), usize>,
    duplicates: IndexMap<(String, String), Duplicate>,
    rows: usize,
}

impl Report {
    /// Creates a new, empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row to the grand totals, to its material's totals, and to
    /// the duplicate bookkeeping.
    ///
    /// Materials appear in the breakdown in the order they were first seen.
    /// An (id, sequence) pair occurring more than once is recorded exactly
    /// once, under the material of the row that first revealed the
    /// duplication; its count tracks the total number of occurrences.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcatotals::{Report, Row};
    ///
    /// let mut report = Report::new();
    /// report.add(Row {
    ///     id: "a1".into(),
    ///     sequence: "1".into(),
    ///     mat_kbob: "concrete".into(),
    ///     gwp_relative: 2.0,
    ///     ..Default::default()
    /// });
    /// assert_eq!(report.rows(), 1);
    /// ```
    pub fn add(&mut self, row: Row) {
        self.rows += 1;
        self.grand += &row;
        *self.materials.entry(row.mat_kbob.clone()).or_default() += &row;

        let key = (row.id.clone(), row.sequence.clone());
        let seen = self.occurrences.entry(key.clone()).or_insert(0);
        *seen += 1;
        if *seen > 1 {
            let count = *seen;
            self.duplicates
                .entry(key)
                .or_insert_with(|| Duplicate {
                    id: row.id,
                    sequence: row.sequence,
                    mat_kbob: row.mat_kbob,
                    count,
                })
                .count = count;
        }
    }

    /// Returns how many rows have been added.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GRAND TOTALS ===")?;
        for (name, value) in self.grand.metrics() {
            writeln!(f, "{name:15}: {}", Grouped(value))?;
        }
        writeln!(f, "\n=== BREAKDOWN BY MATERIAL (mat_kbob) ===")?;
        for (material, totals) in &self.materials {
            writeln!(f, "\n{material}")?;
            for (name, value) in totals.metrics() {
                writeln!(f, "  {name:13}: {}", Grouped(value))?;
            }
        }
        if self.duplicates.is_empty() {
            writeln!(f, "\n=== DUPLICATE CHECK ===")?;
            writeln!(f, "No duplicate id/sequence combinations found.")?;
        } else {
            writeln!(f, "\n=== DUPLICATE ID/SEQUENCE COMBINATIONS ===")?;
            for duplicate in self.duplicates.values() {
                writeln!(f, "{duplicate}")?;
            }
            writeln!(
                f,
                "\nTotal duplicate combinations found: {}",
                self.duplicates.len()
            )?;
        }
        Ok(())
    }
}

/// A repeated (id, sequence) pair: the material it was detected under, and
/// how many times the pair occurred in total.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Duplicate {
    pub id: String,
    pub sequence: String,
    pub mat_kbob: String,
    pub count: usize,
}

impl Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Sequence: {}, Material: {}, Count: {}",
            self.id, self.sequence, self.mat_kbob, self.count
        )
    }
}

/// Formats an indicator value the way the report prints it: six decimal
/// places, thousands separators in the integer part.
struct Grouped(f64);

impl Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format!("{:.6}", self.0);
        // Non-finite values have no decimal point; print them as they are.
        let Some((whole, fraction)) = plain.split_once('.') else {
            return f.write_str(&plain);
        };
        let (sign, digits) = match whole.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("", whole),
        };
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.char_indices() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        write!(f, "{sign}{grouped}.{fraction}")
    }
}
