//! The ASCII momentum-tuple codec.
//!
//! Every event is an optional weight line (one number) followed by one line of four numbers per
//! particle. Events carry no delimiter of their own, so the particle count fixes where one ends
//! and the next begins.

use super::*;
use crate::utils::{canonicalize_path, expand_path};
use log::info;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

/// Load a table from an ASCII momentum-tuple file.
///
/// `~` and environment variables in the path are expanded.
///
/// # Errors
///
/// Fails on the first structural problem in the file (see [`read_ascii_from`]) or if the file
/// cannot be opened.
pub fn read_ascii<P: AsRef<Path>>(
    file_path: P,
    options: &AsciiReadOptions,
) -> PawianResult<DataFrame> {
    let path = canonicalize_path(file_path.as_ref())?;
    let file = File::open(&path)?;
    let df = read_ascii_from(BufReader::new(file), options)?;
    info!("Read {} events from {}", df.height(), path.display());
    Ok(df)
}

/// Load a table from any buffered reader containing ASCII momentum tuples.
///
/// The result has an optional leading `weight` column followed by `<particle>_e`,
/// `<particle>_px`, `<particle>_py` and `<particle>_pz` for every particle, with one row per
/// event in file order.
///
/// # Errors
///
/// * [`PawianError::MalformedRecord`] if a line has the wrong number of values,
/// * [`PawianError::MalformedNumber`] if a value is not a number,
/// * [`PawianError::SchemaMismatch`] if a weighted event holds a different number of particles
///   than requested,
/// * [`PawianError::TruncatedFile`] if the input ends in the middle of an event,
/// * [`PawianError::UnknownParticleCount`] if neither names nor a count were given and the input
///   is unweighted.
pub fn read_ascii_from<R: BufRead>(
    mut reader: R,
    options: &AsciiReadOptions,
) -> PawianResult<DataFrame> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let lines = tokenize(&content);

    let weighted = detect_weights(&lines, options.weighted)?;
    let inferred = if weighted && !options.has_particle_count() {
        let n = infer_particle_count(&lines);
        debug!("inferred {n} particle(s) per event from weight lines");
        Some(n)
    } else {
        None
    };
    let particles = options.resolve_particles(inferred)?;
    debug!(
        "reading {} lines as {} events of {} particle(s) ({})",
        lines.len(),
        if weighted { "weighted" } else { "unweighted" },
        particles.len(),
        options.component_order
    );

    let columns = EventParser::new(&lines, particles.len(), weighted, options.component_order)
        .parse()?;
    columns.into_frame(&particles)
}

/// A non-blank line split into tokens, with its 1-based line number.
struct Line<'a> {
    number: usize,
    tokens: Vec<&'a str>,
}

impl Line<'_> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn is_weight(&self) -> bool {
        self.tokens.len() == 1
    }

    fn is_record(&self) -> bool {
        self.tokens.len() == 4
    }

    fn value(&self, index: usize) -> PawianResult<f64> {
        let token = self.tokens[index];
        token.parse().map_err(|_| PawianError::MalformedNumber {
            line: self.number,
            token: token.to_string(),
        })
    }
}

fn tokenize(content: &str) -> Vec<Line<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| Line {
            number: index + 1,
            tokens: line.split_whitespace().collect(),
        })
        .filter(|line| !line.tokens.is_empty())
        .collect()
}

fn detect_weights(lines: &[Line], forced: Option<bool>) -> PawianResult<bool> {
    let Some(first) = lines.first() else {
        return Ok(forced.unwrap_or(false));
    };
    match forced {
        Some(true) if !first.is_weight() => Err(PawianError::MalformedRecord {
            line: first.number,
            expected: 1,
            found: first.len(),
        }),
        Some(false) if !first.is_record() => Err(PawianError::MalformedRecord {
            line: first.number,
            expected: 4,
            found: first.len(),
        }),
        Some(weighted) => Ok(weighted),
        None if first.is_weight() => {
            debug!("line {} holds a single value, reading weights", first.number);
            Ok(true)
        }
        None if first.is_record() => Ok(false),
        None => Err(PawianError::MalformedRecord {
            line: first.number,
            expected: 4,
            found: first.len(),
        }),
    }
}

/// Number of lines between the first weight line and the next one (or the end of the input).
fn infer_particle_count(lines: &[Line]) -> usize {
    lines
        .split_first()
        .map_or(0, |(_, rest)| records_until_weight(rest))
}

fn records_until_weight(lines: &[Line]) -> usize {
    lines.iter().take_while(|line| !line.is_weight()).count()
}

/// Column buffers filled event by event.
struct EventColumns {
    weights: Option<Vec<f64>>,
    /// One `[E, px, py, pz]` set of columns per particle.
    particles: Vec<[Vec<f64>; 4]>,
}

impl EventColumns {
    fn new(n_particles: usize, weighted: bool, capacity: usize) -> Self {
        Self {
            weights: weighted.then(|| Vec::with_capacity(capacity)),
            particles: (0..n_particles)
                .map(|_| std::array::from_fn(|_| Vec::with_capacity(capacity)))
                .collect(),
        }
    }

    fn into_frame(self, particles: &[String]) -> PawianResult<DataFrame> {
        let mut columns = Vec::with_capacity(4 * particles.len() + 1);
        if let Some(weights) = self.weights {
            columns.push(Column::new(WEIGHT_COLUMN.into(), weights));
        }
        for (name, values) in particles.iter().zip(self.particles) {
            for (component, values) in Component::ALL.iter().zip(values) {
                columns.push(Column::new(component.column_name(name).into(), values));
            }
        }
        Ok(DataFrame::new(columns)?)
    }
}

struct EventParser<'a, 'b> {
    lines: &'b [Line<'a>],
    cursor: usize,
    n_particles: usize,
    weighted: bool,
    /// Position of each [`Component::ALL`] entry on a record line.
    positions: [usize; 4],
}

impl<'a, 'b> EventParser<'a, 'b> {
    fn new(
        lines: &'b [Line<'a>],
        n_particles: usize,
        weighted: bool,
        order: ComponentOrder,
    ) -> Self {
        let on_line = order.components();
        let positions = Component::ALL.map(|component| {
            on_line
                .iter()
                .position(|c| *c == component)
                .unwrap_or_default()
        });
        Self {
            lines,
            cursor: 0,
            n_particles,
            weighted,
            positions,
        }
    }

    fn lines_per_event(&self) -> usize {
        self.n_particles + usize::from(self.weighted)
    }

    fn parse(mut self) -> PawianResult<EventColumns> {
        let mut columns = EventColumns::new(
            self.n_particles,
            self.weighted,
            self.lines.len() / self.lines_per_event(),
        );
        while self.cursor < self.lines.len() {
            let event_start = self.cursor;
            if let Some(weights) = columns.weights.as_mut() {
                weights.push(self.parse_weight()?);
            }
            for particle in columns.particles.iter_mut() {
                let values = self.parse_record(event_start)?;
                for (column, value) in particle.iter_mut().zip(values) {
                    column.push(value);
                }
            }
        }
        Ok(columns)
    }

    fn parse_weight(&mut self) -> PawianResult<f64> {
        let line = &self.lines[self.cursor];
        if line.is_record() {
            // the previous event continues past the requested number of particles
            let first_record = self.cursor.saturating_sub(self.n_particles);
            return Err(PawianError::SchemaMismatch {
                line: line.number,
                expected: self.n_particles,
                found: records_until_weight(&self.lines[first_record..]),
            });
        }
        if !line.is_weight() {
            return Err(PawianError::MalformedRecord {
                line: line.number,
                expected: 4,
                found: line.len(),
            });
        }
        self.cursor += 1;
        line.value(0)
    }

    fn parse_record(&mut self, event_start: usize) -> PawianResult<[f64; 4]> {
        let Some(line) = self.lines.get(self.cursor) else {
            return Err(PawianError::TruncatedFile {
                line: self.lines[self.lines.len() - 1].number,
                expected: self.lines_per_event(),
                found: self.lines.len() - event_start,
            });
        };
        if self.weighted && line.is_weight() {
            return Err(PawianError::SchemaMismatch {
                line: line.number,
                expected: self.n_particles,
                found: records_until_weight(&self.lines[event_start + 1..]),
            });
        }
        if !line.is_record() {
            return Err(PawianError::MalformedRecord {
                line: line.number,
                expected: 4,
                found: line.len(),
            });
        }
        let mut values = [0.0; 4];
        for (value, position) in values.iter_mut().zip(self.positions) {
            *value = line.value(position)?;
        }
        self.cursor += 1;
        Ok(values)
    }
}

/// Write a table to an ASCII momentum-tuple file, replacing any existing file.
///
/// `~` and environment variables in the path are expanded. The table is checked before the file
/// is opened, so an invalid table leaves an existing file untouched.
pub fn write_ascii<P: AsRef<Path>>(
    df: &DataFrame,
    file_path: P,
    options: &AsciiWriteOptions,
) -> PawianResult<()> {
    let path = expand_path(file_path.as_ref())?;
    let rows = EventRows::collect(df, options)?;
    let mut writer = BufWriter::new(File::create(&path)?);
    rows.write(&mut writer, options)?;
    writer.flush()?;
    info!("Wrote {} events to {}", rows.n_events, path.display());
    Ok(())
}

/// Write a table in the ASCII momentum-tuple format to any writer.
///
/// The table must satisfy [`PwaAccessor::new`]. For every row the weight (if any) is written on
/// its own line, followed by one line per particle in column order.
///
/// # Errors
///
/// Fails with [`PawianError::MissingValue`] if a required cell is null. Nothing is written in
/// that case.
pub fn write_ascii_to<W: Write>(
    df: &DataFrame,
    writer: W,
    options: &AsciiWriteOptions,
) -> PawianResult<()> {
    EventRows::collect(df, options)?.write(writer, options)
}

/// The columns of a validated table, in the order they are written.
struct EventRows {
    n_events: usize,
    weights: Option<Vec<f64>>,
    /// One set of columns per particle, in line order.
    particles: Vec<Vec<Vec<f64>>>,
}

impl EventRows {
    fn collect(df: &DataFrame, options: &AsciiWriteOptions) -> PawianResult<Self> {
        let pwa = PwaAccessor::new(df)?;
        let weights = if pwa.has_weight_column() {
            Some(float_column(df, WEIGHT_COLUMN)?)
        } else {
            None
        };
        let particles = pwa
            .particle_names()
            .iter()
            .map(|particle| {
                options
                    .component_order
                    .components()
                    .map(|component| float_column(df, &component.column_name(particle)))
                    .into_iter()
                    .collect::<PawianResult<Vec<_>>>()
            })
            .collect::<PawianResult<Vec<_>>>()?;
        Ok(Self {
            n_events: df.height(),
            weights,
            particles,
        })
    }

    fn write<W: Write>(&self, mut writer: W, options: &AsciiWriteOptions) -> PawianResult<()> {
        let precision = options.precision;
        let width = options.width;
        for row in 0..self.n_events {
            if let Some(weights) = &self.weights {
                writeln!(writer, "{}", precision.format(weights[row]))?;
            }
            for columns in &self.particles {
                let line = columns
                    .iter()
                    .map(|values| format!("{:>width$}", precision.format(values[row])))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(writer, "{line}")?;
            }
        }
        debug!(
            "wrote {} rows of {} particle(s) ({})",
            self.n_events,
            self.particles.len(),
            options.component_order
        );
        Ok(())
    }
}

fn float_column(df: &DataFrame, name: &str) -> PawianResult<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    column
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| PawianError::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}
