//! Reduction of a CalculiX `.dat` report to the three governing scalars
//!
//! The report is scanned once, line by line. Three kinds of block are
//! recognised:
//!
//! ```text
//!      B U C K L I N G   F A C T O R   O U T P U T
//!
//!  MODE NO       BUCKLING
//!                 FACTOR
//!
//!       1   0.2680174E+03
//!       2   0.3149906E+03
//!
//!  stresses (elem, integ.pnt.,sxx,syy,szz,sxy,sxz,syz) for set BASE and time  0.0000000E+00
//!
//!         33   1 -9.995126E-01 -1.893993E-03 -1.058313E-03 -5.286196E-02  3.408146E-04 -3.354961E-03
//!
//!  displacements (vx,vy,vz) for set NALL and time  0.0000000E+00
//!
//!          1 -2.883217E-04  8.952994E-04  0.000000E+00
//! ```
//!
//! Every block ends at the first blank line. Any data line with an
//! unexpected shape aborts the parse: the report comes from the solver, so
//! a deviation means a format mismatch rather than noise to skip over.

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ReportError;
use crate::models::Report;

pub const BUCKLING_BANNER: &str = "B U C K L I N G   F A C T O R   O U T P U T";
pub const DISPLACEMENT_HEADER: &str = "displacements (vx,vy,vz) for set";

/// Lines between the buckling banner and the first mode line
const BUCKLING_HEADER_LINES: usize = 4;
/// Lines between a stress/displacement header and its first record
const RECORD_HEADER_LINES: usize = 1;

fn stress_header() -> &'static Regex {
    static STRESS_HEADER: OnceLock<Regex> = OnceLock::new();
    STRESS_HEADER.get_or_init(|| {
        Regex::new(r"stresses \(elem, integ\.pnt\.,sxx,syy,szz,sxy,sxz,syz\) for set\s+(\S+)")
            .expect("stress header pattern is valid")
    })
}

/// Which displacement blocks contribute to the peak displacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplacementBlocks {
    /// Every block in the report, e.g. one per buckling mode
    #[default]
    MergeAll,
    /// Only the first block
    FirstOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Buckling,
    Stress,
    Displacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Scanning,
    Header { block: Block, remaining: usize },
    Records(Block),
}

#[derive(Debug, Default)]
struct Accumulator {
    buckling: Option<f64>,
    max_stress: f64,
    max_displacement: f64,
    reference_set: Option<String>,
    stresses_done: bool,
    displacement_blocks: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser {
    displacement_blocks: DisplacementBlocks,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_displacement_blocks(mut self, policy: DisplacementBlocks) -> Self {
        self.displacement_blocks = policy;
        self
    }

    pub fn parse(&self, content: &str) -> Result<Report, ReportError> {
        let mut acc = Accumulator::default();
        let mut state = ParseState::Scanning;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            state = match state {
                ParseState::Header { block, remaining } => Self::skip(block, remaining),
                ParseState::Records(_) if line.is_empty() => ParseState::Scanning,
                ParseState::Records(block) => {
                    self.record(&mut acc, block, line, line_no)?;
                    ParseState::Records(block)
                }
                ParseState::Scanning => self.scan(&mut acc, line),
            };
        }

        let buckling_factor = acc.buckling.ok_or(ReportError::MissingBucklingFactor)?;
        tracing::info!(
            "Parsed report: buckling factor {:.4}, max stress {:.4}, max displacement {:.6}",
            buckling_factor,
            acc.max_stress,
            acc.max_displacement
        );
        Ok(Report {
            buckling_factor,
            max_stress: acc.max_stress,
            max_displacement: acc.max_displacement,
        })
    }

    fn skip(block: Block, remaining: usize) -> ParseState {
        if remaining > 1 {
            ParseState::Header {
                block,
                remaining: remaining - 1,
            }
        } else {
            ParseState::Records(block)
        }
    }

    fn enter(block: Block, header_lines: usize) -> ParseState {
        if header_lines == 0 {
            ParseState::Records(block)
        } else {
            ParseState::Header {
                block,
                remaining: header_lines,
            }
        }
    }

    fn scan(&self, acc: &mut Accumulator, line: &str) -> ParseState {
        if line.contains(BUCKLING_BANNER) {
            tracing::debug!("Found buckling factor block");
            return Self::enter(Block::Buckling, BUCKLING_HEADER_LINES);
        }

        if let Some(captures) = stress_header().captures(line) {
            if acc.stresses_done {
                return ParseState::Scanning;
            }
            let set = &captures[1];
            if acc.reference_set.as_deref() == Some(set) {
                // The reference set repeats for the next mode; its records
                // would be counted twice
                tracing::debug!("Stress set {} repeated, ignoring remaining stresses", set);
                acc.stresses_done = true;
                return ParseState::Scanning;
            }
            if acc.reference_set.is_none() {
                acc.reference_set = Some(set.to_string());
            }
            tracing::debug!("Found stress block for set {}", set);
            return Self::enter(Block::Stress, RECORD_HEADER_LINES);
        }

        if line.contains(DISPLACEMENT_HEADER) {
            if self.displacement_blocks == DisplacementBlocks::FirstOnly && acc.displacement_blocks > 0 {
                return ParseState::Scanning;
            }
            acc.displacement_blocks += 1;
            tracing::debug!("Found displacement block #{}", acc.displacement_blocks);
            return Self::enter(Block::Displacement, RECORD_HEADER_LINES);
        }

        ParseState::Scanning
    }

    fn record(&self, acc: &mut Accumulator, block: Block, line: &str, line_no: usize) -> Result<(), ReportError> {
        match block {
            Block::Buckling => {
                let fields = fields(line, line_no, 2)?;
                let factor = number::<f64>(fields[1], line_no)?.abs();
                acc.buckling = Some(acc.buckling.map_or(factor, |b| b.min(factor)));
            }
            Block::Stress => {
                let fields = fields(line, line_no, 8)?;
                number::<u64>(fields[0], line_no)?;
                number::<u64>(fields[1], line_no)?;
                let norm = norm(&fields[2..], line_no)?;
                acc.max_stress = acc.max_stress.max(norm);
            }
            Block::Displacement => {
                let fields = fields(line, line_no, 4)?;
                number::<u64>(fields[0], line_no)?;
                let norm = norm(&fields[1..], line_no)?;
                acc.max_displacement = acc.max_displacement.max(norm);
            }
        }
        Ok(())
    }
}

/// Parse a report with the default block policy.
pub fn parse_report(content: &str) -> Result<Report, ReportError> {
    ReportParser::new().parse(content)
}

fn fields<'a>(line: &'a str, line_no: usize, expected: usize) -> Result<Vec<&'a str>, ReportError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(ReportError::FieldCount {
            line: line_no,
            expected,
            found: fields.len(),
            text: line.to_string(),
        });
    }
    Ok(fields)
}

fn number<T: FromStr>(token: &str, line_no: usize) -> Result<T, ReportError> {
    token.parse().map_err(|_| ReportError::BadNumber {
        line: line_no,
        token: token.to_string(),
    })
}

fn norm(tokens: &[&str], line_no: usize) -> Result<f64, ReportError> {
    let mut sum = 0.0;
    for token in tokens {
        let value: f64 = number(token, line_no)?;
        sum += value * value;
    }
    Ok(sum.sqrt())
}
