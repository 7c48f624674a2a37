// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Text commands, one per line, and the processor that runs them against a
//! [`Database`] and writes a report line (or several) per command.
//!
//! ```text
//! insert <name> <x> <y> <w> <h>
//! remove <name>
//! remove <x> <y> <w> <h>
//! regionsearch <x> <y> <w> <h>
//! intersections
//! search <name>
//! dump
//! ```

use std::io;
use std::io::BufRead;
use std::io::Write;

use log::warn;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::db::Database;
use crate::list::BitSource;
use crate::list::RandomBits;
use crate::rect::Rectangle;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { name: String, rect: Rectangle },
    Remove { name: String },
    RemoveRect(Rectangle),
    RegionSearch(Rectangle),
    Intersections,
    Search { name: String },
    Dump,
}

/// Why a line did not parse. `Display` is the line reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Too few arguments, or coordinates that are not integers. Ends in a space.
    #[error("Rectangle rejected: ")]
    MalformedInsert,
    #[error("Invalid name format: {0}")]
    InvalidName(String),
    /// `search` with other than exactly one argument. Holds the rest of the line.
    #[error("unrecognized command search{0}")]
    MalformedSearch(String),
    /// Wrong arity or non-numeric arguments for a command that reports nothing.
    #[error("malformed {0} command")]
    Ignored(&'static str),
    #[error("Unrecognized command.")]
    Unrecognized,
}

impl ParseError {
    /// Errors that are logged but not reported.
    pub fn is_silent(&self) -> bool {
        return matches!(self, ParseError::Ignored(_));
    }
}

/// Names start with a letter and continue with letters, digits or underscores.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    return match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
}

fn parse_rect(args: &[&str]) -> Option<Rectangle> {
    let mut nums = [0i32; 4];
    for (num, arg) in nums.iter_mut().zip(args) {
        *num = arg.parse().ok()?;
    }
    return Some(Rectangle::new(nums[0], nums[1], nums[2], nums[3]));
}

impl Command {
    /// Parse one line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match keyword {
            "insert" => {
                if args.len() < 5 {
                    return Err(ParseError::MalformedInsert);
                }
                if !is_valid_name(args[0]) {
                    return Err(ParseError::InvalidName(args[0].to_string()));
                }
                // Arguments past the fifth are ignored.
                let rect = parse_rect(&args[1..5]).ok_or(ParseError::MalformedInsert)?;
                Command::Insert {
                    name: args[0].to_string(),
                    rect,
                }
            }
            "remove" => match args.len() {
                1 => Command::Remove {
                    name: args[0].to_string(),
                },
                4 => Command::RemoveRect(parse_rect(args).ok_or(ParseError::Ignored("remove"))?),
                _ => return Err(ParseError::Ignored("remove")),
            },
            "regionsearch" => {
                if args.len() != 4 {
                    return Err(ParseError::Ignored("regionsearch"));
                }
                Command::RegionSearch(parse_rect(args).ok_or(ParseError::Ignored("regionsearch"))?)
            }
            "intersections" => Command::Intersections,
            "search" => {
                if args.len() != 1 {
                    return Err(ParseError::MalformedSearch(line["search".len()..].to_string()));
                }
                Command::Search {
                    name: args[0].to_string(),
                }
            }
            "dump" => Command::Dump,
            _ => return Err(ParseError::Unrecognized),
        };
        return Ok(Some(command));
    }
}

/// Runs commands against a database and reports to `out`.
pub struct Processor<W, B = RandomBits<StdRng>> {
    db: Database<B>,
    out: W,
}

impl<W: Write, B: BitSource> Processor<W, B> {
    pub fn new(db: Database<B>, out: W) -> Processor<W, B> {
        return Processor { db, out };
    }

    pub fn database(&self) -> &Database<B> {
        return &self.db;
    }

    pub fn output(&self) -> &W {
        return &self.out;
    }

    pub fn into_output(self) -> W {
        return self.out;
    }

    /// Run every line of `input`, then flush.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            self.process_line(&line?)?;
        }
        return self.out.flush();
    }

    /// Parse and run one line. Parse errors are reported, not returned: only
    /// I/O failures on `out` come back as `Err`.
    pub fn process_line(&mut self, line: &str) -> io::Result<()> {
        return match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(()),
            Err(err) if err.is_silent() => {
                warn!("ignoring {:?}: {}", line, err);
                Ok(())
            }
            Err(err) => {
                warn!("rejecting {:?}: {:?}", line, err);
                writeln!(self.out, "{}", err)
            }
        };
    }

    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        let out = &mut self.out;
        match command {
            Command::Insert { name, rect } => match self.db.insert(&name, rect) {
                Ok(()) => writeln!(out, "Rectangle inserted: ({}, {})", name, rect),
                Err(err) => writeln!(out, "{}", err),
            },
            Command::Remove { name } => match self.db.remove(&name) {
                Some(entry) => writeln!(out, "Rectangle removed: ({})", entry),
                None => writeln!(out, "Rectangle not removed: {}", name),
            },
            Command::RemoveRect(rect) => match self.db.remove_rect(&rect) {
                Some(entry) => writeln!(out, "Rectangle removed: ({})", entry),
                None => writeln!(out, "Rectangle rejected: {}", rect),
            },
            Command::RegionSearch(region) => match self.db.region_search(region) {
                Ok(hits) => {
                    writeln!(out, "Rectangles intersecting region ({}):", region)?;
                    for entry in hits {
                        writeln!(out, "{} {}", entry.key, entry.value)?;
                    }
                    Ok(())
                }
                Err(err) => writeln!(out, "{}", err),
            },
            Command::Intersections => {
                writeln!(out, "Intersection pairs:")?;
                for (a, b) in self.db.intersections() {
                    writeln!(out, "({}) | ({})", a, b)?;
                }
                Ok(())
            }
            Command::Search { name } => {
                let found = self.db.search(&name);
                if found.is_empty() {
                    return writeln!(out, "Rectangle not found: ({})", name);
                }
                writeln!(out, "Rectangles found:")?;
                for entry in found {
                    writeln!(out, "{} {}", entry.key, entry.value)?;
                }
                Ok(())
            }
            Command::Dump => write!(out, "{}", self.db.dump()),
        }
    }
}
