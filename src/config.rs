// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Command-line configuration for the `skipdb` binary.
//!
//! ```text
//! skipdb <command-file> [--seed <u64>] [--bits <1,0,...>]
//! ```
//!
//! `--seed` makes node levels reproducible across runs. `--bits` replays an
//! exact coin-flip script. Without either, levels come from OS entropy.

use std::path::PathBuf;

use thiserror::Error;

use crate::list::BitSource;
use crate::list::RandomBits;
use crate::list::ScriptedBits;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid file. No filename in command line arguments")]
    MissingFile,
    #[error("Invalid file")]
    EmptyFile,
    #[error("{0} needs a value")]
    MissingValue(&'static str),
    #[error("invalid seed {0:?}")]
    BadSeed(String),
    #[error("invalid bit {0:?}: expected 1, 0, true or false")]
    BadBit(String),
    #[error("--seed and --bits are mutually exclusive")]
    ConflictingBits,
    #[error("unexpected argument {0:?}")]
    Unexpected(String),
}

/// Where node levels come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BitsConfig {
    #[default]
    Entropy,
    Seed(u64),
    Script(Vec<bool>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The command file to run.
    pub input: PathBuf,
    pub bits: BitsConfig,
}

fn parse_bit(token: &str) -> Result<bool, ConfigError> {
    return match token.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ConfigError::BadBit(other.to_string())),
    };
}

impl Config {
    /// Parse arguments, not including the program name.
    pub fn from_args<I, S>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut input = None;
        let mut bits = BitsConfig::Entropy;
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--seed"))?;
                    if bits != BitsConfig::Entropy {
                        return Err(ConfigError::ConflictingBits);
                    }
                    let seed = value.parse().map_err(|_| ConfigError::BadSeed(value.clone()))?;
                    bits = BitsConfig::Seed(seed);
                }
                "--bits" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--bits"))?;
                    if bits != BitsConfig::Entropy {
                        return Err(ConfigError::ConflictingBits);
                    }
                    let script = value
                        .split(',')
                        .filter(|token| !token.trim().is_empty())
                        .map(parse_bit)
                        .collect::<Result<Vec<bool>, ConfigError>>()?;
                    bits = BitsConfig::Script(script);
                }
                flag if flag.starts_with("--") => return Err(ConfigError::Unexpected(arg)),
                _ if input.is_none() => input = Some(arg),
                _ => return Err(ConfigError::Unexpected(arg)),
            }
        }

        let input = input.ok_or(ConfigError::MissingFile)?;
        if input.trim().is_empty() {
            return Err(ConfigError::EmptyFile);
        }
        return Ok(Config {
            input: PathBuf::from(input),
            bits,
        });
    }

    /// Build the configured level source.
    pub fn bit_source(&self) -> Box<dyn BitSource> {
        return match &self.bits {
            BitsConfig::Entropy => Box::new(RandomBits::from_entropy()),
            BitsConfig::Seed(seed) => Box::new(RandomBits::seeded(*seed)),
            BitsConfig::Script(script) => Box::new(ScriptedBits::new(script.iter().copied())),
        };
    }
}
