use clap::Parser;

use crate::ciphertext::K4;

/// Exploratory structure search over the unsolved Kryptos K4 passage:
/// splits the ciphertext on every candidate separator and looks for segment
/// groupings with identical letter-frequency shapes.
#[derive(Parser, Debug, Clone)]
#[command(name = "k4sieve")]
#[command(version = "0.1.0")]
#[command(about = "Letter-frequency shape search over K4 segment groupings", long_about = None)]
pub struct Args {
    /// Simulation mode: analyze an endless stream of random pseudo-K4s
    #[arg(long = "sim")]
    pub sim: bool,

    /// Custom analysis of an arbitrary ciphertext (upper-cased before use)
    #[arg(long = "ciphertext", default_value = "")]
    pub ciphertext: String,

    /// Number of workers to process the analysis in parallel
    #[arg(long = "workers", default_value = "20")]
    pub workers: usize,
}

impl Args {
    /// Validate the arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }

        if !self.ciphertext.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err("ciphertext must contain ASCII letters only".to_string());
        }

        Ok(())
    }

    /// The ciphertext to analyze: the override if one was given, K4
    /// otherwise. Simulation mode replaces this with a random string each
    /// cycle.
    pub fn resolved_ciphertext(&self) -> String {
        if self.ciphertext.is_empty() {
            K4.to_string()
        } else {
            self.ciphertext.to_ascii_uppercase()
        }
    }
}
