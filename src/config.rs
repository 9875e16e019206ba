use crate::error::{FfResult, FittsForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: CostParams,
    #[command(flatten)]
    pub telemetry: TelemetryParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 0.1)]
    pub temp_initial: f64,
    #[arg(long, default_value_t = 1e-4)]
    pub temp_final: f64,
    #[arg(long, default_value_t = 0.999)]
    pub cooling_rate: f64,
    #[arg(long, default_value_t = 1000)]
    pub iterations_per_temp: usize,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            temp_initial: 0.1,
            temp_final: 1e-4,
            cooling_rate: 0.999,
            iterations_per_temp: 1000,
            seed: None,
        }
    }
}

/// Constants of the movement-time and reach models.
#[derive(Args, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParams {
    #[arg(long, default_value_t = 1.0)]
    pub key_width: f64,
    #[arg(long, default_value_t = 0.0)]
    pub intercept_a: f64,
    #[arg(long, default_value_t = 1.0)]
    pub slope_b: f64,
    #[arg(long, default_value_t = 1.0)]
    pub digraph_weight: f64,
    #[arg(long, default_value_t = 0.1)]
    pub letter_weight: f64,
    // Plain bool flags cannot be switched off from the CLI.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub normalize_inputs: bool,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            key_width: 1.0,
            intercept_a: 0.0,
            slope_b: 1.0,
            digraph_weight: 1.0,
            letter_weight: 0.1,
            normalize_inputs: true,
        }
    }
}

impl CostParams {
    pub fn validate(&self) -> FfResult<()> {
        if !(self.key_width.is_finite() && self.key_width > 0.0) {
            return Err(FittsForgeError::InvalidParameter(format!(
                "key_width must be positive, got {}",
                self.key_width
            )));
        }
        let constants = [
            ("intercept_a", self.intercept_a),
            ("slope_b", self.slope_b),
            ("digraph_weight", self.digraph_weight),
            ("letter_weight", self.letter_weight),
        ];
        for (name, value) in constants {
            if !value.is_finite() {
                return Err(FittsForgeError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryParams {
    #[arg(long, default_value_t = 1000)]
    pub log_every: usize,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub log_components: bool,
}

impl Default for TelemetryParams {
    fn default() -> Self {
        Self {
            log_every: 1000,
            log_components: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields with values the user typed on the command line.
    /// Clap defaults never override file values.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.temp_initial);
        update_if_present!(search.temp_final);
        update_if_present!(search.cooling_rate);
        update_if_present!(search.iterations_per_temp);
        update_if_present!(search.seed);

        update_if_present!(weights.key_width);
        update_if_present!(weights.intercept_a);
        update_if_present!(weights.slope_b);
        update_if_present!(weights.digraph_weight);
        update_if_present!(weights.letter_weight);
        update_if_present!(weights.normalize_inputs);

        update_if_present!(telemetry.log_every);
        update_if_present!(telemetry.log_components);
    }
}
