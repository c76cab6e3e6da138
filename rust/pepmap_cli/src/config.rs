use pepmap::LayoutConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::RunArgs;
use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub layout: LayoutSettings,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct InputConfig {
    pub reference_fasta: Option<PathBuf>,
    pub peptide_table: Option<PathBuf>,
    /// Fail on unusable peptide rows instead of skipping them.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub line_width: usize,
    pub vertical_increment: f64,
    pub text_left_offset: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            line_width: 80,
            vertical_increment: 20.0,
            text_left_offset: 3,
        }
    }
}

impl LayoutSettings {
    pub fn layout_config(&self) -> Result<LayoutConfig, CliError> {
        Ok(LayoutConfig::new(self.line_width, self.vertical_increment)?)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Reads the config file (if any) and applies the command line overrides.
    pub fn from_args(args: &RunArgs) -> Result<Self, CliError> {
        let mut config = match &args.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &RunArgs) {
        if let Some(fasta) = &args.reference_fasta {
            self.input.reference_fasta = Some(fasta.clone());
        }
        if let Some(table) = &args.peptide_table {
            self.input.peptide_table = Some(table.clone());
        }
        if args.strict {
            self.input.strict = true;
        }
        if let Some(width) = args.line_width {
            self.layout.line_width = width;
        }
        if let Some(increment) = args.vertical_increment {
            self.layout.vertical_increment = increment;
        }
        if let Some(offset) = args.text_left_offset {
            self.layout.text_left_offset = offset;
        }
        if let Some(dir) = &args.output_dir {
            let pretty = self.output.as_ref().is_some_and(|o| o.pretty);
            self.output = Some(OutputConfig {
                directory: dir.clone(),
                pretty,
            });
        }
        if args.pretty {
            if let Some(output) = self.output.as_mut() {
                output.pretty = true;
            }
        }
    }

    fn validate(&self) -> Result<(), CliError> {
        self.inputs()?;
        self.output_config()?;
        self.layout.layout_config()?;
        Ok(())
    }

    pub fn inputs(&self) -> Result<(&Path, &Path), CliError> {
        let fasta = self.input.reference_fasta.as_deref().ok_or_else(|| {
            CliError::Config(
                "No reference FASTA provided, set input.reference_fasta or pass --reference-fasta"
                    .to_string(),
            )
        })?;
        let table = self.input.peptide_table.as_deref().ok_or_else(|| {
            CliError::Config(
                "No peptide table provided, set input.peptide_table or pass --peptide-table"
                    .to_string(),
            )
        })?;
        Ok((fasta, table))
    }

    pub fn output_config(&self) -> Result<&OutputConfig, CliError> {
        self.output.as_ref().ok_or_else(|| {
            CliError::Config(
                "No output directory provided, set output.directory or pass --output-dir"
                    .to_string(),
            )
        })
    }

    /// What `write-template` writes out.
    pub fn template() -> Self {
        Self {
            input: InputConfig {
                reference_fasta: Some(PathBuf::from("reference.fasta")),
                peptide_table: Some(PathBuf::from("peptides.csv")),
                strict: false,
            },
            layout: LayoutSettings::default(),
            output: Some(OutputConfig {
                directory: PathBuf::from("pepmap_reports"),
                pretty: false,
            }),
        }
    }
}
