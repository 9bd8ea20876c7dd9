use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "station-cleaner")]
#[command(about = "Cleans daily weather-station spreadsheets into an analysis-ready table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a station table and write the cleaned artifacts
    Clean {
        #[arg(short, long, help = "Input spreadsheet (xlsx, xls, ods) or delimited text file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output directory [default: the input file's directory]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Cleaning configuration file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,

        #[arg(long, help = "Worksheet name [default: first sheet]")]
        sheet: Option<String>,

        #[arg(long, help = "Field delimiter for delimited text input")]
        delimiter: Option<char>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Clean and check the result without writing anything
    Validate {
        #[arg(short, long, help = "Input spreadsheet or delimited text file")]
        input: PathBuf,

        #[arg(long, help = "Cleaning configuration file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,

        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Clean and print the executive summary
    Summary {
        #[arg(short, long, help = "Input spreadsheet or delimited text file")]
        input: PathBuf,

        #[arg(long, help = "Cleaning configuration file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,

        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Display information about a cleaned Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
