use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use transcribe_runner::job::{Device, Task};
use transcribe_runner::present::ViewKind;

#[derive(Parser, Debug)]
#[command(
    name = "transcribe-runner",
    version,
    about = "Transcribe a URL or local media file and collect the transcript artifacts"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe one URL or local file
    Run(RunArgs),

    /// List the models, languages and tasks the backend understands
    Options,

    /// Write a commented default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// URL to transcribe (e.g. a YouTube link)
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,

    /// Local audio or video file to transcribe
    #[arg(long, conflicts_with = "input")]
    pub file: Option<String>,

    /// URL or local file path in a single field
    #[arg(short, long)]
    pub input: Option<String>,

    /// Model name or HuggingFace repo id
    #[arg(short, long)]
    pub model: Option<String>,

    /// Language code; "auto" lets the backend detect it
    #[arg(short, long)]
    pub language: Option<String>,

    #[arg(long, value_enum)]
    pub device: Option<Device>,

    #[arg(long, value_enum)]
    pub task: Option<Task>,

    /// Base output directory (its contents are replaced)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// HuggingFace token for private models. Visible in process listings;
    /// TRANSCRIBE_HF_TOKEN is the quieter option
    #[arg(long)]
    pub hf_token: Option<String>,

    /// Context passed to the model before transcription
    #[arg(long)]
    pub initial_prompt: Option<String>,

    /// What to print when the job finishes
    #[arg(long, value_enum)]
    pub view: Option<ViewKind>,

    /// Give this job its own subdirectory instead of reusing the output directory
    #[arg(long)]
    pub per_job_dir: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
