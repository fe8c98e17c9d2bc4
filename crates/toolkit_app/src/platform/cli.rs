use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Terminal front end for the toolkit server.
#[derive(Debug, Parser)]
#[command(name = "toolkit")]
#[command(about = "Submit jobs to a toolkit server and follow their progress", long_about = None)]
pub struct Cli {
    /// Configuration file (RON). Defaults to ./toolkit.ron when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Server base URL, overriding the configuration file.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a form and follow the resulting task.
    Submit(SubmitArgs),

    /// Follow an existing task until it finishes.
    Track {
        /// Task identifier returned by the server.
        task_id: String,
    },

    /// Generate a QR code and print the server's reply.
    Qr {
        /// Text to encode.
        text: String,
    },
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Endpoint the form posts to, e.g. /api/video/convert.
    #[arg(long)]
    pub action: String,

    /// Send text fields as a JSON object instead of multipart data.
    #[arg(long)]
    pub url_form: bool,

    /// Text field, repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_pair)]
    pub fields: Vec<(String, String)>,

    /// File field, repeatable.
    #[arg(long = "file", value_name = "NAME=PATH", value_parser = parse_pair)]
    pub files: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}
