//! Text command - run the post-processing steps by hand.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{Context, print_json, read_input};

/// Arguments for the text command.
#[derive(Args, Debug)]
pub struct TextArgs {
    #[command(subcommand)]
    pub command: TextCommand,
}

#[derive(Subcommand, Debug)]
pub enum TextCommand {
    /// Drop screenshot UI noise lines
    Clean {
        /// Input file (default: stdin)
        input: Option<String>,
    },

    /// Rejoin lines that OCR broke mid-sentence
    Reflow {
        /// Input file (default: stdin)
        input: Option<String>,
    },

    /// List the hyperlinks in the text
    Links {
        /// Input file (default: stdin)
        input: Option<String>,
    },

    /// Turn each sentence into a bullet
    Bullets {
        /// Input file (default: stdin)
        input: Option<String>,
    },
}

/// Run the text command.
pub async fn run(args: TextArgs, ctx: &Context) -> Result<()> {
    match args.command {
        TextCommand::Clean { input } => {
            let raw = read_input(input.as_deref())?;
            let cleaned = essspace_text::strip_noise_lines(&raw);
            if ctx.json_output {
                print_json(&serde_json::json!({ "text": cleaned }))?;
            } else if let Some(text) = cleaned {
                println!("{}", text);
            }
        }
        TextCommand::Reflow { input } => {
            let raw = read_input(input.as_deref())?;
            emit_text(ctx, &essspace_text::reflow_ocr_text(&raw))?;
        }
        TextCommand::Links { input } => {
            let raw = read_input(input.as_deref())?;
            let links = essspace_text::extract_links(&raw);
            if ctx.json_output {
                print_json(&links)?;
            } else {
                for link in links {
                    println!("{}", link);
                }
            }
        }
        TextCommand::Bullets { input } => {
            let raw = read_input(input.as_deref())?;
            emit_text(ctx, &essspace_text::summarize_and_bullet(&raw))?;
        }
    }

    Ok(())
}

fn emit_text(ctx: &Context, text: &str) -> Result<()> {
    if ctx.json_output {
        print_json(&serde_json::json!({ "text": text }))?;
    } else if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}
