//! Notes command - note management.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use console::{Style, style};
use essspace_domain::{CaptureSession, DomainError, Note, NoteId, SummarizerPreference};
use essspace_text::truncate;

use super::{Context, print_json, print_success, read_input};
use crate::app::App;

/// Arguments for the notes command.
#[derive(Args, Debug)]
pub struct NotesArgs {
    #[command(subcommand)]
    pub command: NotesCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// Add a typed note
    Add {
        /// Note content (use - to read stdin)
        content: Option<String>,

        /// Note title
        #[arg(long)]
        title: Option<String>,

        /// Tags for the note
        #[arg(short, long)]
        tags: Vec<String>,

        /// Store the body as plain text rather than markdown
        #[arg(long)]
        plain: bool,
    },

    /// List notes, newest first
    List {
        /// Maximum notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Notes to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Only notes with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Search note titles, bodies, OCR text, transcripts and summaries
    Search {
        /// Search query
        query: String,

        /// Maximum notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a specific note
    Show {
        /// Note ID
        id: NoteId,
    },

    /// Replace the body of a note
    Edit {
        /// Note ID
        id: NoteId,

        /// New body (use - to read stdin)
        text: String,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: NoteId,
    },

    /// Summarize a note and store the summary
    Summarize {
        /// Note ID
        id: NoteId,

        /// Summarizer to use: auto, on_device or cloud (default from config)
        #[arg(long)]
        mode: Option<SummarizerPreference>,
    },

    /// Store a bullet-point version of a note as its summary
    Bullets {
        /// Note ID
        id: NoteId,
    },

    /// Show note counts and the database location
    Stats,
}

/// Run the notes command.
pub async fn run(args: NotesArgs, ctx: &Context) -> Result<()> {
    let app = App::open(ctx)?;
    let notes = app.notes();
    let dim = Style::new().dim();

    match args.command {
        NotesCommand::Add {
            content,
            title,
            tags,
            plain,
        } => {
            let content = match content.as_deref() {
                Some("-") => read_input(None)?,
                Some(text) => text.to_string(),
                None => String::new(),
            };
            let note = CaptureSession::text_note(title.as_deref().unwrap_or_default(), &content)
                .ok_or_else(|| anyhow!("Note is empty: give a title or some content"))?;
            let note = tags
                .into_iter()
                .fold(note, |note, tag| note.with_tag(tag))
                .with_markdown(!plain);

            if ctx.verbose && !note.tags.is_empty() {
                println!("{}", dim.apply_to(format!("Tags: {:?}", note.tags)));
            }

            let id = notes.insert_note(note).await?;
            report_created(ctx, &app, id).await?;
        }
        NotesCommand::List { limit, offset, tag } => {
            let list = match tag.as_deref() {
                Some(tag) => notes.list_notes_by_tag(tag, limit, offset).await?,
                None => notes.list_notes(limit, offset).await?,
            };
            if ctx.json_output {
                print_json(&list)?;
            } else {
                println!("{}", style("Notes").bold());
                println!("{}", dim.apply_to("─".repeat(50)));
                println!();
                print_note_lines(&list);

                let total = notes.count_notes().await?;
                let shown = offset + list.len();
                if tag.is_none() && total > shown {
                    println!();
                    println!(
                        "{}",
                        dim.apply_to(format!("... and {} more", total - shown))
                    );
                }
            }
        }
        NotesCommand::Search { query, limit } => {
            let found = notes.search_notes(&query, limit).await?;
            if ctx.json_output {
                print_json(&found)?;
            } else {
                println!("{}", style("Note Search").bold());
                println!("{}", dim.apply_to("─".repeat(50)));
                println!();
                print_note_lines(&found);
            }
        }
        NotesCommand::Show { id } => {
            let note = notes.require_note(id).await?;
            if ctx.json_output {
                print_json(&note)?;
            } else {
                print_note(&note);
            }
        }
        NotesCommand::Edit { id, text } => {
            let text = if text == "-" { read_input(None)? } else { text };
            let note = notes.edit_text(id, Some(text)).await?;
            if ctx.json_output {
                print_json(&note)?;
            } else {
                print_success(format!("Note {} updated", id));
                if !note.links.is_empty() {
                    println!("{}", dim.apply_to(format!("Links: {}", note.links.join(", "))));
                }
            }
        }
        NotesCommand::Delete { id } => {
            if !notes.delete_note(id).await? {
                return Err(DomainError::NotFound(id).into());
            }
            if ctx.json_output {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                print_success(format!("Note {} deleted", id));
            }
        }
        NotesCommand::Summarize { id, mode } => {
            let note = notes.require_note(id).await?;
            let text = note.text.unwrap_or_default();
            let preference = mode.unwrap_or_else(|| app.preference());
            let api_key = app.api_key();
            if ctx.verbose {
                let key_source = api_key
                    .as_ref()
                    .map(|k| k.source.to_string())
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "{}",
                    dim.apply_to(format!("Summarizer: {} (API key: {})", preference, key_source))
                );
            }

            let summary = notes
                .summarize_note(
                    id,
                    &text,
                    preference,
                    api_key.as_ref().map(|k| k.value.as_str()),
                )
                .await?;
            print_summary(ctx, id, &summary)?;
        }
        NotesCommand::Bullets { id } => {
            let bullets = notes.bulletize_note(id).await?;
            print_summary(ctx, id, &bullets)?;
        }
        NotesCommand::Stats => {
            let stats = notes.stats().await?;
            if ctx.json_output {
                print_json(&serde_json::json!({
                    "database": app.db_path,
                    "stats": stats,
                }))?;
            } else {
                println!("{}", style("Note Store").bold());
                println!("{}", dim.apply_to("─".repeat(50)));
                println!("  Database:       {}", app.db_path.display());
                println!("  Notes:          {}", stats.note_count);
                println!("  With photo:     {}", stats.with_photo);
                println!("  With audio:     {}", stats.with_audio);
                println!("  With summary:   {}", stats.with_summary);
                println!("  Schema version: {}", stats.schema_version);
            }
        }
    }

    Ok(())
}

/// Report a newly created note, as JSON or a check line.
pub async fn report_created(ctx: &Context, app: &App, id: NoteId) -> Result<()> {
    if ctx.json_output {
        let note = app.notes().require_note(id).await?;
        print_json(&note)?;
    } else {
        let dim = Style::new().dim();
        print_success(format!("Note created: {}", dim.apply_to(id)));
    }
    Ok(())
}

fn print_summary(ctx: &Context, id: NoteId, summary: &str) -> Result<()> {
    if ctx.json_output {
        print_json(&serde_json::json!({ "id": id, "summary": summary }))?;
    } else {
        print_success(format!("Summary saved for note {}", id));
        println!();
        println!("{}", summary);
    }
    Ok(())
}

fn print_note_lines(notes: &[Note]) {
    let dim = Style::new().dim();
    if notes.is_empty() {
        println!("{}", dim.apply_to("No notes found"));
        return;
    }
    for note in notes {
        println!(
            "{} {}",
            dim.apply_to(format!("[{}]", note.id)),
            truncate(&note.display_title().replace('\n', " "), 60)
        );
    }
}

fn print_note(note: &Note) {
    let dim = Style::new().dim();
    println!("{}", style(note.display_title()).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!(
        "{}",
        dim.apply_to(format!(
            "ID {} · created {} · modified {}",
            note.id,
            note.created_at.format("%Y-%m-%d %H:%M"),
            note.last_modified.format("%Y-%m-%d %H:%M")
        ))
    );
    if let Some(photo) = &note.photo_path {
        println!("{}", dim.apply_to(format!("Photo: {}", photo)));
    }
    if let Some(audio) = &note.audio_path {
        println!("{}", dim.apply_to(format!("Audio: {}", audio)));
    }
    if !note.tags.is_empty() {
        println!("{}", dim.apply_to(format!("Tags: {}", note.tags.join(", "))));
    }
    println!();

    match &note.text {
        Some(text) => println!("{}", text),
        None => println!("{}", dim.apply_to("(no text)")),
    }

    if let Some(summary) = &note.summary {
        println!();
        println!("{}", style("Summary").bold());
        println!("{}", summary);
    }
    if !note.links.is_empty() {
        println!();
        println!("{}", style("Links").bold());
        for link in &note.links {
            println!("  {}", link);
        }
    }
}
