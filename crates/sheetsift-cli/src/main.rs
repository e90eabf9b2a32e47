//! Sheetsift CLI - sheet schema inference and typed row dumps

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetsift::prelude::*;
use sheetsift::open_shared_strings;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetsift")]
#[command(
    author,
    version,
    about = "Infer column types of a spreadsheet sheet and decode its rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the column schema inferred from a sample of rows
    Schema {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Print the schema as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Infer a schema from a sample, then decode and print every row
    Rows {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter (default: tab)
        #[arg(short, long, default_value = "\t")]
        delimiter: char,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// Extracted sheet part (e.g. xl/worksheets/sheet1.xml)
    input: PathBuf,

    /// Extracted shared-string part (xl/sharedStrings.xml)
    #[arg(long)]
    shared_strings: Option<PathBuf>,

    /// Sheet name used in log messages (default: input file stem)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Rows to skip before sampling, e.g. 1 for a header row
    #[arg(long, default_value = "0")]
    skip: usize,

    /// Number of rows to sample for inference
    #[arg(short, long, default_value = "1000")]
    sample: usize,

    /// Date pattern in strftime syntax
    #[arg(long, default_value = "%Y-%m-%d")]
    date_format: String,

    /// Locale of formatted numbers (e.g. en-US, de-DE)
    #[arg(long, default_value = "en-US")]
    locale: String,

    /// Keep cells without a type attribute and read cached formula values
    #[arg(long)]
    lenient: bool,
}

impl SheetArgs {
    fn convert_options(&self) -> Result<ConvertOptions> {
        let decimal_format = DecimalFormat::for_locale(&self.locale)
            .with_context(|| format!("Unsupported --locale '{}'", self.locale))?;
        Ok(ConvertOptions::new(
            DateFormat::new(self.date_format.as_str()),
            decimal_format,
        ))
    }

    fn cursor_options(&self) -> CursorOptions {
        if self.lenient {
            CursorOptions::lenient()
        } else {
            CursorOptions::default()
        }
    }

    fn sheet_name(&self) -> String {
        self.sheet_name.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Sheet1".to_string())
        })
    }

    fn shared_strings(&self) -> Result<SharedStringTable> {
        match &self.shared_strings {
            Some(path) => open_shared_strings(path)
                .with_context(|| format!("Failed to read '{}'", path.display())),
            None => Ok(SharedStringTable::default()),
        }
    }

    fn open<'a>(
        &self,
        strings: &'a SharedStringTable,
    ) -> Result<SheetCursor<'a, io::BufReader<File>>> {
        let cursor = SheetCursor::open(&self.sheet_name(), &self.input, strings)
            .with_context(|| format!("Failed to open '{}'", self.input.display()))?;
        Ok(cursor.with_options(self.cursor_options()))
    }

    fn infer(&self, strings: &SharedStringTable) -> Result<SchemaInferrer> {
        let mut cursor = self.open(strings)?;
        sample_schema(&mut cursor, self.skip, self.sample, self.convert_options()?)
            .with_context(|| format!("Failed to sample '{}'", self.input.display()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { sheet, json } => {
            let stdout = io::stdout();
            print_schema(&sheet, json, &mut stdout.lock())
        }
        Commands::Rows {
            sheet,
            output,
            delimiter,
        } => match output {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create '{}'", path.display()))?;
                let mut out = BufWriter::new(file);
                let written = print_rows(&sheet, delimiter, &mut out)?;
                out.flush()
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                eprintln!("Wrote {} rows to '{}'", written, path.display());
                Ok(())
            }
            None => {
                let stdout = io::stdout();
                print_rows(&sheet, delimiter, &mut stdout.lock()).map(|_| ())
            }
        },
    }
}

fn print_schema<W: Write>(sheet: &SheetArgs, json: bool, out: &mut W) -> Result<()> {
    let strings = sheet.shared_strings()?;
    let schema = sheet.infer(&strings)?.into_schema();

    if json {
        serde_json::to_writer_pretty(&mut *out, &schema).context("Failed to encode schema")?;
        writeln!(out)?;
    } else {
        for (col, data_type) in schema.iter().enumerate() {
            writeln!(out, "{}\t{}", CellAddress::column_to_letters(col as u16), data_type)?;
        }
    }
    Ok(())
}

/// Decode every row of the sheet; returns the number of rows written
fn print_rows<W: Write>(sheet: &SheetArgs, delimiter: char, out: &mut W) -> Result<usize> {
    let strings = sheet.shared_strings()?;
    let decoder = sheet.infer(&strings)?.into_decoder();
    tracing::info!(schema = %decoder.schema(), "decoding {}", sheet.input.display());

    let mut written = 0;
    let mut skipped = 0;
    for result in TypedRows::new(sheet.open(&strings)?, decoder) {
        match result {
            Ok(row) => {
                let line: Vec<String> = row
                    .cells
                    .iter()
                    .map(|cell| quote_field(&cell.to_string(), delimiter))
                    .collect();
                writeln!(out, "{}", line.join(&delimiter.to_string()))?;
                written += 1;
            }
            // already logged by the decoder; keep going
            Err(sheetsift::Error::Convert(_)) => skipped += 1,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read '{}'", sheet.input.display()))
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("{} rows did not match the schema and were skipped", skipped);
    }
    Ok(written)
}

/// Quote a field if it contains the delimiter, a quote or a line break
fn quote_field(text: &str, delimiter: char) -> String {
    if text.contains(delimiter) || text.contains('"') || text.contains('\n') || text.contains('\r')
    {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
