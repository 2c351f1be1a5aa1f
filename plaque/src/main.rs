use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use clap::Parser;
use plaque_core::{LayoutConfig, PlaqueRenderer, PlaqueRequest};

/// Render name plaques: one PNG per spreadsheet row, composited onto a
/// common background image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Spreadsheet with one row per plaque: full name, organization, role
    #[arg(short, long, default_value = "people.xlsx")]
    input: PathBuf,

    /// Background image, stretched to the plaque dimensions
    #[arg(short, long, default_value = "background.jpg")]
    background: PathBuf,

    /// Directory the rendered PNG files are written to
    #[arg(short, long, default_value = "out/img")]
    out_dir: PathBuf,

    /// Layout overrides as JSON; defaults apply for omitted fields
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    let renderer = PlaqueRenderer::new(config);

    let mut workbook = open_workbook_auto(&args.input)
        .with_context(|| format!("opening spreadsheet {}", args.input.display()))?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        bail!("spreadsheet {} has no worksheets", args.input.display());
    };
    let range =
        range.with_context(|| format!("reading first worksheet of {}", args.input.display()))?;

    let mut rendered = 0usize;
    for (index, row) in range.rows().enumerate() {
        let full_name = cell_text(row.first());
        let organization = cell_text(row.get(1));
        let role = cell_text(row.get(2));

        let file_name = format!("{index:03}_{}.png", safe_stem(&organization, &full_name));
        let request = PlaqueRequest {
            full_name,
            organization,
            role,
            background_image: args.background.clone(),
            output_path: args.out_dir.join(&file_name),
        };
        log::info!("row {index}: {file_name}");
        renderer
            .render_plate(&request)
            .with_context(|| format!("rendering row {index} ({file_name})"))?;
        rendered += 1;
    }

    println!("PNG done: {rendered} -> {}", args.out_dir.display());
    Ok(())
}

/// Coerce a cell to trimmed text. Blank or missing cells become empty
/// strings and every other value keeps its display form; row data is never
/// a reason to fail.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// File-name stem: the whitespace tokens of "organization + full name"
/// joined by underscores, uppercased.
fn safe_stem(organization: &str, full_name: &str) -> String {
    format!("{organization} {full_name}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}
