//! Gridcalc CLI - document inspection and editing tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridcalc::prelude::*;
use gridcalc::{DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Formula-aware grid document tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new blank document
    New {
        /// Output document file
        output: PathBuf,

        /// Row count
        #[arg(long, default_value_t = DEFAULT_GRID_ROWS)]
        rows: usize,

        /// Column count
        #[arg(long, default_value_t = DEFAULT_GRID_COLUMNS)]
        cols: usize,
    },

    /// Show information about a document
    Info {
        /// Input document file
        input: PathBuf,
    },

    /// Recompute a document and print or save the resolved values
    Eval {
        /// Input document file
        input: PathBuf,

        /// Output JSON file for resolved values (default: stdout table)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply an edit to a document
    Edit {
        /// Input document file
        input: PathBuf,

        /// Output document file (default: edit in place)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(subcommand)]
        op: EditOp,
    },
}

#[derive(Subcommand)]
enum EditOp {
    /// Set a cell's content by address (e.g. B3)
    Set {
        /// Cell address, column letters then row number
        cell: String,

        /// New content (formulas start with =)
        value: String,
    },

    /// Insert a blank row next to an anchor row
    InsertRow {
        /// Anchor row id
        anchor: u64,

        /// Insert below the anchor instead of above
        #[arg(long)]
        below: bool,
    },

    /// Delete rows by id
    DeleteRows {
        /// Row ids, comma separated
        #[arg(value_delimiter = ',')]
        ids: Vec<u64>,
    },

    /// Insert a blank column next to an anchor column
    InsertColumn {
        /// Anchor column field name
        anchor: String,

        /// Insert right of the anchor instead of left
        #[arg(long)]
        right: bool,
    },

    /// Delete columns by field name
    DeleteColumns {
        /// Field names, comma separated
        #[arg(value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Append a blank row at the bottom
    AppendRow,

    /// Append a blank column at the right
    AppendColumn,

    /// Set a row's display height
    SetHeight {
        /// Row id
        row: u64,

        /// Height in pixels
        height: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::New { output, rows, cols } => new_document(&output, rows, cols),
        Commands::Info { input } => show_info(&input),
        Commands::Eval { input, output } => eval_document(&input, output.as_deref()),
        Commands::Edit { input, output, op } => edit_document(&input, output.as_deref(), op),
    }
}

fn new_document(output: &Path, rows: usize, cols: usize) -> Result<()> {
    let grid = Grid::with_dimensions(cols, rows);
    grid.save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    eprintln!("Created {} x {} document at '{}'", rows, cols, output.display());
    Ok(())
}

fn show_info(input: &Path) -> Result<()> {
    let grid = open_document(input)?;
    let (_, stats) = grid.resolve_with_stats();

    println!("File: {}", input.display());
    println!(
        "Size: {} rows x {} columns",
        grid.row_count(),
        grid.column_count()
    );
    println!("Formulas: {}", stats.formula_count);
    println!("Errors: {}", stats.errors);

    Ok(())
}

fn eval_document(input: &Path, output: Option<&Path>) -> Result<()> {
    let grid = open_document(input)?;

    let (resolved, stats) = grid.resolve_with_stats();
    eprintln!(
        "Recomputed {} cells ({} formulas, {} errors)",
        stats.cells_resolved, stats.formula_count, stats.errors
    );

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &resolved)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        writer.flush()?;
        eprintln!("Wrote '{}'", path.display());
    } else {
        print_table(&resolved)?;
    }

    Ok(())
}

fn edit_document(input: &Path, output: Option<&Path>, op: EditOp) -> Result<()> {
    let mut grid = open_document(input)?;

    match op {
        EditOp::Set { cell, value } => {
            let address = CellAddress::parse(&cell)
                .with_context(|| format!("Invalid cell address '{cell}'"))?;
            let row_id = address
                .row
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| grid.row_at(i))
                .map(|row| row.id)
                .with_context(|| format!("Row {} is out of range", address.row))?;
            grid.set_cell(row_id, address.column_letters(), value.into())
                .with_context(|| format!("Failed to set '{cell}'"))?;
            eprintln!("Set {cell}");
        }
        EditOp::InsertRow { anchor, below } => {
            let position = if below {
                RowInsertPosition::Below
            } else {
                RowInsertPosition::Above
            };
            let id = grid
                .insert_row_at(anchor, position)
                .context("Failed to insert row")?;
            eprintln!("Inserted row {id}");
        }
        EditOp::DeleteRows { ids } => {
            let removed = grid.delete_rows(&ids);
            eprintln!("Deleted {removed} rows");
        }
        EditOp::InsertColumn { anchor, right } => {
            let position = if right {
                ColumnInsertPosition::Right
            } else {
                ColumnInsertPosition::Left
            };
            let field = grid
                .insert_column_at(&anchor, position)
                .context("Failed to insert column")?;
            eprintln!("Inserted column {field}");
        }
        EditOp::DeleteColumns { fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let removed = grid
                .delete_columns(&fields)
                .context("Failed to delete columns")?;
            eprintln!("Deleted {removed} columns");
        }
        EditOp::AppendRow => {
            let id = grid.append_row();
            eprintln!("Appended row {id}");
        }
        EditOp::AppendColumn => {
            let field = grid.append_column();
            eprintln!("Appended column {field}");
        }
        EditOp::SetHeight { row, height } => {
            grid.set_row_height(row, height)
                .context("Failed to set row height")?;
            eprintln!("Set row {row} height to {height}");
        }
    }

    let target = output.unwrap_or(input);
    grid.save(target)
        .with_context(|| format!("Failed to write '{}'", target.display()))?;
    eprintln!("Wrote '{}'", target.display());

    Ok(())
}

fn open_document(input: &Path) -> Result<Grid> {
    Grid::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

/// Print resolved values as a tab-separated table with a row-number column
fn print_table(resolved: &ResolvedGrid) -> Result<()> {
    let mut out = String::new();

    out.push_str("row");
    for column in &resolved.columns {
        out.push('\t');
        out.push_str(column.header_name.as_deref().unwrap_or(&column.field));
    }
    out.push('\n');

    for (index, row) in resolved.rows.iter().enumerate() {
        out.push_str(&(index + 1).to_string());
        for column in &resolved.columns {
            out.push('\t');
            if let Some(value) = row.cells.get(&column.field) {
                out.push_str(&value.to_string());
            }
        }
        out.push('\n');
    }

    io::stdout()
        .write_all(out.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(())
}
