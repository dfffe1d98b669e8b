//! Print an HDU summary of a FITS file.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::bintable::parse_columns;
use hdf2fits::extension::ExtensionType;
use hdf2fits::header::Card;
use hdf2fits::value::Value;
use hdf2fits::{Hdu, HduList};
use hdf2fits_tools::{init_logging, Verbosity};
use log::debug;

/// Print the HDUs of a FITS file: type, EXTNAME, axes and columns
#[derive(Debug, Parser)]
#[command(name = "fitsinfo", version, about, long_about = None)]
struct Cli {
    /// FITS file to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also list every header card
    #[arg(short = 'c', long = "cards")]
    cards: bool,

    #[command(flatten)]
    verbosity: Verbosity,
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Logical(true) => String::from("T"),
        Value::Logical(false) => String::from("F"),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("'{s}'"),
    }
}

fn format_cards(cards: &[Card]) -> String {
    let mut out = String::from("  Header cards:\n");
    for card in cards {
        let kw = card.keyword_str();
        let _ = match (&card.value, &card.comment) {
            (Some(val), Some(comment)) => {
                writeln!(out, "    {kw} = {} / {comment}", format_value(val))
            }
            (Some(val), None) => writeln!(out, "    {kw} = {}", format_value(val)),
            (None, Some(comment)) => writeln!(out, "    {kw} {comment}"),
            (None, None) => writeln!(out, "    {kw}"),
        };
    }
    out
}

fn format_hdu(index: usize, hdu: &Hdu) -> Result<String> {
    let mut out = String::new();
    let header = &hdu.header;
    let ext_label = hdu
        .extname()
        .map(|name| format!(" (EXTNAME: {name})"))
        .unwrap_or_default();

    if hdu.is_primary() {
        writeln!(out, "HDU {index}: Primary")?;
    } else {
        writeln!(out, "HDU {index}: {} extension{ext_label}", hdu.extension_type()?)?;
    }

    if hdu.is_primary() || hdu.extension_type()? == ExtensionType::Image {
        let naxes = header.naxes()?;
        writeln!(out, "  BITPIX: {}", header.get_int("BITPIX").unwrap_or(0))?;
        writeln!(out, "  NAXIS: {}", naxes.len())?;
        if !naxes.is_empty() {
            writeln!(out, "  Dimensions: {naxes:?}")?;
        }
        if let Some(bzero) = header.get_float("BZERO") {
            writeln!(out, "  BZERO: {bzero}")?;
        }
    } else {
        let columns = parse_columns(header)?;
        writeln!(out, "  Columns: {}", columns.len())?;
        writeln!(out, "  Rows: {}", header.require_usize("NAXIS2")?)?;
        writeln!(out, "  Row width: {} bytes", header.require_usize("NAXIS1")?)?;
        for col in &columns {
            writeln!(out, "    {} ({})", col.name, col.format.tform())?;
        }
    }
    writeln!(out, "  Data size: {} bytes", hdu.data.len())?;
    Ok(out)
}

fn format_fits_info(hdus: &HduList, cards: bool) -> Result<String> {
    let mut out = String::new();
    for (i, hdu) in hdus.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format_hdu(i, hdu)?);
        if cards {
            out.push_str(&format_cards(hdu.header.cards()));
        }
    }
    Ok(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbosity);

    let hdus = HduList::open(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    debug!("{} holds {} HDUs", cli.file.display(), hdus.len());
    print!("{}", format_fits_info(&hdus, cli.cards)?);
    Ok(())
}
