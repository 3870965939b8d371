use crate::boundary::service as boundary_service;
use crate::conf::Conf;
use crate::dashboard::service::{self, Input, Spreadsheet};
use crate::export;
use crate::filter::Selection;
use crate::photo::PhotoLibrary;
use crate::{Error, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, PartialEq)]
struct Args {
    spreadsheet: PathBuf,
    output: PathBuf,
    photos: Option<PathBuf>,
    selection: Selection,
}

pub async fn run(args: &[String], conf: &Conf) -> Result<()> {
    let args = parse_args(args)?;
    let boundaries = boundary_service::load(conf).await?;
    let file_name = args
        .spreadsheet
        .file_name()
        .and_then(|it| it.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = fs::read(&args.spreadsheet)?;
    let photos = match &args.photos {
        Some(dir) => PhotoLibrary::load_dir(dir)?,
        None => PhotoLibrary::default(),
    };
    let outcome = service::run(
        Input {
            spreadsheet: Spreadsheet { file_name, bytes },
            photos,
            selection: args.selection,
        },
        &boundaries,
    )?;
    let Some(map) = outcome.map else {
        warn!(rows = outcome.row_count, "Nothing to render");
        return Err(Error::InvalidInput(outcome.message.unwrap_or_default()));
    };
    fs::write(&args.output, export::to_html(&map)?)?;
    info!(
        output = ?args.output,
        rows = outcome.row_count,
        clusters = map.clusters.len(),
        "Saved map"
    );
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = vec![];
    let mut photos = None;
    let mut selection = Selection::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--photos" | "--district" | "--usage" => {
                let Some(value) = iter.next() else {
                    return Err(Error::CLI(format!("Missing value for {arg}")));
                };
                match arg.as_str() {
                    "--photos" => photos = Some(PathBuf::from(value)),
                    "--district" => selection.districts.push(value.clone()),
                    _ => selection.usages.push(value.clone()),
                }
            }
            flag if flag.starts_with("--") => {
                return Err(Error::CLI(format!("Unknown option: {flag}")))
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [spreadsheet, output] = <[PathBuf; 2]>::try_from(positional).map_err(|_| {
        Error::CLI(
            "Usage: render <spreadsheet> <output.html> [--photos <dir>] [--district <name>]... [--usage <name>]..."
                .into(),
        )
    })?;
    Ok(Args {
        spreadsheet,
        output,
        photos,
        selection,
    })
}
