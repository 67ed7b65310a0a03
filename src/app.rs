use std::path::PathBuf;

use clap::{Arg, ArgMatches};

use crate::error::{Error, Result};

/// Command line of the `unspent_interest` binary.
#[derive(Debug)]
pub struct App {
    input_paths: Vec<PathBuf>,
    header_rows: Vec<usize>,
    output_path: PathBuf,
    fifo_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    conf_path: Option<String>,
}

impl App {
    pub fn new() -> Result<App> {
        App::from_matches(&App::command().get_matches())
    }

    pub fn from_args<I, T>(args: I) -> Result<App>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = App::command()
            .get_matches_from_safe(args)
            .map_err(|err| Error::Arguments(err.message))?;
        App::from_matches(&matches)
    }

    fn command() -> clap::App<'static, 'static> {
        clap::App::new("unspent_interest")
            .version("0.1.0")
            .about("Normalizes ledger sheets for FIFO calculation and reports unspent interest")
            .arg(Arg::with_name("input_path")
                .short("i")
                .long("input")
                .takes_value(true)
                .multiple(true)
                .help("Ledger sheet(s) exported as CSV, in ledger order"))
            .arg(Arg::with_name("header_row")
                .short("r")
                .long("row")
                .takes_value(true)
                .multiple(true)
                .help("Header row of each sheet (first row = 1), in the same order as the sheets"))
            .arg(Arg::with_name("output_path")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Name of the normalized CSV to write"))
            .arg(Arg::with_name("fifo_path")
                .short("f")
                .long("fifo")
                .takes_value(true)
                .help("FIFO calculator output to analyze"))
            .arg(Arg::with_name("report_path")
                .short("p")
                .long("report")
                .takes_value(true)
                .requires("fifo_path")
                .help("Also write the FIFO analysis to <name>-profit.csv and <name>-interest.csv"))
            .arg(Arg::with_name("config_path")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Config file"))
    }

    fn from_matches(matches: &ArgMatches) -> Result<App> {
        let input_paths: Vec<PathBuf> = matches
            .values_of("input_path")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();

        let header_rows = match matches.values_of("header_row") {
            Some(values) => values
                .map(|value| {
                    value
                        .parse::<usize>()
                        .ok()
                        .filter(|row| *row >= 1)
                        .ok_or_else(|| Error::Arguments(format!("invalid header row '{}'", value)))
                })
                .collect::<Result<Vec<usize>>>()?,
            None => vec![1; input_paths.len()],
        };
        if header_rows.len() != input_paths.len() {
            return Err(Error::Arguments(format!(
                "Number of sheets and header rows should be equal: {} != {}",
                input_paths.len(),
                header_rows.len()
            )));
        }

        let fifo_path = matches.value_of("fifo_path").map(PathBuf::from);
        if input_paths.is_empty() && fifo_path.is_none() {
            return Err(Error::Arguments(
                "Nothing to do: provide sheets (--input) or a FIFO output (--fifo)".to_string(),
            ));
        }

        let output_path = match matches.value_of("output_path") {
            Some(name) if name.ends_with(".csv") => PathBuf::from(name),
            Some(name) => PathBuf::from(format!("{}.csv", name)),
            None => PathBuf::from(format!(
                "{}.csv",
                chrono::Local::now().format("%Y%m%d-%H%M%S")
            )),
        };

        Ok(App {
            input_paths,
            header_rows,
            output_path,
            fifo_path,
            report_path: matches.value_of("report_path").map(PathBuf::from),
            conf_path: matches.value_of("config_path").map(str::to_string),
        })
    }

    pub fn get_input_paths(&self) -> &[PathBuf] { &self.input_paths }
    pub fn get_header_rows(&self) -> &[usize] { &self.header_rows }
    pub fn get_output_path(&self) -> &PathBuf { &self.output_path }
    pub fn get_fifo_path(&self) -> Option<&PathBuf> { self.fifo_path.as_ref() }
    pub fn get_report_path(&self) -> Option<&PathBuf> { self.report_path.as_ref() }
    pub fn get_config_path(&self) -> Option<&str> { self.conf_path.as_deref() }
}
