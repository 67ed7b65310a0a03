use std::process;

use log::info;

use unspent_interest::app::App;
use unspent_interest::parser::{self, Parser};
use unspent_interest::{Accountant, Config, Ledger, Result};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let app = App::new()?;

    let config = match app.get_config_path() {
        Some(path) => Config::new(path)?,
        None => Config::default(),
    };

    if !app.get_input_paths().is_empty() {
        let sheets = app
            .get_input_paths()
            .iter()
            .zip(app.get_header_rows())
            .map(|(path, header_row)| Parser::new(*header_row).parse_sheet(path))
            .collect::<Result<Vec<_>>>()?;

        let ledger = Ledger::from_sheets(&sheets, &config)?;
        parser::write_normalized_file(app.get_output_path(), &ledger.rows)?;
        info!(
            "{} sheets normalized into {}",
            sheets.len(),
            app.get_output_path().display()
        );
    }

    if let Some(fifo_path) = app.get_fifo_path() {
        let analysis = Accountant::from_config(&config).analyze_file(fifo_path)?;
        print!("{}", analysis.profit);
        print!("{}", analysis.unspent_interest);
        if let Some(report_path) = app.get_report_path() {
            analysis.write_to_files(report_path)?;
        }
    }

    Ok(())
}
