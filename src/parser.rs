use std::io::{Read, Write};
use std::path::Path;

use csv::{StringRecord, Trim};
use log::{debug, info};

use crate::error::{Error, Result};
use crate::ledger::{NormalizedRow, RawLedgerRow, Sheet};

// column positions in a sheet export (first column = 0)
const ORDER: usize = 0;
const DATE: usize = 1;
const TRANS_TYPE: usize = 2;
const INPUT_CURR: usize = 3;
const INPUT_AMOUNT: usize = 4;
const OUTPUT_CURR: usize = 5;
const OUTPUT_AMOUNT: usize = 6;
const NOTE: usize = 7;

/// Reads one sheet that was exported from the ledger workbook as CSV.
pub struct Parser {
    header_row: usize,
}

impl Parser {
    /// `header_row` is the 1-based line holding the column titles.
    pub fn new(header_row: usize) -> Parser {
        Parser {
            header_row: header_row.max(1),
        }
    }

    pub fn parse_sheet(&self, path: &Path) -> Result<Sheet> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = std::fs::File::open(path)?;
        self.parse_reader(&name, file)
    }

    pub fn parse_reader<R: Read>(&self, sheet: &str, mut reader: R) -> Result<Sheet> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input.as_slice());

        // The csv reader drops empty lines, so blank rows and line numbers are
        // recovered from the byte span each record was read from.
        let header_line = self.header_row as u64;
        let mut record = StringRecord::new();
        let mut rows = Vec::new();
        let mut consumed = 0;
        let mut previous_end = 0;
        let mut breaks_before = 0;
        while reader.read_record(&mut record)? {
            let end = (reader.position().byte() as usize).min(input.len());
            let (start, stop) = content_span(&input, consumed, end);
            let line = 1 + breaks_before + line_breaks(&input, consumed, start);
            let separators = line_breaks(&input, previous_end, start);
            breaks_before += line_breaks(&input, consumed, end);
            consumed = end;
            previous_end = stop;

            if line <= header_line {
                continue;
            }
            if separators > 1 || is_blank(&record) {
                break;
            }
            rows.push(parse_row(sheet, line, rows.len(), &record)?);
        }

        info!("Sheet '{}': read {} rows", sheet, rows.len());
        Ok(Sheet {
            name: sheet.to_string(),
            rows,
        })
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Bytes of `input[from..to]` without the line terminators around them.
fn content_span(input: &[u8], from: usize, to: usize) -> (usize, usize) {
    let start = (from..to)
        .find(|&i| !is_terminator(input[i]))
        .unwrap_or(to);
    let stop = (start..to)
        .rev()
        .find(|&i| !is_terminator(input[i]))
        .map_or(start, |i| i + 1);
    (start, stop)
}

/// Counts `\n`, `\r\n` and lone `\r` line endings in `input[from..to]`.
fn line_breaks(input: &[u8], from: usize, to: usize) -> u64 {
    (from..to)
        .filter(|&i| match input[i] {
            b'\n' => true,
            b'\r' => input.get(i + 1) != Some(&b'\n'),
            _ => false,
        })
        .count() as u64
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn cell(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// spreadsheets export whole numbers as "1.0"
fn parse_order(value: &str) -> Option<u32> {
    value
        .parse::<u32>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
                .map(|v| v as u32)
        })
        .filter(|order| *order >= 1)
}

fn parse_row(
    sheet: &str,
    line: u64,
    position: usize,
    record: &StringRecord,
) -> Result<RawLedgerRow> {
    // rows without a number are counted by position
    let order = match record.get(ORDER).filter(|value| !value.is_empty()) {
        Some(value) => parse_order(value).ok_or_else(|| Error::InvalidOrder {
            sheet: sheet.to_string(),
            line,
            value: value.to_string(),
        })?,
        None => position as u32 + 1,
    };
    debug!("Sheet '{}': parsed row #{} (line {})", sheet, order, line);

    Ok(RawLedgerRow {
        order,
        date: cell(record, DATE),
        transaction_type: cell(record, TRANS_TYPE),
        input_currency: cell(record, INPUT_CURR),
        input_amount: cell(record, INPUT_AMOUNT),
        output_currency: cell(record, OUTPUT_CURR),
        output_amount: cell(record, OUTPUT_AMOUNT),
        note: cell(record, NOTE),
    })
}

/// Writes the calculator input: `date,note,inputAmount,inputCurrency,outputAmount,outputCurrency`.
pub fn write_normalized<W: Write>(writer: W, rows: &[NormalizedRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_normalized_file(path: &Path, rows: &[NormalizedRow]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_normalized(file, rows)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
