//! Reading obligation records from delimited text and JSON.
//!
//! CSV input is headerless, one record per line: `payer,debtor,amount`.
//! The debtor owes the payer the amount.

use crate::config::SettleConfig;
use crate::core::obligation::{Obligation, ObligationError, ObligationSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning raw records into obligations.
///
/// `line` is the 1-based line for CSV input and the 1-based record index
/// for JSON input.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: invalid amount '{value}'")]
    InvalidAmount { line: usize, value: String },
    #[error("line {line}: amount '{value}' has more than {scale} decimal places")]
    TooPrecise { line: usize, value: String, scale: u32 },
    #[error("line {line}: amount '{value}' exceeds the maximum of {max}")]
    TooLarge { line: usize, value: String, max: Decimal },
    #[error("line {line}: {source}")]
    Obligation {
        line: usize,
        #[source]
        source: ObligationError,
    },
}

/// Parse headerless `payer,debtor,amount` lines.
///
/// Fields are trimmed and blank lines skipped. Extra trailing fields are
/// ignored.
pub fn read_csv<R: Read>(reader: R, config: &SettleConfig) -> Result<ObligationSet, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut set = ObligationSet::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |i: usize, name: &'static str| {
            record
                .get(i)
                .filter(|s| !s.is_empty())
                .ok_or(IngestError::MissingField { line, field: name })
        };
        let payer = field(0, "payer")?;
        let debtor = field(1, "debtor")?;
        let amount = parse_amount(field(2, "amount")?, line, config)?;

        let ob = Obligation::try_new(debtor, payer, amount)
            .map_err(|source| IngestError::Obligation { line, source })?;
        set.add(ob);
    }
    Ok(set)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize)]
struct ObligationInput {
    debtor: String,
    creditor: String,
    amount: RawAmount,
    #[serde(default)]
    memo: Option<String>,
}

#[derive(Deserialize)]
struct ObligationsFile {
    obligations: Vec<ObligationInput>,
}

/// Parse `{"obligations": [{"debtor", "creditor", "amount", "memo"?}]}`.
///
/// Amounts may be JSON strings or numbers.
pub fn read_json<R: Read>(reader: R, config: &SettleConfig) -> Result<ObligationSet, IngestError> {
    let file: ObligationsFile = serde_json::from_reader(reader)?;

    let mut set = ObligationSet::new();
    for (index, input) in file.obligations.into_iter().enumerate() {
        let line = index + 1;
        let raw = match &input.amount {
            RawAmount::Text(s) => s.trim().to_string(),
            RawAmount::Number(n) => n.to_string(),
        };
        let amount = parse_amount(&raw, line, config)?;

        let mut ob = Obligation::try_new(input.debtor.trim(), input.creditor.trim(), amount)
            .map_err(|source| IngestError::Obligation { line, source })?;
        if let Some(memo) = input.memo {
            ob = ob.with_memo(memo);
        }
        set.add(ob);
    }
    Ok(set)
}

fn parse_amount(value: &str, line: usize, config: &SettleConfig) -> Result<Decimal, IngestError> {
    let amount = Decimal::from_str(value).map_err(|_| IngestError::InvalidAmount {
        line,
        value: value.to_string(),
    })?;
    if amount.normalize().scale() > config.minor_unit_scale {
        return Err(IngestError::TooPrecise {
            line,
            value: value.to_string(),
            scale: config.minor_unit_scale,
        });
    }
    if amount > config.max_amount {
        return Err(IngestError::TooLarge {
            line,
            value: value.to_string(),
            max: config.max_amount,
        });
    }
    Ok(amount)
}
