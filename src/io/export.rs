//! Writing payments and obligations out as delimited text.

use crate::core::obligation::{ObligationSet, Payment};
use std::io::Write;

/// Write payments as CSV with a `debtor,creditor,amount` header.
pub fn write_payments_csv<W: Write>(writer: W, payments: &[Payment]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["debtor", "creditor", "amount"])?;
    for p in payments {
        let amount = p.amount.to_string();
        wtr.write_record([p.debtor.as_str(), p.creditor.as_str(), amount.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write obligations in the headerless `payer,debtor,amount` input format.
pub fn write_obligations_csv<W: Write>(
    writer: W,
    obligations: &ObligationSet,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for ob in obligations.obligations() {
        let amount = ob.amount().to_string();
        wtr.write_record([ob.creditor(), ob.debtor(), amount.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
