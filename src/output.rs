use std::io::Write;

use crate::domain::{Error, Vendor, WriteOffRequest, money};
use crate::poster::PostingResult;

/// Writes the batch report as CSV: one row per item, a blank line, then the
/// vendor balances.
pub struct ReportWriter<W: Write> {
    inner: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// `requests` may be shorter than `results` when some items could not be
    /// read; those rows are written without vendor and reference.
    pub fn write_results(
        &mut self,
        requests: &[Option<WriteOffRequest>],
        results: &[PostingResult],
    ) -> Result<(), Error> {
        let mut writer = csv::Writer::from_writer(&mut self.inner);
        writer.write_record([
            "item",
            "vendor",
            "reference",
            "result",
            "amount",
            "outstanding",
            "status",
            "mode",
            "reason",
        ])?;

        for (idx, result) in results.iter().enumerate() {
            let request = requests.get(idx).and_then(Option::as_ref);
            let vendor = request
                .and_then(|r| r.vendor_id.clone())
                .unwrap_or_default();
            let reference = request
                .and_then(|r| r.reference.clone())
                .unwrap_or_default();
            let item = (idx + 1).to_string();

            match result {
                Ok(posting) => writer.write_record([
                    item,
                    vendor,
                    reference,
                    "posted".to_string(),
                    money::format(posting.write_off.amount),
                    money::format(posting.vendor.outstanding),
                    status_label(&posting.vendor).to_string(),
                    posting.mode.as_str().to_string(),
                    String::new(),
                ])?,
                Err(e) => writer.write_record([
                    item,
                    vendor,
                    reference,
                    "failed".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    e.reason_code().to_string(),
                ])?,
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_vendors(&mut self, vendors: &[Vendor]) -> Result<(), Error> {
        self.inner.write_all(b"\n")?;

        let mut writer = csv::Writer::from_writer(&mut self.inner);
        writer.write_record(["vendor", "name", "outstanding", "status"])?;
        for vendor in vendors {
            writer.write_record([
                vendor.id.as_str(),
                vendor.name.as_str(),
                money::format(vendor.outstanding).as_str(),
                status_label(vendor),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn status_label(vendor: &Vendor) -> &'static str {
    vendor.status.map(|s| s.as_str()).unwrap_or("")
}
