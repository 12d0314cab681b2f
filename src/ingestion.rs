use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::traits::RequestStream;
use crate::domain::{Error, Vendor, VendorId, VendorStatus, WriteOffRequest, money};

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).flexible(true);
    builder
}

/// Streams write-off requests from CSV with the header
/// `vendor,reference,amount,note,date,actor,branch`.
pub struct RequestCsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> RequestCsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader_builder().from_reader(reader)),
        }
    }
}

impl<R: Read + Send + 'static> RequestStream for RequestCsvReader<R> {
    type ReqStream = Pin<Box<dyn Stream<Item = Result<WriteOffRequest, Error>> + Send>>;

    fn stream(&mut self) -> Self::ReqStream {
        let Some(reader) = self.reader.take() else {
            // Already consumed.
            return Box::pin(stream::iter(Vec::<Result<WriteOffRequest, Error>>::new()));
        };

        let iter = reader
            .into_deserialize::<WriteOffRequest>()
            .map(|row| {
                row.map_err(|e| Error::Ingestion(format!("CSV deserialization error: {e}")))
            });

        Box::pin(stream::iter(iter))
    }
}

#[derive(Debug, Deserialize)]
struct VendorRow {
    id: String,
    name: String,
    outstanding: String,
    status: Option<String>,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = Error;

    fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
        let outstanding = money::parse_amount(&row.outstanding)
            .filter(|balance| *balance >= Decimal::ZERO)
            .ok_or_else(|| {
                Error::Ingestion(format!(
                    "Invalid outstanding balance for vendor {}: {}",
                    row.id, row.outstanding
                ))
            })?;

        let status = match row.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(VendorStatus::parse(raw).ok_or_else(|| {
                Error::Ingestion(format!("Invalid status for vendor {}: {raw}", row.id))
            })?),
            None => None,
        };

        Ok(Vendor {
            id: VendorId::new(row.id),
            name: row.name,
            outstanding,
            status,
        })
    }
}

/// Reads the vendor table (`id,name,outstanding,status`). Any bad row fails
/// the whole load.
pub fn load_vendors<R: Read>(reader: R) -> Result<Vec<Vendor>, Error> {
    reader_builder()
        .from_reader(reader)
        .into_deserialize::<VendorRow>()
        .map(|row| Vendor::try_from(row?))
        .collect()
}
