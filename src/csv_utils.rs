use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::types::{Error, Order};

// Everything is read as text: contacts must keep their leading zeros and
// broken numbers or dates are reported later instead of failing the load.
#[derive(Deserialize, Serialize, Debug)]
pub struct Row {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Cliente", default)]
    client: String,
    #[serde(rename = "Contato", default)]
    contact: String,
    #[serde(rename = "Data", default)]
    date: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "Caruru", default)]
    caruru_kg: String,
    #[serde(rename = "Bobó", default)]
    bobo_kg: String,
    #[serde(rename = "Valor", default)]
    value: String,
}

impl Row {
    const HEADERS: [&'static str; 8] = [
        "ID", "Cliente", "Contato", "Data", "Status", "Caruru", "Bobó", "Valor",
    ];

    fn into_order(self, line: u64) -> Result<Order, Error> {
        let id = self
            .id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidId(line, self.id.clone()))?;
        Ok(Order {
            id,
            client: self.client,
            contact: self.contact,
            date: self.date,
            status: self.status,
            caruru_kg: self.caruru_kg,
            bobo_kg: self.bobo_kg,
            value: self.value,
        })
    }
}

impl From<&Order> for Row {
    fn from(o: &Order) -> Self {
        Row {
            id: o.id.to_string(),
            client: o.client.clone(),
            contact: o.contact.clone(),
            date: o.date.clone(),
            status: o.status.clone(),
            caruru_kg: o.caruru_kg.clone(),
            bobo_kg: o.bobo_kg.clone(),
            value: o.value.clone(),
        }
    }
}

pub fn read_orders(reader: impl Read) -> Result<Vec<Order>, Error> {
    // Only headers are trimmed: field text, contacts included, stays as
    // typed.
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut orders = Vec::new();
    for result in rdr.records() {
        let mut record = result?;
        let line = record.position().map_or(0, |p| p.line());

        // Short rows read their missing trailing columns as empty text.
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }

        let row: Row = record.deserialize(Some(&headers))?;
        orders.push(row.into_order(line)?);
    }
    Ok(orders)
}

pub fn write_orders<'a, I: IntoIterator<Item = &'a Order>>(
    writer: impl Write,
    orders: I,
) -> Result<(), Error> {
    // Headers are written by hand so an empty book still gets them.
    let mut wrt = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wrt.write_record(Row::HEADERS)?;
    for o in orders {
        wrt.serialize(Row::from(o))?;
    }
    wrt.flush()
        .map_err(|e| Error::Io("CSV output".to_string(), e))?;
    Ok(())
}
