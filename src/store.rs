use std::{
    collections::HashSet,
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::csv_utils::{read_orders, write_orders};
use crate::dates::{self, ISO_FORMAT};
use crate::quantity::parse_quantity;
use crate::types::{Error, Field, NewOrder, Order, OrderId, Status};

/// The whole order book, in file order. Every mutation is followed by a
/// full rewrite of the file.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new() -> OrderStore {
        OrderStore { orders: Vec::new() }
    }

    pub fn from_orders(orders: Vec<Order>) -> Result<OrderStore, Error> {
        let mut seen = HashSet::new();
        for o in &orders {
            if !seen.insert(o.id) {
                return Err(Error::DuplicateId(o.id));
            }
        }
        Ok(OrderStore { orders })
    }

    /// A missing file is an empty book; any other failure is fatal.
    pub fn load(path: &Path) -> Result<OrderStore, Error> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} does not exist yet, starting with an empty book", path.display());
                return Ok(OrderStore::new());
            }
            Err(e) => return Err(Error::Io(path.display().to_string(), e)),
        };

        let store = OrderStore::from_orders(read_orders(BufReader::new(file))?)?;
        debug!("Loaded {} orders from {}", store.orders.len(), path.display());
        Ok(store)
    }

    /// Writes a sibling temp file and renames it over `path`.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let tmp = temp_path(path);
        let io_err = |e| Error::Io(tmp.display().to_string(), e);

        let file = File::create(&tmp).map_err(io_err)?;
        let written = write_orders(BufWriter::new(file), &self.orders).and_then(|_| {
            fs::rename(&tmp, path).map_err(|e| Error::Io(path.display().to_string(), e))
        });
        if let Err(e) = written {
            if let Err(rm) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {}", tmp.display(), rm);
            }
            return Err(e);
        }

        debug!("Saved {} orders to {}", self.orders.len(), path.display());
        Ok(())
    }

    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// `None` once the highest id is `OrderId::MAX`.
    pub fn next_id(&self) -> Option<OrderId> {
        match self.orders.iter().map(|o| o.id).max() {
            Some(m) => m.checked_add(1),
            None => Some(1),
        }
    }

    pub fn create(&mut self, order: NewOrder) -> Result<OrderId, Error> {
        let id = self.next_id().ok_or(Error::IdsExhausted)?;
        self.orders.push(order.with_id(id));
        info!("Created order {}", id);
        Ok(id)
    }

    pub fn update(&mut self, id: OrderId, field: Field, value: &str) -> Result<(), Error> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(Error::OrderNotFound(id))?;

        let slot = match field {
            Field::Id => return Err(Error::ReadOnlyField(field.header())),
            Field::Client => &mut order.client,
            Field::Contact => &mut order.contact,
            Field::Date => &mut order.date,
            Field::Status => &mut order.status,
            Field::CaruruKg => &mut order.caruru_kg,
            Field::BoboKg => &mut order.bobo_kg,
            Field::Value => &mut order.value,
        };
        *slot = value.to_string();
        info!("Order {}: {} set to `{}`", id, field.header(), value);
        Ok(())
    }

    pub fn set_status(&mut self, id: OrderId, status: Status) -> Result<(), Error> {
        self.update(id, Field::Status, status.label())
    }

    pub fn delete(&mut self, id: OrderId) -> Result<Order, Error> {
        let idx = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(Error::OrderNotFound(id))?;
        info!("Deleted order {}", id);
        Ok(self.orders.remove(idx))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Checks operator input before it reaches the book: the date must be
/// readable (it is stored as ISO) and the quantities must be numbers.
pub fn validate_new_order(order: NewOrder) -> Result<NewOrder, Error> {
    let date = dates::parse_date(&order.date)
        .ok_or_else(|| Error::InvalidDate(order.date.clone()))?;
    parse_quantity(Field::CaruruKg.header(), &order.caruru_kg)?;
    parse_quantity(Field::BoboKg.header(), &order.bobo_kg)?;
    parse_quantity(Field::Value.header(), &order.value)?;

    Ok(NewOrder {
        date: date.format(ISO_FORMAT).to_string(),
        ..order
    })
}

/// Same checks as [`validate_new_order`] for a single edited field. Returns
/// the text to store.
pub fn validate_field(field: Field, value: &str) -> Result<String, Error> {
    match field {
        Field::Date => dates::parse_date(value)
            .map(|d| d.format(ISO_FORMAT).to_string())
            .ok_or_else(|| Error::InvalidDate(value.to_string())),
        Field::CaruruKg | Field::BoboKg | Field::Value => {
            parse_quantity(field.header(), value)?;
            Ok(value.trim().to_string())
        }
        Field::Status => Status::recognize(value)
            .map(|s| s.label().to_string())
            .ok_or_else(|| Error::UnknownStatus(value.to_string())),
        Field::Id => Err(Error::ReadOnlyField(field.header())),
        Field::Client | Field::Contact => Ok(value.trim().to_string()),
    }
}
