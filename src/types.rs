use std::fmt::Display;

pub type OrderId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub client: String,
    pub contact: String,
    pub date: String,
    pub status: String,
    pub caruru_kg: String,
    pub bobo_kg: String,
    pub value: String,
}

/// Everything an order needs except its id, which the store assigns.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub client: String,
    pub contact: String,
    pub date: String,
    pub status: String,
    pub caruru_kg: String,
    pub bobo_kg: String,
    pub value: String,
}

impl NewOrder {
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            client: self.client,
            contact: self.contact,
            date: self.date,
            status: self.status,
            caruru_kg: self.caruru_kg,
            bobo_kg: self.bobo_kg,
            value: self.value,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    InProgress,
    Delivered,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "🔴 Pendente",
            Status::InProgress => "🟡 Em produção",
            Status::Delivered => "✅ Entregue",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Status::Delivered)
    }

    /// Maps a stored label onto a status; anything unrecognized is `Pending`
    /// so legacy labels keep working.
    pub fn from_label(label: &str) -> Status {
        Status::recognize(label).unwrap_or(Status::Pending)
    }

    /// Emoji prefixes and case are ignored and English aliases accepted.
    pub fn recognize(label: &str) -> Option<Status> {
        let key: String = label
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ");

        match key.as_str() {
            "pendente" | "pending" => Some(Status::Pending),
            "em produção" | "em producao" | "in progress" | "preparing" => {
                Some(Status::InProgress)
            }
            "entregue" | "delivered" | "done" => Some(Status::Delivered),
            _ => None,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The columns an edit may target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Id,
    Client,
    Contact,
    Date,
    Status,
    CaruruKg,
    BoboKg,
    Value,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Client,
        Field::Contact,
        Field::Date,
        Field::Status,
        Field::CaruruKg,
        Field::BoboKg,
        Field::Value,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Client => "Cliente",
            Field::Contact => "Contato",
            Field::Date => "Data",
            Field::Status => "Status",
            Field::CaruruKg => "Caruru",
            Field::BoboKg => "Bobó",
            Field::Value => "Valor",
        }
    }

    fn snake_name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Client => "client",
            Field::Contact => "contact",
            Field::Date => "date",
            Field::Status => "status",
            Field::CaruruKg => "caruru_kg",
            Field::BoboKg => "bobo_kg",
            Field::Value => "value",
        }
    }
}

impl std::str::FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_accents(s.trim());
        Field::ALL
            .into_iter()
            .find(|f| fold_accents(f.header()) == wanted || f.snake_name() == wanted)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

fn fold_accents(s: &str) -> String {
    s.to_lowercase().replace('ó', "o")
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on `{0}`: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {0}: invalid order id `{1}`")]
    InvalidId(u64, String),
    #[error("Duplicate order id {0}")]
    DuplicateId(OrderId),
    #[error("Order ids exhausted")]
    IdsExhausted,
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    #[error("Unknown status `{0}`")]
    UnknownStatus(String),
    #[error("Unknown field `{0}`")]
    UnknownField(String),
    #[error("Field `{0}` cannot be edited")]
    ReadOnlyField(&'static str),
    #[error("Invalid date `{0}`")]
    InvalidDate(String),
    #[error("Invalid number for {0}: `{1}`")]
    InvalidNumber(&'static str, String),
    #[error("Configuration error: {0}")]
    Config(String),
}
