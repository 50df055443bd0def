use std::fmt::{self, Display};

use chrono::NaiveDate;
use itertools::Itertools;
use log::warn;

use crate::dates::{normalize_store, DateIssue, ISO_FORMAT};
use crate::quantity::{format_quantity, parse_quantity, Totals};
use crate::types::{Error, Field, Order, OrderId, Status};

/// One delivered order as it appears in the report listing.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveredLine {
    pub id: OrderId,
    pub client: String,
    pub totals: Totals,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumberIssue {
    pub id: OrderId,
    pub client: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub total_count: usize,
    pub pending_count: usize,
    /// Raw status labels with their counts, in the order first seen.
    pub by_status: Vec<(String, usize)>,
    pub all_totals: Totals,
    pub pending_totals: Totals,
    pub delivered: Vec<DeliveredLine>,
    pub date_issues: Vec<DateIssue>,
    pub number_issues: Vec<NumberIssue>,
}

fn order_totals(o: &Order) -> Result<Totals, Error> {
    Ok(Totals::new(
        parse_quantity(Field::CaruruKg.header(), &o.caruru_kg)?,
        parse_quantity(Field::BoboKg.header(), &o.bobo_kg)?,
        parse_quantity(Field::Value.header(), &o.value)?,
    ))
}

impl DayReport {
    /// Single pass over the book. Orders with an unreadable number still
    /// count towards the date and status counts but add nothing to any sum.
    pub fn build(orders: &[Order], date: NaiveDate) -> DayReport {
        let (normalized, date_issues) = normalize_store(orders);

        let mut report = DayReport {
            date,
            total_count: 0,
            pending_count: 0,
            by_status: Vec::new(),
            all_totals: Totals::default(),
            pending_totals: Totals::default(),
            delivered: Vec::new(),
            date_issues,
            number_issues: Vec::new(),
        };

        for (o, d) in normalized {
            if d.valid() != Some(date) {
                continue;
            }

            report.total_count += 1;
            match report.by_status.iter_mut().find(|(label, _)| *label == o.status) {
                Some((_, n)) => *n += 1,
                None => report.by_status.push((o.status.clone(), 1)),
            }

            let delivered = Status::from_label(&o.status).is_delivered();
            if !delivered {
                report.pending_count += 1;
            }

            let totals = match order_totals(o) {
                Ok(t) => t,
                Err(e) => {
                    warn!("Order {}: {}", o.id, e);
                    report.number_issues.push(NumberIssue {
                        id: o.id,
                        client: o.client.clone(),
                        error: e.to_string(),
                    });
                    Totals::default()
                }
            };

            report.all_totals = report.all_totals + totals;
            if delivered {
                report.delivered.push(DeliveredLine {
                    id: o.id,
                    client: o.client.clone(),
                    totals,
                });
            } else {
                report.pending_totals = report.pending_totals + totals;
            }
        }

        report
    }

    pub fn delivered_count(&self) -> usize {
        self.total_count - self.pending_count
    }

    pub fn delivered_totals(&self) -> Totals {
        self.all_totals - self.pending_totals
    }
}

impl Display for DayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orders for {}", self.date.format(ISO_FORMAT))?;
        writeln!(f, "Total orders: {}", self.total_count)?;

        if !self.by_status.is_empty() {
            writeln!(f)?;
            writeln!(f, "By status:")?;
            for (label, n) in &self.by_status {
                writeln!(f, "  {:<20} {}", format!("'{}'", label), n)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "All ({}):        {}", self.total_count, self.all_totals)?;
        writeln!(f, "Pending ({}):    {}", self.pending_count, self.pending_totals)?;
        writeln!(f, "Delivered ({}):  {}", self.delivered_count(), self.delivered_totals())?;

        if !self.delivered.is_empty() {
            writeln!(f)?;
            writeln!(f, "Delivered orders:")?;
            for line in &self.delivered {
                writeln!(
                    f,
                    "  #{} {}: caruru {} kg, bobó {} kg, R$ {}",
                    line.id,
                    line.client,
                    format_quantity(line.totals.caruru_kg),
                    format_quantity(line.totals.bobo_kg),
                    format_quantity(line.totals.value)
                )?;
            }
        }

        if !self.date_issues.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Unreadable dates ({}): ids {}",
                self.date_issues.len(),
                self.date_issues.iter().map(|i| i.id).join(", ")
            )?;
            for issue in &self.date_issues {
                writeln!(f, "  {}", issue)?;
            }
        }

        if !self.number_issues.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Unreadable numbers ({}), left out of the sums:",
                self.number_issues.len()
            )?;
            for issue in &self.number_issues {
                writeln!(f, "  #{} {}: {}", issue.id, issue.client, issue.error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(
        id: OrderId,
        date: &str,
        status: &str,
        caruru: &str,
        bobo: &str,
        value: &str,
    ) -> Order {
        Order {
            id,
            client: format!("Cliente {id}"),
            contact: String::new(),
            date: date.to_string(),
            status: status.to_string(),
            caruru_kg: caruru.to_string(),
            bobo_kg: bobo.to_string(),
            value: value.to_string(),
        }
    }

    fn christmas_eve() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()
    }

    fn christmas_book() -> Vec<Order> {
        vec![
            order(1, "2025-12-24", "pending", "2.0", "1.0", "50.0"),
            order(2, "24/12/2025", "pending", "1.5", "0.5", "30.0"),
            order(3, "2025-12-24", "delivered", "1.0", "1.0", "40.0"),
            order(4, "2025-12-25", "pending", "9.0", "9.0", "900.0"),
        ]
    }

    #[test]
    fn pending_and_delivered_split() {
        let r = DayReport::build(&christmas_book(), christmas_eve());

        assert_eq!(r.total_count, 3);
        assert_eq!(r.pending_count, 2);
        assert_eq!(r.delivered_count(), 1);
        assert_eq!(r.all_totals, Totals::new(4.5, 2.5, 120.0));
        assert_eq!(r.pending_totals, Totals::new(3.5, 1.5, 80.0));
        assert_eq!(r.delivered_totals(), Totals::new(1.0, 1.0, 40.0));
        assert_eq!(
            r.delivered,
            vec![DeliveredLine {
                id: 3,
                client: "Cliente 3".to_string(),
                totals: Totals::new(1.0, 1.0, 40.0),
            }]
        );
    }

    #[test]
    fn parts_add_up_to_the_whole() {
        let book = vec![
            order(1, "2025-12-24", "🔴 Pendente", "0.25", "0.5", "10.5"),
            order(2, "2025-12-24", "✅ Entregue", "0.75", "0.25", "33.25"),
            order(3, "2025-12-24", "🟡 Em produção", "1.5", "", "21.75"),
            order(4, "2025-12-24", "✅ Entregue", "2,25", "0.125", "R$ 7,50"),
        ];
        let r = DayReport::build(&book, christmas_eve());

        assert_eq!(r.pending_totals + r.delivered_totals(), r.all_totals);
        assert_eq!(r.by_status.iter().map(|(_, n)| n).sum::<usize>(), r.total_count);
    }

    #[test]
    fn status_groups_use_exact_labels() {
        let book = vec![
            order(1, "2025-12-24", "✅ Entregue", "1", "1", "1"),
            order(2, "2025-12-24", "Entregue", "1", "1", "1"),
            order(3, "2025-12-24", "✅ Entregue", "1", "1", "1"),
            order(4, "2025-12-24", "Aguardando", "1", "1", "1"),
        ];
        let r = DayReport::build(&book, christmas_eve());

        assert_eq!(
            r.by_status,
            vec![
                ("✅ Entregue".to_string(), 2),
                ("Entregue".to_string(), 1),
                ("Aguardando".to_string(), 1),
            ]
        );
        // Both spellings of "delivered" count as delivered; the unknown label is pending.
        assert_eq!(r.delivered_count(), 3);
        assert_eq!(r.pending_count, 1);
    }

    #[test]
    fn invalid_dates_are_listed_and_excluded() {
        let book = vec![
            order(1, "2025-12-24", "pending", "1", "1", "10"),
            order(2, "31/02/2025", "pending", "1", "1", "10"),
            order(3, "", "pending", "1", "1", "10"),
        ];
        let r = DayReport::build(&book, christmas_eve());

        assert_eq!(r.total_count, 1);
        assert_eq!(r.date_issues.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(r.date_issues[0].raw, "31/02/2025");
    }

    #[test]
    fn bad_numbers_are_flagged_not_fatal() {
        let book = vec![
            order(1, "2025-12-24", "pending", "2.0", "1.0", "50.0"),
            order(2, "2025-12-24", "pending", "dois", "1.0", "50.0"),
            order(3, "2025-12-24", "delivered", "1.0", "1.0", "quarenta"),
        ];
        let r = DayReport::build(&book, christmas_eve());

        assert_eq!(r.total_count, 3);
        assert_eq!(r.pending_count, 2);
        assert_eq!(r.all_totals, Totals::new(2.0, 1.0, 50.0));
        assert_eq!(r.pending_totals, Totals::new(2.0, 1.0, 50.0));
        assert_eq!(r.delivered_totals(), Totals::default());
        assert_eq!(r.number_issues.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(r.number_issues[0].error, "Invalid number for Caruru: `dois`");
    }

    #[test]
    fn empty_book_is_all_zeros() {
        let r = DayReport::build(&[], christmas_eve());

        assert_eq!(r.total_count, 0);
        assert_eq!(r.delivered_count(), 0);
        assert_eq!(r.all_totals, Totals::default());
        assert_eq!(
            r.to_string(),
            "Orders for 2025-12-24
Total orders: 0

All (0):        caruru 0.00 kg | bobó 0.00 kg | R$ 0.00
Pending (0):    caruru 0.00 kg | bobó 0.00 kg | R$ 0.00
Delivered (0):  caruru 0.00 kg | bobó 0.00 kg | R$ 0.00
"
        );
    }

    #[test]
    fn rendered_report() {
        let mut book = christmas_book();
        book.push(order(5, "31/02/2025", "pending", "1", "1", "1"));

        let r = DayReport::build(&book, christmas_eve());
        let expected = "Orders for 2025-12-24
Total orders: 3

By status:
  'pending'            2
  'delivered'          1

All (3):        caruru 4.50 kg | bobó 2.50 kg | R$ 120.00
Pending (2):    caruru 3.50 kg | bobó 1.50 kg | R$ 80.00
Delivered (1):  caruru 1.00 kg | bobó 1.00 kg | R$ 40.00

Delivered orders:
  #3 Cliente 3: caruru 1.00 kg, bobó 1.00 kg, R$ 40.00

Unreadable dates (1): ids 5
  #5 Cliente 5: cannot read date `31/02/2025`
";
        assert_eq!(r.to_string(), expected);
        assert_eq!(DayReport::build(&book, christmas_eve()).to_string(), expected);
    }
}
