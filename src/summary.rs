// 📊 Bill Summary - a snapshot of the table for display and export

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::io;

use crate::entities::{Cents, ConsumableId};
use crate::money::print_price;
use crate::store::TableStore;
use crate::table::TableManager;

#[derive(Debug, Clone, Serialize)]
pub struct ConsumableLine {
    pub id: ConsumableId,
    pub name: String,
    pub price: Cents,
    pub quantity: u32,
    pub total: Cents,
    pub consumers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonLine {
    pub name: String,
    pub items: usize,
    /// Share before tip
    pub subtotal: Cents,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillSummary {
    pub generated_at: DateTime<Utc>,
    pub tip_percent: u32,
    pub total: Cents,
    pub total_with_tip: Cents,
    /// Items nobody has claimed yet
    pub unclaimed: Cents,
    /// Cents lost to uneven splits
    pub rounding_loss: Cents,
    pub consumables: Vec<ConsumableLine>,
    pub persons: Vec<PersonLine>,
}

impl BillSummary {
    pub fn from_table<S: TableStore>(table: &TableManager<S>) -> Self {
        let consumables = table
            .consumables()
            .iter()
            .map(|c| ConsumableLine {
                id: c.id,
                name: c.name.clone(),
                price: c.price,
                quantity: c.quantity,
                total: c.total_price(),
                consumers: c.number_of_consumers(),
            })
            .collect();

        let persons = table
            .persons()
            .iter()
            .map(|p| PersonLine {
                name: p.name.clone(),
                items: p.number_of_consumables(),
                subtotal: p.personal_bill(table.consumables()),
                total: table.personal_bill(p),
            })
            .collect();

        BillSummary {
            generated_at: Utc::now(),
            tip_percent: table.tip(),
            total: table.total_bill(),
            total_with_tip: table.total_bill_with_tip(),
            unclaimed: table.unclaimed_total(),
            rounding_loss: table.rounding_loss(),
            consumables,
            persons,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize bill summary")
    }

    /// One CSV row per person
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for line in &self.persons {
            wtr.serialize(line).context("Failed to write CSV row")?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Items");
        for c in &self.consumables {
            let _ = writeln!(
                out,
                "  #{:<4} {:<24} {:>3} x {:>10} = {:>10}  ({} sharing)",
                c.id,
                c.name,
                c.quantity,
                print_price(c.price),
                print_price(c.total),
                c.consumers
            );
        }

        let _ = writeln!(out, "Persons");
        for p in &self.persons {
            let _ = writeln!(
                out,
                "  {:<24} {:>3} items  {:>10}",
                p.name,
                p.items,
                print_price(p.total)
            );
        }

        let _ = writeln!(out, "Total:          {:>10}", print_price(self.total));
        let _ = writeln!(
            out,
            "With {:>3}% tip: {:>10}",
            self.tip_percent,
            print_price(self.total_with_tip)
        );
        if self.unclaimed > 0 {
            let _ = writeln!(out, "Unclaimed:      {:>10}", print_price(self.unclaimed));
        }
        if self.rounding_loss > 0 {
            let _ = writeln!(out, "Rounding loss:  {:>10}", print_price(self.rounding_loss));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample_table() -> TableManager<MemoryStore> {
        let mut table = TableManager::open(MemoryStore::new(), 10).unwrap();
        table.add_person("ana").unwrap();
        table.add_person("bruno").unwrap();
        let pizza = table.add_consumable("Pizza", 1000, 1).unwrap().id;
        table.add_consumable("Beer", 450, 2).unwrap();
        table.add_consumable_to_person(pizza, "ana").unwrap();
        table.add_consumable_to_person(pizza, "bruno").unwrap();
        table
    }

    #[test]
    fn test_summary_totals() {
        let summary = BillSummary::from_table(&sample_table());

        assert_eq!(summary.tip_percent, 10);
        assert_eq!(summary.total, 1900);
        assert_eq!(summary.total_with_tip, 2090);
        assert_eq!(summary.unclaimed, 900);
        assert_eq!(summary.rounding_loss, 0);
        assert_eq!(summary.consumables.len(), 2);
        assert_eq!(summary.consumables[0].consumers, 2);

        assert_eq!(summary.persons[0].name, "ana");
        assert_eq!(summary.persons[0].subtotal, 500);
        assert_eq!(summary.persons[0].total, 550);
    }

    #[test]
    fn test_summary_json() {
        let json = BillSummary::from_table(&sample_table()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 1900);
        assert_eq!(value["persons"][1]["name"], "bruno");
    }

    #[test]
    fn test_summary_csv() {
        let mut buffer = Vec::new();
        BillSummary::from_table(&sample_table())
            .write_csv(&mut buffer)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name,items,subtotal,total");
        assert_eq!(lines[1], "ana,1,500,550");
        assert_eq!(lines[2], "bruno,1,500,550");
    }

    #[test]
    fn test_summary_text() {
        let text = BillSummary::from_table(&sample_table()).render_text();

        assert!(text.contains("Pizza"));
        assert!(text.contains("$20.90"));
        assert!(text.contains("Unclaimed:"));
        assert!(!text.contains("Rounding loss:"));
    }
}
