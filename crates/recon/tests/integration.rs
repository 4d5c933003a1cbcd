use std::path::PathBuf;

use roilens_core::{Channel, ChannelTag, CrmMovement, CustomerId, Filter, WeeklyEntry};
use roilens_engine::aggregate;
use roilens_recon::{crm_by_channel, crm_series, crm_totals, customer_summary, import_csv};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_movements() -> Vec<CrmMovement> {
    serde_json::from_str(&read_fixture("movements.json")).unwrap()
}

#[test]
fn csv_import_merges_into_the_working_set() {
    let mut existing = WeeklyEntry::new(2025, 3, 1, ChannelTag::from("WHATSAPP"));
    existing.spend = 100.0;
    existing.revenue = 250.0;
    let existing_id = existing.id.clone();

    let csv = read_fixture("weekly-import.csv");
    let outcome = import_csv(&csv, &[existing], &Filter::new(2025).with_month(3)).unwrap();

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.rows.len(), 3);
    assert!(outcome.invalid.is_empty());

    // the matched row keeps its id but takes the imported values
    let kept = outcome.rows.iter().find(|r| r.id == existing_id).unwrap();
    assert_eq!(kept.spend, 1200.0);
    assert_eq!(kept.revenue, 3900.0);
    assert_eq!(kept.notes, "Campaña arranque");

    // lower-cased channel text canonicalized during parse
    let week2 = outcome
        .rows
        .iter()
        .find(|r| r.week_of_month == 2)
        .unwrap();
    assert_eq!(week2.channel.known(), Some(Channel::Whatsapp));
}

#[test]
fn merged_rows_aggregate_like_any_other_set() {
    let csv = read_fixture("weekly-import.csv");
    let outcome = import_csv(&csv, &[], &Filter::new(2025).with_month(3)).unwrap();

    let totals = aggregate(&outcome.rows);
    assert_eq!(totals.spend, 1200.0 + 350.0 + 900.0);
    assert_eq!(totals.revenue, 3900.0 + 800.0 + 2100.0);
    assert_eq!(totals.leads, 40.0 + 25.0);
    assert_eq!(totals.new_customers, 9.0);
}

#[test]
fn crm_march_report_from_store_shaped_json() {
    let movements = load_movements();
    let march = Filter::new(2025).with_month(3);

    let totals = crm_totals(&movements, &march);
    assert_eq!(totals.revenue_gross, 3500.0 + 1200.0 + 2800.0 + 2200.0);
    assert_eq!(totals.refunds, 500.0);
    assert_eq!(totals.revenue_net, 9200.0);
    assert_eq!(totals.number_of_sales, 4);
    // ana and bruno are new in March; carla first bought in February;
    // diego is pending and elisa's sale is trashed
    assert_eq!(totals.new_customers, 2);
    assert_eq!(totals.avg_ticket, 9700.0 / 4.0);

    let rows = crm_by_channel(&movements, &march);
    assert_eq!(rows.len(), Channel::ALL.len());
    let whatsapp = rows.iter().find(|r| r.channel == Channel::Whatsapp).unwrap();
    assert_eq!(whatsapp.totals.revenue_gross, 3500.0);
    assert_eq!(whatsapp.totals.refunds, 500.0);
    assert_eq!(whatsapp.totals.new_customers, 1);
    let meta = rows.iter().find(|r| r.channel == Channel::MetaAds).unwrap();
    assert_eq!(meta.totals.revenue_gross, 2800.0);
    assert_eq!(meta.totals.new_customers, 1);

    let series = crm_series(&movements, &march);
    assert_eq!(series.len(), 31);
    assert_eq!(series[3].label, "2025-03-04");
    assert_eq!(series[3].totals.revenue_gross, 3500.0);
    assert_eq!(series[11].totals.revenue_gross, 0.0);
}

#[test]
fn customer_lifetime_summary_from_store_shaped_json() {
    let movements = load_movements();
    let summary = customer_summary(&movements, &CustomerId::from("cli-ana"));

    assert_eq!(summary.revenue_gross, 4700.0);
    assert_eq!(summary.refunds, 500.0);
    assert_eq!(summary.revenue_net, 4200.0);
    assert_eq!(summary.number_of_sales, 2);
    assert_eq!(summary.avg_ticket, 2350.0);
    assert_eq!(summary.first_sale.map(|d| d.to_string()), Some("2025-03-04".into()));
    assert_eq!(summary.last_sale.map(|d| d.to_string()), Some("2025-03-18".into()));
}
