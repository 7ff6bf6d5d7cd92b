use analytics::{BreakEvenOutcome, MetricsReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use configuration::BreakEvenSettings;
use core_types::CostSchedule;
use rust_decimal::Decimal;

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text.to_string()).set_alignment(CellAlignment::Right)
}

pub fn metrics_table(report: &MetricsReport) -> Table {
    let rows: Vec<(&str, String)> = vec![
        ("Available stock", report.available_stock.to_string()),
        ("Expected leads", report.expected_leads.to_string()),
        ("Confirmed orders", report.confirmed_orders.to_string()),
        ("Delivered orders", report.delivered_orders.to_string()),
        ("Returned orders", report.returned_orders.to_string()),
        ("Total revenue", money(report.total_revenue)),
        ("Advertising costs", money(report.advertising_costs)),
        ("Stock costs", money(report.stock_costs)),
        ("Delivery costs", money(report.delivery_costs)),
        ("Return costs", money(report.return_costs)),
        ("COD fees", money(report.cod_fees)),
        ("Call center costs", money(report.call_center_costs)),
        ("Total costs", money(report.total_costs)),
        ("Total profit", money(report.total_profit)),
        ("Profit per unit", money(report.profit_per_unit)),
        ("ROI", percent(report.roi)),
        ("Profit margin", percent(report.profit_margin)),
    ];

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right(value)]);
    }
    table
}

pub fn cost_schedule_table(costs: &CostSchedule) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Fee", "Rate"]);
    table.add_row(vec![Cell::new("Delivery fee / confirmed order"), right(money(costs.delivery_fee))]);
    table.add_row(vec![Cell::new("Return fee / returned order"), right(money(costs.return_fee))]);
    table.add_row(vec![Cell::new("COD fee / revenue"), right(percent(costs.cod_fee_rate))]);
    table.add_row(vec![Cell::new("Call center fee / confirmed order"), right(money(costs.call_center_fee))]);
    table
}

pub fn break_even_table(
    outcome: &BreakEvenOutcome,
    target: Decimal,
    settings: &BreakEvenSettings,
) -> Table {
    let status = match outcome {
        BreakEvenOutcome::Converged { .. } => "converged",
        BreakEvenOutcome::NotConverged { .. } if outcome.total_profit() < target => {
            "not reachable in search range"
        }
        BreakEvenOutcome::NotConverged { .. } => "approximate",
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Status",
        "Search range",
        "Target profit",
        "Stock",
        "Profit at stock",
        "Iterations",
        "Monotonic",
    ]);
    table.add_row(vec![
        Cell::new(status),
        right(format!("{}..={}", settings.lower_bound, settings.upper_bound)),
        right(money(target)),
        right(outcome.stock()),
        right(money(outcome.total_profit())),
        right(outcome.iterations()),
        Cell::new(if outcome.is_monotonic() { "yes" } else { "no" }),
    ]);
    table
}

pub fn sweep_table(reports: &[MetricsReport]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Stock",
        "Leads",
        "Confirmed",
        "Delivered",
        "Returned",
        "Revenue",
        "Costs",
        "Profit",
        "ROI",
        "Margin",
    ]);
    for report in reports {
        table.add_row(vec![
            right(report.available_stock),
            right(report.expected_leads),
            right(report.confirmed_orders),
            right(report.delivered_orders),
            right(report.returned_orders),
            right(money(report.total_revenue)),
            right(money(report.total_costs)),
            right(money(report.total_profit)),
            right(percent(report.roi)),
            right(percent(report.profit_margin)),
        ]);
    }
    table
}
