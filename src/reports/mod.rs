use chargefield::api::{Simulation, SimulationSummary};
use chargefield::error::FieldResult;
use chargefield::presets::get_all_arrangements;
use chargefield::solver::ChargeFieldReport;
use chargefield::util::{fmt_float, fmt_sci};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_grid_summary(sim: &Simulation) {
    let (x1, y1, x2, y2) = sim.region.bounds();
    let (rows, cols) = sim.grid.dims();

    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Region").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "[{}, {}] x [{}, {}]",
            fmt_float(x1),
            fmt_float(x2),
            fmt_float(y1),
            fmt_float(y2)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Grid").add_attribute(Attribute::Bold),
        Cell::new(format!("{} x {} (lres {})", rows, cols, fmt_float(sim.region.lres()))),
    ]);
    table.add_row(vec![
        Cell::new("Charges").add_attribute(Attribute::Bold),
        Cell::new(sim.charges.len()),
    ]);
    table.add_row(vec![
        Cell::new("Peak |E| on grid").add_attribute(Attribute::Bold),
        Cell::new(format!("{} N/C", fmt_sci(sim.grid.max_magnitude(), 2))).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Streamlines").add_attribute(Attribute::Bold),
        Cell::new(sim.image.streamline_count),
    ]);
    println!("\n{}", table);
}

pub fn print_charge_table(reports: &[ChargeFieldReport]) {
    if reports.is_empty() {
        return;
    }

    let mut table = base_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("x"),
        Cell::new("y"),
        Cell::new("q"),
        Cell::new("|E| (N/C)").fg(Color::Cyan),
    ]);
    for i in 0..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in reports {
        let q_cell = Cell::new(fmt_float(r.charge.q));
        let q_cell = if r.charge.is_positive() {
            q_cell.fg(Color::Green)
        } else {
            q_cell.fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(r.index),
            Cell::new(fmt_float(r.charge.x)),
            Cell::new(fmt_float(r.charge.y)),
            q_cell,
            Cell::new(fmt_sci(r.magnitude, 2)).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_batch_table(results: &[(String, FieldResult<SimulationSummary>)]) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Scenario").add_attribute(Attribute::Bold),
        Cell::new("Charges"),
        Cell::new("Grid"),
        Cell::new("Peak |E| (N/C)").fg(Color::Cyan),
        Cell::new("Status"),
    ]);

    for (name, result) in results {
        match result {
            Ok(s) => table.add_row(vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new(s.charge_count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{}x{}", s.grid_rows, s.grid_cols)),
                Cell::new(fmt_sci(s.peak_grid_field, 2)).fg(Color::Cyan),
                Cell::new("ok").fg(Color::Green),
            ]),
            Err(e) => table.add_row(vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(e.to_string()).fg(Color::Red),
            ]),
        };
    }
    println!("\n{}", table);
}

pub fn print_presets_table() {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Preset").add_attribute(Attribute::Bold),
        Cell::new("Charges"),
        Cell::new("Description"),
    ]);
    for (arrangement, charges) in get_all_arrangements() {
        table.add_row(vec![
            Cell::new(arrangement.to_string()).add_attribute(Attribute::Bold),
            Cell::new(charges.len()).set_alignment(CellAlignment::Right),
            Cell::new(arrangement.description()),
        ]);
    }
    println!("\n{}", table);
}
