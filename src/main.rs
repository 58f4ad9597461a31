// Terminal front end for the sales dashboard.
//
// Each menu option is one dashboard section:
// - [1] loads a workbook into the session,
// - [2]..[5] re-run the pipeline and print metrics, tables and charts,
// - [6] writes a JSON snapshot of the current dashboard.
// The session is owned by `main` and passed down; there is no global state.
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sales_dashboard::output::{
    preview_dataset, render_bar_chart, write_export, write_json,
};
use sales_dashboard::util::{format_currency, format_int, format_number};
use sales_dashboard::{
    ColumnNames, DashboardConfig, Metric, Section, Selection, Session,
};

const PREVIEW_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "sales_dashboard", about = "Sales metrics and charts from a spreadsheet")]
struct Args {
    /// Workbook to load at startup
    workbook: Option<PathBuf>,

    /// Directory for CSV exports and JSON snapshots
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON file overriding the expected column names
    #[arg(long)]
    columns: Option<PathBuf>,
}

/// Read one trimmed line after printing `prompt`; `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask a yes/no question until the user answers Y or N.
fn prompt_yes_no(question: &str) -> bool {
    loop {
        let Some(resp) = read_line(&format!("{} (Y/N): ", question)) else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Numbered single-select; returns the chosen index into `options`.
fn prompt_pick(title: &str, options: &[String]) -> Option<usize> {
    println!("{}", title);
    for (i, opt) in options.iter().enumerate() {
        println!("[{}] {}", i, opt);
    }
    loop {
        let choice = read_line("Enter choice: ")?;
        match choice.parse::<usize>() {
            Ok(i) if i < options.len() => return Some(i),
            _ => println!("Invalid choice. Please enter 0-{}.", options.len() - 1),
        }
    }
}

fn money(config: &DashboardConfig, metric: &Metric<f64>) -> String {
    metric.render(|v| format_currency(&config.currency_symbol, *v))
}

fn whole(metric: &Metric<f64>) -> String {
    metric.render(|v| format_number(*v, 0))
}

fn print_welcome(columns: &ColumnNames) {
    println!("Please load an Excel file to get started.");
    println!("Expected columns in your Excel file:");
    for c in columns.expected_columns() {
        println!("  - {}", c);
    }
    println!();
}

fn handle_load(session: &mut Session, path: &Path) {
    match session.upload_path(path) {
        Ok(report) => {
            println!(
                "Loaded {} rows x {} columns from sheet '{}'.",
                format_int(report.total_rows),
                format_int(report.columns),
                report.sheet_name
            );
            if report.skipped_blank_rows > 0 {
                println!(
                    "Note: {} blank rows skipped.",
                    format_int(report.skipped_blank_rows)
                );
            }
            println!();
        }
        Err(e) => eprintln!("Failed to load file: {}\n", e),
    }
}

fn handle_overview(session: &Session) {
    let Some(dash) = session.dashboard() else {
        return print_welcome(&session.config().columns);
    };
    let config = session.config();
    let s = &dash.summary;
    println!("Data Overview");
    println!("  Total Records: {}", format_int(s.total_records));
    println!("  Total Sales:   {}", money(config, &s.total_sales));
    println!("  Total Units:   {}", whole(&s.total_units));
    println!("  Avg Sale:      {}\n", money(config, &s.average_sale));
}

fn handle_region(session: &mut Session) {
    let Some(dash) = session.dashboard() else {
        return print_welcome(&session.config().columns);
    };
    let config = session.config().clone();
    let Some(regions) = dash.region_choices else {
        println!("Error: {} column not found in the data\n", config.columns.region);
        return;
    };

    let mut options = vec![config.all_regions_label.clone()];
    options.extend(regions);
    let Some(picked) = prompt_pick("Select Region:", &options) else {
        return;
    };
    let selection = if picked == 0 {
        Selection::All
    } else {
        Selection::Region(options[picked].clone())
    };
    session.select_region(selection);

    if let Some(dash) = session.dashboard() {
        println!(
            "Showing {} records for {}",
            format_int(dash.filtered_records),
            options[picked]
        );
        println!("{}\n", preview_dataset(dash.filtered(), PREVIEW_ROWS));
    }
}

fn handle_analytics(session: &Session) {
    let Some(dash) = session.dashboard() else {
        return print_welcome(&session.config().columns);
    };
    println!("Sales Analytics\n");
    match &dash.charts {
        Section::Ready { data } => {
            println!("{}\n", render_bar_chart("Units Sold by Salesperson", &data.units_sold, 0));
            println!("{}\n", render_bar_chart("Total Sales by Salesperson", &data.total_sales, 0));
            println!(
                "{}\n",
                render_bar_chart("Average Sales by Salesperson", &data.average_sales, 2)
            );
        }
        Section::Skipped { missing } => {
            let required = session.config().columns.chart_columns().join(", ");
            println!("Warning: Required columns ({}) not found in the data", required);
            println!("Missing columns: {:?}\n", missing);
        }
    }
}

fn handle_salesperson(session: &Session) {
    let Some(mut dash) = session.dashboard() else {
        return print_welcome(&session.config().columns);
    };
    let config = session.config();
    let people = match &dash.salespeople {
        Section::Ready { data } => data.clone(),
        Section::Skipped { .. } => {
            println!(
                "Error: {} and {} columns not found in the data\n",
                config.columns.first_name, config.columns.last_name
            );
            return;
        }
    };
    if people.is_empty() {
        println!("No salespeople in the current selection.\n");
        return;
    }
    let Some(picked) = prompt_pick("Select Salesperson for detailed analysis:", &people) else {
        return;
    };
    let report = match dash.entity_report(config, &people[picked]) {
        Ok(report) => report,
        Err(e) => {
            println!("Error: {}\n", e);
            return;
        }
    };

    println!("Salesperson Analysis: {}", report.identity);
    println!("  Records:     {}", format_int(report.record_count));
    println!("  Total Sales: {}", money(config, &report.total_sales));
    println!("  Units Sold:  {}", whole(&report.total_units));
    println!("  Salary:      {}", money(config, &report.reference_salary));
    println!("\nData for {}:", report.identity);
    println!("{}\n", preview_dataset(&report.rows, PREVIEW_ROWS));

    if prompt_yes_no(&format!("Download {} data as CSV", report.identity)) {
        match write_export(&config.out_dir, &report, &config.export_suffix) {
            Ok(path) => println!("Saved {}\n", path.display()),
            Err(e) => eprintln!("Write error: {}\n", e),
        }
    }
}

fn handle_snapshot(session: &Session) {
    let Some(dash) = session.dashboard() else {
        return print_welcome(&session.config().columns);
    };
    let path = session.config().out_dir.join("dashboard.json");
    match write_json(&path, &dash) {
        Ok(()) => println!("Dashboard snapshot saved to {}\n", path.display()),
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = DashboardConfig {
        out_dir: args.out_dir,
        ..DashboardConfig::default()
    };
    if let Some(path) = &args.columns {
        config.columns = ColumnNames::from_json_file(path)?;
    }
    let mut session = Session::new(config);

    println!("Sales Dashboard\n");
    match &args.workbook {
        Some(path) => handle_load(&mut session, path),
        None => print_welcome(&session.config().columns),
    }

    loop {
        println!("[1] Load workbook");
        println!("[2] Data overview");
        println!("[3] Filter by region");
        println!("[4] Sales analytics");
        println!("[5] Salesperson analysis");
        println!("[6] Save dashboard snapshot");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Some(path) = read_line("Workbook path: ") {
                    handle_load(&mut session, Path::new(&path));
                }
            }
            "2" => handle_overview(&session),
            "3" => handle_region(&mut session),
            "4" => handle_analytics(&session),
            "5" => handle_salesperson(&session),
            "6" => handle_snapshot(&session),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
    Ok(())
}
