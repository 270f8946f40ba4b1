/// Dashboard Example
///
/// This example demonstrates:
/// - Loading listings from CSV and cleaning them
/// - Printing the state summary table
/// - Driving one dashboard session with actions
/// - Printing each view's render data as JSON

use listingview::{
    state_summary, Action, Dashboard, DashboardConfig, Geometry, ListingTable, SharedTables,
};

const LISTINGS: &str = "\
status,price,bed,bath,acre_lot,city,state,house_size
for_sale,105000,3,2,0.12,Adjuntas,Puerto Rico,920
for_sale,80000,4,2,0.08,Adjuntas,Puerto Rico,1527
sold,179000,4,3,0.46,San Sebastian,Puerto Rico,2520
for_sale,405000,3,2,1.0,Agawam,Massachusetts,1850
for_sale,329900,3,2,0.34,Agawam,Massachusetts,1592
for_sale,275000,3,2,1.01,Amherst,Massachusetts,
for_sale,250000,3,2,0.3,Vergennes,Vermont,1166
for_sale,189000,2,1,0.5,Barre,Vermont,0
";

const STATES: &str = "\
long,lat,group,order,region,subregion
-71.1,42.1,1,1,massachusetts,
-71.2,42.2,1,2,massachusetts,
-73.2,44.1,2,3,vermont,
-73.3,44.2,2,4,vermont,
-72.5,43.0,3,5,new hampshire,
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ListingView Dashboard Example ===\n");

    // 1. Load and clean
    println!("1. Loading listings...");
    let raw = ListingTable::from_csv_reader("listings", LISTINGS.as_bytes())?;
    let geometry = Geometry::from_csv_reader(STATES.as_bytes())?;
    let tables = SharedTables::new(raw, geometry);
    println!(
        "   {} listings, {} after cleaning\n",
        tables.raw.len(),
        tables.cleaned.len()
    );

    // 2. Aggregate
    println!("2. Average price by state:");
    for summary in state_summary(&tables.cleaned)? {
        println!(
            "   {:<16} {:>12.2} ({} listings)",
            summary.key,
            summary.avg_price.unwrap_or(f64::NAN),
            summary.count
        );
    }

    // 3. Drive a session
    println!("\n3. Dashboard session:");
    let mut dashboard = Dashboard::new(&tables, &DashboardConfig::default())?;
    let actions = vec![
        Action::SelectField {
            field: "status".to_string(),
        },
        Action::RefreshOverview,
        Action::SelectStates {
            states: vec!["Vermont".to_string(), "Massachusetts".to_string()],
        },
        Action::RefreshComparison,
        Action::SelectState {
            state: "Vermont".to_string(),
        },
        Action::SetLogScale { enabled: true },
        Action::RefreshScatter,
        Action::SetPriceRange {
            min: 200000.0,
            max: 300000.0,
        },
    ];

    for action in actions {
        println!("   > {:?}", action);
        if let Some(output) = dashboard.dispatch(action)? {
            println!("{}\n", serde_json::to_string_pretty(&output)?);
        }
    }

    println!("=== Example Complete ===");
    Ok(())
}
