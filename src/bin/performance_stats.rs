use colored::Colorize;
use flag_practice::database::Database;
use flag_practice::spaced_repetition::ResponseTimeStats;
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <database_file>", args[0]);
        eprintln!();
        eprintln!("Reports accuracy and response times per category.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  <database_file>  Path to the SQLite database file");
        eprintln!();
        eprintln!("Example: {} ~/flag_practice.db", args[0]);
        std::process::exit(1);
    }

    let db = match Database::new(&args[1]) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };

    let accuracy = match db.accuracy_per_category() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error fetching accuracy statistics: {}", e);
            std::process::exit(1);
        }
    };

    if accuracy.is_empty() {
        println!("No completed sessions found in the database.");
        return;
    }

    let recent_accuracy = match db.accuracy_per_category_last_10_sessions() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error fetching recent accuracy statistics: {}", e);
            std::process::exit(1);
        }
    };

    let times = match db.response_times_per_category() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error fetching response times: {}", e);
            std::process::exit(1);
        }
    };

    println!("Performance Analysis Report");
    println!("===========================");
    println!();

    for (category, (correct, total, pct)) in &accuracy {
        println!("Category: {}", category.bold());
        println!("{}", "-".repeat(60));
        println!(
            "  Accuracy (all time): {}/{} ({})",
            correct,
            total,
            color_percentage(*pct)
        );
        match recent_accuracy.get(category) {
            Some((correct, total, recent_pct)) => {
                println!(
                    "  Accuracy (last 10 sessions): {}/{} ({})",
                    correct,
                    total,
                    color_percentage(*recent_pct)
                );
                print_change(*pct, *recent_pct);
            }
            None => println!("  Accuracy (last 10 sessions): no data"),
        }
        print_times(times.get(category));
        println!();
    }
}

fn color_percentage(pct: f64) -> String {
    let text = format!("{:.1}%", pct);
    if pct >= 80.0 {
        text.green().to_string()
    } else if pct >= 50.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn print_times(stats: Option<&ResponseTimeStats>) {
    match stats {
        Some(stats) => println!(
            "  Response time - Average: {:.3}s, Std Dev: {:.3}s",
            stats.average, stats.standard_deviation
        ),
        None => println!("  Response time - No data available"),
    }
}

/// Print improvement (or decline) between all-time and recent accuracy
fn print_change(all_time: f64, recent: f64) {
    let change = recent - all_time;
    if change > 0.05 {
        println!("    {} Improving: +{:.1} points", "✓".green(), change);
    } else if change < -0.05 {
        println!("    {} Declining: {:.1} points", "✗".red(), change);
    } else {
        println!("    • No significant change");
    }
}
