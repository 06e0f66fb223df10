use chrono::Utc;
use flag_practice::spaced_repetition::{
    MIN_EASE_FACTOR, ReviewCard, ReviewScheduler, quality_to_string,
};
use flag_practice::time_format::format_due;
use sra::sm_2::Quality;
use std::env;

const CARD: &str = "card";

fn main() {
    let args: Vec<String> = env::args().collect();

    let (repetitions, interval, ease_factor) = validate_input(args);

    let today = Utc::now().date_naive();
    let card = ReviewCard {
        ease_factor,
        interval,
        repetitions,
        next_review_date: Some(today),
        ..ReviewCard::default()
    };

    println!(
        "SM-2 Scheduling Results for: reps={}, interval={}, ease={:.2}",
        repetitions, interval, ease_factor
    );

    for quality in [Quality::Grade0, Quality::Grade3, Quality::Grade4, Quality::Grade5] {
        compute_and_print(&card, today, quality);
    }
}

fn validate_input(args: Vec<String>) -> (u32, u32, f32) {
    if args.len() != 4 {
        eprintln!("Usage: {} <repetitions> <interval> <ease_factor>", args[0]);
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  <repetitions>  Current number of repetitions (non-negative integer)");
        eprintln!("  <interval>     Current interval in days (non-negative integer)");
        eprintln!("  <ease_factor>  Current ease factor (at least 1.3, typically 1.3 - 2.6)");
        eprintln!();
        eprintln!("Example: {} 3 10 2.5", args[0]);
        std::process::exit(1);
    }

    let repetitions: u32 = match args[1].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: repetitions must be a non-negative integer");
            std::process::exit(1);
        }
    };

    let interval: u32 = match args[2].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: interval must be a non-negative integer");
            std::process::exit(1);
        }
    };

    let ease_factor: f32 = match args[3].parse() {
        Ok(n) if n >= MIN_EASE_FACTOR => n,
        _ => {
            eprintln!("Error: ease_factor must be a number of at least {}", MIN_EASE_FACTOR);
            std::process::exit(1);
        }
    };
    (repetitions, interval, ease_factor)
}

fn compute_and_print(card: &ReviewCard, today: chrono::NaiveDate, quality: Quality) {
    let mut cards = std::collections::HashMap::new();
    cards.insert(CARD.to_string(), card.clone());
    let mut scheduler = ReviewScheduler::with_cards(cards, Default::default());

    let updated = match quality {
        Quality::Grade0 => scheduler.record_incorrect(CARD, today),
        passing => scheduler.record_correct(CARD, passing, today),
    };

    println!(
        "Grade: {} | Next review: {} | Reps: {} | Interval: {} | Ease: {:.2}",
        quality_to_string(quality),
        format_due(today, updated.next_review_date),
        updated.repetitions,
        updated.interval,
        updated.ease_factor
    );
}
