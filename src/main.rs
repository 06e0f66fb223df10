use colored::Colorize;
use flag_practice::answer_evaluator_service::AnswerEvaluatorService;
use flag_practice::catalog::Catalog;
use flag_practice::cli::Args;
use flag_practice::config::QuizConfig;
use flag_practice::database_factory::DatabaseFactory;
use flag_practice::session::{AnswerLog, Question, SessionController};
use flag_practice::session_queue::QuizMode;
use flag_practice::time_format::format_due;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse_args();
    if args.no_color {
        colored::control::set_override(false);
    }

    let store_config = args.store_config()?;
    let mode = args.quiz_mode()?;
    let catalog = Arc::new(Catalog::load(&args.catalog)?);
    let db = Arc::new(DatabaseFactory::create(store_config)?);
    let date_provider = db.date_provider();
    let response_times = AnswerEvaluatorService::new(&db.conn).all_stats();

    let mut session = match args.seed {
        Some(seed) => SessionController::start_with_rng(
            catalog.clone(),
            db.clone(),
            date_provider.clone(),
            QuizConfig::default(),
            mode.clone(),
            StdRng::seed_from_u64(seed),
        )?,
        None => SessionController::start(
            catalog.clone(),
            db.clone(),
            date_provider.clone(),
            QuizConfig::default(),
            mode.clone(),
        )?,
    }
    .with_response_times(response_times);

    let session_id = db.create_session(&mode.to_string())?;
    session.add_listener(Box::new(AnswerLog::new(db.clone(), Some(session_id))));
    info!("Session {} started in {} mode", session_id, mode);

    let deadline = match mode {
        QuizMode::Timed => Some(Instant::now() + Duration::from_secs(args.time_limit)),
        _ => None,
    };

    println!("{}", format!("Flag practice: {} mode", mode).bold());
    println!("Type the country name (or option number). Enter 'quit' to stop.");
    if deadline.is_some() {
        println!("You have {} seconds.", args.time_limit);
    }
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut quit = false;

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            println!("{}", "Time's up!".yellow().bold());
            break;
        }

        let Some(question) = session.advance()?.cloned() else {
            break;
        };
        print_question(&question);

        let started = Instant::now();
        let Some(line) = lines.next().transpose()? else {
            quit = true;
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") {
            quit = true;
            break;
        }

        let elapsed = started.elapsed().as_secs_f64();
        if deadline.is_some_and(|d| Instant::now() >= d) {
            println!("{}", "Time's up! That answer came too late.".yellow().bold());
            break;
        }

        let answer = resolve_option(input, &question);
        let outcome = session.submit_answer(&answer, Some(elapsed))?;
        if outcome.was_correct {
            println!(
                "{} {} | next review {}",
                "Correct!".green().bold(),
                question.item.name,
                format_due(
                    date_provider.today(),
                    session
                        .scheduler()
                        .get(&outcome.item_code)
                        .and_then(|card| card.next_review_date)
                )
            );
        } else {
            println!(
                "{} It was {}.",
                "Wrong.".red().bold(),
                question.item.name.bold()
            );
        }
        println!(
            "Score {} | Streak {}\n",
            session.state().score,
            session.state().streak
        );
    }

    let summary = session.end_session();
    db.update_session_summary(session_id, &summary)?;
    if quit {
        db.abandon_session(session_id)?;
    } else {
        db.complete_session(session_id)?;
    }

    println!("{}", "Session summary".bold());
    println!(
        "  Answered: {} | Correct: {} | Accuracy: {:.1}%",
        summary.total_questions, summary.correct_answers, summary.accuracy_percentage
    );
    println!(
        "  Average time: {:.2}s | Best streak: {}",
        summary.average_time_seconds, summary.best_streak
    );
    println!(
        "  Reviews due today: {}",
        db.count_due_reviews(date_provider.today())?
    );

    Ok(())
}

fn print_question(question: &Question) {
    let label = if question.is_retry {
        format!("#{} (retry)", question.tick).yellow()
    } else {
        format!("#{}", question.tick).cyan()
    };
    let colors = if question.item.colors.is_empty() {
        "unknown".to_string()
    } else {
        question.item.colors.join(", ")
    };
    println!(
        "{} Which flag is this? colors: {} | layout: {} | region: {}",
        label, colors, question.item.layout, question.item.category
    );
    for (i, option) in question.options.iter().enumerate() {
        println!("   {}. {}", i + 1, option.name);
    }
    print!("> ");
    let _ = io::stdout().flush();
}

/// Maps an option number to that option's name; anything else passes through
fn resolve_option(input: &str, question: &Question) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i))
        .map(|option| option.name.clone())
        .unwrap_or_else(|| input.to_string())
}
