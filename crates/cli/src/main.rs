use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aarogya_core::{
    load_catalog, AlertSeverity, Assessment, Assistant, ChatSession, ConditionQuery, CoreConfig,
    Language, Reply, WhatsAppLinker,
};

#[derive(Parser)]
#[command(name = "aarogya")]
#[command(about = "Aarogya multilingual health assistant CLI")]
struct Cli {
    /// Reply language: english, hindi or odia (default from AAROGYA_DEFAULT_LANGUAGE)
    #[arg(long, short, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the opening greeting
    Greet,
    /// Ask a question and print the assistant's reply
    Ask {
        /// Question text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show which intent a message is classified as
    Intent {
        text: Vec<String>,
    },
    /// List the symptom categories found in a message
    Symptoms {
        text: Vec<String>,
    },
    /// Assess symptom categories, e.g. `aarogya assess fever headache`
    Assess {
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Interactive conversation on stdin. `:lang <language>` switches language, `:quit` exits
    Chat,
    /// Search the disease library
    Conditions {
        /// Text to match against names and symptoms
        #[arg(long, short)]
        query: Option<String>,
        /// Restrict to one category
        #[arg(long, short)]
        category: Option<String>,
    },
    /// List condition categories
    Categories,
    /// List vaccines, optionally for one age group
    Vaccines {
        #[arg(long)]
        age_group: Option<String>,
    },
    /// List health alerts, newest first
    Alerts {
        /// info, warning or danger
        #[arg(long)]
        severity: Option<String>,
    },
    /// Print a prefilled WhatsApp link for the helpline
    WhatsappLink {
        /// Message text (defaults to a localized greeting)
        #[arg(long, short)]
        message: Option<String>,
        /// Label the link for a phone rather than WhatsApp Web
        #[arg(long)]
        mobile: bool,
    },
}

fn joined(words: &[String]) -> String {
    words.join(" ")
}

fn print_assessment(assessment: &Assessment, language: Language) {
    for scored in &assessment.conditions {
        println!(
            "{:>5.1}%  {:<24} {}",
            scored.score,
            scored.condition.display_name(language),
            scored.urgency.as_str()
        );
    }
}

/// Drive a chat session from `input`, writing bot turns to `output`.
fn run_chat<R: BufRead, W: Write>(
    session: &mut ChatSession,
    input: R,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(greeting) = session.messages().first() {
        writeln!(output, "{}\n", greeting.text)?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line == ":quit" {
            break;
        }
        let mut words = line.split_whitespace();
        if words.next() == Some(":lang") {
            let language = words.collect::<Vec<_>>().join(" ");
            session.set_language(Language::resolve(&language));
            writeln!(output, "[{}]\n", session.language())?;
            continue;
        }
        if let Some(reply) = session.send(line)? {
            writeln!(output, "{}\n", reply.text)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_env()?;
    let language = cli
        .language
        .as_deref()
        .map(Language::resolve)
        .unwrap_or(cfg.default_language());
    let assistant = Assistant::new(load_catalog(&cfg)?);
    let catalog = assistant.catalog();

    match cli.command {
        Some(Commands::Greet) => {
            println!("{}", assistant.greet(language)?);
        }
        Some(Commands::Ask { text }) => {
            let reply = assistant.respond(&joined(&text), language)?;
            println!("{}", reply.text);
        }
        Some(Commands::Intent { text }) => {
            println!("{}", assistant.classify_intent(&joined(&text)));
        }
        Some(Commands::Symptoms { text }) => {
            let found = assistant.extract_symptoms(&joined(&text));
            if found.is_empty() {
                println!("No symptoms recognised.");
            } else {
                for symptom in found {
                    println!("{}", symptom);
                }
            }
        }
        Some(Commands::Assess { symptoms }) => {
            let symptoms: BTreeSet<String> = symptoms
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            let assessment = assistant.assess_symptoms(&symptoms);
            print_assessment(&assessment, language);
            println!(
                "\n{}",
                assistant.compose_response(Reply::Assessment(&assessment), language)?
            );
        }
        Some(Commands::Chat) => {
            let mut session = ChatSession::start(assistant.clone(), language)?;
            let stdin = io::stdin();
            run_chat(&mut session, stdin.lock(), io::stdout())?;
        }
        Some(Commands::Conditions { query, category }) => {
            let matches = catalog.search_conditions(&ConditionQuery {
                text: query,
                category,
            });
            if matches.is_empty() {
                println!("No conditions found.");
            }
            for condition in matches {
                let c = condition.localized(language);
                println!("{} ({}) [{:?}]", c.name, c.category, c.severity);
                println!("  symptoms: {}", c.symptoms.join(", "));
            }
        }
        Some(Commands::Categories) => {
            for category in catalog.condition_categories() {
                println!("{}", category);
            }
        }
        Some(Commands::Vaccines { age_group }) => {
            for vaccine in catalog.vaccines_for_age_group(age_group.as_deref()) {
                let v = vaccine.localized(language);
                println!("{}: {}", v.name, v.schedule);
                println!("  age groups: {}", v.age_groups.join(", "));
            }
        }
        Some(Commands::Alerts { severity }) => {
            let severity = severity
                .as_deref()
                .filter(|s| !s.eq_ignore_ascii_case("all"))
                .map(str::parse::<AlertSeverity>)
                .transpose()?;
            for alert in catalog.alerts(severity) {
                let a = alert.localized(language);
                println!(
                    "{} [{}] {} ({})",
                    a.date,
                    a.severity.as_str(),
                    a.title,
                    a.location
                );
                println!("  {}", a.description);
            }
        }
        Some(Commands::WhatsappLink { message, mobile }) => {
            let link = WhatsAppLinker::new(cfg.whatsapp_number()).link(
                message.as_deref(),
                language,
                mobile,
            );
            println!("{}: {}", link.button_text, link.url);
        }
        None => {
            println!("Use 'aarogya --help' for commands");
        }
    }

    Ok(())
}
