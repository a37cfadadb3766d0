//! Voice Shopping Assistant
//!
//! Terminal front end for the shopping interpreter:
//! Transcript → (translation) → Command → Shopping list

mod config;
mod list;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use config::AppConfig;
use list::{Outcome, ShoppingList};
use shopping_intent::translate::{is_supported, DEFAULT_LANGUAGE};
use shopping_intent::{
    init as init_shopping_intent, load_tables_file, Command, CompletionConfig, GeminiCompletion,
    Intent, IntentParser, LookupTables, SuggestionEngine, TextCompletion, Translator,
};

#[derive(Parser)]
#[command(name = "voice-shop")]
#[command(about = "Voice-driven shopping list assistant")]
struct Args {
    /// Interpret the given utterances in order and exit (repeatable)
    #[arg(long)]
    say: Vec<String>,

    /// Interactive mode (read utterances from stdin)
    #[arg(long)]
    interactive: bool,

    /// Print each command as JSON instead of a message
    #[arg(long)]
    json: bool,

    /// YAML lookup tables replacing the built-in ones
    #[arg(long)]
    tables: Option<String>,

    /// Configuration file, created with defaults if missing
    #[arg(long, default_value = "voice-shop.json")]
    config: String,

    /// Spoken language code (e.g. es-ES), or "auto"
    #[arg(long)]
    language: Option<String>,
}

struct Assistant {
    parser: IntentParser,
    translator: Translator,
    suggestions: SuggestionEngine,
    language: String,
    list: ShoppingList,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    info!("🛒 Starting voice shopping assistant");

    if let Err(e) = init_shopping_intent() {
        error!("Failed to initialize shopping interpreter: {}", e);
        return Ok(());
    }

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading config: {}", args.config))?;
    if let Some(language) = args.language {
        config.language = language;
    }
    if config.language != "auto" && !is_supported(&config.language) {
        warn!("Unsupported language {}, using {}", config.language, DEFAULT_LANGUAGE);
        config.language = DEFAULT_LANGUAGE.to_string();
    }

    let tables = match args.tables.or(config.tables_path.clone()) {
        Some(path) => load_tables_file(&path)?,
        None => LookupTables::builtin(),
    };

    let completion = completion_service(&config.completion);
    let mut parser = IntentParser::with_tables(config.interpreter.clone(), tables)?;
    if let Some(service) = &completion {
        parser = parser.with_completion(service.clone());
    } else {
        info!("GEMINI_API_KEY not set, using local variety suggestions");
    }

    let mut assistant = Assistant {
        parser,
        translator: Translator::new(completion),
        suggestions: SuggestionEngine::new(),
        language: config.language.clone(),
        list: ShoppingList::new(),
        json: args.json,
    };

    if !args.say.is_empty() {
        for utterance in &args.say {
            assistant.handle(utterance).await?;
        }
    } else if args.interactive {
        run_interactive(&mut assistant).await?;
    } else {
        run_demo_utterances(&mut assistant).await?;
    }

    info!("✅ Voice shopping session completed");
    Ok(())
}

fn completion_service(config: &CompletionConfig) -> Option<Arc<dyn TextCompletion>> {
    let key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())?;
    let mut config = config.clone();
    config.api_key = Some(key);
    match GeminiCompletion::new(config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("Failed to create completion client: {}", e);
            None
        }
    }
}

impl Assistant {
    async fn handle(&mut self, utterance: &str) -> Result<()> {
        let language = if self.language == "auto" {
            self.translator.detect_language(utterance).await
        } else {
            self.language.clone()
        };
        let english = self.translator.to_english(utterance, &language).await;

        let command = self.parser.interpret(&english, self.list.pending()).await;

        if self.json {
            println!("{}", serde_json::to_string(&command)?);
        } else {
            let message = self
                .translator
                .to_user_language(&command.message, &language)
                .await;
            println!("{} {}", icon(&command), message);
            if let Some(options) = &command.suggestions {
                for (i, option) in options.iter().enumerate() {
                    println!("   {}. {}", i + 1, option);
                }
            }
        }

        let outcome = self.list.apply(&command);
        if !self.json {
            report(&outcome);
        }
        Ok(())
    }

    fn show_suggestions(&self) {
        let today = OffsetDateTime::now_utc().date();
        let picks = self.suggestions.generate(self.list.items(), today);
        println!("💡 You might also need: {}", picks.join(", "));
    }

    fn show_meal_ingredients(&self, meals: &str) {
        let meals: Vec<&str> = meals.split(',').map(str::trim).collect();
        let picks = self.suggestions.meal_suggestions(self.list.items(), &meals);
        if picks.is_empty() {
            println!("💡 Nothing missing for {}", meals.join(", "));
        } else {
            println!("💡 For {} you still need: {}", meals.join(", "), picks.join(", "));
        }
    }

    fn toggle(&mut self, position: &str) {
        let id = position
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.list.items().get(i))
            .map(|item| item.id.clone());
        match id {
            Some(id) if self.list.toggle_completed(&id) => print!("{}", self.list.render()),
            _ => println!("⚠️  No item at position {}", position.trim()),
        }
    }
}

fn icon(command: &Command) -> &'static str {
    match command.intent {
        Intent::Add | Intent::Confirm => "✅",
        Intent::Remove => "🗑️ ",
        Intent::Search => "🔍",
        Intent::Update => "✏️ ",
        Intent::Suggest => "🤔",
        Intent::Error => "❌",
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::NotFound(name) => println!("⚠️  {} is not on your list", name),
        Outcome::Found(hits) if hits.is_empty() => println!("   No matching items on your list"),
        Outcome::Found(hits) => {
            for item in hits {
                println!("   • {} {} {}", item.quantity, item.unit, item.name);
            }
        }
        Outcome::Added(_)
        | Outcome::Removed(_)
        | Outcome::Updated(_)
        | Outcome::AwaitingChoice(_)
        | Outcome::Cancelled
        | Outcome::Ignored => {}
    }
}

async fn run_interactive(assistant: &mut Assistant) -> Result<()> {
    println!("🎤 Interactive Voice Shopping Assistant");
    println!("Type what you would say and press Enter (or 'quit' to exit):");
    println!("Examples:");
    println!("  - 'I need 5 apples'");
    println!("  - 'milk' (then 'number 2')");
    println!("  - 'remove bread from my list'");
    println!("  - 'find toothpaste under $5'");
    println!("Extras: 'list', 'suggest', 'meals pasta dinner, salad', 'done 2'");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("🎤 Say: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match line {
            "" => continue,
            "list" => print!("{}", assistant.list.render()),
            "suggest" => assistant.show_suggestions(),
            _ => {
                if let Some(meals) = line.strip_prefix("meals ") {
                    assistant.show_meal_ingredients(meals);
                } else if let Some(position) = line.strip_prefix("done ") {
                    assistant.toggle(position);
                } else {
                    assistant.handle(line).await?;
                }
            }
        }
        println!();
    }

    Ok(())
}

async fn run_demo_utterances(assistant: &mut Assistant) -> Result<()> {
    let demo_utterances = vec![
        "I need 5 apples",
        "add 2 bags of rice",
        "milk",
        "number 2",
        "add horizon brand yogurt under $4",
        "find toothpaste under $5",
        "remove apples from my list",
    ];

    println!(
        "🎤 Running voice shopping demo with {} utterances",
        demo_utterances.len()
    );
    println!();

    for (i, utterance) in demo_utterances.iter().enumerate() {
        println!("{}/{}: {}", i + 1, demo_utterances.len(), utterance);
        assistant.handle(utterance).await?;
        println!();
    }

    println!("🧾 Final list:");
    print!("{}", assistant.list.render());
    assistant.show_suggestions();
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
