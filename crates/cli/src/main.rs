use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use triage_core::keywords::{EMERGENCY_KEYWORDS, MILD_KEYWORDS, SPECIALTY_TABLE, URGENT_KEYWORDS};
use triage_core::{questions_for_step, Dispatcher, EnvValues, SymptomInput, TriageConfig, TriageResult};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom triage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage a symptom description
    Analyze {
        /// Free-text symptom description
        text: String,
        /// How long the symptoms have lasted
        #[arg(long)]
        duration: Option<String>,
        /// Self-reported severity
        #[arg(long)]
        severity: Option<String>,
        /// Try the AI analyzer first (needs OPENAI_API_KEY)
        #[arg(long)]
        ai: bool,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the classifier's keyword tables
    Keywords {
        /// Only show one tier
        #[arg(long, value_enum)]
        tier: Option<Tier>,
    },
    /// Show the questions for a conversation step (1-3)
    Questions {
        step: u8,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Tier {
    Emergency,
    Urgent,
    Specialty,
    Mild,
}

/// Read AI settings from the environment; see `TriageConfig::from_env_values`.
///
/// `--ai` turns the AI toggle on regardless of `TRIAGE_USE_AI`.
fn config_from_env() -> Result<TriageConfig, triage_core::ConfigError> {
    TriageConfig::from_env_values(ai_env_values(EnvValues {
        use_ai: None,
        api_key: std::env::var("OPENAI_API_KEY").ok(),
        model: std::env::var("TRIAGE_AI_MODEL").ok(),
        api_base_url: std::env::var("TRIAGE_AI_BASE_URL").ok(),
        timeout_secs: std::env::var("TRIAGE_AI_TIMEOUT_SECS").ok(),
    }))
}

fn ai_env_values(values: EnvValues) -> EnvValues {
    EnvValues {
        use_ai: Some("true".into()),
        ..values
    }
}

fn print_result(result: &TriageResult) {
    println!("Urgency: {}", result.urgency);
    println!("Recommendation: {}", result.recommendation);
    if let Some(provider) = &result.provider_type {
        println!("Provider: {}", provider);
    }
    println!("Confidence: {:.2}", result.confidence);
    if !result.possible_conditions.is_empty() {
        println!("Possible conditions: {}", result.possible_conditions.join(", "));
    }
    if !result.recommended_specialties.is_empty() {
        println!("Specialties: {}", result.recommended_specialties.join(", "));
    }
    if !result.red_flags.is_empty() {
        println!("Red flags: {}", result.red_flags.join(", "));
    }
    for tip in &result.self_care_tips {
        println!("  - {}", tip);
    }
    println!("Follow-up needed: {}", result.follow_up_needed);
    if result.safety_override {
        println!("Note: urgency raised to emergency by the safety check");
    }
    println!("Source: {}", result.model_used);
}

fn print_keywords(tier: Option<Tier>) {
    let show = |t: Tier| tier.is_none_or(|only| only == t);

    if show(Tier::Emergency) {
        println!("emergency: {}", EMERGENCY_KEYWORDS.join(", "));
    }
    if show(Tier::Urgent) {
        println!("urgent_care: {}", URGENT_KEYWORDS.join(", "));
    }
    if show(Tier::Specialty) {
        for entry in SPECIALTY_TABLE {
            println!(
                "{} ({}): {}",
                entry.specialty,
                entry.provider,
                entry.keywords.join(", ")
            );
        }
    }
    if show(Tier::Mild) {
        println!("home_care: {}", MILD_KEYWORDS.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            text,
            duration,
            severity,
            ai,
            json,
        }) => {
            let cfg = if ai {
                config_from_env()?
            } else {
                TriageConfig::rule_based()
            };
            let dispatcher = Dispatcher::new(Arc::new(cfg));
            if ai && !dispatcher.ai_available() {
                eprintln!("AI analyzer unavailable; using rule-based analysis");
            }

            let mut input = SymptomInput::new(text);
            if let Some(d) = duration {
                input = input.with_duration(d);
            }
            if let Some(s) = severity {
                input = input.with_severity(s);
            }

            let result = dispatcher.analyze_input(&input, ai).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Some(Commands::Keywords { tier }) => print_keywords(tier),
        Some(Commands::Questions { step }) => {
            if !(1..=3).contains(&step) {
                eprintln!("Error: step must be between 1 and 3");
                return Ok(());
            }
            let round = questions_for_step(step);
            println!("Step {}: {}", round.step, round.step_title);
            for q in round.questions {
                println!("  [{}] {} ({})", q.id, q.question, q.placeholder);
            }
        }
        None => {
            println!("Use --help for available commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_flag_enables_analyzer_with_only_a_key() {
        let values = ai_env_values(EnvValues {
            api_key: Some("sk-test".into()),
            ..EnvValues::default()
        });
        let cfg = TriageConfig::from_env_values(values).unwrap();
        assert!(cfg.ai_enabled());
        assert!(Dispatcher::new(Arc::new(cfg)).ai_available());
    }

    #[test]
    fn test_ai_flag_overrides_disabled_toggle() {
        let values = ai_env_values(EnvValues {
            use_ai: Some("false".into()),
            api_key: Some("sk-test".into()),
            ..EnvValues::default()
        });
        assert!(TriageConfig::from_env_values(values).unwrap().ai_enabled());
    }

    #[test]
    fn test_ai_flag_without_key_stays_rule_based() {
        let cfg = TriageConfig::from_env_values(ai_env_values(EnvValues::default())).unwrap();
        assert!(!cfg.ai_enabled());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from(["triage", "analyze", "sore throat", "--ai", "--json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Analyze { ai: true, json: true, .. })
        ));
    }
}
