//! Answer Engine command-line entry point
//!
//! Configuration priority: env vars > config/{env}.* > config/default.* > defaults

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use answer_engine_agent::AnswerAgent;
use answer_engine_config::{init_tracing, load_settings, Settings};
use answer_engine_core::{AnswerMode, AskRequest, ModeProfile};

#[derive(Parser)]
#[command(name = "answer-engine")]
#[command(
    about = "Grounded question answering with citations and confidence scores",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Configuration environment (loads config/<env>.*)
    #[arg(long, env = "ANSWER_ENGINE_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question and print the result as JSON
    Ask {
        /// The question to answer
        question: String,

        /// Tenant the question belongs to
        #[arg(short, long)]
        tenant: String,

        /// Asking user
        #[arg(short, long)]
        user: Option<String>,

        /// standard, conversational, research, summarization, comparison or fact_check;
        /// anything else answers in standard mode
        #[arg(short, long, default_value = "standard", value_parser = parse_mode)]
        mode: AnswerMode,

        /// Continue an existing conversation
        #[arg(short, long)]
        conversation: Option<String>,

        /// Restrict retrieval to a source id (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Answer language (defaults to the configured language)
        #[arg(short, long)]
        language: Option<String>,

        /// Preferred model
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature, 0.0 - 2.0
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum tokens to generate
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Omit citations from the result
        #[arg(long)]
        no_citations: bool,

        /// Omit the confidence assessment from the result
        #[arg(long)]
        no_confidence: bool,
    },

    /// List operating modes and their retrieval parameters
    Modes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_settings(cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };
    init_tracing(&settings.observability).context("initializing tracing")?;
    tracing::debug!(
        environment = ?settings.environment,
        config_env = cli.env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Modes => print_modes(),
        Commands::Ask {
            question,
            tenant,
            user,
            mode,
            conversation,
            sources,
            language,
            model,
            temperature,
            max_tokens,
            no_citations,
            no_confidence,
        } => {
            let mut request = AskRequest::new(question, tenant)
                .with_mode(mode)
                .with_language(
                    language.unwrap_or_else(|| settings.pipeline.default_language.clone()),
                )
                .with_temperature(temperature.unwrap_or(settings.pipeline.default_temperature));

            if let Some(user) = user {
                request = request.with_user(user);
            }
            if let Some(conversation) = conversation {
                request = request.with_conversation(conversation);
            }
            if !sources.is_empty() {
                request = request.with_sources(sources);
            }
            if let Some(model) = model {
                request = request.with_model(model);
            }
            if let Some(max_tokens) = max_tokens {
                request = request.with_max_tokens(max_tokens);
            }
            if no_citations {
                request = request.without_citations();
            }
            if no_confidence {
                request = request.without_confidence();
            }

            let agent = AnswerAgent::from_settings(&settings).context("building answer agent")?;
            let result = agent.ask(request).await.context("answering question")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn parse_mode(tag: &str) -> Result<AnswerMode, std::convert::Infallible> {
    Ok(AnswerMode::parse_lenient(tag))
}

fn print_modes() -> anyhow::Result<()> {
    let modes: Vec<_> = ModeProfile::all()
        .iter()
        .map(|profile| {
            json!({
                "mode": profile.mode,
                "breadth_k": profile.retrieval.breadth_k,
                "rerank": profile.retrieval.rerank,
                "diversify": profile.retrieval.diversify,
                "uses_history": profile.uses_history(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&modes)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_mode(args: &[&str]) -> AnswerMode {
        let base = ["answer-engine", "ask", "What is ML?", "--tenant", "t1"];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        match cli.command {
            Commands::Ask { mode, .. } => mode,
            Commands::Modes => panic!("expected ask"),
        }
    }

    #[test]
    fn test_mode_flag() {
        assert_eq!(parsed_mode(&[]), AnswerMode::Standard);
        assert_eq!(parsed_mode(&["--mode", "research"]), AnswerMode::Research);
        assert_eq!(parsed_mode(&["-m", "fact-check"]), AnswerMode::FactCheck);
    }

    #[test]
    fn test_unknown_mode_answers_in_standard() {
        assert_eq!(parsed_mode(&["--mode", "poetry"]), AnswerMode::Standard);
    }
}
