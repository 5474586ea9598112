use std::sync::Arc;

use api_shared::{AnalysisRes, EducationRes, HealthService, PatientInfoReq, QuestionsRes};
use clap::{Parser, Subcommand};
use dx_core::{
    Gender, GatewayConfig, HttpModelGateway, Mode, ModelGateway, NonEmptyText, OfflineGateway,
    SymptomAnalysisService, SymptomInput,
};

#[derive(Parser)]
#[command(name = "dx")]
#[command(about = "DX symptom analysis CLI")]
struct Cli {
    /// Skip the models entirely and answer from the demo engine
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a symptom description and print the differential as JSON
    Analyze {
        /// Free-text symptom description
        symptoms: String,
        /// Audience: doctor or patient
        #[arg(long, default_value = "doctor")]
        mode: Mode,
        /// Patient age in years
        #[arg(long)]
        age: Option<u32>,
        /// Patient gender: male, female or other
        #[arg(long)]
        gender: Option<Gender>,
    },
    /// Generate follow-up questions for a symptom description
    Questions {
        /// Free-text symptom description
        symptoms: String,
        /// Audience: doctor or patient
        #[arg(long, default_value = "doctor")]
        mode: Mode,
    },
    /// Print plain-language education about a diagnosis
    Educate {
        /// Diagnosis name, e.g. "Migraine"
        diagnosis: String,
    },
    /// Check both model slots
    Health,
}

fn service(offline: bool) -> Result<SymptomAnalysisService, Box<dyn std::error::Error>> {
    let gateway: Arc<dyn ModelGateway> = if offline {
        Arc::new(OfflineGateway)
    } else {
        Arc::new(HttpModelGateway::new(GatewayConfig::from_env()?)?)
    };
    Ok(SymptomAnalysisService::new(gateway))
}

fn symptom_input(symptoms: &str, mode: Mode) -> Result<SymptomInput, Box<dyn std::error::Error>> {
    let symptoms = NonEmptyText::new(symptoms)?;
    Ok(SymptomInput::new(symptoms.into_inner(), mode))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            symptoms,
            mode,
            age,
            gender,
        }) => {
            let input = match symptom_input(&symptoms, mode) {
                Ok(input) => input.with_patient_info(PatientInfoReq { age, gender }.into()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            };
            let outcome = service(cli.offline)?.analyze_with_follow_ups(&input).await;
            print_json(&AnalysisRes::from(outcome))?;
        }
        Some(Commands::Questions { symptoms, mode }) => match symptom_input(&symptoms, mode) {
            Ok(input) => {
                let questions = service(cli.offline)?
                    .generate_follow_up_questions(&input)
                    .await;
                print_json(&QuestionsRes { questions })?;
            }
            Err(e) => eprintln!("Error: {}", e),
        },
        Some(Commands::Educate { diagnosis }) => match NonEmptyText::new(&diagnosis) {
            Ok(diagnosis) => {
                let content = service(cli.offline)?
                    .generate_education(diagnosis.as_str())
                    .await;
                print_json(&EducationRes { content })?;
            }
            Err(e) => eprintln!("Error: {}", e),
        },
        Some(Commands::Health) => {
            let models = service(cli.offline)?.check_models().await;
            print_json(&HealthService::check_health(models))?;
        }
        None => {
            println!("Use 'dx --help' for commands");
        }
    }

    Ok(())
}
