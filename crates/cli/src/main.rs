use clap::{Parser, Subcommand};
use patientor_client::{bootstrap, load_patient_details, submit_entry, ApiClient, SubmitOutcome};
use patientor_core::{
    config::api_config_from_env_values,
    constants::{API_BASE_URL_VAR, ENVIRONMENT_VAR},
    render::{render_patient, render_patient_list},
    EntryModal, FormField, PatientStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patientor patient record CLI")]
struct Cli {
    /// Environment selecting the API base URL (development or production)
    #[arg(long, global = true)]
    env: Option<String>,
    /// API base URL, overriding the environment's default
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API is reachable
    Ping,
    /// List all patients
    List,
    /// List all diagnosis codes
    Diagnoses,
    /// Show a patient with their entries
    Show {
        /// Patient id
        id: String,
    },
    /// Add an entry to a patient
    AddEntry {
        /// Patient id
        id: String,
        /// Entry type: HealthCheck, Hospital or OccupationalHealthcare
        #[arg(long = "type")]
        entry_type: String,
        /// Visit date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        specialist: String,
        #[arg(long)]
        description: String,
        /// Health check rating 0-3
        #[arg(long)]
        rating: Option<String>,
        #[arg(long)]
        discharge_date: Option<String>,
        #[arg(long)]
        discharge_criteria: Option<String>,
        #[arg(long)]
        employer: Option<String>,
        #[arg(long)]
        sick_leave_start: Option<String>,
        #[arg(long)]
        sick_leave_end: Option<String>,
        /// Diagnosis code (repeatable)
        #[arg(long = "diagnosis")]
        diagnoses: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = api_config_from_env_values(
        cli.env.or_else(|| std::env::var(ENVIRONMENT_VAR).ok()),
        cli.base_url
            .or_else(|| std::env::var(API_BASE_URL_VAR).ok()),
    )?;
    tracing::debug!("using API at {}", config.base_url());
    let client = ApiClient::new(config)?;

    match cli.command {
        Some(Commands::Ping) => {
            client.ping().await?;
            println!("API at {} is alive", client.config().base_url());
        }
        Some(Commands::List) => {
            let patients = client.list_patients().await?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                let mut store = PatientStore::new();
                store.replace_patients(patients);
                print!("{}", render_patient_list(&store));
            }
        }
        Some(Commands::Diagnoses) => {
            for diagnosis in client.list_diagnoses().await? {
                match diagnosis.latin {
                    Some(latin) => println!("{}  {} ({})", diagnosis.code, diagnosis.name, latin),
                    None => println!("{}  {}", diagnosis.code, diagnosis.name),
                }
            }
        }
        Some(Commands::Show { id }) => {
            let mut store = PatientStore::new();
            bootstrap(&client, &mut store).await;
            load_patient_details(&client, &mut store, &id).await;
            match store.patient(&id) {
                Some(patient) => print!("{}", render_patient(patient, &store)),
                None => anyhow::bail!("patient {} not found", id),
            }
        }
        Some(Commands::AddEntry {
            id,
            entry_type,
            date,
            specialist,
            description,
            rating,
            discharge_date,
            discharge_criteria,
            employer,
            sick_leave_start,
            sick_leave_end,
            diagnoses,
        }) => {
            let today = chrono::Local::now().date_naive();
            let mut store = PatientStore::new();
            bootstrap(&client, &mut store).await;
            load_patient_details(&client, &mut store, &id).await;
            if store.patient(&id).is_none() {
                anyhow::bail!("patient {} not found", id);
            }

            let mut modal = EntryModal::new();
            modal.open(today);
            let fields = [
                (FormField::Type, Some(entry_type)),
                (FormField::Date, date),
                (FormField::Specialist, Some(specialist)),
                (FormField::Description, Some(description)),
                (FormField::HealthCheckRating, rating),
                (FormField::DischargeDate, discharge_date),
                (FormField::DischargeCriteria, discharge_criteria),
                (FormField::EmployerName, employer),
                (FormField::SickLeaveStartDate, sick_leave_start),
                (FormField::SickLeaveEndDate, sick_leave_end),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    modal.set(field, value)?;
                }
            }
            for code in diagnoses {
                if store.diagnosis(&code).is_none() {
                    tracing::warn!("diagnosis code {} is not known", code);
                }
                modal.select_diagnosis(code)?;
            }

            match submit_entry(&client, &mut store, &mut modal, &id, today).await? {
                SubmitOutcome::Created(entry) => {
                    println!("Added entry {} to patient {}", entry.id, id)
                }
                SubmitOutcome::Invalid(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{}: {}", field.label(), message);
                    }
                    anyhow::bail!("entry is invalid");
                }
                SubmitOutcome::Failed(message) => {
                    anyhow::bail!("Error: {}", message);
                }
            }
        }
        None => {
            println!("Use 'patientor --help' for commands");
        }
    }

    Ok(())
}
