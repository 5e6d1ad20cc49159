use chrono::{Local, NaiveDate};
use patientor_client::{bootstrap, load_patient_details, submit_entry, ApiClient, SubmitOutcome};
use patientor_core::{
    config::api_config_from_env_values,
    constants::{API_BASE_URL_VAR, ENVIRONMENT_VAR},
    render::{render_patient, render_patient_list},
    EntryModal, FormField, PatientStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  patients               list patients
  diagnoses              list diagnosis codes
  open <id>              show a patient and make it current
  add                    open the add-entry form for the current patient
  set <field> <value>    edit a form field (type, date, specialist, description,
                         healthCheckRating, discharge.date, discharge.criteria,
                         employerName, sickLeave.startDate, sickLeave.endDate)
  diagnosis <code>       add a diagnosis code to the form
  clear-diagnoses        remove all selected diagnosis codes
  form                   show the form values and errors
  submit                 submit the form
  cancel                 close the form without saving
  help                   show this help
  quit                   exit";

/// Interactive session state: the store, the current patient page and its add-entry modal.
struct App {
    client: ApiClient,
    store: PatientStore,
    current: Option<String>,
    modal: EntryModal,
}

impl App {
    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Handle one command line. Returns `false` when the session should end.
    async fn handle(&mut self, line: &str) -> anyhow::Result<bool> {
        let mut parts = line.trim().splitn(3, ' ');
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            "patients" | "home" => {
                self.current = None;
                self.modal.cancel(Self::today());
                print!("{}", render_patient_list(&self.store));
            }
            "diagnoses" => {
                for diagnosis in self.store.diagnoses() {
                    println!("{}  {}", diagnosis.code, diagnosis.name);
                }
            }
            "open" if arg.is_empty() => println!("usage: open <id>"),
            "open" => {
                if self.store.patient(arg).is_none() {
                    println!("loading data...");
                }
                load_patient_details(&self.client, &mut self.store, arg).await;
                match self.store.patient(arg) {
                    Some(patient) => {
                        print!("{}", render_patient(patient, &self.store));
                        self.current = Some(arg.to_string());
                        self.modal.cancel(Self::today());
                    }
                    None => println!("patient {arg} not found"),
                }
            }
            "add" => {
                if self.current.is_none() {
                    println!("open a patient first");
                } else {
                    self.modal.open(Self::today());
                    println!("Add a new entry (date pre-filled with today)");
                }
            }
            "set" => {
                let field = arg.parse::<FormField>()?;
                self.modal.set(field, rest)?;
            }
            "diagnosis" => {
                if self.store.diagnosis(arg).is_none() {
                    println!("warning: diagnosis code {arg} is not loaded");
                }
                self.modal.select_diagnosis(arg)?;
            }
            "clear-diagnoses" => self.modal.clear_diagnoses()?,
            "form" => self.print_form(),
            "submit" => self.submit().await?,
            "cancel" => self.modal.cancel(Self::today()),
            other => println!("unknown command '{other}', try 'help'"),
        }

        Ok(true)
    }

    async fn submit(&mut self) -> anyhow::Result<()> {
        let Some(patient_id) = self.current.clone() else {
            println!("open a patient first");
            return Ok(());
        };

        match submit_entry(
            &self.client,
            &mut self.store,
            &mut self.modal,
            &patient_id,
            Self::today(),
        )
        .await?
        {
            SubmitOutcome::Created(_) => {
                if let Some(patient) = self.store.patient(&patient_id) {
                    print!("{}", render_patient(patient, &self.store));
                }
            }
            SubmitOutcome::Invalid(_) => self.print_form(),
            SubmitOutcome::Failed(message) => println!("Error: {message}"),
        }
        Ok(())
    }

    fn print_form(&self) {
        if !self.modal.is_open() {
            println!("the form is closed; use 'add'");
            return;
        }
        if let Some(error) = self.modal.submit_error() {
            println!("Error: {error}");
        }
        let values = self.modal.values();
        for field in FormField::ALL {
            let error = self
                .modal
                .errors()
                .get(field)
                .map(|e| format!("  <- {e}"))
                .unwrap_or_default();
            println!("{:<24}{}{}", field.path(), values.get(field), error);
        }
        println!("{:<24}{}", "diagnosisCodes", values.diagnosis_codes.join(", "));
    }
}

/// Interactive Patientor session
///
/// Loads the patient and diagnosis lists, then reads commands from stdin.
///
/// # Environment Variables
/// - `PATIENTOR_ENV`: `development` or `production` (default: production)
/// - `PATIENTOR_API_BASE_URL`: overrides the environment's API base URL
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = api_config_from_env_values(
        std::env::var(ENVIRONMENT_VAR).ok(),
        std::env::var(API_BASE_URL_VAR).ok(),
    )?;
    tracing::info!("++ Starting Patientor against {}", config.base_url());

    let mut app = App {
        client: ApiClient::new(config)?,
        store: PatientStore::new(),
        current: None,
        modal: EntryModal::new(),
    };
    bootstrap(&app.client, &mut app.store).await;
    println!("Patientor");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match app.handle(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}
