use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use reqwest::Client;
use signup_form::config::Config;
use signup_form::form::{SignupForm, SubmitOutcome};
use signup_form::models::{Country, Field, UserType};
use signup_form::services::countries::RestCountriesClient;
use signup_form::services::signup::SignupClient;
use signup_form::workflow::{SubmissionState, SubmissionWorkflow};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    std::io::stdout().flush()?;
    input
        .next_line()
        .await?
        .ok_or_else(|| anyhow!("input closed before the form was submitted"))
}

fn print_user_types() {
    println!("User Type:");
    for (index, user_type) in UserType::ALL.iter().enumerate() {
        println!("  {}) {}", index + 1, user_type.label());
    }
}

fn print_countries(countries: &[Country]) {
    if countries.is_empty() {
        println!("Country: no countries available");
        return;
    }
    println!("Country:");
    for country in countries {
        println!("  {}", country.name);
    }
}

/// Accepts the option number, the wire name or the label.
fn parse_user_type(answer: &str) -> Option<UserType> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|index| UserType::ALL.get(index).copied());
    }
    UserType::ALL.into_iter().find(|user_type| {
        user_type.as_str() == answer || user_type.label().eq_ignore_ascii_case(answer)
    })
}

async fn fill_field(form: &mut SignupForm, input: &mut Input, field: Field) -> anyhow::Result<()> {
    match field {
        Field::UserType => {
            print_user_types();
            let answer = prompt(input, field.label()).await?;
            match parse_user_type(&answer) {
                Some(user_type) => form.set_user_type(user_type),
                None => form.set(field, ""),
            }
        }
        Field::Country => {
            print_countries(&form.countries());
            let answer = prompt(input, field.label()).await?;
            if !form.select_country(answer.trim()) {
                form.set(field, "");
            }
        }
        _ => {
            let answer = prompt(input, field.label()).await?;
            form.set(field, answer);
        }
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing()?;

    let config = Config::from_env();
    info!(
        signup_endpoint = %config.signup_endpoint_url,
        countries = %config.countries_url,
        "starting signup form"
    );

    let http_client = Client::new();
    let signup = Arc::new(SignupClient::new(
        http_client.clone(),
        config.signup_endpoint_url.as_str(),
    ));
    let countries = Arc::new(RestCountriesClient::new(
        http_client,
        config.countries_url.as_str(),
    ));

    let workflow = Arc::new(SubmissionWorkflow::new(signup));
    workflow.subscribe(|state| {
        if state.loading() {
            println!("Signing up...");
        }
    });

    let mut form = SignupForm::mount(workflow.clone(), countries);
    form.countries_ready().await;

    println!("Sign Up");
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<Field> = Field::ALL.to_vec();

    let settled = loop {
        for field in pending.iter().copied() {
            fill_field(&mut form, &mut input, field).await?;
        }

        match form.submit().await {
            SubmitOutcome::Invalid(errors) => {
                for (_, message) in errors.iter() {
                    println!("{}", message);
                }
                pending = errors.fields().collect();
            }
            SubmitOutcome::Busy => continue,
            SubmitOutcome::Submitted(state) => break state,
        }
    };

    let code = match settled {
        SubmissionState::Succeeded => {
            println!("Signup Successful");
            ExitCode::SUCCESS
        }
        other => {
            println!("{}", other.error().unwrap_or("Signup failed"));
            ExitCode::FAILURE
        }
    };

    form.unmount();
    Ok(code)
}
