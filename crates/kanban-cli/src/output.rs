//! JSON envelopes printed by `kanban`.
//!
//! Results go to stdout as `{"success":true,"api_version":..,"data":..}`.
//! Failures go to stderr as `{"success":false,"api_version":..,"error":..}`
//! and the process exits with status 1, so scripts can branch on either the
//! exit code or the `success` flag.

use serde::Serialize;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            api_version: API_VERSION,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            api_version: API_VERSION,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// Board and task listings, with the count alongside so callers need not
/// measure the array.
#[derive(Serialize)]
pub struct Listing<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

/// Acknowledgement for `board delete` and `task delete`.
#[derive(Serialize)]
pub struct Deleted<'a> {
    pub deleted: &'a str,
}

pub fn output_success<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(&Envelope::data(data))?);
    Ok(())
}

pub fn output_list<T: Serialize>(items: Vec<T>) -> anyhow::Result<()> {
    let count = items.len();
    output_success(Listing { items, count })
}

pub fn output_deleted(id: &str) -> anyhow::Result<()> {
    output_success(Deleted { deleted: id })
}

pub fn output_error(message: &str) -> ! {
    match serde_json::to_string(&Envelope::failure(message)) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", message),
    }
    std::process::exit(1);
}
