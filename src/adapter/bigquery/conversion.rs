//! BigQuery Type Conversion
//!
//! Statement parameters to API parameters, result pages to records,
//! insertAll responses to row errors

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat};
use google_cloud_bigquery::http::job::get_query_results::GetQueryResultsResponse;
use google_cloud_bigquery::http::job::query::QueryResponse;
use google_cloud_bigquery::http::table::{TableFieldSchema, TableFieldType, TableSchema};
use google_cloud_bigquery::http::tabledata::insert_all::{ErrorMessage, InsertAllResponse};
use google_cloud_bigquery::http::tabledata::list::{Tuple, Value as BqValue};
use google_cloud_bigquery::http::types::{
    QueryParameter, QueryParameterType, QueryParameterValue,
};
use serde_json::Value;

use crate::domain::entities::query_statement::QueryParam;
use crate::domain::entities::record::{InsertRowError, Record};

/// Convert named statement parameters into API query parameters
pub fn to_query_parameters(params: &[QueryParam]) -> Vec<QueryParameter> {
    params
        .iter()
        .map(|param| QueryParameter {
            name: Some(param.name.clone()),
            parameter_type: QueryParameterType {
                parameter_type: param.value.type_name().to_string(),
                ..Default::default()
            },
            parameter_value: QueryParameterValue {
                value: Some(param.value.to_api_string()),
                ..Default::default()
            },
        })
        .collect()
}

/// One page of query results, from `jobs.query` or `jobs.getQueryResults`
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    pub job_complete: bool,
    pub schema: Option<TableSchema>,
    pub rows: Vec<Tuple>,
    pub page_token: Option<String>,
}

impl From<QueryResponse> for ResultPage {
    fn from(response: QueryResponse) -> Self {
        Self {
            job_complete: response.job_complete,
            schema: response.schema,
            rows: response.rows.unwrap_or_default(),
            page_token: response.page_token,
        }
    }
}

impl From<GetQueryResultsResponse> for ResultPage {
    fn from(response: GetQueryResultsResponse) -> Self {
        Self {
            job_complete: response.job_complete,
            schema: response.schema,
            rows: response.rows.unwrap_or_default(),
            page_token: response.page_token,
        }
    }
}

/// What to request after absorbing a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    Done,
    /// Call getQueryResults with this page token (`None` = first page)
    Fetch(Option<String>),
}

/// Accumulates result pages until the job is complete and no token remains
#[derive(Debug, Default)]
pub struct ResultPages {
    schema: Option<TableSchema>,
    rows: Vec<Tuple>,
    cursor: Option<String>,
}

impl ResultPages {
    pub fn absorb(&mut self, page: ResultPage) -> NextPage {
        // incomplete jobs carry no rows yet; ask again from the same position
        if !page.job_complete {
            return NextPage::Fetch(self.cursor.clone());
        }

        if self.schema.is_none() {
            self.schema = page.schema;
        }
        self.rows.extend(page.rows);

        // an empty token also means the last page
        self.cursor = page.page_token.filter(|token| !token.is_empty());
        match &self.cursor {
            Some(token) => NextPage::Fetch(Some(token.clone())),
            None => NextPage::Done,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let schema = self
            .schema
            .context("BigQuery returned rows without a schema")?;
        rows_to_records(&schema.fields, &self.rows)
    }
}

/// Per-row errors of an insertAll response (`reason: message`)
pub fn row_errors(response: InsertAllResponse) -> Vec<InsertRowError> {
    response
        .insert_errors
        .unwrap_or_default()
        .into_iter()
        .map(|error| {
            let detail = error
                .errors
                .iter()
                .map(describe_error)
                .collect::<Vec<_>>()
                .join("; ");
            InsertRowError::new(error.index.max(0) as usize, detail)
        })
        .collect()
}

fn describe_error(error: &ErrorMessage) -> String {
    match (error.reason.is_empty(), error.message.is_empty()) {
        (false, false) => format!("{}: {}", error.reason, error.message),
        (false, true) => error.reason.clone(),
        (true, false) => error.message.clone(),
        (true, true) => "unknown error".to_string(),
    }
}

/// Convert all result tuples using the response schema
pub fn rows_to_records(fields: &[TableFieldSchema], rows: &[Tuple]) -> Result<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(i, tuple)| {
            tuple_to_record(fields, tuple).with_context(|| format!("Failed to convert row {}", i))
        })
        .collect()
}

/// Zip one tuple with the schema; column order follows the schema
pub fn tuple_to_record(fields: &[TableFieldSchema], tuple: &Tuple) -> Result<Record> {
    if fields.len() != tuple.f.len() {
        bail!(
            "row has {} cells but schema has {} fields",
            tuple.f.len(),
            fields.len()
        );
    }

    fields
        .iter()
        .zip(&tuple.f)
        .map(|(field, cell)| Ok((field.name.clone(), cell_to_json(field, &cell.v)?)))
        .collect()
}

fn cell_to_json(field: &TableFieldSchema, value: &BqValue) -> Result<Value> {
    match value {
        BqValue::Null => Ok(Value::Null),
        BqValue::String(raw) => scalar_to_json(&field.data_type, raw)
            .with_context(|| format!("Invalid value for column {}", field.name)),
        // REPEATED: each element has the field's own type
        BqValue::Array(cells) => cells
            .iter()
            .map(|cell| cell_to_json(field, &cell.v))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        BqValue::Struct(tuple) => {
            tuple_to_record(field.fields.as_deref().unwrap_or(&[]), tuple).map(Value::Object)
        }
    }
}

fn scalar_to_json(data_type: &TableFieldType, raw: &str) -> Result<Value> {
    match data_type {
        TableFieldType::Integer | TableFieldType::Int64 => {
            let v: i64 = raw.parse().context("not an integer")?;
            Ok(Value::from(v))
        }
        TableFieldType::Float | TableFieldType::Float64 => {
            let v: f64 = raw.parse().context("not a float")?;
            // NaN and Infinity have no JSON number form
            Ok(serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())))
        }
        TableFieldType::Boolean | TableFieldType::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => bail!("not a boolean: {}", other),
        },
        TableFieldType::Json => serde_json::from_str(raw).context("not valid JSON"),
        TableFieldType::Timestamp => Ok(Value::String(
            epoch_to_rfc3339(raw).unwrap_or_else(|| raw.to_string()),
        )),
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// TIMESTAMP cells arrive as floating point epoch seconds (e.g. `1.7356896E9`)
fn epoch_to_rfc3339(raw: &str) -> Option<String> {
    let seconds: f64 = raw.parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round() as i64;
    let ts = DateTime::from_timestamp(
        micros.div_euclid(1_000_000),
        (micros.rem_euclid(1_000_000) * 1_000) as u32,
    )?;
    Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
