//! BigQuery Warehouse Client
//!
//! WarehouseClient implementation on top of the BigQuery REST client

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_bigquery::client::Client;
use google_cloud_bigquery::http::job::get_query_results::GetQueryResultsRequest;
use google_cloud_bigquery::http::job::query::QueryRequest;
use google_cloud_bigquery::http::tabledata::insert_all::{InsertAllRequest, Row};
use log::debug;

use super::conversion::{row_errors, to_query_parameters, NextPage, ResultPages};
use crate::domain::entities::query_statement::QueryStatement;
use crate::domain::entities::record::{InsertRowError, Record};
use crate::domain::entities::table_ref::TableRef;
use crate::domain::repositories::warehouse_client::WarehouseClient;

/// Prepare rows for insertAll, each with a fresh insert id
pub fn prepare_rows(records: Vec<Record>) -> Vec<Row<Record>> {
    records
        .into_iter()
        .map(|json| Row {
            insert_id: Some(uuid::Uuid::new_v4().to_string()),
            json,
        })
        .collect()
}

/// BigQuery client that owns the Client instance
pub struct BigQueryWarehouseClient {
    client: Client,
    /// Project that runs (and is billed for) query jobs
    project_id: String,
    /// Server-side wait per request; an unfinished job is polled again
    query_timeout_ms: i64,
}

impl BigQueryWarehouseClient {
    pub fn new(client: Client, project_id: impl Into<String>, query_timeout_ms: i64) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            query_timeout_ms,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl WarehouseClient for BigQueryWarehouseClient {
    async fn run_query(&self, statement: &QueryStatement) -> Result<Vec<Record>> {
        let request = QueryRequest {
            query: statement.sql.clone(),
            query_parameters: to_query_parameters(&statement.params),
            timeout_ms: Some(self.query_timeout_ms),
            ..Default::default()
        };

        let response = self
            .client
            .job()
            .query(&self.project_id, &request)
            .await
            .context("BigQuery query failed")?;

        let job = response.job_reference.clone();
        let mut pages = ResultPages::default();
        let mut next = pages.absorb(response.into());

        while let NextPage::Fetch(page_token) = next {
            debug!(
                "Fetching results of job {} (page token: {:?})",
                job.job_id, page_token
            );
            let request = GetQueryResultsRequest {
                page_token,
                location: job.location.clone(),
                timeout_ms: Some(self.query_timeout_ms),
                ..Default::default()
            };
            let response = self
                .client
                .job()
                .get_query_results(&job.project_id, &job.job_id, &request)
                .await
                .with_context(|| {
                    format!("BigQuery getQueryResults failed for job {}", job.job_id)
                })?;
            next = pages.absorb(response.into());
        }

        debug!("BigQuery query returned {} rows", pages.row_count());
        pages.into_records()
    }

    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: Vec<Record>,
    ) -> Result<Vec<InsertRowError>> {
        let request = InsertAllRequest {
            rows: prepare_rows(rows),
            skip_invalid_rows: None,
            ignore_unknown_values: None,
            template_suffix: None,
            trace_id: None,
        };

        let response = self
            .client
            .tabledata()
            .insert(&table.project_id, &table.dataset, &table.table, &request)
            .await
            .context("BigQuery insert failed")?;

        Ok(row_errors(response))
    }
}
