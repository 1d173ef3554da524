//! Shared fakes for integration-style tests.
//!
//! The driver's capabilities are injectable, so these tests run against
//! in-memory fakes instead of a live server: `FakeTransport` plays the
//! Flight SQL side and `FakeControlPlane` plays the REST side, both
//! recording the calls they receive.

use async_trait::async_trait;
use duckgresql_rs::query::statement::ParamBatch;
use duckgresql_rs::rest::protocol::{JobResultRows, JobStatusReport};
use duckgresql_rs::transport::{BearerToken, FlightEndpoint, FlightInfo, Ticket};
use duckgresql_rs::wire::codec::{encode_length_delimited_field, encode_string_field};
use duckgresql_rs::{
    ConnectionParams, ControlPlane, DuckgresqlError, FlightSqlTransport, JobStatus, Table,
    TransportError,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Connection parameters used by every test.
pub fn test_params() -> ConnectionParams {
    ConnectionParams::builder()
        .token("dkgql_test_token")
        .database("testdb")
        .build()
        .unwrap()
}

/// Encode a create-prepared-statement action result carrying `handle`.
pub fn prepared_result_body(handle: &[u8]) -> Vec<u8> {
    let inner = encode_length_delimited_field(1, handle);
    let mut body = encode_string_field(
        1,
        "type.googleapis.com/arrow.flight.protocol.sql.ActionCreatePreparedStatementResult",
    );
    body.extend_from_slice(&encode_length_delimited_field(2, &inner));
    body
}

/// In-memory Flight SQL transport with canned responses.
pub struct FakeTransport {
    /// Table returned by `fetch_stream`
    pub table: Table,
    /// Handle issued for create-prepared-statement actions
    pub handle: Vec<u8>,
    /// Whether `get_flight_info` advertises an endpoint
    pub with_endpoint: bool,
    /// When set, `push_batch` fails with this message
    pub fail_push: Option<String>,
    /// Action names observed, in order
    pub actions: Vec<String>,
    /// Parameter batches observed
    pub batches: Vec<ParamBatch>,
    /// Credentials observed during the handshake
    pub handshakes: Vec<(String, String)>,
}

impl FakeTransport {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            handle: b"fake-handle".to_vec(),
            with_endpoint: true,
            fail_push: None,
            actions: Vec::new(),
            batches: Vec::new(),
            handshakes: Vec::new(),
        }
    }
}

#[async_trait]
impl FlightSqlTransport for FakeTransport {
    async fn authenticate(
        &mut self,
        credential: &str,
        database: &str,
    ) -> Result<BearerToken, TransportError> {
        self.handshakes
            .push((credential.to_string(), database.to_string()));
        Ok(BearerToken::new("conn_fake_bearer"))
    }

    async fn get_flight_info(
        &mut self,
        _descriptor: &[u8],
        _token: &BearerToken,
    ) -> Result<FlightInfo, TransportError> {
        if self.with_endpoint {
            Ok(FlightInfo {
                endpoints: vec![FlightEndpoint {
                    ticket: Ticket(b"fake-ticket".to_vec()),
                }],
            })
        } else {
            Ok(FlightInfo::default())
        }
    }

    async fn fetch_stream(
        &mut self,
        _ticket: &Ticket,
        _token: &BearerToken,
    ) -> Result<Table, TransportError> {
        Ok(self.table.clone())
    }

    async fn push_batch(
        &mut self,
        _descriptor: &[u8],
        batch: &ParamBatch,
        _token: &BearerToken,
    ) -> Result<(), TransportError> {
        if let Some(message) = &self.fail_push {
            return Err(TransportError::Rpc(message.clone()));
        }
        self.batches.push(batch.clone());
        Ok(())
    }

    async fn do_action(
        &mut self,
        action: &str,
        _body: &[u8],
        _token: &BearerToken,
    ) -> Result<Vec<Vec<u8>>, TransportError> {
        self.actions.push(action.to_string());
        if action == "CreatePreparedStatement" {
            Ok(vec![prepared_result_body(&self.handle)])
        } else {
            Ok(vec![])
        }
    }
}

/// In-memory control plane replaying a scripted status sequence.
///
/// The final status repeats once the script is exhausted, the way a real
/// server keeps answering the same terminal state.
pub struct FakeControlPlane {
    statuses: Mutex<VecDeque<JobStatusReport>>,
    pub submitted: Mutex<Vec<(String, Option<serde_json::Value>)>>,
    pub cancelled: Mutex<Vec<String>>,
    result: JobResultRows,
}

impl FakeControlPlane {
    pub fn new(statuses: Vec<(JobStatus, Option<&str>)>) -> Self {
        let result: JobResultRows = serde_json::from_value(serde_json::json!({
            "columns": ["region", "total"],
            "results": [
                {"region": "emea", "total": 10},
                {"region": "apac", "total": 20},
                {"region": "amer", "total": 30},
            ],
        }))
        .unwrap();
        Self {
            statuses: Mutex::new(
                statuses
                    .into_iter()
                    .map(|(status, error)| JobStatusReport {
                        status,
                        error: error.map(str::to_string),
                    })
                    .collect(),
            ),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            result,
        }
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn connect(&self, _credential: &str, _database: &str) -> Result<String, DuckgresqlError> {
        Ok("conn_rest_token".to_string())
    }

    async fn submit_async(
        &self,
        _conn_token: &str,
        query: &str,
        bindings: Option<&serde_json::Value>,
    ) -> Result<String, DuckgresqlError> {
        self.submitted
            .lock()
            .unwrap()
            .push((query.to_string(), bindings.cloned()));
        Ok("job-7".to_string())
    }

    async fn job_status(
        &self,
        _conn_token: &str,
        _job_id: &str,
    ) -> Result<JobStatusReport, DuckgresqlError> {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.pop_front().unwrap())
        } else {
            Ok(statuses.front().expect("status script is empty").clone())
        }
    }

    async fn job_result(
        &self,
        _conn_token: &str,
        _job_id: &str,
    ) -> Result<JobResultRows, DuckgresqlError> {
        Ok(self.result.clone())
    }

    async fn cancel_job(&self, _conn_token: &str, job_id: &str) -> Result<(), DuckgresqlError> {
        self.cancelled.lock().unwrap().push(job_id.to_string());
        Ok(())
    }
}
