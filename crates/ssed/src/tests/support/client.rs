//! Loopback gRPC client helpers.

use std::net::SocketAddr;

use prost::Message;
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tonic::{Request, Status};

use crate::proto::connector_client::ConnectorClient;
use crate::proto::{
    BundledRows, CACHE_HEADER, CACHE_NO_STORE, Dual, FUNCTION_REQUEST_HEADER,
    FunctionRequestHeader, Row,
};

/// What the host observed for one execution call.
#[derive(Debug, Default)]
pub struct CallReply {
    /// Text of the first cell of every returned row.
    pub rows: Vec<String>,
    /// Status that terminated the response stream, if any.
    pub failure: Option<Status>,
    /// Whether the response asked the host not to cache it.
    pub no_store: bool,
}

pub async fn connect(address: SocketAddr) -> ConnectorClient<Channel> {
    ConnectorClient::connect(format!("http://{address}"))
        .await
        .expect("client connects")
}

/// Calls `function_id` with one text column holding `values`.
pub async fn execute(
    client: &mut ConnectorClient<Channel>,
    function_id: i32,
    values: &[&str],
) -> Result<CallReply, Status> {
    let mut request = Request::new(tokio_stream::iter(vec![bundle(values)]));
    let header = FunctionRequestHeader {
        function_id,
        version: String::from("1.0.0"),
    };
    request.metadata_mut().insert_bin(
        FUNCTION_REQUEST_HEADER,
        MetadataValue::from_bytes(&header.encode_to_vec()),
    );
    send(client, request).await
}

/// Calls the service without the function request header.
pub async fn execute_without_header(
    client: &mut ConnectorClient<Channel>,
    values: &[&str],
) -> Result<CallReply, Status> {
    send(client, Request::new(tokio_stream::iter(vec![bundle(values)]))).await
}

async fn send(
    client: &mut ConnectorClient<Channel>,
    request: Request<tokio_stream::Iter<std::vec::IntoIter<BundledRows>>>,
) -> Result<CallReply, Status> {
    let response = client.execute_function(request).await?;
    let no_store = response
        .metadata()
        .get(CACHE_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(CACHE_NO_STORE);

    let mut stream = response.into_inner();
    let mut reply = CallReply {
        no_store,
        ..CallReply::default()
    };
    loop {
        match stream.message().await {
            Ok(Some(bundle)) => reply.rows.extend(bundle.rows.into_iter().map(|row| {
                row.duals
                    .into_iter()
                    .next()
                    .map(|dual| dual.str_data)
                    .unwrap_or_default()
            })),
            Ok(None) => break,
            Err(status) => {
                reply.failure = Some(status);
                break;
            }
        }
    }
    Ok(reply)
}

fn bundle(values: &[&str]) -> BundledRows {
    BundledRows {
        rows: values
            .iter()
            .map(|value| Row {
                duals: vec![Dual {
                    num_data: f64::NAN,
                    str_data: (*value).to_owned(),
                }],
            })
            .collect(),
    }
}
