//! Test domain: sample commands and queries with their handlers.

use std::io::Read;
use std::sync::{Arc, Mutex};

use cqrs_bus::{
    async_trait, Command, CommandHandler, HandlerError, MessageBus, Query, QueryHandler, RawStream,
    StreamCommandHandler,
};
use serde::{Deserialize, Serialize};

/// Query payload: doubles `Value`.
#[derive(Debug, Serialize, Deserialize, Query)]
#[query(response = i64)]
#[serde(rename_all = "PascalCase")]
pub struct TestQuery {
    pub value: i64,
}

#[derive(Default)]
pub struct TestQueryHandler;

#[async_trait]
impl QueryHandler for TestQueryHandler {
    type Query = TestQuery;

    async fn handle(&self, query: TestQuery) -> Result<i64, HandlerError> {
        Ok(query.value * 2)
    }
}

/// Command payload: does nothing.
#[derive(Debug, Serialize, Deserialize, Command)]
#[serde(rename_all = "PascalCase")]
pub struct SampleCommand {
    pub foo: String,
}

#[derive(Default)]
pub struct SampleCommandHandler;

#[async_trait]
impl CommandHandler for SampleCommandHandler {
    type Command = SampleCommand;

    async fn handle(&self, _command: SampleCommand) -> Result<(), HandlerError> {
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SampleQueryResponse {
    pub baz: String,
}

/// Query payload: `Foo == "Ex"` fails with `"Exception"`.
#[derive(Debug, Serialize, Deserialize, Query)]
#[query(response = SampleQueryResponse)]
#[serde(rename_all = "PascalCase")]
pub struct SampleQuery {
    pub foo: String,
}

#[derive(Default)]
pub struct SampleQueryHandler;

#[async_trait]
impl QueryHandler for SampleQueryHandler {
    type Query = SampleQuery;

    async fn handle(&self, query: SampleQuery) -> Result<SampleQueryResponse, HandlerError> {
        if query.foo == "Ex" {
            return Err("Exception".into());
        }
        Ok(SampleQueryResponse {
            baz: format!("{}Baz", query.foo),
        })
    }
}

/// Stream command without fields: records what arrived on the stream.
#[derive(Debug, Serialize, Deserialize, Command)]
#[message(name = "UploadFile")]
pub struct Upload {}

/// Stream command naming the file it carries.
#[derive(Debug, Serialize, Deserialize, Command)]
pub struct Attach {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub file_name: Option<String>,
    pub label: Option<String>,
    pub bytes: Vec<u8>,
}

pub type Uploads = Arc<Mutex<Vec<Received>>>;

pub struct UploadHandler {
    pub uploads: Uploads,
}

#[async_trait]
impl StreamCommandHandler for UploadHandler {
    type Command = Upload;

    async fn handle(&self, _command: Upload, stream: RawStream) -> Result<(), HandlerError> {
        record(&self.uploads, None, stream)
    }
}

pub struct AttachHandler {
    pub uploads: Uploads,
}

#[async_trait]
impl StreamCommandHandler for AttachHandler {
    type Command = Attach;

    async fn handle(&self, command: Attach, stream: RawStream) -> Result<(), HandlerError> {
        record(&self.uploads, Some(command.file_name), stream)
    }
}

fn record(
    uploads: &Uploads,
    file_name: Option<String>,
    mut stream: RawStream,
) -> Result<(), HandlerError> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    let received = Received {
        file_name,
        label: stream.label().map(str::to_string),
        bytes,
    };
    uploads
        .lock()
        .map_err(|_| HandlerError::new("upload log poisoned"))?
        .push(received);
    Ok(())
}

/// Registered shape with no handler bound.
#[derive(Debug, Serialize, Deserialize, Command)]
pub struct Unhandled {
    pub id: u32,
}

/// Registered shape whose only field is optional.
#[derive(Debug, Serialize, Deserialize, Command)]
pub struct Tag {
    pub label: Option<String>,
}

/// The bus used by most tests, plus the upload log its stream handler writes.
pub fn sample_bus() -> (MessageBus, Uploads) {
    let uploads: Uploads = Arc::default();
    let upload_log = uploads.clone();
    let attach_log = uploads.clone();
    let bus = MessageBus::builder()
        .query(TestQueryHandler::default)
        .query(SampleQueryHandler::default)
        .command(SampleCommandHandler::default)
        .stream_command(move || UploadHandler {
            uploads: upload_log.clone(),
        })
        .stream_command(move || AttachHandler {
            uploads: attach_log.clone(),
        })
        .declare_command::<Unhandled>()
        .declare_command::<Tag>()
        .build()
        .unwrap();
    (bus, uploads)
}

/// Envelope JSON for `name` with `args` embedded as a JSON string.
pub fn envelope(name: &str, args: serde_json::Value) -> String {
    serde_json::json!({ "name": name, "args": args.to_string() }).to_string()
}
