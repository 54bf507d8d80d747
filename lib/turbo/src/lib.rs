//! Blocking client for an Arweave bundling upload service.
//!
//! The client authenticates with an Arweave wallet and uploads one signed ANS-104 data item per
//! call, returning the identifier the payload is addressable by once bundled.

use std::fmt;
use std::io;
use std::io::{Cursor, Read};
use std::sync::Arc;

use reqwest::blocking::Body;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod data_item;
mod jwk;
mod signer;

pub use data_item::Tag;
pub use jwk::Jwk;
pub use signer::ArweaveSigner;

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.ardrive.io";

const UPLOAD_PATH: &str = "v1/tx";

const CONTENT_TYPE_TAG: &str = "Content-Type";

/// Errors returned by the client
#[remain::sorted]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Generic HTTP Error
    #[error("HTTP Error. Code: {status}, message: {error}")]
    HttpError {
        status: StatusCode,
        headers: HeaderMap,
        error: String,
    },

    #[error("invalid wallet key: {0}")]
    InvalidKey(String),

    #[error("invalid data item tag: {0}")]
    InvalidTag(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Errors returned by reqwest
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error("invalid wallet key: {0}")]
    RsaError(#[from] rsa::Error),

    /// Serde JSON parsing error
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("failed to sign data item: {0}")]
    SigningError(String),

    #[error("payload changed while uploading: expected {expected} bytes, read {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("unsupported key type `{0}`, expected RSA")]
    UnsupportedKeyType(String),

    /// URL Parsing Error
    #[error(transparent)]
    UrlParserError(#[from] url::ParseError),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Receipt for a successful upload.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub timestamp: Option<u64>,

    #[serde(default)]
    pub winc: Option<String>,

    #[serde(default)]
    pub data_caches: Vec<String>,

    #[serde(default)]
    pub fast_finality_indexes: Vec<String>,
}

/// Entrypoint for uploading to the service.
#[derive(Clone)]
pub struct Client {
    upload_url: Url,
    owner: String,
    signer: Arc<ArweaveSigner>,
    client: reqwest::blocking::Client,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("upload_url", &self.upload_url.as_str())
            .field("owner", &self.owner)
            .finish()
    }
}

impl Client {
    /// Creates a client that signs and uploads on behalf of `wallet`.
    pub fn authenticated<A>(agent: A, wallet: Jwk, upload_url: Url) -> ClientResult<Self>
    where
        A: Into<String>,
    {
        let http = reqwest::blocking::Client::builder()
            .user_agent(agent.into())
            .build()?;

        Self::with_http_client(http, &wallet, upload_url)
    }

    fn with_http_client(
        client: reqwest::blocking::Client,
        wallet: &Jwk,
        upload_url: Url,
    ) -> ClientResult<Self> {
        if !wallet.is_private() {
            return Err(ClientError::InvalidKey(
                "wallet is missing its private exponent".to_string(),
            ));
        }

        let signer = ArweaveSigner::from_jwk(wallet)?;
        let owner = wallet.address()?;

        Ok(Self {
            upload_url,
            owner,
            signer: Arc::new(signer),
            client,
        })
    }

    /// Address of the wallet uploads are made from.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.upload_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))?)
    }

    /// Signs `size` bytes as a data item tagged with `content_type` and streams it to the service,
    /// returning the upload receipt.
    ///
    /// `open` is called twice: once to hash the payload for signing and once to stream it. Both
    /// readers must yield the same `size` bytes.
    pub fn upload<F, R>(
        &self,
        open: F,
        size: u64,
        content_type: &str,
    ) -> ClientResult<UploadResponse>
    where
        F: Fn() -> io::Result<R>,
        R: Read + Send + 'static,
    {
        let tags = [Tag::new(CONTENT_TYPE_TAG, content_type)];
        let raw_tags = data_item::serialize_tags(&tags)?;

        let (actual, digest) = data_item::hash_stream(open()?)?;
        if actual != size {
            return Err(ClientError::SizeMismatch {
                expected: size,
                actual,
            });
        }

        let owner = self.signer.owner();
        let message = data_item::signature_message(owner, &raw_tags, size, &digest);
        let signature = self.signer.sign(&message)?;
        let header = data_item::encode_header(&signature, owner, tags.len(), &raw_tags);

        let uri = self.url(UPLOAD_PATH)?;
        debug!(
            "uploading data item {} ({size} bytes of {content_type}) to {uri}",
            data_item::id(&signature)
        );

        let length = header.len() as u64 + size;
        let body = Cursor::new(header).chain(open()?.take(size));

        let response = self
            .client
            .post(uri)
            .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
            .body(Body::sized(body, length))
            .send()?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_body = response.bytes()?;

        if status.is_success() {
            debug!("Received successful response. Read payload.");
            Ok(serde_json::from_slice::<UploadResponse>(&response_body)?)
        } else {
            let error = String::from_utf8_lossy(&response_body).to_string();
            Err(ClientError::HttpError {
                status,
                headers,
                error,
            })
        }
    }
}
