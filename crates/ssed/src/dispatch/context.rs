//! Per-call metadata decoded from request headers.

use prost::Message;
use tonic::metadata::MetadataMap;

use crate::functions::CachePolicy;
use crate::proto::{
    COMMON_REQUEST_HEADER, CommonRequestHeader, FUNCTION_REQUEST_HEADER, FunctionRequestHeader,
};

use super::errors::CallError;

/// Caller details from the optional common request header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonRequest {
    /// Calling app.
    pub app_id: String,
    /// Calling user.
    pub user_id: String,
    /// Rows the host announced it will send.
    pub cardinality: i64,
}

/// Metadata for one execution call, decoded once when the call arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    function_id: u32,
    header_version: String,
    common: Option<CommonRequest>,
    cache_policy: CachePolicy,
}

impl CallContext {
    /// Context for a call to `function_id` with no further metadata.
    #[must_use]
    pub fn new(function_id: u32) -> Self {
        Self {
            function_id,
            header_version: String::new(),
            common: None,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Decodes the call headers.
    ///
    /// The function request header is mandatory. The common request header
    /// is optional and ignored when unreadable.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Decode`] when the function request header is
    /// absent, not valid protobuf, or names a negative id.
    pub fn from_metadata(metadata: &MetadataMap) -> Result<Self, CallError> {
        let header: FunctionRequestHeader = decode_header(metadata, FUNCTION_REQUEST_HEADER)?
            .ok_or_else(|| CallError::decode(format!("'{FUNCTION_REQUEST_HEADER}' is missing")))?;
        let function_id = u32::try_from(header.function_id).map_err(|_| {
            CallError::decode(format!("function id {} is negative", header.function_id))
        })?;

        let common = decode_header::<CommonRequestHeader>(metadata, COMMON_REQUEST_HEADER)
            .ok()
            .flatten()
            .map(|common| CommonRequest {
                app_id: common.app_id,
                user_id: common.user_id,
                cardinality: common.cardinality,
            });

        Ok(Self {
            function_id,
            header_version: header.version,
            common,
            cache_policy: CachePolicy::default(),
        })
    }

    /// Requested function id.
    #[must_use]
    pub const fn function_id(&self) -> u32 {
        self.function_id
    }

    /// Version string of the function request header.
    #[must_use]
    pub fn header_version(&self) -> &str {
        self.header_version.as_str()
    }

    /// Caller details, when the host sent them.
    #[must_use]
    pub const fn common(&self) -> Option<&CommonRequest> {
        self.common.as_ref()
    }

    /// Cache directive selected for the call.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Records the cache directive chosen by the resolved handler.
    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }
}

fn decode_header<M>(metadata: &MetadataMap, key: &'static str) -> Result<Option<M>, CallError>
where
    M: Message + Default,
{
    let Some(value) = metadata.get_bin(key) else {
        return Ok(None);
    };
    let bytes = value
        .to_bytes()
        .map_err(|error| CallError::decode(format!("'{key}' is not valid base64: {error}")))?;
    M::decode(bytes)
        .map(Some)
        .map_err(|error| CallError::decode(format!("'{key}' is not a valid message: {error}")))
}
