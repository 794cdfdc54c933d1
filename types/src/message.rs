//! Request and response payloads exchanged between the coordinator and a worker.
//!
//! Payloads are protobuf messages. Every matrix carries its own dimensions, so a
//! frame decodes without any out-of-band schema.

use prost::Message;

use crate::{Matrix, WireError};

/// Protobuf representations of the wire payloads.
pub mod proto {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Matrix {
        #[prost(uint64, tag = "1")]
        pub rows: u64,
        #[prost(uint64, tag = "2")]
        pub cols: u64,
        #[prost(sint64, repeated, tag = "3")]
        pub data: Vec<i64>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Request {
        #[prost(message, optional, tag = "1")]
        pub left: Option<Matrix>,
        #[prost(message, repeated, tag = "2")]
        pub right: Vec<Matrix>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Response {
        #[prost(message, repeated, tag = "1")]
        pub blocks: Vec<Matrix>,
        #[prost(string, tag = "2")]
        pub error: String,
    }
}

/// A value that travels as the body of one frame.
pub trait WireMessage: Sized {
    fn encode_payload(&self) -> Vec<u8>;

    fn decode_payload(bytes: &[u8]) -> Result<Self, WireError>;
}

/// Work sent to one worker: a left operand multiplied by each right operand in order.
///
/// The row-only split sends one right operand (all of B). The row-and-column
/// split sends every column block of B, so the left operand is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub left: Matrix,
    pub right: Vec<Matrix>,
}

/// A worker's answer to one [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// One product block per right operand, in request order.
    Product(Vec<Matrix>),
    /// The worker could not compute the product.
    Error(String),
}

impl From<&Matrix> for proto::Matrix {
    fn from(m: &Matrix) -> Self {
        proto::Matrix {
            rows: m.rows() as u64,
            cols: m.cols() as u64,
            data: m.as_slice().to_vec(),
        }
    }
}

impl TryFrom<proto::Matrix> for Matrix {
    type Error = WireError;

    fn try_from(m: proto::Matrix) -> Result<Self, Self::Error> {
        let rows = usize::try_from(m.rows)
            .map_err(|_| WireError::Malformed(format!("row count {} too large", m.rows)))?;
        let cols = usize::try_from(m.cols)
            .map_err(|_| WireError::Malformed(format!("column count {} too large", m.cols)))?;
        Ok(Matrix::new(rows, cols, m.data)?)
    }
}

impl WireMessage for Matrix {
    fn encode_payload(&self) -> Vec<u8> {
        proto::Matrix::from(self).encode_to_vec()
    }

    fn decode_payload(bytes: &[u8]) -> Result<Self, WireError> {
        Matrix::try_from(proto::Matrix::decode(bytes)?)
    }
}

impl WireMessage for Request {
    fn encode_payload(&self) -> Vec<u8> {
        proto::Request {
            left: Some(proto::Matrix::from(&self.left)),
            right: self.right.iter().map(proto::Matrix::from).collect(),
        }
        .encode_to_vec()
    }

    fn decode_payload(bytes: &[u8]) -> Result<Self, WireError> {
        let request = proto::Request::decode(bytes)?;
        let left = request
            .left
            .ok_or_else(|| WireError::Malformed("request has no left operand".to_string()))?;
        if request.right.is_empty() {
            return Err(WireError::Malformed(
                "request has no right operand".to_string(),
            ));
        }
        Ok(Request {
            left: Matrix::try_from(left)?,
            right: request
                .right
                .into_iter()
                .map(Matrix::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl WireMessage for Response {
    fn encode_payload(&self) -> Vec<u8> {
        let message = match self {
            Response::Product(blocks) => proto::Response {
                blocks: blocks.iter().map(proto::Matrix::from).collect(),
                error: String::new(),
            },
            Response::Error(error) => proto::Response {
                blocks: Vec::new(),
                error: error.clone(),
            },
        };
        message.encode_to_vec()
    }

    fn decode_payload(bytes: &[u8]) -> Result<Self, WireError> {
        let response = proto::Response::decode(bytes)?;
        if !response.error.is_empty() {
            return Ok(Response::Error(response.error));
        }
        Ok(Response::Product(
            response
                .blocks
                .into_iter()
                .map(Matrix::try_from)
                .collect::<Result<_, _>>()?,
        ))
    }
}
