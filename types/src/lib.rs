//! Shared types for distributed matrix multiplication.
//!
//! `matmul-types` holds everything both sides of a connection agree on:
//!
//! - [`Matrix`] and the [`multiply`] kernel
//! - the [`Request`] / [`Response`] payloads, encoded as protobuf
//! - [`FrameCodec`], which frames payloads as `[u64 BE length][body]`
//!
//! # Example
//!
//! ```no_run
//! use matmul_types::{FrameCodec, Matrix, Request, Response};
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codec = FrameCodec::new();
//!     let mut stream = TcpStream::connect("127.0.0.1:5001").await?;
//!
//!     let request = Request {
//!         left: Matrix::identity(2),
//!         right: vec![Matrix::from_rows(vec![vec![1, 2], vec![3, 4]])?],
//!     };
//!     codec.write(&mut stream, &request).await?;
//!
//!     let response: Response = codec.read(&mut stream).await?;
//!     println!("{:?}", response);
//!     Ok(())
//! }
//! ```

mod error;
mod frame;
mod matrix;
mod message;

pub use error::{Error, WireError};
pub use frame::{FrameCodec, DEFAULT_MAX_FRAME_LEN, HEADER_LEN};
pub use matrix::{multiply, Matrix};
pub use message::{proto, Request, Response, WireMessage};
