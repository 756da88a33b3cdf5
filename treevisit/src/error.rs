use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error")]
    Io(#[from] io::Error),
    #[error("the operation is not supported by a synthesized directory entry")]
    UnsupportedOperation,
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            Error::UnsupportedOperation => io::Error::new(io::ErrorKind::Unsupported, err),
        }
    }
}
