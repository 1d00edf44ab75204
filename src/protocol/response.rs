//! Response definitions
//!
//! Represents replies sent back to clients.

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK\n`
    Ok,

    /// `OK\n<value>\n`
    Value(Vec<u8>),

    /// `NOTFOUND\n`
    NotFound,

    /// `ERROR\n`
    Error,
}

impl Response {
    /// Encode the response into its wire bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Response::Ok => b"OK\n".to_vec(),
            Response::Value(value) => {
                let mut bytes = Vec::with_capacity(value.len() + 4);
                bytes.extend_from_slice(b"OK\n");
                bytes.extend_from_slice(value);
                bytes.push(b'\n');
                bytes
            }
            Response::NotFound => b"NOTFOUND\n".to_vec(),
            Response::Error => b"ERROR\n".to_vec(),
        }
    }
}
