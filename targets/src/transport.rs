//! Transport selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network transport used by [`SocketTarget`](crate::SocketTarget)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// One datagram per request
    #[default]
    Udp,
    /// One two-byte length-prefixed frame per request
    Tcp,
}

impl Transport {
    /// Returns the identifier string for this transport.
    pub fn id(&self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unknown transport name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported transport '{0}', expected udp or tcp")]
pub struct ParseTransportError(String);

impl FromStr for Transport {
    type Err = ParseTransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Transport::Udp),
            "tcp" => Ok(Transport::Tcp),
            _ => Err(ParseTransportError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_from_str() {
        assert_eq!("udp".parse::<Transport>().unwrap(), Transport::Udp);
        assert_eq!("TCP".parse::<Transport>().unwrap(), Transport::Tcp);

        let err = "quic".parse::<Transport>().unwrap_err();
        assert!(err.to_string().contains("quic"));
    }

    #[test]
    fn test_transport_serde() {
        assert_eq!(serde_json::to_string(&Transport::Tcp).unwrap(), "\"tcp\"");
        let transport: Transport = serde_json::from_str("\"udp\"").unwrap();
        assert_eq!(transport, Transport::Udp);
        assert_eq!(Transport::default().to_string(), "udp");
    }
}
