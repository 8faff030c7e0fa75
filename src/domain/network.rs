// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Only IPv4 ranges are supported: {0}")]
    NotIpv4(String),

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Host bits set in {0}; expected the network address")]
    HostBitsSet(String),

    #[error("Cannot carve /{requested} block #{index} from {parent}")]
    SubnetOutOfRange {
        parent: String,
        requested: u8,
        index: u32,
    },
}

/// IPv4 network block in CIDR notation
///
/// Invariants:
/// - Prefix length 0-32
/// - Address is the network address (no host bits set)
/// - Canonical `a.b.c.d/n` representation
///
/// # Examples
///
/// ```rust
/// use stack_topology::domain::Ipv4Cidr;
///
/// let block = Ipv4Cidr::new("10.0.0.0/16").unwrap();
/// assert_eq!(block.prefix_length(), 16);
/// assert_eq!(block.subnet(24, 3).unwrap().to_string(), "10.0.3.0/24");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix_length: u8,
}

impl Ipv4Cidr {
    /// Parse a CIDR string such as `10.0.0.0/16`
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref().trim();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| NetworkError::InvalidCidr(cidr.to_string()))?;

        let address = IpAddr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;
        let address = match address {
            IpAddr::V4(v4) => v4,
            IpAddr::V6(_) => return Err(NetworkError::NotIpv4(cidr.to_string())),
        };

        // u8 parsing alone would accept a leading '+'
        if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NetworkError::InvalidCidr(cidr.to_string()));
        }
        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        Self::from_parts(address, prefix_length).and_then(|block| {
            if block.network != address {
                Err(NetworkError::HostBitsSet(cidr.to_string()))
            } else {
                Ok(block)
            }
        })
    }

    /// Build from an address and prefix, masking off host bits
    pub fn from_parts(address: Ipv4Addr, prefix_length: u8) -> Result<Self, NetworkError> {
        if prefix_length > 32 {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        let network = Ipv4Addr::from(u32::from(address) & Self::mask(prefix_length));
        Ok(Self {
            network,
            prefix_length,
        })
    }

    fn mask(prefix_length: u8) -> u32 {
        if prefix_length == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(prefix_length))
        }
    }

    /// Network address
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of addresses covered by the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix_length))
    }

    /// Last address in the block
    pub fn last_address(&self) -> Ipv4Addr {
        let last = u64::from(u32::from(self.network)) + self.size() - 1;
        Ipv4Addr::from(last as u32)
    }

    /// How many `/new_prefix` blocks fit inside this block
    pub fn subnet_count(&self, new_prefix: u8) -> u64 {
        if new_prefix < self.prefix_length || new_prefix > 32 {
            return 0;
        }
        1u64 << u32::from(new_prefix - self.prefix_length)
    }

    /// The `index`-th `/new_prefix` block inside this block, counting from
    /// the network address upward
    pub fn subnet(&self, new_prefix: u8, index: u32) -> Result<Self, NetworkError> {
        if u64::from(index) >= self.subnet_count(new_prefix) {
            return Err(NetworkError::SubnetOutOfRange {
                parent: self.to_string(),
                requested: new_prefix,
                index,
            });
        }

        let step = 1u64 << (32 - u32::from(new_prefix));
        let base = u64::from(u32::from(self.network)) + u64::from(index) * step;
        Self::from_parts(Ipv4Addr::from(base as u32), new_prefix)
    }

    /// Whether `other` lies entirely inside this block
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_length >= self.prefix_length
            && u32::from(other.network) & Self::mask(self.prefix_length) == u32::from(self.network)
    }

    /// Whether the two blocks share any address
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_length)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(value: Ipv4Cidr) -> Self {
        value.to_string()
    }
}
