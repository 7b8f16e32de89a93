// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Port classification for chain graphs.

mod chain_port_type;
mod chain_ports;

pub use chain_port_type::{ChainPortType, PortDirection};
pub use chain_ports::{chain_ports, ChainPort};
