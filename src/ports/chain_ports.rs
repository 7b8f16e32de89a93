// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ChainPortType, PortDirection};
use crate::loader::ExecutorSpecification;
use serde::Serialize;

/// One connectable port of an executor inside a chain graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainPort {
    pub name: String,
    pub value_type: String,
    pub port_type: ChainPortType,
}

impl ChainPort {
    pub fn direction(&self) -> PortDirection {
        self.port_type.actual_port_type()
    }
}

/// Ports of `specification` as a chain graph sees them.
///
/// Input ports come first, then output ports. With `expose_controls`, every
/// control whose name is not already taken by an input port follows as an
/// [`ChainPortType::InputControlAsPort`].
pub fn chain_ports(specification: &ExecutorSpecification, expose_controls: bool) -> Vec<ChainPort> {
    let mut ports: Vec<ChainPort> = specification
        .in_ports()
        .iter()
        .map(|port| ChainPort {
            name: port.name.clone(),
            value_type: port.value_type.clone(),
            port_type: ChainPortType::InputPort,
        })
        .chain(specification.out_ports().iter().map(|port| ChainPort {
            name: port.name.clone(),
            value_type: port.value_type.clone(),
            port_type: ChainPortType::OutputPort,
        }))
        .collect();

    if expose_controls {
        specification.with_controls(|controls| {
            for control in controls {
                let taken = specification
                    .in_ports()
                    .iter()
                    .any(|port| port.name == control.name);
                if !taken {
                    ports.push(ChainPort {
                        name: control.name.clone(),
                        value_type: control.value_type.clone(),
                        port_type: ChainPortType::InputControlAsPort,
                    });
                }
            }
        });
    }
    ports
}
