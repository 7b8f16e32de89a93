// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Data direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

/// Kind of a port in a chain graph.
///
/// Data ports are actual; controls exposed as ports are virtual. Every kind,
/// virtual ones included, has a data direction used for wiring.
///
/// # Variants
/// * `InputPort` - Data input, wire code 1
/// * `OutputPort` - Data output, wire code 2
/// * `InputControlAsPort` - Control exposed as an input, wire code 3
/// * `OutputControlAsPort` - Control exposed as an output, wire code 4
///
/// Wire codes are stable and never renumbered.
///
/// # Example
/// ```
/// use the_chainworks::ports::{ChainPortType, PortDirection};
///
/// let port_type = ChainPortType::value_of_code(3).unwrap();
/// assert_eq!(port_type, ChainPortType::InputControlAsPort);
/// assert!(port_type.is_virtual());
/// assert_eq!(port_type.actual_port_type(), PortDirection::Input);
/// assert_eq!(ChainPortType::value_of_code(99), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPortType {
    InputPort,
    OutputPort,
    InputControlAsPort,
    OutputControlAsPort,
}

impl ChainPortType {
    pub const ALL: [ChainPortType; 4] = [
        ChainPortType::InputPort,
        ChainPortType::OutputPort,
        ChainPortType::InputControlAsPort,
        ChainPortType::OutputControlAsPort,
    ];

    pub fn code(self) -> i32 {
        match self {
            ChainPortType::InputPort => 1,
            ChainPortType::OutputPort => 2,
            ChainPortType::InputControlAsPort => 3,
            ChainPortType::OutputControlAsPort => 4,
        }
    }

    pub fn value_of_code(code: i32) -> Option<ChainPortType> {
        Self::ALL.into_iter().find(|port_type| port_type.code() == code)
    }

    pub fn is_actual(self) -> bool {
        matches!(self, ChainPortType::InputPort | ChainPortType::OutputPort)
    }

    pub fn is_virtual(self) -> bool {
        !self.is_actual()
    }

    pub fn actual_port_type(self) -> PortDirection {
        match self {
            ChainPortType::InputPort | ChainPortType::InputControlAsPort => PortDirection::Input,
            ChainPortType::OutputPort | ChainPortType::OutputControlAsPort => PortDirection::Output,
        }
    }
}

impl TryFrom<i32> for ChainPortType {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::value_of_code(code).ok_or(code)
    }
}

impl Display for ChainPortType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            ChainPortType::InputPort => "input port",
            ChainPortType::OutputPort => "output port",
            ChainPortType::InputControlAsPort => "input control as port",
            ChainPortType::OutputControlAsPort => "output control as port",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        struct TestCase {
            code: i32,
            expected: Option<ChainPortType>,
            actual: bool,
            direction: Option<PortDirection>,
        }

        let test_cases = vec![
            TestCase {
                code: 1,
                expected: Some(ChainPortType::InputPort),
                actual: true,
                direction: Some(PortDirection::Input),
            },
            TestCase {
                code: 2,
                expected: Some(ChainPortType::OutputPort),
                actual: true,
                direction: Some(PortDirection::Output),
            },
            TestCase {
                code: 3,
                expected: Some(ChainPortType::InputControlAsPort),
                actual: false,
                direction: Some(PortDirection::Input),
            },
            TestCase {
                code: 4,
                expected: Some(ChainPortType::OutputControlAsPort),
                actual: false,
                direction: Some(PortDirection::Output),
            },
            TestCase {
                code: 0,
                expected: None,
                actual: false,
                direction: None,
            },
            TestCase {
                code: 99,
                expected: None,
                actual: false,
                direction: None,
            },
        ];

        for tc in test_cases {
            let port_type = ChainPortType::value_of_code(tc.code);
            assert_eq!(port_type, tc.expected, "code {}", tc.code);
            if let Some(port_type) = port_type {
                assert_eq!(port_type.code(), tc.code);
                assert_eq!(port_type.is_actual(), tc.actual, "code {}", tc.code);
                assert_eq!(port_type.is_virtual(), !tc.actual, "code {}", tc.code);
                assert_eq!(Some(port_type.actual_port_type()), tc.direction, "code {}", tc.code);
            }
        }
    }

    #[test]
    fn test_virtual_and_actual_split_evenly() {
        let virtual_count = ChainPortType::ALL.iter().filter(|t| t.is_virtual()).count();
        assert_eq!(virtual_count, 2);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(ChainPortType::try_from(2), Ok(ChainPortType::OutputPort));
        assert_eq!(ChainPortType::try_from(-1), Err(-1));
    }
}
