//! Order lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status as stored in the `state` field
///
/// ```text
/// pendiente ─► enProceso ─► enCamino ─► porCobrar ─► completada
///     │            │           │           │
///     └────────────┴───────────┴───────────┴──────► cancelada
/// ```
///
/// Any non-terminal status may move to any other status; `completada` and
/// `cancelada` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    /// Received, not started
    #[default]
    Pendiente,
    /// Being prepared in the kitchen
    EnProceso,
    /// Out for delivery
    EnCamino,
    /// Waiting at the cashier
    PorCobrar,
    /// Settled (only reachable through checkout)
    Completada,
    /// Cancelled
    Cancelada,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pendiente,
        OrderStatus::EnProceso,
        OrderStatus::EnCamino,
        OrderStatus::PorCobrar,
        OrderStatus::Completada,
        OrderStatus::Cancelada,
    ];

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completada | OrderStatus::Cancelada)
    }

    /// Shown on the kitchen board
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && *self != OrderStatus::PorCobrar
    }

    /// Wire name (same as the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EnProceso => "enProceso",
            OrderStatus::EnCamino => "enCamino",
            OrderStatus::PorCobrar => "porCobrar",
            OrderStatus::Completada => "completada",
            OrderStatus::Cancelada => "cancelada",
        }
    }

    /// Display label for operators
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "Pendiente",
            OrderStatus::EnProceso => "En proceso",
            OrderStatus::EnCamino => "En camino",
            OrderStatus::PorCobrar => "Por cobrar",
            OrderStatus::Completada => "Completada",
            OrderStatus::Cancelada => "Cancelada",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
