use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::ChannelTag;
use crate::lifecycle::{self, Lifecycle};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(String);

impl MovementId {
    pub fn new() -> Self {
        MovementId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MovementId {
    fn default() -> Self {
        MovementId::new()
    }
}

impl From<&str> for MovementId {
    fn from(s: &str) -> Self {
        MovementId(s.to_string())
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a customer record owned by the CRM, not by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        CustomerId(s.to_string())
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        CustomerId(s)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sale or refund. Amounts are sign-agnostic: refunds are subtracted
/// explicitly during reconciliation, never stored as negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "venta")]
    Sale,
    #[serde(rename = "reembolso")]
    Refund,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Sale => "venta",
            MovementKind::Refund => "reembolso",
        }
    }

    pub fn parse(s: &str) -> Option<MovementKind> {
        match s.trim().to_lowercase().as_str() {
            "venta" => Some(MovementKind::Sale),
            "reembolso" => Some(MovementKind::Refund),
            _ => None,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only `Confirmed` movements participate in financial aggregates; pending
/// and cancelled rows are visible in the CRM but never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStatus {
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl MovementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementStatus::Confirmed => "confirmado",
            MovementStatus::Pending => "pendiente",
            MovementStatus::Cancelled => "cancelado",
        }
    }

    pub fn parse(s: &str) -> Option<MovementStatus> {
        match s.trim().to_lowercase().as_str() {
            "confirmado" => Some(MovementStatus::Confirmed),
            "pendiente" => Some(MovementStatus::Pending),
            "cancelado" => Some(MovementStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One CRM transaction. `date` is the business date; `created_at` is the
/// record-creation timestamp and is used only to break ties when two
/// movements share a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmMovement {
    pub id: MovementId,
    #[serde(rename = "clienteId")]
    pub customer_id: CustomerId,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "tipoMovimiento")]
    pub kind: MovementKind,
    #[serde(rename = "estado")]
    pub status: MovementStatus,
    #[serde(rename = "monto", default)]
    pub amount: f64,
    #[serde(rename = "canalAtribucion")]
    pub channel: ChannelTag,
    #[serde(rename = "tipoVenta", default, skip_serializing_if = "Option::is_none")]
    pub sale_type: Option<String>,
    #[serde(rename = "producto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(rename = "metodoPago", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(rename = "referencia", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "deletedAt", default, with = "lifecycle::as_deleted_at")]
    pub lifecycle: Lifecycle,
}

impl CrmMovement {
    pub fn new(
        customer_id: CustomerId,
        date: NaiveDate,
        kind: MovementKind,
        status: MovementStatus,
        amount: f64,
        channel: ChannelTag,
    ) -> Self {
        CrmMovement {
            id: MovementId::new(),
            customer_id,
            date,
            created_at: Some(Utc::now()),
            kind,
            status,
            amount,
            channel,
            sale_type: None,
            product: None,
            payment_method: None,
            reference: None,
            notes: None,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Chronological position for first/last-sale decisions: business date
    /// first, creation timestamp as the tie-breaker. Movements without a
    /// creation timestamp sort before those with one, matching the store's
    /// empty-string-first ordering.
    pub fn chronology(&self) -> (NaiveDate, Option<DateTime<Utc>>) {
        (self.date, self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_status_round_trip_wire_names() {
        assert_eq!(
            serde_json::to_string(&MovementKind::Refund).unwrap(),
            "\"reembolso\""
        );
        assert_eq!(
            serde_json::from_str::<MovementStatus>("\"confirmado\"").unwrap(),
            MovementStatus::Confirmed
        );
        assert_eq!(MovementKind::parse("Venta"), Some(MovementKind::Sale));
        assert_eq!(MovementStatus::parse("nope"), None);
    }

    #[test]
    fn movement_wire_format_uses_store_field_names() {
        let mov = CrmMovement::new(
            CustomerId::from("c-1"),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            MovementKind::Sale,
            MovementStatus::Confirmed,
            1500.0,
            ChannelTag::from("WHATSAPP"),
        );
        let json = serde_json::to_value(&mov).unwrap();
        assert_eq!(json["clienteId"], "c-1");
        assert_eq!(json["fecha"], "2025-03-10");
        assert_eq!(json["tipoMovimiento"], "venta");
        assert_eq!(json["estado"], "confirmado");
        assert_eq!(json["monto"], 1500.0);
        assert_eq!(json["canalAtribucion"], "WHATSAPP");
        // empty optionals stay off the wire
        assert!(json.get("producto").is_none());
    }

    #[test]
    fn chronology_breaks_date_ties_with_created_at() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut a = CrmMovement::new(
            CustomerId::from("c-1"),
            date,
            MovementKind::Sale,
            MovementStatus::Confirmed,
            100.0,
            ChannelTag::from("WHATSAPP"),
        );
        let mut b = a.clone();
        a.created_at = None;
        b.created_at = Some(chrono::Utc::now());
        assert!(a.chronology() < b.chronology());
    }
}
