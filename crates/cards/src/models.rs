use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeType {
    Qr,
    Linear,
}

/// Symbology a renderer should draw for a card.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum RenderFormat {
    #[serde(rename = "QR")]
    Qr,
    #[serde(rename = "CODE128")]
    Code128,
}

impl BarcodeType {
    /// Anything the scanner reports other than `qr` is drawn as a 1D code.
    pub fn from_symbology(symbology: &str) -> Self {
        if symbology == "qr" {
            BarcodeType::Qr
        } else {
            BarcodeType::Linear
        }
    }

    pub fn render_format(self) -> RenderFormat {
        match self {
            BarcodeType::Qr => RenderFormat::Qr,
            BarcodeType::Linear => RenderFormat::Code128,
        }
    }
}

/// One stored barcode credential. Field names match the persisted JSON.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub number: String,
    pub barcode_type: BarcodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Input of the add/edit form. `id` and `createdAt` are never taken from it.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CardForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_number"))]
    pub number: String,
    #[serde(default)]
    pub barcode_type: Option<BarcodeType>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

const MISSING_BARCODE: &str = "Barcode data is missing.";

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rejected("blank", "Please enter a card name"));
    }
    Ok(())
}

// Scanned payloads are opaque, whitespace included.
fn validate_number(number: &str) -> Result<(), ValidationError> {
    if number.is_empty() {
        return Err(rejected("empty", MISSING_BARCODE));
    }
    Ok(())
}

fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid card".to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CardForm {
    /// Validates the form and builds the card to persist.
    pub fn into_card(self, id: String, created_at: i64) -> Result<Card, String> {
        self.validate().map_err(|e| first_message(&e))?;
        let barcode_type = self
            .barcode_type
            .ok_or_else(|| MISSING_BARCODE.to_string())?;

        Ok(Card {
            id,
            name: self.name.trim().to_string(),
            number: self.number,
            barcode_type,
            color: trimmed(self.color),
            notes: trimmed(self.notes),
            created_at,
        })
    }
}

/// Detail screen payload: the card plus how to draw its code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    pub render_format: RenderFormat,
}

impl From<Card> for CardDetail {
    fn from(card: Card) -> Self {
        let render_format = card.barcode_type.render_format();
        CardDetail { card, render_format }
    }
}
