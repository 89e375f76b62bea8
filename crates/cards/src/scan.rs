use crate::models::BarcodeType;
use serde::{Deserialize, Serialize};

/// Symbologies the camera scanner is configured to report.
pub const SUPPORTED_SYMBOLOGIES: &[&str] = &[
    "qr", "ean13", "ean8", "upc_a", "upc_e", "code39", "code93", "code128", "codabar", "itf",
    "pdf417",
];

/// Raw result handed over by the camera component.
#[derive(Debug, Deserialize, Clone)]
pub struct ScanResult {
    pub data: String,
    #[serde(rename = "type")]
    pub symbology: String,
}

/// Barcode fields a scan fills into the card form.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScannedBarcode {
    pub number: String,
    pub barcode_type: BarcodeType,
}

impl ScanResult {
    pub fn classify(self) -> Result<ScannedBarcode, String> {
        if self.data.is_empty() {
            return Err("Scan returned no data".to_string());
        }

        if !SUPPORTED_SYMBOLOGIES.contains(&self.symbology.as_str()) {
            return Err(format!("Unsupported barcode type: {}", self.symbology));
        }

        Ok(ScannedBarcode {
            barcode_type: BarcodeType::from_symbology(&self.symbology),
            number: self.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(data: &str, symbology: &str) -> ScanResult {
        ScanResult {
            data: data.to_string(),
            symbology: symbology.to_string(),
        }
    }

    #[test]
    fn test_qr_scan() {
        let scanned = scan("https://example.com/member/42", "qr").classify().unwrap();
        assert_eq!(scanned.barcode_type, BarcodeType::Qr);
        assert_eq!(scanned.number, "https://example.com/member/42");
    }

    #[test]
    fn test_one_dimensional_scans_are_linear() {
        for symbology in ["ean13", "upc_a", "code128", "itf"] {
            let scanned = scan("4006381333931", symbology).classify().unwrap();
            assert_eq!(scanned.barcode_type, BarcodeType::Linear, "{symbology}");
        }
    }

    #[test]
    fn test_pdf417_is_linear() {
        // Only `qr` maps to the 2D renderer.
        let scanned = scan("payload", "pdf417").classify().unwrap();
        assert_eq!(scanned.barcode_type, BarcodeType::Linear);
    }

    #[test]
    fn test_payload_kept_verbatim() {
        let scanned = scan("  0042 ", "code39").classify().unwrap();
        assert_eq!(scanned.number, "  0042 ");
    }

    #[test]
    fn test_empty_scan_rejected() {
        assert!(scan("", "qr").classify().is_err());
    }

    #[test]
    fn test_unsupported_symbology_rejected() {
        let err = scan("abc", "aztec").classify().unwrap_err();
        assert_eq!(err, "Unsupported barcode type: aztec");
    }

    #[test]
    fn test_symbology_names_are_exact() {
        let err = scan("abc", "QR").classify().unwrap_err();
        assert_eq!(err, "Unsupported barcode type: QR");
    }

    #[test]
    fn test_scan_result_wire_format() {
        let result: ScanResult = serde_json::from_str(r#"{"data":"123","type":"ean8"}"#).unwrap();
        assert_eq!(result.symbology, "ean8");
    }
}
