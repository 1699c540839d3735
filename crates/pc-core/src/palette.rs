//! Category color table

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Hue in degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl(pub f32, pub f32, pub f32);

impl Hsl {
    /// Convert to 8-bit RGB
    pub fn to_rgb(self) -> [u8; 3] {
        let h = self.0.rem_euclid(360.0) / 360.0;
        let s = (self.1 / 100.0).clamp(0.0, 1.0);
        let l = (self.2 / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return [v, v, v];
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let channel = |t: f32| -> u8 {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
    }
}

/// Mapping from category label to display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTable {
    pub entries: HashMap<String, Hsl>,

    /// Used for labels missing from `entries`
    pub fallback: Hsl,
}

impl Default for ColorTable {
    fn default() -> Self {
        let entries = [
            ("Load", Hsl(185.0, 56.0, 73.0)),
            ("Roll", Hsl(37.0, 50.0, 75.0)),
            ("Discharge", Hsl(325.0, 50.0, 39.0)),
            ("Optional", Hsl(10.0, 28.0, 67.0)),
            ("MissedConnection", Hsl(271.0, 39.0, 57.0)),
            ("LongLayover", Hsl(56.0, 58.0, 73.0)),
            ("TransshipmentLongStanding", Hsl(28.0, 100.0, 52.0)),
            ("CargoBox", Hsl(41.0, 75.0, 61.0)),
            ("IncorrectTransportPlan", Hsl(60.0, 86.0, 61.0)),
            ("TerminalMismatchArrivingVessel", Hsl(30.0, 100.0, 73.0)),
            ("TerminalMismatchDepartingVessel", Hsl(318.0, 65.0, 67.0)),
            ("DepartureVoyageMismatch", Hsl(274.0, 30.0, 76.0)),
            ("VesselCodeMismatch", Hsl(20.0, 49.0, 49.0)),
            ("VesselNameMismatch", Hsl(334.0, 80.0, 84.0)),
            ("MultipleMismatchGcssAndGsis", Hsl(185.0, 80.0, 45.0)),
            ("DeliveryRisk", Hsl(10.0, 30.0, 42.0)),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(label, hsl)| (label.to_string(), hsl))
                .collect(),
            fallback: Hsl(100.0, 100.0, 100.0),
        }
    }
}

impl ColorTable {
    /// An empty table where every label uses the fallback
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            ..Self::default()
        }
    }

    /// Color for a label, falling back for unknown or missing labels
    pub fn lookup(&self, label: Option<&str>) -> Hsl {
        label
            .and_then(|l| self.entries.get(l))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Labels in the table, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}
