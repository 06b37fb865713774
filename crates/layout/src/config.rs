use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use shared::domain::{CardId, LabelVariant};

use crate::{error::LayoutError, interpolate::BreakpointTable};

/// Every designer-authored sizing constant for the card grid, in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Viewports at or below this width get abridged labels.
    pub label_threshold: f64,
    pub cards: CardLayouts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayouts {
    pub showreel: CardLayout,
    pub experiments: CardLayout,
    pub playground: CardLayout,
    pub contact: CardLayout,
}

impl CardLayouts {
    pub fn get(&self, card: CardId) -> &CardLayout {
        match card {
            CardId::Showreel => &self.showreel,
            CardId::Experiments => &self.experiments,
            CardId::Playground => &self.playground,
            CardId::Contact => &self.contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    pub card_width: BreakpointTable,
    pub image_height: BreakpointTable,
    pub header_height: f64,
    pub bottom_area_height: f64,
    pub labels: CardLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLabels {
    pub full: String,
    pub abridged: String,
}

impl CardLabels {
    pub fn for_variant(&self, variant: LabelVariant) -> &str {
        match variant {
            LabelVariant::Full => &self.full,
            LabelVariant::Abridged => &self.abridged,
        }
    }
}

impl LayoutConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, LayoutError> {
        let config: Self = toml::from_str(raw).map_err(|e| LayoutError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| LayoutError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Breakpoint tables validate themselves; this covers the scalar
    /// constants next to them.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.label_threshold.is_finite() {
            return Err(LayoutError::InvalidConfiguration(
                "label_threshold must be finite".into(),
            ));
        }
        for card in CardId::ALL {
            let layout = self.cards.get(card);
            for (name, value) in [
                ("header_height", layout.header_height),
                ("bottom_area_height", layout.bottom_area_height),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(LayoutError::InvalidConfiguration(format!(
                        "{card}.{name} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_threshold: 640.0,
            cards: CardLayouts {
                showreel: card(
                    &[(320.0, 288.0), (768.0, 340.0), (1280.0, 420.0), (1920.0, 520.0)],
                    &[(320.0, 150.0), (768.0, 190.0), (1280.0, 236.0), (1920.0, 300.0)],
                    48.0,
                    64.0,
                    ("Watch the showreel", "Showreel"),
                ),
                experiments: card(
                    &[(320.0, 288.0), (768.0, 320.0), (1280.0, 380.0), (1920.0, 460.0)],
                    &[(320.0, 140.0), (768.0, 170.0), (1280.0, 210.0), (1920.0, 260.0)],
                    48.0,
                    56.0,
                    ("Shader experiments", "Shaders"),
                ),
                playground: card(
                    &[(320.0, 288.0), (768.0, 320.0), (1280.0, 380.0), (1920.0, 460.0)],
                    &[(320.0, 140.0), (768.0, 170.0), (1280.0, 210.0), (1920.0, 260.0)],
                    48.0,
                    56.0,
                    ("Interactive playground", "Play"),
                ),
                contact: card(
                    &[(320.0, 288.0), (1280.0, 360.0)],
                    &[(320.0, 96.0), (1280.0, 128.0)],
                    40.0,
                    72.0,
                    ("Leave feedback or a voice memo", "Feedback"),
                ),
            },
        }
    }
}

fn card(
    card_width: &[(f64, f64)],
    image_height: &[(f64, f64)],
    header_height: f64,
    bottom_area_height: f64,
    (full, abridged): (&str, &str),
) -> CardLayout {
    CardLayout {
        card_width: BreakpointTable::from_sorted_literals(card_width),
        image_height: BreakpointTable::from_sorted_literals(image_height),
        header_height,
        bottom_area_height,
        labels: CardLabels {
            full: full.to_string(),
            abridged: abridged.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
